use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use voxorb_audio::MicCaptureThread;
use voxorb_foundation::AudioError;
use voxorb_vad::VadError;

use crate::orb::VoiceOrb;

/// Options for the analysis runtime.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Input device name; `None` uses the system default.
    pub device: Option<String>,
    /// Analysis tick period. ~16 ms approximates a display refresh.
    pub tick: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            device: None,
            tick: Duration::from_millis(16),
        }
    }
}

/// Drives the cooperative analysis loop and owns the capture thread.
///
/// The loop is a single tokio task; `active` is checked at the head of
/// every iteration and again before re-arming, so a `stop()` that lands
/// mid-tick prevents the next tick from running.
pub struct OrbRuntime {
    orb: Arc<VoiceOrb>,
    options: RuntimeOptions,
    capture: Option<MicCaptureThread>,
    loop_handle: Option<JoinHandle<()>>,
}

impl OrbRuntime {
    pub fn new(orb: Arc<VoiceOrb>, options: RuntimeOptions) -> Self {
        Self {
            orb,
            options,
            capture: None,
            loop_handle: None,
        }
    }

    /// Acquire the microphone and attach it to the detector.
    ///
    /// Failure is surfaced both as the returned error and as an `Error`
    /// event; the runtime stays restartable and the caller may retry.
    pub fn connect(&mut self) -> Result<(), AudioError> {
        match MicCaptureThread::spawn(self.options.device.clone()) {
            Ok((capture, source)) => {
                self.capture = Some(capture);
                self.orb.connect(Box::new(source));
                Ok(())
            }
            Err(e) => {
                self.orb.report_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Start detection and the analysis loop.
    ///
    /// Idempotent: while a loop is already running this neither resets
    /// detector state nor spawns a second loop.
    pub fn start(&mut self) -> Result<(), VadError> {
        self.orb.start()?;

        if let Some(handle) = &self.loop_handle {
            if !handle.is_finished() {
                return Ok(());
            }
        }

        let orb = self.orb.clone();
        let tick = self.options.tick;
        self.loop_handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if !orb.is_active() {
                    break;
                }
                orb.tick();
                if !orb.is_active() {
                    break;
                }
            }
            tracing::debug!("analysis loop exited");
        }));
        Ok(())
    }

    /// Stop detection and wait for the loop task to wind down.
    pub async fn stop(&mut self) {
        self.orb.stop();
        if let Some(handle) = self.loop_handle.take() {
            let _ = handle.await;
        }
    }

    /// Full teardown: stop, release the detector's source, and join the
    /// capture thread.
    pub async fn shutdown(mut self) {
        self.stop().await;
        self.orb.disconnect();
        if let Some(mut capture) = self.capture.take() {
            capture.stop();
        }
        tracing::info!("runtime shutdown complete");
    }
}
