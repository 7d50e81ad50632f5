use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use voxorb_animation::AnimationController;
use voxorb_foundation::SharedClock;
use voxorb_vad::{
    EventKind, LevelSource, VadConfig, VadConfigPatch, VadError, VadEvent, VadMetrics,
    VoiceActivityDetector,
};

/// Gain applied to the smoothed level before it drives the controller.
const VOICE_LEVEL_GAIN: f32 = 3.0;
const VOICE_LEVEL_FLOOR: f32 = 0.1;
const VOICE_LEVEL_CEIL: f32 = 3.0;

/// How long a manual level adjustment holds off automatic updates.
const MANUAL_OVERRIDE_GRACE: Duration = Duration::from_secs(2);

/// The orchestrator: one detector/controller pair wired together.
///
/// An explicit context object the host constructs and passes around; there
/// is no process-wide instance. Construction registers the listeners that
/// bind detector transitions to controller calls:
///
/// - voice-start → `play()`
/// - voice-end → `pause()`
/// - voice-level → `set_voice_level(clamp(smoothed * 3, 0.1, 3))`
///
/// Controller failures before a player is attached are ignored, so the
/// detector can run headless.
pub struct VoiceOrb {
    detector: Arc<Mutex<VoiceActivityDetector>>,
    controller: Arc<Mutex<AnimationController>>,
    override_until: Arc<Mutex<Option<Instant>>>,
    clock: SharedClock,
}

impl VoiceOrb {
    pub fn new(config: VadConfig, controller: AnimationController, clock: SharedClock) -> Self {
        let detector = Arc::new(Mutex::new(VoiceActivityDetector::new(config)));
        let controller = Arc::new(Mutex::new(controller));
        let override_until: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

        {
            let mut d = detector.lock();

            let c = controller.clone();
            d.on(EventKind::VoiceStart, move |_| {
                if let Err(e) = c.lock().play() {
                    tracing::debug!(%e, "voice-start ignored by controller");
                }
            });

            let c = controller.clone();
            d.on(EventKind::VoiceEnd, move |_| {
                if let Err(e) = c.lock().pause() {
                    tracing::debug!(%e, "voice-end ignored by controller");
                }
            });

            let c = controller.clone();
            let deadline = override_until.clone();
            let level_clock = clock.clone();
            d.on(EventKind::VoiceLevel, move |event| {
                let VadEvent::VoiceLevel { smoothed, .. } = event else {
                    return;
                };

                let now = level_clock.now();
                {
                    let mut guard = deadline.lock();
                    if let Some(until) = *guard {
                        if now < until {
                            return;
                        }
                        *guard = None;
                    }
                }

                let level = (smoothed * VOICE_LEVEL_GAIN).clamp(VOICE_LEVEL_FLOOR, VOICE_LEVEL_CEIL);
                let _ = c.lock().set_voice_level(level);
            });
        }

        Self {
            detector,
            controller,
            override_until,
            clock,
        }
    }

    /// Merge a partial detector configuration; effective on the next tick.
    pub fn configure(&self, patch: VadConfigPatch) {
        self.detector.lock().configure(patch);
    }

    /// Attach an energy source to the detector.
    pub fn connect(&self, source: Box<dyn LevelSource>) {
        self.detector.lock().attach_source(source);
    }

    /// Stop analysis and release the energy source.
    pub fn disconnect(&self) {
        self.detector.lock().disconnect(self.clock.now());
    }

    pub fn start(&self) -> Result<(), VadError> {
        self.detector.lock().start(self.clock.now())
    }

    pub fn stop(&self) {
        self.detector.lock().stop(self.clock.now());
    }

    /// One analysis step against the attached source.
    pub fn tick(&self) {
        self.detector.lock().tick(self.clock.now());
    }

    /// Manually drive the visual level. Automatic (VAD-driven) level
    /// updates are suspended for a short grace window so the adjustment
    /// sticks, then resume on their own.
    pub fn set_voice_level(&self, level: f32) -> Result<(), voxorb_animation::ControllerError> {
        *self.override_until.lock() = Some(self.clock.now() + MANUAL_OVERRIDE_GRACE);
        self.controller.lock().set_voice_level(level)
    }

    /// Register an external listener for detector events.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: FnMut(&VadEvent) + Send + 'static,
    {
        self.detector.lock().on(kind, listener);
    }

    /// Surface a runtime failure to `Error` listeners.
    pub fn report_error(&self, message: impl Into<String>) {
        self.detector.lock().report_error(message);
    }

    pub fn is_active(&self) -> bool {
        self.detector.lock().is_active()
    }

    pub fn is_connected(&self) -> bool {
        self.detector.lock().is_connected()
    }

    pub fn is_voice_detected(&self) -> bool {
        self.detector.lock().is_voice_detected()
    }

    pub fn metrics(&self) -> VadMetrics {
        self.detector.lock().metrics().clone()
    }

    /// Shared handle to the wrapped controller, e.g. to install hooks or a
    /// player after construction.
    pub fn controller(&self) -> Arc<Mutex<AnimationController>> {
        self.controller.clone()
    }
}
