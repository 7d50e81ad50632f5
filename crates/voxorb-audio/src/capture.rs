use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use voxorb_foundation::AudioError;
use voxorb_vad::LevelSource;

use crate::energy;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Capability check: true iff the environment exposes an input device.
pub fn is_supported() -> bool {
    cpal::default_host().default_input_device().is_some()
}

/// Names of all available input devices.
pub fn input_device_names() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    for device in host.input_devices()? {
        if let Ok(name) = device.name() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Lock-free cell holding the latest normalized energy level.
///
/// The capture callback stores into it, the analysis tick loads from it;
/// stale reads are fine, torn reads are not possible.
#[derive(Default)]
pub struct LevelCell(AtomicU32);

impl LevelCell {
    pub fn new() -> Self {
        Self(AtomicU32::new(0.0f32.to_bits()))
    }

    pub fn store(&self, level: f32) {
        self.0.store(level.to_bits(), Ordering::Relaxed);
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Microphone-backed [`LevelSource`] reading the shared level cell.
pub struct MicSource {
    cell: Arc<LevelCell>,
}

impl LevelSource for MicSource {
    fn level(&self) -> f32 {
        self.cell.load()
    }
}

/// A dedicated OS thread owning the cpal input stream.
///
/// The stream is not `Send`, so it lives entirely inside the thread; the
/// data path out is the shared [`LevelCell`]. Dropping the handle stops
/// the thread, so the device is released on every exit path.
pub struct MicCaptureThread {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl MicCaptureThread {
    /// Open the requested (or default) input device and start capturing.
    ///
    /// Blocks until the stream is running or acquisition failed, bounded
    /// by a startup timeout.
    pub fn spawn(device_name: Option<String>) -> Result<(Self, MicSource), AudioError> {
        let cell = Arc::new(LevelCell::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<String, AudioError>>(1);

        let thread_cell = cell.clone();
        let thread_shutdown = shutdown.clone();
        let handle = thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || {
                let stream = match open_stream(device_name.as_deref(), thread_cell) {
                    Ok((stream, device)) => {
                        let _ = ready_tx.send(Ok(device));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                while !thread_shutdown.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(50));
                }

                drop(stream);
                tracing::debug!("mic capture thread shut down");
            })
            .map_err(|e| AudioError::Fatal(format!("Failed to spawn capture thread: {e}")))?;

        match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(Ok(device)) => {
                tracing::info!(%device, "microphone capture started");
                Ok((
                    Self {
                        handle: Some(handle),
                        shutdown,
                    },
                    MicSource { cell },
                ))
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                shutdown.store(true, Ordering::SeqCst);
                Err(AudioError::Fatal(
                    "Capture thread did not report readiness in time".to_string(),
                ))
            }
        }
    }

    /// Signal the thread to release the device and wait for it to exit.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MicCaptureThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn resolve_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device, AudioError> {
    match name {
        Some(wanted) => {
            for device in host.input_devices()? {
                if device.name().map(|n| n == wanted).unwrap_or(false) {
                    return Ok(device);
                }
            }
            Err(AudioError::DeviceNotFound {
                name: wanted.to_string(),
            })
        }
        None => host.default_input_device().ok_or(AudioError::NoDevice),
    }
}

fn open_stream(
    device_name: Option<&str>,
    cell: Arc<LevelCell>,
) -> Result<(cpal::Stream, String), AudioError> {
    let host = cpal::default_host();
    let device = resolve_device(&host, device_name)?;
    let device_label = device.name().unwrap_or_else(|_| "<unknown>".to_string());

    let supported = device.default_input_config()?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();

    tracing::debug!(
        device = %device_label,
        ?sample_format,
        sample_rate = config.sample_rate.0,
        channels = config.channels,
        "opening input stream"
    );

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                cell.store(energy::rms(data));
            },
            log_stream_error,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                cell.store(energy::rms_i16(data));
            },
            log_stream_error,
            None,
        )?,
        SampleFormat::U16 => device.build_input_stream(
            &config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                cell.store(energy::rms_u16(data));
            },
            log_stream_error,
            None,
        )?,
        other => {
            return Err(AudioError::FormatNotSupported {
                format: format!("{other:?}"),
            })
        }
    };

    stream.play()?;
    Ok((stream, device_label))
}

fn log_stream_error(err: cpal::StreamError) {
    tracing::error!(%err, "audio stream error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_cell_round_trips() {
        let cell = LevelCell::new();
        assert_eq!(cell.load(), 0.0);

        cell.store(0.42);
        assert_eq!(cell.load(), 0.42);

        cell.store(0.0);
        assert_eq!(cell.load(), 0.0);
    }

    #[test]
    fn mic_source_reads_the_shared_cell() {
        let cell = Arc::new(LevelCell::new());
        let source = MicSource { cell: cell.clone() };

        cell.store(0.8);
        assert_eq!(source.level(), 0.8);
    }
}
