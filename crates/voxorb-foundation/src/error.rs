use thiserror::Error;

/// Errors raised while acquiring or running the microphone energy source.
///
/// Acquisition failures are recoverable: the caller may retry later.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No input device available")]
    NoDevice,

    #[error("Input device not found: {name}")]
    DeviceNotFound { name: String },

    #[error("Audio capture is not supported in this environment")]
    Unsupported,

    #[error("Sample format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("Device enumeration error: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("Default stream config error: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Build stream error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Play stream error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}
