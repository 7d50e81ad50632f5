pub mod capture;
pub mod energy;

// Public API
pub use capture::{input_device_names, is_supported, LevelCell, MicCaptureThread, MicSource};
