pub mod config;
pub mod detector;
pub mod error;
pub mod registry;
pub mod source;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use config::{VadConfig, VadConfigPatch};
pub use detector::VoiceActivityDetector;
pub use error::VadError;
pub use registry::EventRegistry;
pub use source::LevelSource;
pub use types::{EventKind, VadEvent, VadMetrics};
