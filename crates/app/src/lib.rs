pub mod display;
pub mod orb;
pub mod runtime;
pub mod settings;

pub use orb::VoiceOrb;
pub use runtime::{OrbRuntime, RuntimeOptions};
pub use settings::OrbSettings;
