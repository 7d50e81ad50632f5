pub mod controller;
pub mod error;
pub mod hooks;
pub mod player;

pub use controller::{AnimationController, ControllerLimits};
pub use error::ControllerError;
pub use hooks::ControllerHooks;
pub use player::AnimatedPlayer;
