use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VadError {
    #[error("No audio source attached")]
    NotConnected,
}
