use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("No animated player attached")]
    NotReady,
}
