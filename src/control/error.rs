use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("control options must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
