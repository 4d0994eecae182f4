use thiserror::Error;

/// Failure reported by the host store while persisting a setting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to store setting `{setting}`: {message}")]
pub struct PersistError {
    pub setting: String,
    pub message: String,
}

impl PersistError {
    pub fn new(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no item is selected; cannot determine the project")]
    NoCurrentItem,
    #[error("advanced edit rejected: {}", .0.join("; "))]
    InvalidEdit(Vec<String>),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("settings do not match their type: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] anyhow::Error),
    #[error("failed to canonicalize settings: {0}")]
    Canonicalize(String),
}
