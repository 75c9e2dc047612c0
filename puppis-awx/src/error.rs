//! Error type for AWX API operations

/// Error returned by the AWX client
#[derive(Debug, thiserror::Error)]
pub enum AwxError {
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication failed ({status}): {detail}")]
    Auth { status: u16, detail: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("AWX API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl AwxError {
    /// Whether this error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwxError::NotFound(_))
    }
}

pub type AwxResult<T> = Result<T, AwxError>;
