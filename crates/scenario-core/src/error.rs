use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// No response was received (timeout, refused connection, broken body).
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// The backend answered with a non-success status; `body` is its text.
    #[error("Backend failure ({status}): {body}")]
    BackendFailure { status: u16, body: String },

    /// Success status, but the body does not have the documented shape.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DashboardError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        DashboardError::MalformedPayload(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        DashboardError::InvalidConfig(msg.into())
    }

    /// True for failures the backend itself reported.
    pub fn is_backend(&self) -> bool {
        matches!(self, DashboardError::BackendFailure { .. })
    }

    /// The string shown to the operator.
    ///
    /// Backend bodies are passed through verbatim; a blank body falls back to
    /// the status code so the banner is never empty.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::BackendFailure { status, body } => {
                if body.trim().is_empty() {
                    format!("backend returned status {}", status)
                } else {
                    body.clone()
                }
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::MalformedPayload(e.to_string())
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
