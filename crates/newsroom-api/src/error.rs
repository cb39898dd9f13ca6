use thiserror::Error;

/// Everything that can go wrong talking to the portal REST API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Error getting news list")]
    ListFailed,

    #[error("Error getting news list by target name")]
    TargetListFailed,

    #[error("{message} (status {status})")]
    Rejected { message: String, status: u16 },

    #[error("Request failed with status {0}")]
    Status(u16),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Pending deletion store error: {0}")]
    UndoStore(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::Status(status) => Some(*status),
            ApiError::NetworkError(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
