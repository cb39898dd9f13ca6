use newsroom_api::ApiError;
use thiserror::Error;

/// All the ways things can go wrong above the REST layer
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("View {0} is not mounted")]
    NotMounted(String),

    #[error("Unknown view template: {0}")]
    UnknownTemplate(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
