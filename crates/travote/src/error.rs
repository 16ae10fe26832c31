use thiserror::Error;

#[derive(Error, Debug)]
pub enum TravoteError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] crate::geo::InvalidInput),
    #[error("Storage error: {0}")]
    Storage(#[from] crate::store::StorageError),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] crate::store::DeserializationError),
    #[error("Auth error: {0}")]
    Auth(#[from] crate::auth::AuthError),
    #[error("Data processing error: {0}")]
    DataProcessing(#[from] travote_data::DataError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TravoteError>;
