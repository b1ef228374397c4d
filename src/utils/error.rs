use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Invalid file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: String },

    #[error("Invalid section name: {reason}")]
    InvalidSectionName { reason: String },

    #[error("Too many sections: {given} payloads given but only {capacity} section names exist")]
    TooManySections { given: usize, capacity: usize },

    #[error("File already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Upload to {url} rejected with status {status}")]
    UploadRejected { url: String, status: u16 },

    #[error("Delivery of '{file}' failed: {message}")]
    Delivery { file: String, message: String },

    #[error("{failed} of {total} sections failed to deliver; first failure: {first}")]
    PartialFailure {
        failed: usize,
        total: usize,
        first: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl SaveError {
    /// Input and configuration problems, as opposed to failures of the delivery target.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            SaveError::InvalidFileName { .. }
                | SaveError::InvalidSectionName { .. }
                | SaveError::TooManySections { .. }
                | SaveError::ConfigError { .. }
                | SaveError::InvalidConfigValueError { .. }
                | SaveError::Url(_)
                | SaveError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SaveError>;
