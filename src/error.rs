use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A subprocess exited unsuccessfully. Both fields are already redacted.
    #[error("command '{command}' failed: {detail}")]
    Shell { command: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP status error: {0}")]
    HttpStatus(String),

    #[error("GPG error: {0}")]
    Gpg(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Sync(String),

    #[error("{operation} failed: {message}")]
    Operation { operation: String, message: String },
}

impl Error {
    /// Wrap this error under an operation label, e.g. "Sync pull failed: ...".
    pub fn during(self, operation: &str) -> Self {
        Error::Operation {
            operation: operation.to_string(),
            message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
