use thiserror::Error;

#[derive(Error, Debug)]
pub enum BskyError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Rate limited by {0}")]
    RateLimit(String),

    #[error("Post {operation} failed: {message}")]
    Post { operation: String, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl BskyError {
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn http(status: u16, msg: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: msg.into(),
        }
    }

    pub fn post(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Post {
            operation: operation.into(),
            message: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BskyError>;
