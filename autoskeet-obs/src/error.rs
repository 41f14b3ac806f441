use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Instance not connected: {0}:{1}")]
    InstanceNotConnected(String, u16),
}

pub type Result<T> = std::result::Result<T, ObsError>;
