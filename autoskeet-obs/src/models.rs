use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObsInstance {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for ObsInstance {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4455,
            password: None,
        }
    }
}
