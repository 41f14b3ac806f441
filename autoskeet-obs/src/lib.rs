pub mod client;
pub mod error;
pub mod models;

pub use client::ObsClient;
pub use error::{ObsError, Result};
pub use models::*;
