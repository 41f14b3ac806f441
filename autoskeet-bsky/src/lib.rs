pub mod client;
pub mod error;
pub mod models;

pub use client::{BskyClient, BskyConfig};
pub use error::{BskyError, Result};
pub use models::*;
