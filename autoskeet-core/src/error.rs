// ================================================================
// File: autoskeet-core/src/error.rs
// ================================================================

use thiserror::Error;
use autoskeet_bsky::BskyError;
use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("BlueSky error: {0}")]
    Bluesky(#[from] BskyError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to download thumbnail image from {url}: status {status}")]
    ThumbnailFetch { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
