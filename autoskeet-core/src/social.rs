// File: autoskeet-core/src/social.rs

use async_trait::async_trait;
use autoskeet_bsky::{BlobRef, BskyClient, BskyError, CreatePostRequest, ExternalEmbed, PostReference};
use crate::Error;

/// The social-network operations the notifier depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialClient: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<(), Error>;
    async fn upload_blob(&self, data: Vec<u8>, mime_type: &str) -> Result<BlobRef, Error>;
    async fn send_post(&self, text: &str, embed: ExternalEmbed) -> Result<PostReference, Error>;
}

#[async_trait]
impl SocialClient for BskyClient {
    async fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        match BskyClient::login(self, username, password).await {
            Ok(_) => Ok(()),
            Err(BskyError::Auth(msg)) => Err(Error::Auth(msg)),
            Err(e) => Err(e.into()),
        }
    }

    async fn upload_blob(&self, data: Vec<u8>, mime_type: &str) -> Result<BlobRef, Error> {
        Ok(BskyClient::upload_blob(self, data, mime_type).await?)
    }

    async fn send_post(&self, text: &str, embed: ExternalEmbed) -> Result<PostReference, Error> {
        let request = CreatePostRequest::new(text).with_embed(embed);
        Ok(BskyClient::send_post(self, request).await?)
    }
}
