// File: autoskeet-core/src/notifier.rs

use std::sync::Arc;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use autoskeet_bsky::{ExternalEmbed, PostReference};

use crate::debounce::Debounce;
use crate::events::StreamListener;
use crate::http::HttpClient;
use crate::settings::{Platform, PlatformSelection, Settings};
use crate::social::SocialClient;
use crate::template::render_template;
use crate::Error;

pub const THUMBNAIL_ALT: &str = "live stream thumbnail";
pub const DEFAULT_THUMBNAIL_MIME: &str = "image/jpeg";

/// Result of announcing one platform.
#[derive(Debug)]
pub struct PostAttempt {
    pub platform: Platform,
    pub result: Result<PostReference, Error>,
}

/// What a "streaming started" signal led to.
#[derive(Debug)]
pub enum LiveStartOutcome {
    /// An attempt happened within the debounce window; nothing was done.
    Debounced { last_post: DateTime<Utc> },
    /// Login failed, so no post was tried.
    AuthenticationFailed(Error),
    /// One entry per announced platform, in posting order.
    Attempted(Vec<PostAttempt>),
}

impl LiveStartOutcome {
    pub fn attempts(&self) -> &[PostAttempt] {
        match self {
            LiveStartOutcome::Attempted(attempts) => attempts,
            _ => &[],
        }
    }

    pub fn posted(&self) -> usize {
        self.attempts().iter().filter(|a| a.result.is_ok()).count()
    }
}

/// Announces stream starts on BlueSky.
///
/// Constructed once when the host loads the plugin; the host pushes
/// configuration changes through [`Notifier::update_settings`] and stream
/// starts through [`StreamListener`].
pub struct Notifier {
    settings: Settings,
    social: Arc<dyn SocialClient>,
    http: Arc<dyn HttpClient>,
    debounce: Debounce,
}

impl Notifier {
    pub fn new(settings: Settings, social: Arc<dyn SocialClient>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            settings,
            social,
            http,
            debounce: Debounce::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) {
        debug!("Settings updated: {:?}", settings);
        self.settings = settings;
    }

    pub fn last_post_time(&self) -> Option<DateTime<Utc>> {
        self.debounce.last()
    }

    /// Logs in with the stored credentials. Every attempt starts a new session.
    pub async fn authenticate(&self) -> Result<(), Error> {
        self.social
            .login(&self.settings.username, &self.settings.password)
            .await?;
        info!("BlueSky client logged in as {}", self.settings.username);
        Ok(())
    }

    /// Composes and submits the announcement for one platform.
    ///
    /// With a thumbnail configured, a non-200 fetch drops the post and
    /// reports `Error::ThumbnailFetch`.
    pub async fn post_announcement(&self, platform: Platform, link: &str) -> Result<PostReference, Error> {
        let title = platform.live_title();
        let text = render_template(&self.settings.message_template, title, link)?;
        info!("Post text prepared: {}", text);

        let mut embed = ExternalEmbed::new(link, title, self.settings.live_description.as_str());

        if let Some(thumbnail_url) = self.settings.thumbnail_url.as_deref() {
            let response = self.http.get(thumbnail_url).await?;
            if response.status != 200 {
                return Err(Error::ThumbnailFetch {
                    url: thumbnail_url.to_string(),
                    status: response.status,
                });
            }

            let mime_type = response
                .content_type
                .unwrap_or_else(|| DEFAULT_THUMBNAIL_MIME.to_string());
            let blob = self.social.upload_blob(response.body, &mime_type).await?;
            info!("Thumbnail uploaded: {} ({} bytes)", blob.cid.link, blob.size);
            embed = embed.with_image(blob, THUMBNAIL_ALT);
        }

        let has_image = embed.image().is_some();
        let post = self.social.send_post(&text, embed).await?;
        if has_image {
            info!("Skeeted {} announcement with thumbnail: {}", platform, post.uri);
        } else {
            info!("Skeeted {} announcement without an image: {}", platform, post.uri);
        }
        Ok(post)
    }

    /// Runs the live-start handler as of `now`.
    ///
    /// The debounce timestamp is set to `now` whenever the guard lets the
    /// attempt through, whether or not anything got posted.
    pub async fn handle_streaming_started_at(&mut self, now: DateTime<Utc>) -> LiveStartOutcome {
        if let Some(last_post) = self.debounce.last() {
            if !self.debounce.is_ready(now) {
                debug!(
                    "Skipping announcement; last attempt at {} is within {}s",
                    last_post,
                    self.debounce.window().num_seconds()
                );
                return LiveStartOutcome::Debounced { last_post };
            }
        }

        let outcome = match self.authenticate().await {
            Err(e) => {
                warn!("Failed to authenticate with BlueSky: {}", e);
                LiveStartOutcome::AuthenticationFailed(e)
            }
            Ok(()) => {
                if let PlatformSelection::Unrecognized(raw) = &self.settings.platform_selection {
                    warn!("Unrecognized platform selection '{}'; nothing to announce", raw);
                }

                let mut attempts = Vec::new();
                for (platform, link) in self.settings.targets() {
                    let result = self.post_announcement(platform, &link).await;
                    if let Err(e) = &result {
                        error!("Error sending {} announcement to BlueSky: {}", platform, e);
                    }
                    attempts.push(PostAttempt { platform, result });
                }
                LiveStartOutcome::Attempted(attempts)
            }
        };

        self.debounce.record(now);
        outcome
    }
}

#[async_trait]
impl StreamListener for Notifier {
    async fn on_streaming_started(&mut self) {
        let outcome = self.handle_streaming_started_at(Utc::now()).await;
        debug!(
            "Live-start handled: {} attempted, {} posted",
            outcome.attempts().len(),
            outcome.posted()
        );
    }
}
