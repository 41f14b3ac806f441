use crate::error::Result;
use crate::models::*;
use crate::BskyError;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_SERVICE: &str = "https://bsky.social";

#[derive(Debug, Clone)]
pub struct BskyConfig {
    service: String,
    dry_run: bool,
}

impl Default for BskyConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            dry_run: false,
        }
    }
}

impl BskyConfig {
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Minimal XRPC client covering what an announcement needs:
/// a password session, blob upload and post creation.
pub struct BskyClient {
    config: BskyConfig,
    http: reqwest::Client,
    session: Arc<RwLock<Option<Session>>>,
}

impl BskyClient {
    pub fn new(config: BskyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| BskyError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &BskyConfig {
        &self.config
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Creates a fresh session, replacing any previous one.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session> {
        debug!("Creating BlueSky session for {}", identifier);

        let url = self.xrpc_url("com.atproto.server.createSession");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            *self.session.write().await = None;
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BskyError::auth(format!("{status}: {body}")));
        }

        let session: Session = response.json().await?;
        info!("BlueSky session created for {} ({})", session.handle, session.did);
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    pub async fn upload_blob(&self, data: Vec<u8>, mime_type: &str) -> Result<BlobRef> {
        let size = data.len() as u64;
        if self.config.dry_run() {
            info!("Dry run: would upload {} byte blob ({})", size, mime_type);
            return Ok(BlobRef::new("dry-run", mime_type, size));
        }

        let (_, token) = self.credentials().await?;
        let response = self
            .http
            .post(self.xrpc_url("com.atproto.repo.uploadBlob"))
            .bearer_auth(token)
            .header(CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await?;

        let uploaded: UploadBlobResponse = self.check(response).await?.json().await?;
        debug!("Uploaded blob {} ({} bytes)", uploaded.blob.cid.link, uploaded.blob.size);
        Ok(uploaded.blob)
    }

    pub async fn send_post(&self, req: CreatePostRequest) -> Result<PostReference> {
        if self.config.dry_run() {
            info!("Dry run: would post {:?}", req.text);
            let now = Utc::now().to_rfc3339();
            return Ok(PostReference {
                uri: format!("mock://post/{now}"),
                cid: format!("mock-cid-{now}"),
            });
        }

        let (did, token) = self.credentials().await?;
        let record = PostRecord {
            record_type: POST_COLLECTION.to_string(),
            text: req.text,
            created_at: Utc::now().to_rfc3339(),
            embed: req.embed,
        };

        let response = self
            .http
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "repo": did,
                "collection": POST_COLLECTION,
                "record": record,
            }))
            .send()
            .await?;

        let body: serde_json::Value = self.check(response).await?.json().await?;
        let uri = body["uri"]
            .as_str()
            .ok_or_else(|| BskyError::post("create", "response has no uri"))?;
        let cid = body["cid"]
            .as_str()
            .ok_or_else(|| BskyError::post("create", "response has no cid"))?;

        Ok(PostReference {
            uri: uri.to_string(),
            cid: cid.to_string(),
        })
    }

    fn xrpc_url(&self, endpoint: &str) -> String {
        format!("{}/xrpc/{}", self.config.service(), endpoint)
    }

    async fn credentials(&self) -> Result<(String, String)> {
        let session = self.session.read().await;
        let session = session
            .as_ref()
            .ok_or_else(|| BskyError::auth("Not authenticated"))?;
        Ok((session.did.clone(), session.access_jwt.clone()))
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(BskyError::RateLimit(self.config.service().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BskyError::http(status.as_u16(), body));
        }
        Ok(response)
    }
}
