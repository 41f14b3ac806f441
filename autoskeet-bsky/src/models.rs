use serde::{Deserialize, Serialize};

pub const POST_COLLECTION: &str = "app.bsky.feed.post";
pub const EXTERNAL_EMBED_TYPE: &str = "app.bsky.embed.external";
pub const BLOB_TYPE: &str = "blob";

/// Session returned by `com.atproto.server.createSession`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub did: String,
    pub handle: String,
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    #[serde(rename = "refreshJwt")]
    pub refresh_jwt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// Reference to an uploaded blob, embedded verbatim into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    #[serde(rename = "$type")]
    pub blob_type: String,
    #[serde(rename = "ref")]
    pub cid: CidLink,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
}

impl BlobRef {
    pub fn new(cid: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            blob_type: BLOB_TYPE.to_string(),
            cid: CidLink { link: cid.into() },
            mime_type: mime_type.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadBlobResponse {
    pub blob: BlobRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct External {
    pub uri: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<BlobRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub alt: String,
    pub image: BlobRef,
}

/// External link card, optionally carrying the uploaded thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEmbed {
    #[serde(rename = "$type")]
    pub embed_type: String,
    pub external: External,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<EmbedImage>,
}

impl ExternalEmbed {
    pub fn new(
        uri: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            embed_type: EXTERNAL_EMBED_TYPE.to_string(),
            external: External {
                uri: uri.into(),
                title: title.into(),
                description: description.into(),
                thumb: None,
            },
            images: Vec::new(),
        }
    }

    /// Attaches an image. The blob also becomes the card thumbnail, since
    /// that is the slot clients render for external embeds.
    pub fn with_image(mut self, image: BlobRef, alt: impl Into<String>) -> Self {
        self.external.thumb = Some(image.clone());
        self.images.push(EmbedImage {
            alt: alt.into(),
            image,
        });
        self
    }

    pub fn image(&self) -> Option<&BlobRef> {
        self.images.first().map(|i| &i.image)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "$type")]
    pub record_type: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<ExternalEmbed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub text: String,
    pub embed: Option<ExternalEmbed>,
}

impl CreatePostRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embed: None,
        }
    }

    pub fn with_embed(mut self, embed: ExternalEmbed) -> Self {
        self.embed = Some(embed);
        self
    }
}
