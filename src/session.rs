//! Upload interactions: one request, its raw response and parsed captions.

use crate::gateway::{CaptionGateway, GatewayError};
use crate::parser::parse_captions;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prompt sent with every upload unless the caller supplies its own.
pub const DEFAULT_PROMPT: &str = "Generate a creative and engaging caption for this image, perfect for WhatsApp or social media. Make it fun, descriptive, and shareable!";

const SHARE_BASE_URL: &str = "https://wa.me/";

/// Characters a browser's `encodeURIComponent` leaves as-is.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The record of a single upload: the image, what the model said, and the
/// captions parsed out of it. Read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSession {
    id: Uuid,
    image: String,
    raw: String,
    options: Vec<String>,
    timestamp: DateTime<Utc>,
}

impl CaptionSession {
    /// Create a session from a raw response, parsing it into captions.
    pub fn new(image: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            id: Uuid::new_v4(),
            image: image.into(),
            options: parse_captions(&raw),
            raw,
            timestamp: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Image as a `data:` URI.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unmodified model response.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parsed captions, never empty.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Captions that get copy and share buttons: every option except the
    /// first and the last.
    pub fn actionable_options(&self) -> &[String] {
        match self.options.len() {
            0..=2 => &[],
            n => &self.options[1..n - 1],
        }
    }
}

/// Request captions for an image and parse them into a new session.
///
/// Gateway errors are returned unchanged; no retry is attempted.
pub async fn generate_captions<G: CaptionGateway>(
    gateway: &G,
    image_data_uri: &str,
    prompt: &str,
) -> Result<CaptionSession, GatewayError> {
    let raw = gateway.request_caption(image_data_uri, prompt).await?;
    let session = CaptionSession::new(image_data_uri, raw);
    log::info!("Parsed {} caption(s) for session {}", session.options().len(), session.id());
    Ok(session)
}

/// WhatsApp share link carrying `caption` as the prefilled message,
/// encoded the way `encodeURIComponent` does it.
pub fn share_link(caption: &str) -> String {
    format!(
        "{}?text={}",
        SHARE_BASE_URL,
        utf8_percent_encode(caption, URI_COMPONENT)
    )
}

/// Sessions for the current user, newest first. Unbounded until cleared.
#[derive(Debug, Clone, Default)]
pub struct CaptionHistory {
    sessions: Vec<CaptionSession>,
}

impl CaptionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session at the front.
    pub fn push(&mut self, session: CaptionSession) {
        self.sessions.insert(0, session);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaptionSession> {
        self.sessions.iter()
    }

    pub fn latest(&self) -> Option<&CaptionSession> {
        self.sessions.first()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
