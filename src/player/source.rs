//! Stream source resolution.
//!
//! Manifest-style streams (HLS playlists) frequently fail CORS or referrer checks when
//! fetched straight from a CDN, so they are routed through the backend's same-origin
//! relay at `<api-base>/proxy/stream?url=<encoded>`. Progressive files and URLs that
//! already live on the API origin are handed to the player untouched.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::constants::{PROXY_STREAM_PATH, PROXY_URL_PARAM};
use crate::utils::{PlayerError, PlayerResult};

/// Characters left as-is by `encodeURIComponent`; everything else is escaped.
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

const MANIFEST_STEMS: [&str; 5] = ["playlist", "manifest", "master", "index", "stream"];
const MANIFEST_MARKERS: [&str; 2] = ["hls", "streaming"];
const HLS_MIME_TYPES: [&str; 3] = [
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
    "audio/mpegurl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HLS manifest, played through the streaming engine
    Manifest,
    /// Direct file, played natively by the media element
    Progressive,
}

/// A resolved stream for one playback session. Immutable once playback starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSource {
    pub session_id: Uuid,
    pub original_url: String,
    pub url: String,
    pub kind: SourceKind,
    pub proxied: bool,
    pub content_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StreamSourceResolver {
    api_base: String,
}

impl StreamSourceResolver {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { api_base }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Rewrite `raw` through the proxy when it is manifest-style and cross-origin.
    pub fn resolve(&self, raw: &str) -> String {
        if !is_manifest_url(raw) || self.is_same_origin(raw) {
            return raw.to_string();
        }

        let proxied = format!(
            "{}{}?{}={}",
            self.api_base,
            PROXY_STREAM_PATH,
            PROXY_URL_PARAM,
            utf8_percent_encode(raw, URI_COMPONENT)
        );
        debug!("Routing manifest through proxy: {} -> {}", raw, proxied);
        proxied
    }

    /// Build the immutable source for a new playback session.
    pub fn source(&self, raw: &str, content_id: Option<String>) -> PlayerResult<PlaybackSource> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PlayerError::InvalidSource("empty source URL".to_string()));
        }

        let url = self.resolve(raw);
        let kind = if is_manifest_url(&url) {
            SourceKind::Manifest
        } else {
            SourceKind::Progressive
        };

        Ok(PlaybackSource {
            session_id: Uuid::new_v4(),
            original_url: raw.to_string(),
            proxied: url != raw,
            url,
            kind,
            content_id,
        })
    }

    fn is_same_origin(&self, raw: &str) -> bool {
        if is_proxied(raw) {
            return true;
        }
        match Url::parse(raw) {
            // Relative URLs resolve against the page origin
            Err(_) => true,
            Ok(target) => match Url::parse(&self.api_base) {
                Ok(base) => base.origin() == target.origin(),
                Err(_) => false,
            },
        }
    }
}

/// Whether `raw` looks like an HLS manifest (or the proxy that serves one).
pub fn is_manifest_url(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    let path = lower
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if path.ends_with(".m3u8") {
        return true;
    }

    if MANIFEST_STEMS
        .iter()
        .any(|stem| lower.contains(&format!("{stem}.m3u8")))
    {
        return true;
    }

    MANIFEST_MARKERS.iter().any(|marker| lower.contains(marker))
        || lower.contains(PROXY_STREAM_PATH)
        || HLS_MIME_TYPES.iter().any(|mime| {
            let encoded = utf8_percent_encode(mime, URI_COMPONENT)
                .to_string()
                .to_ascii_lowercase();
            lower.contains(mime) || lower.contains(&encoded)
        })
}

fn is_proxied(raw: &str) -> bool {
    raw.contains(PROXY_STREAM_PATH)
}

/// Recover the upstream URL from a proxied one.
pub fn proxied_upstream(proxied: &str) -> Option<String> {
    let (_, query) = proxied.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != PROXY_URL_PARAM {
            return None;
        }
        percent_decode_str(value)
            .decode_utf8()
            .ok()
            .map(|decoded| decoded.into_owned())
    })
}
