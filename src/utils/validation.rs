// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{ResolverError, Result};
use std::fs;
use std::path::Path;
use url::Url;

const PLAYABLE_SCHEMES: &[&str] = &["http", "https", "file", "rtsp", "rtmp"];

pub struct Validator;

impl Validator {
    /// Accepts any URL that parses as absolute. Relative paths and garbage fail.
    pub fn validate_video_url(url: &str) -> Result<()> {
        Self::parse_video_url(url).map(|_| ())
    }

    /// Stricter check for handing a URL to a media player.
    pub fn validate_playable_url(url: &str) -> Result<()> {
        let parsed = Self::parse_video_url(url)?;

        if !PLAYABLE_SCHEMES.contains(&parsed.scheme()) {
            return Err(ResolverError::MalformedUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if parsed.scheme() != "file" && parsed.host_str().is_none_or(str::is_empty) {
            return Err(ResolverError::MalformedUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(())
    }

    fn parse_video_url(url: &str) -> Result<Url> {
        Url::parse(url.trim()).map_err(|e| ResolverError::MalformedUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn validate_image_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            ResolverError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(ResolverError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    /// Truncates on a character boundary.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None => text.to_string(),
        }
    }
}
