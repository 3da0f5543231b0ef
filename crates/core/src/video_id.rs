use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use reqwest::Url;

use crate::error::{CaptionError, Result};

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Validated 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Strict validation: exactly 11 characters from `[A-Za-z0-9_-]`.
    pub fn parse(input: &str) -> Result<Self> {
        if VIDEO_ID_RE.is_match(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(CaptionError::InvalidInput(input.to_string()))
        }
    }

    /// Accepts either a bare id or a watch/share URL and extracts the id.
    ///
    /// Recognized URL forms: `watch?v=<id>`, `youtu.be/<id>`,
    /// `/shorts/<id>`, `/embed/<id>` and `/live/<id>`.
    pub fn from_input(input: &str) -> Result<Self> {
        let input = input.trim();
        if let Ok(id) = Self::parse(input) {
            return Ok(id);
        }

        let Ok(url) = Url::parse(input) else {
            return Err(CaptionError::InvalidInput(input.to_string()));
        };

        let host = url.host_str().unwrap_or_default();
        let candidate = if is_short_link_host(host) {
            url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
        } else if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
            Some(v.into_owned())
        } else {
            let mut segments = url.path_segments().into_iter().flatten();
            match segments.next() {
                Some("shorts" | "embed" | "live") => segments.next().map(str::to_string),
                _ => None,
            }
        };

        match candidate {
            Some(id) => Self::parse(&id),
            None => Err(CaptionError::InvalidInput(input.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_short_link_host(host: &str) -> bool {
    host == "youtu.be" || host.ends_with(".youtu.be")
}

impl FromStr for VideoId {
    type Err = CaptionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
