use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One selectable caption stream as listed in the player response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    #[serde(default)]
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks; absent (empty) for authored ones.
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: TrackName,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackName {
    #[serde(default)]
    pub simple_text: String,
}

impl CaptionTrack {
    pub fn display_name(&self) -> &str {
        &self.name.simple_text
    }
}

impl fmt::Display for CaptionTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.name.simple_text, self.language_code, self.kind
        )
    }
}

/// Raw json3 caption payload, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub events: Vec<CaptionEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionEvent {
    #[serde(rename = "tStartMs")]
    pub start_offset_ms: u64,
    #[serde(
        rename = "dDurationMs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
    #[serde(rename = "segs", default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<CaptionSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    #[serde(rename = "utf8", default)]
    pub text: String,
    #[serde(rename = "tOffsetMs", default)]
    pub offset_ms: i64,
    /// Recognizer confidence, kept as the number the service sent.
    #[serde(rename = "acAsrConf", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Number>,
}

/// Merged caption text with its time window, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSpan {
    pub start: f64,
    pub end: f64,
    pub text: String,
}
