use std::{fmt::Write, str::FromStr};

use crate::{
    error::{CaptionError, Result},
    types::{Caption, SubtitleSpan},
};

const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_MIN: u64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u64 = 60 * NANOS_PER_MIN;

/// Format seconds as `HH:MM:SS<sep>mmm`. Hours are not wrapped at 24.
///
/// Seconds are truncated to whole nanoseconds first and every field is
/// derived from that integer.
pub fn format_timestamp(seconds: f64, millis_separator: char) -> String {
    let nanos = (seconds * NANOS_PER_SEC as f64) as u64;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        nanos / NANOS_PER_HOUR,
        (nanos / NANOS_PER_MIN) % 60,
        (nanos / NANOS_PER_SEC) % 60,
        millis_separator,
        (nanos / NANOS_PER_MILLI) % 1000
    )
}

pub fn format_srt_time(seconds: f64) -> String {
    format_timestamp(seconds, ',')
}

pub fn format_vtt_time(seconds: f64) -> String {
    format_timestamp(seconds, '.')
}

/// Span texts joined by single spaces.
pub fn format_plain_text(spans: &[SubtitleSpan]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn format_srt(spans: &[SubtitleSpan]) -> String {
    let mut output = String::new();
    for (i, span) in spans.iter().enumerate() {
        let _ = writeln!(output, "{}", i + 1);
        let _ = writeln!(
            output,
            "{} --> {}",
            format_srt_time(span.start),
            format_srt_time(span.end)
        );
        output.push_str(&span.text);
        output.push_str("\n\n");
    }
    output
}

pub fn format_vtt(spans: &[SubtitleSpan]) -> String {
    let mut output = String::from("WEBVTT\n\n");
    for span in spans {
        let _ = writeln!(
            output,
            "{} --> {}",
            format_vtt_time(span.start),
            format_vtt_time(span.end)
        );
        output.push_str(&span.text);
        output.push_str("\n\n");
    }
    output
}

impl Caption {
    pub fn plain_text(&self) -> String {
        format_plain_text(&self.subtitle_spans())
    }

    pub fn srt(&self) -> String {
        format_srt(&self.subtitle_spans())
    }

    pub fn vtt(&self) -> String {
        format_vtt(&self.subtitle_spans())
    }

    /// Lossless pretty-printed dump of the raw events.
    pub fn to_json_snapshot(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CaptionError::decode("caption snapshot", e))
    }

    pub fn from_json_snapshot(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CaptionError::decode("caption snapshot", e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Srt,
    Vtt,
    Text,
    Json,
}

impl OutputFormat {
    pub fn render(self, caption: &Caption) -> Result<String> {
        match self {
            OutputFormat::Srt => Ok(caption.srt()),
            OutputFormat::Vtt => Ok(caption.vtt()),
            OutputFormat::Text => Ok(caption.plain_text()),
            OutputFormat::Json => caption.to_json_snapshot(),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            "txt" | "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
