//! Timed-text round trip for the selected track.

use reqwest::Url;
use tracing::debug;

use crate::{
    error::{CaptionError, Result},
    transport::{RequestSpec, ResilientTransport},
    types::{Caption, CaptionTrack},
};

/// Query suffix asking the timed-text endpoint for structured json3 output.
pub const JSON3_FORMAT_PARAM: &str = "&fmt=json3";

pub fn payload_url(track: &CaptionTrack) -> Result<Url> {
    let raw = format!("{}{}", track.base_url, JSON3_FORMAT_PARAM);
    Url::parse(&raw).map_err(|e| CaptionError::decode("caption track url", e))
}

pub fn decode_caption(body: &[u8]) -> Result<Caption> {
    serde_json::from_slice(body).map_err(|e| CaptionError::decode("caption payload", e))
}

pub async fn fetch_caption(
    transport: &ResilientTransport,
    track: &CaptionTrack,
) -> Result<Caption> {
    let url = payload_url(track)?;
    let response = transport.execute(&RequestSpec::get(url)).await?;

    let caption = decode_caption(&response.body)?;
    debug!(
        language = %track.language_code,
        events = caption.events.len(),
        attempts = response.attempts,
        "caption payload decoded"
    );
    Ok(caption)
}
