//! Player metadata round trip: which caption tracks a video has.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{CaptionError, Result},
    transport::{RequestSpec, ResilientTransport},
    types::CaptionTrack,
    video_id::VideoId,
};

pub const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";
pub const CLIENT_NAME: &str = "WEB";
pub const CLIENT_VERSION: &str = "2.20250925.01.00";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest<'a> {
    pub context: RequestContext,
    pub video_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RequestContext {
    pub client: ClientInfo,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_name: &'static str,
    pub client_version: &'static str,
}

impl<'a> PlayerRequest<'a> {
    pub fn new(video_id: &'a VideoId) -> Self {
        Self {
            context: RequestContext {
                client: ClientInfo {
                    client_name: CLIENT_NAME,
                    client_version: CLIENT_VERSION,
                },
            },
            video_id: video_id.as_str(),
        }
    }
}

/// Only the caption branch of the player response is modelled. A video
/// without captions simply lacks it.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerResponse {
    #[serde(default)]
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    #[serde(default)]
    pub player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

impl PlayerResponse {
    pub fn into_tracks(self) -> Vec<CaptionTrack> {
        self.captions
            .map(|c| c.player_captions_tracklist_renderer.caption_tracks)
            .unwrap_or_default()
    }
}

/// Decodes a player response body into its (non-empty) track list.
pub fn decode_tracks(body: &[u8]) -> Result<Vec<CaptionTrack>> {
    let response: PlayerResponse =
        serde_json::from_slice(body).map_err(|e| CaptionError::decode("player response", e))?;

    let tracks = response.into_tracks();
    if tracks.is_empty() {
        return Err(CaptionError::not_found("video has no caption tracks"));
    }
    Ok(tracks)
}

pub async fn fetch_tracks(
    transport: &ResilientTransport,
    player_url: &Url,
    video_id: &VideoId,
) -> Result<Vec<CaptionTrack>> {
    let body = serde_json::to_vec(&PlayerRequest::new(video_id))
        .map_err(|e| CaptionError::decode("player request", e))?;

    let response = transport
        .execute(&RequestSpec::post_json(player_url.clone(), body))
        .await?;

    let tracks = decode_tracks(&response.body)?;
    debug!(
        video_id = %video_id,
        count = tracks.len(),
        attempts = response.attempts,
        "caption tracks listed"
    );
    Ok(tracks)
}
