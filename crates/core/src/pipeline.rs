use std::{path::Path, sync::Arc};

use reqwest::Url;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    error::{CaptionError, Result},
    format::OutputFormat,
    metadata::{PLAYER_URL, fetch_tracks},
    options::Options,
    payload::fetch_caption,
    retry::{Clock, RetryPolicy, SystemClock},
    select::select_track,
    transport::ResilientTransport,
    types::{Caption, CaptionTrack},
    video_id::VideoId,
};

/// Wiring for a single call. Build a new one per download; nothing is shared
/// between calls.
pub struct Downloader {
    options: Options,
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    player_url: String,
}

impl Downloader {
    pub fn new(options: Options) -> Self {
        Self {
            policy: RetryPolicy::from_max_retries(options.max_retries),
            options,
            clock: Arc::new(SystemClock),
            cancel: CancellationToken::new(),
            player_url: PLAYER_URL.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Overrides the metadata endpoint.
    pub fn with_player_url(mut self, url: impl Into<String>) -> Self {
        self.player_url = url.into();
        self
    }

    fn transport(&self) -> Result<ResilientTransport> {
        let client = reqwest::Client::builder()
            .user_agent(self.options.user_agent.as_str())
            .timeout(self.options.timeout)
            .build()
            .map_err(CaptionError::NetworkError)?;

        Ok(ResilientTransport::new(
            client,
            self.policy.clone(),
            Arc::clone(&self.clock),
            self.options.timeout,
            self.cancel.clone(),
        ))
    }

    fn player_url(&self) -> Result<Url> {
        Url::parse(&self.player_url).map_err(|e| CaptionError::decode("player url", e))
    }

    /// Metadata round trip only.
    pub async fn tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let video_id = VideoId::parse(video_id)?;
        let transport = self.transport()?;
        fetch_tracks(&transport, &self.player_url()?, &video_id).await
    }

    /// Metadata, track selection, then payload. Any failure discards the
    /// partial progress.
    pub async fn download(&self, video_id: &str) -> Result<Caption> {
        let video_id = VideoId::parse(video_id)?;
        let transport = self.transport()?;

        let tracks = fetch_tracks(&transport, &self.player_url()?, &video_id).await?;
        let (track, tier) = select_track(&tracks, &self.options.language, &self.options.kind)?;
        info!(
            video_id = %video_id,
            language = %track.language_code,
            kind = %track.kind,
            tier = ?tier,
            "selected caption track"
        );

        fetch_caption(&transport, track).await
    }
}

/// Download captions with default options.
pub async fn download(video_id: &str) -> Result<Caption> {
    download_with_options(video_id, &Options::default()).await
}

pub async fn download_with_options(video_id: &str, options: &Options) -> Result<Caption> {
    Downloader::new(options.clone()).download(video_id).await
}

/// Like [`download_with_options`], aborting with `Canceled` once `cancel` fires.
pub async fn download_with_cancel(
    video_id: &str,
    options: &Options,
    cancel: CancellationToken,
) -> Result<Caption> {
    Downloader::new(options.clone())
        .with_cancellation(cancel)
        .download(video_id)
        .await
}

/// List every caption track the video offers.
pub async fn available_tracks(video_id: &str, options: &Options) -> Result<Vec<CaptionTrack>> {
    Downloader::new(options.clone()).tracks(video_id).await
}

/// Render `caption` in `format` and write it to `path`.
pub async fn save_caption(caption: &Caption, path: &Path, format: OutputFormat) -> Result<()> {
    let rendered = format.render(caption)?;
    fs::write(path, rendered).await?;
    Ok(())
}

/// Load a caption previously written with [`OutputFormat::Json`].
pub async fn load_caption(path: &Path) -> Result<Caption> {
    let json_content = fs::read_to_string(path).await?;
    Caption::from_json_snapshot(&json_content)
}
