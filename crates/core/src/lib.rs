//! ytcaption Core Library
//!
//! Fetches YouTube caption tracks through the player API, picks one by
//! language and kind, and renders the timed text as SRT, WebVTT, plain text
//! or a JSON snapshot.

pub mod error;
pub mod extract;
pub mod format;
pub mod metadata;
pub mod options;
pub mod payload;
pub mod pipeline;
pub mod retry;
pub mod select;
pub mod transport;
pub mod types;
pub mod video_id;

// Re-export commonly used items at crate root
pub use error::{CaptionError, ErrorKind, Result};
pub use extract::extract_spans;
pub use format::{
    OutputFormat, format_plain_text, format_srt, format_srt_time, format_vtt, format_vtt_time,
};
pub use options::Options;
pub use pipeline::{
    Downloader, available_tracks, download, download_with_cancel, download_with_options,
    load_caption, save_caption,
};
pub use retry::{Clock, ManualClock, RetryPolicy, SystemClock};
pub use select::{SelectionTier, select_track};
pub use tokio_util::sync::CancellationToken;
pub use types::{Caption, CaptionEvent, CaptionSegment, CaptionTrack, SubtitleSpan, TrackName};
pub use video_id::VideoId;
