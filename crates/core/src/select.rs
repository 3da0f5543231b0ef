use crate::{
    error::{CaptionError, Result},
    types::CaptionTrack,
};

/// Which rule of the fallback ladder picked a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTier {
    /// Language and kind both match.
    Exact,
    /// Language matches, kind ignored.
    Language,
    /// First usable track of any language.
    AnyTrack,
}

/// Picks a track: exact language+kind, then language only, then the first
/// track with a URL. Within a tier the earliest track wins.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    language: &str,
    kind: &str,
) -> Result<(&'a CaptionTrack, SelectionTier)> {
    let usable = || tracks.iter().filter(|t| !t.base_url.is_empty());

    if let Some(track) = usable().find(|t| t.language_code == language && t.kind == kind) {
        return Ok((track, SelectionTier::Exact));
    }
    if let Some(track) = usable().find(|t| t.language_code == language) {
        return Ok((track, SelectionTier::Language));
    }
    if let Some(track) = usable().next() {
        return Ok((track, SelectionTier::AnyTrack));
    }

    Err(CaptionError::not_found(format!(
        "no usable caption track among {} listed",
        tracks.len()
    )))
}
