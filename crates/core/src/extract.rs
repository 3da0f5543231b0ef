use crate::types::{Caption, CaptionEvent, SubtitleSpan};

/// Line-break marker the timed-text service emits as its own segment.
const NEWLINE_MARKER: &str = "\n";

/// Merges each event's segments into one span, drops empty ones and sorts by
/// start time. The sort is stable, so spans starting together keep event order.
pub fn extract_spans(events: &[CaptionEvent]) -> Vec<SubtitleSpan> {
    let mut spans: Vec<SubtitleSpan> = events.iter().filter_map(merge_event).collect();
    spans.sort_by(|a, b| a.start.total_cmp(&b.start));
    spans
}

fn merge_event(event: &CaptionEvent) -> Option<SubtitleSpan> {
    if event.segments.is_empty() {
        return None;
    }

    let start = event.start_offset_ms as f64 / 1000.0;
    let mut end = start;
    let mut text = String::new();

    for seg in event.segments.iter().filter(|s| s.text != NEWLINE_MARKER) {
        text.push_str(&seg.text);
        // Both offsets come off the wire; i128 holds any u64 + i64 sum.
        let seg_end_ms = i128::from(event.start_offset_ms) + i128::from(seg.offset_ms);
        let seg_end = seg_end_ms as f64 / 1000.0;
        if seg_end > end {
            end = seg_end;
        }
    }

    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(SubtitleSpan {
        start,
        end,
        text: text.to_string(),
    })
}

impl Caption {
    pub fn subtitle_spans(&self) -> Vec<SubtitleSpan> {
        extract_spans(&self.events)
    }
}
