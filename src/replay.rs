//! Replay timeline projection
//!
//! Session videos are stored under URLs ending in `__<epoch-ms>.webm`, where
//! the number is the wall-clock time the recording started. An event's
//! position in the video is its own timestamp minus that offset.

use crate::fetcher::JourneyModel;
use crate::highlight::HighlightRequest;
use crate::model::SessionRecording;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn video_offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"__(\d+)\.webm$").expect("static pattern is valid"))
}

/// Recording start offset encoded in a video URL, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOffset(pub i64);

impl VideoOffset {
    /// Extract the offset from a video URL
    ///
    /// Returns `None` when the URL carries no parseable offset.
    pub fn from_url(url: &str) -> Option<Self> {
        let captures = video_offset_pattern().captures(url)?;
        captures.get(1)?.as_str().parse().ok().map(VideoOffset)
    }
}

/// Display time of an event in seconds
///
/// Values are not clamped; an event logged before or after the recording
/// projects outside the video. With no offset every event sits at 0.
pub fn project_event_time(timestamp: i64, offset: Option<VideoOffset>) -> f64 {
    match offset {
        Some(VideoOffset(start)) if start != 0 => (timestamp as f64 - start as f64) / 1000.0,
        _ => 0.0,
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// An event placed on the replay timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub event_id: String,
    pub name: String,
    pub step_name: String,
    pub status: Option<String>,
    /// Seconds into the video
    pub time: f64,
    pub highlighted: bool,
}

/// A journey's events projected onto its session video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayTimeline {
    pub video_url: Option<String>,
    pub entries: Vec<TimelineEntry>,
}

impl ReplayTimeline {
    pub fn has_video(&self) -> bool {
        self.video_url.is_some()
    }

    /// Entries already reached at `position` seconds
    pub fn reached(&self, position: f64) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().filter(move |e| e.time <= position)
    }
}

/// Project a journey's configured events onto its video
///
/// Events are visited step by step in sorted order. Each event with a video
/// URL updates the offset used for itself and every event after it. The
/// video shown is the highlighted event's, when it has one, otherwise the
/// first video encountered. Entries end up sorted by display time, stable.
pub fn build_timeline(model: &JourneyModel, highlight: &HighlightRequest) -> ReplayTimeline {
    let requested = highlight.event_id();
    let mut offset: Option<VideoOffset> = None;
    let mut first_video: Option<&str> = None;
    let mut highlighted_video: Option<&str> = None;
    let mut entries = Vec::new();

    for (step, event) in model.configured_events() {
        let Some(event_id) = event.id.as_deref() else {
            continue;
        };

        if let Some(url) = event.video_url.as_deref() {
            if let Some(found) = VideoOffset::from_url(url) {
                offset = Some(found);
            }
            if first_video.is_none() {
                first_video = Some(url);
            }
            if requested == Some(event_id) {
                highlighted_video = Some(url);
            }
        }

        entries.push(TimelineEntry {
            event_id: event_id.to_string(),
            name: event.display_name().to_string(),
            step_name: step.display_name().to_string(),
            status: event.status.clone(),
            time: project_event_time(event.timestamp_key(), offset),
            highlighted: requested == Some(event_id),
        });
    }

    entries.sort_by(|a, b| a.time.total_cmp(&b.time));

    let video_url = match requested {
        Some(_) => highlighted_video.or(first_video),
        None => first_video,
    };

    ReplayTimeline {
        video_url: video_url.map(str::to_string),
        entries,
    }
}

/// One event on a recording's own timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub event_id: String,
    /// Milliseconds since the recording started
    pub offset_ms: i64,
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

impl RecordingEntry {
    /// Offset as seconds with two decimals
    pub fn display_offset(&self) -> String {
        format!("{:.2}s", self.offset_ms as f64 / 1000.0)
    }
}

/// Recorded events positioned relative to the recording start
pub fn recording_entries(recording: &SessionRecording) -> Vec<RecordingEntry> {
    let start = recording.start_time.timestamp_millis();
    recording
        .events
        .iter()
        .map(|event| RecordingEntry {
            event_id: event.event_id.clone(),
            offset_ms: event.timestamp.saturating_sub(start),
            parameters: event.parameters.clone(),
        })
        .collect()
}

/// Recording length as seconds with one decimal
pub fn format_duration(duration_ms: i64) -> String {
    format!("{:.1}s", duration_ms as f64 / 1000.0)
}
