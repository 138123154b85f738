//! Common types shared by the engine adapter, the stall machine and the controller

use crate::player::quality::QualityLevel;
use crate::player::tracks::TrackInfo;

/// One contiguous buffered time range, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferedRange {
    pub start: f64,
    pub end: f64,
}

impl BufferedRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: f64) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Seconds of media buffered ahead of `position`.
pub fn buffered_ahead(ranges: &[BufferedRange], position: f64) -> f64 {
    ranges
        .iter()
        .find(|range| range.contains(position))
        .map(|range| (range.end - position).max(0.0))
        .unwrap_or(0.0)
}

/// Mirrors the media element's readiness levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

impl ReadyState {
    /// Enough data to start or resume playback.
    pub fn can_play(self) -> bool {
        self >= ReadyState::HaveFutureData
    }
}

/// Notifications raised by the media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata,
    Progress,
    CanPlay,
    CanPlayThrough,
    Play,
    Playing,
    Pause,
    Waiting,
    Stalled,
    Seeking,
    Seeked,
    TimeUpdate,
    DurationChange,
    VolumeChange { volume: f64, muted: bool },
    RateChange(f64),
    Ended,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    Network,
    Media,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub fatal: bool,
    pub details: String,
}

impl EngineError {
    pub fn fatal(kind: EngineErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: true,
            details: details.into(),
        }
    }

    pub fn recoverable(kind: EngineErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            fatal: false,
            details: details.into(),
        }
    }
}

/// Signals raised by the streaming engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ManifestParsed,
    LevelsUpdated(Vec<QualityLevel>),
    LevelSwitched(usize),
    SubtitleTracksUpdated(Vec<TrackInfo>),
    AudioTracksUpdated(Vec<TrackInfo>),
    Error(EngineError),
}
