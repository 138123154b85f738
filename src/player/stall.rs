//! Buffering and stall recovery.
//!
//! The machine only produces local instructions for the engine and the media element.
//! Nothing here is surfaced to the user apart from the buffering flag and, once every
//! automatic recovery is spent, the terminal `FatalError` phase.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::types::{BufferedRange, EngineError, EngineErrorKind};
use crate::constants::{
    EDGE_NUDGE_BACKOFF_SECS, EDGE_NUDGE_WINDOW_SECS, GAP_SKIP_OFFSET_SECS, GAP_SKIP_WINDOW_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Source assigned, playback not started yet
    Idle,
    Playing,
    Buffering,
    StalledRecovering,
    Paused,
    Ended,
    FatalError,
}

/// Gap-handling thresholds, in seconds. Product-tuned defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StallThresholds {
    #[serde(default = "default_edge_window")]
    pub edge_nudge_window_secs: f64,
    #[serde(default = "default_edge_backoff")]
    pub edge_nudge_backoff_secs: f64,
    #[serde(default = "default_gap_window")]
    pub gap_skip_window_secs: f64,
    #[serde(default = "default_gap_offset")]
    pub gap_skip_offset_secs: f64,
}

impl Default for StallThresholds {
    fn default() -> Self {
        Self {
            edge_nudge_window_secs: default_edge_window(),
            edge_nudge_backoff_secs: default_edge_backoff(),
            gap_skip_window_secs: default_gap_window(),
            gap_skip_offset_secs: default_gap_offset(),
        }
    }
}

fn default_edge_window() -> f64 {
    EDGE_NUDGE_WINDOW_SECS
}
fn default_edge_backoff() -> f64 {
    EDGE_NUDGE_BACKOFF_SECS
}
fn default_gap_window() -> f64 {
    GAP_SKIP_WINDOW_SECS
}
fn default_gap_offset() -> f64 {
    GAP_SKIP_OFFSET_SECS
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorMove {
    /// Cursor sits at the tail of a range; move it just behind the buffered edge
    NudgeToEdge(f64),
    /// Cursor sits in a small gap; jump just past the start of the next range
    SkipGap(f64),
}

impl CursorMove {
    pub fn target(self) -> f64 {
        match self {
            CursorMove::NudgeToEdge(target) | CursorMove::SkipGap(target) => target,
        }
    }
}

/// Instructions produced when playback stalls.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryPlan {
    pub cursor: Option<CursorMove>,
    /// Always set: the engine must resume segment loading
    pub resume_loading: bool,
    /// Ask ABR for one level lower
    pub step_down_quality: bool,
}

/// Response to a fatal engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Non-fatal: the engine retries on its own
    Ignore,
    RestartLoad,
    RecoverMedia,
    /// Destroy the engine and show the terminal "unavailable" state
    TearDown,
}

/// Decide how to move the cursor out of a stall, if at all.
pub fn plan_cursor_move(
    ranges: &[BufferedRange],
    position: f64,
    thresholds: &StallThresholds,
) -> Option<CursorMove> {
    if let Some(current) = ranges.iter().find(|range| range.contains(position)) {
        let target = current.end - thresholds.edge_nudge_backoff_secs;
        if current.end - position <= thresholds.edge_nudge_window_secs && target > position {
            return Some(CursorMove::NudgeToEdge(target));
        }
    }

    ranges
        .iter()
        .filter(|range| {
            range.start > position && range.start - position <= thresholds.gap_skip_window_secs
        })
        .min_by(|a, b| a.start.total_cmp(&b.start))
        .map(|range| CursorMove::SkipGap(range.start + thresholds.gap_skip_offset_secs))
}

#[derive(Debug)]
pub struct StallMachine {
    phase: PlaybackPhase,
    thresholds: StallThresholds,
    stepped_down_this_stall: bool,
    media_recoveries: u32,
}

impl StallMachine {
    pub fn new(thresholds: StallThresholds) -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            thresholds,
            stepped_down_this_stall: false,
            media_recoveries: 0,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_stalled(&self) -> bool {
        matches!(
            self.phase,
            PlaybackPhase::Buffering | PlaybackPhase::StalledRecovering
        )
    }

    /// New source: back to `Idle`, recovery budget restored.
    pub fn reset(&mut self) {
        self.phase = PlaybackPhase::Idle;
        self.stepped_down_this_stall = false;
        self.media_recoveries = 0;
    }

    fn transition(&mut self, next: PlaybackPhase) {
        if self.phase != next {
            debug!("Playback phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    /// "waiting" / "stalled" from the media element.
    ///
    /// Safe to call repeatedly: later calls in the same stall re-plan the cursor but do
    /// not step quality down again.
    pub fn on_waiting(
        &mut self,
        ranges: &[BufferedRange],
        position: f64,
        abr_active: bool,
    ) -> Option<RecoveryPlan> {
        match self.phase {
            PlaybackPhase::Playing => {
                self.transition(PlaybackPhase::Buffering);
                self.stepped_down_this_stall = false;
            }
            PlaybackPhase::Buffering | PlaybackPhase::StalledRecovering => {}
            _ => return None,
        }

        let cursor = plan_cursor_move(ranges, position, &self.thresholds);
        if let Some(cursor) = cursor {
            info!("Stall at {:.3}s, moving cursor: {:?}", position, cursor);
        } else {
            debug!("Stall at {:.3}s, no buffered range close enough to jump", position);
        }

        let step_down_quality = abr_active && !self.stepped_down_this_stall;
        if step_down_quality {
            self.stepped_down_this_stall = true;
        }

        self.transition(PlaybackPhase::StalledRecovering);
        Some(RecoveryPlan {
            cursor,
            resume_loading: true,
            step_down_quality,
        })
    }

    /// "canplay" / "playing": playback resumed on its own.
    pub fn on_resumed(&mut self) {
        match self.phase {
            PlaybackPhase::Buffering
            | PlaybackPhase::StalledRecovering
            | PlaybackPhase::Idle
            | PlaybackPhase::Paused
            | PlaybackPhase::Ended => {
                self.transition(PlaybackPhase::Playing);
                self.stepped_down_this_stall = false;
            }
            PlaybackPhase::Playing | PlaybackPhase::FatalError => {}
        }
    }

    /// "canplay" while not actively playing only clears a stall.
    pub fn on_can_play(&mut self) {
        if self.is_stalled() {
            self.on_resumed();
        }
    }

    pub fn on_paused(&mut self) {
        if !matches!(self.phase, PlaybackPhase::Ended | PlaybackPhase::FatalError) {
            self.transition(PlaybackPhase::Paused);
        }
    }

    pub fn on_ended(&mut self) {
        if self.phase != PlaybackPhase::FatalError {
            self.transition(PlaybackPhase::Ended);
        }
    }

    /// Map an engine error to the recovery step. Network fatals always restart loading;
    /// media fatals get one recovery per source; anything else is terminal.
    pub fn on_engine_error(&mut self, error: &EngineError) -> ErrorAction {
        if self.phase == PlaybackPhase::FatalError {
            return ErrorAction::Ignore;
        }
        if !error.fatal {
            debug!("Non-fatal engine error: {}", error.details);
            return ErrorAction::Ignore;
        }

        match error.kind {
            EngineErrorKind::Network => {
                warn!("Fatal network error, restarting load: {}", error.details);
                ErrorAction::RestartLoad
            }
            EngineErrorKind::Media if self.media_recoveries == 0 => {
                warn!("Fatal media error, attempting recovery: {}", error.details);
                self.media_recoveries += 1;
                ErrorAction::RecoverMedia
            }
            EngineErrorKind::Media | EngineErrorKind::Other => {
                warn!("Unrecoverable engine error: {}", error.details);
                self.transition(PlaybackPhase::FatalError);
                ErrorAction::TearDown
            }
        }
    }
}
