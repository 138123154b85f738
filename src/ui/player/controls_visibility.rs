use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ControlState {
    /// Controls and cursor are hidden
    Hidden,
    /// Controls are visible and will hide at the deadline
    Visible { hide_at: Instant },
    /// Controls stay visible: paused or a menu is open
    Pinned,
}

/// Inputs the visibility timer is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityContext {
    pub is_playing: bool,
    pub is_buffering: bool,
    pub menu_open: bool,
    /// Playback was torn down after a fatal error
    pub unavailable: bool,
}

/// Auto-hide for the player controls plus the delayed pause overlay.
#[derive(Debug)]
pub struct ControlsVisibility {
    state: ControlState,
    pause_overlay_at: Option<Instant>,
    pause_overlay_visible: bool,
    hide_after: Duration,
    pause_overlay_after: Duration,
}

impl ControlsVisibility {
    pub fn new(hide_after: Duration, pause_overlay_after: Duration) -> Self {
        Self {
            state: ControlState::Pinned,
            pause_overlay_at: None,
            pause_overlay_visible: false,
            hide_after,
            pause_overlay_after,
        }
    }

    pub fn controls_visible(&self) -> bool {
        !matches!(self.state, ControlState::Hidden)
    }

    pub fn pause_overlay_visible(&self) -> bool {
        self.pause_overlay_visible
    }

    /// Earliest pending timer, for the driver to sleep on.
    pub fn next_deadline(&self) -> Option<Instant> {
        let hide = match self.state {
            ControlState::Visible { hide_at } => Some(hide_at),
            _ => None,
        };
        match (hide, self.pause_overlay_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Re-evaluate after the playing / buffering / menu inputs changed.
    pub fn sync(&mut self, ctx: VisibilityContext, now: Instant) {
        if ctx.menu_open {
            self.state = ControlState::Pinned;
            self.cancel_pause_overlay();
        } else if !ctx.is_playing {
            self.state = ControlState::Pinned;
            if ctx.is_buffering || ctx.unavailable {
                self.cancel_pause_overlay();
            } else if !self.pause_overlay_visible && self.pause_overlay_at.is_none() {
                self.pause_overlay_at = Some(now + self.pause_overlay_after);
            }
        } else {
            self.cancel_pause_overlay();
            if self.state == ControlState::Pinned {
                self.state = ControlState::Visible {
                    hide_at: now + self.hide_after,
                };
            }
        }
    }

    /// Pointer movement, key press, click or scroll.
    pub fn on_activity(&mut self, ctx: VisibilityContext, now: Instant) {
        self.cancel_pause_overlay();
        self.state = if ctx.menu_open || !ctx.is_playing {
            ControlState::Pinned
        } else {
            ControlState::Visible {
                hide_at: now + self.hide_after,
            }
        };
        self.sync(ctx, now);
    }

    /// Fire due timers. Returns true when anything visible changed.
    pub fn tick(&mut self, ctx: VisibilityContext, now: Instant) -> bool {
        let mut changed = false;

        if let ControlState::Visible { hide_at } = self.state
            && now >= hide_at
            && ctx.is_playing
            && !ctx.menu_open
        {
            debug!("Inactivity timeout, hiding controls");
            self.state = ControlState::Hidden;
            changed = true;
        }

        if let Some(at) = self.pause_overlay_at
            && now >= at
        {
            self.pause_overlay_at = None;
            if !ctx.is_playing && !ctx.is_buffering && !ctx.menu_open && !ctx.unavailable {
                debug!("Showing pause overlay");
                self.pause_overlay_visible = true;
                changed = true;
            }
        }

        changed
    }

    fn cancel_pause_overlay(&mut self) {
        self.pause_overlay_at = None;
        self.pause_overlay_visible = false;
    }
}
