/// Playback state owned by the controller. Written only from media element events or
/// explicit user actions; reset to defaults on every source change.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub is_playing: bool,
    pub is_buffering: bool,
    pub position_millis: u64,
    pub duration_millis: u64,
    pub volume: f64,
    pub is_muted: bool,
    pub playback_rate: f64,
    pub is_fullscreen: bool,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_buffering: false,
            position_millis: 0,
            duration_millis: 0,
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
            is_fullscreen: false,
        }
    }
}

impl PlaybackStatus {
    pub fn set_position_secs(&mut self, seconds: f64) {
        self.position_millis = secs_to_millis(seconds);
    }

    pub fn set_duration_secs(&mut self, seconds: Option<f64>) {
        self.duration_millis = seconds.map(secs_to_millis).unwrap_or(0);
    }

    /// 0.0..=1.0, or `None` while the duration is unknown
    pub fn progress(&self) -> Option<f64> {
        (self.duration_millis > 0)
            .then(|| (self.position_millis as f64 / self.duration_millis as f64).min(1.0))
    }
}

fn secs_to_millis(seconds: f64) -> u64 {
    // NaN and infinite durations (live streams) map to 0
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let status = PlaybackStatus::default();
        assert!(!status.is_playing);
        assert_eq!(status.volume, 1.0);
        assert_eq!(status.playback_rate, 1.0);
        assert_eq!(status.progress(), None);
    }

    #[test]
    fn test_time_conversion() {
        let mut status = PlaybackStatus::default();
        status.set_duration_secs(Some(120.0));
        status.set_position_secs(30.25);

        assert_eq!(status.position_millis, 30_250);
        assert_eq!(status.progress(), Some(30_250.0 / 120_000.0));

        status.set_duration_secs(Some(f64::INFINITY));
        assert_eq!(status.duration_millis, 0);
        status.set_position_secs(f64::NAN);
        assert_eq!(status.position_millis, 0);
    }
}
