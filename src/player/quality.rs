use tracing::{debug, info};

use crate::constants::AUTO_QUALITY_LABEL;

/// One rendition advertised by the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityLevel {
    pub height: Option<u32>,
    pub bitrate: u64,
    pub name: Option<String>,
}

impl QualityLevel {
    pub fn label(&self) -> String {
        if let Some(height) = self.height {
            format!("{}p", height)
        } else if let Some(name) = &self.name {
            name.clone()
        } else {
            format!("{} kbps", self.bitrate / 1000)
        }
    }
}

/// Who picks the rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityMode {
    /// Engine ABR decides
    Auto,
    /// User pinned a level for this session
    Manual(usize),
}

#[derive(Debug, Clone)]
pub struct QualityLevels {
    levels: Vec<QualityLevel>,
    mode: QualityMode,
    active: Option<usize>,
}

impl Default for QualityLevels {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            mode: QualityMode::Auto,
            active: None,
        }
    }
}

impl QualityLevels {
    pub fn levels(&self) -> &[QualityLevel] {
        &self.levels
    }

    pub fn mode(&self) -> QualityMode {
        self.mode
    }

    pub fn is_auto(&self) -> bool {
        self.mode == QualityMode::Auto
    }

    /// Replace the advertised levels wholesale. A pinned level that no longer exists
    /// falls back to Auto.
    pub fn replace(&mut self, levels: Vec<QualityLevel>) {
        debug!("Quality levels updated: {} renditions", levels.len());
        if let QualityMode::Manual(index) = self.mode
            && index >= levels.len()
        {
            self.mode = QualityMode::Auto;
        }
        self.levels = levels;
        self.active = self.active.filter(|index| *index < self.levels.len());
    }

    pub fn record_switch(&mut self, index: usize) {
        if index < self.levels.len() {
            self.active = Some(index);
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Pin a level (`Some`) or go back to Auto (`None`). Returns false for an unknown level.
    pub fn select(&mut self, level: Option<usize>) -> bool {
        match level {
            None => {
                info!("Quality set to Auto");
                self.mode = QualityMode::Auto;
                true
            }
            Some(index) if index < self.levels.len() => {
                info!("Quality pinned to {}", self.levels[index].label());
                self.mode = QualityMode::Manual(index);
                self.active = Some(index);
                true
            }
            Some(_) => false,
        }
    }

    /// Label shown in the quality menu button
    pub fn current_label(&self) -> String {
        match self.mode {
            QualityMode::Auto => AUTO_QUALITY_LABEL.to_string(),
            QualityMode::Manual(index) => self
                .levels
                .get(index)
                .map(QualityLevel::label)
                .unwrap_or_else(|| AUTO_QUALITY_LABEL.to_string()),
        }
    }

    /// Level one step below `current`, only while ABR is in control.
    pub fn step_down_from(&self, current: Option<usize>) -> Option<usize> {
        if !self.is_auto() {
            return None;
        }
        current.filter(|level| *level > 0).map(|level| level - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ladder() -> Vec<QualityLevel> {
        [360, 720, 1080]
            .into_iter()
            .map(|height| QualityLevel {
                height: Some(height),
                bitrate: height as u64 * 4000,
                name: None,
            })
            .collect()
    }

    #[test]
    fn test_defaults_to_auto() {
        let mut quality = QualityLevels::default();
        quality.replace(ladder());

        assert!(quality.is_auto());
        assert_eq!(quality.current_label(), "Auto");
    }

    #[test]
    fn test_pin_and_release() {
        let mut quality = QualityLevels::default();
        quality.replace(ladder());

        assert!(quality.select(Some(1)));
        assert_eq!(quality.mode(), QualityMode::Manual(1));
        assert_eq!(quality.current_label(), "720p");

        assert!(!quality.select(Some(9)));
        assert_eq!(quality.mode(), QualityMode::Manual(1));

        assert!(quality.select(None));
        assert_eq!(quality.current_label(), "Auto");
    }

    #[test]
    fn test_step_down_only_in_auto() {
        let mut quality = QualityLevels::default();
        quality.replace(ladder());

        assert_eq!(quality.step_down_from(Some(2)), Some(1));
        assert_eq!(quality.step_down_from(Some(0)), None);
        assert_eq!(quality.step_down_from(None), None);

        quality.select(Some(2));
        assert_eq!(quality.step_down_from(Some(2)), None);
    }

    #[test]
    fn test_replace_drops_stale_pin() {
        let mut quality = QualityLevels::default();
        quality.replace(ladder());
        quality.select(Some(2));

        quality.replace(ladder().into_iter().take(2).collect());
        assert!(quality.is_auto());
    }

    #[test]
    fn test_level_labels() {
        let named = QualityLevel {
            height: None,
            bitrate: 128_000,
            name: Some("audio only".into()),
        };
        let bare = QualityLevel {
            height: None,
            bitrate: 800_000,
            name: None,
        };
        assert_eq!(named.label(), "audio only");
        assert_eq!(bare.label(), "800 kbps");
    }
}
