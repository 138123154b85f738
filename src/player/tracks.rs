use tracing::debug;

use crate::utils::{PlayerError, PlayerResult};

/// Engine-assigned track index
pub type TrackId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackInfo {
    pub id: TrackId,
    pub name: String,
    pub language: Option<String>,
    pub is_default: bool,
}

impl TrackInfo {
    pub fn label(&self) -> String {
        match &self.language {
            Some(language) if !self.name.contains(language.as_str()) => {
                format!("{} ({})", self.name, language)
            }
            _ => self.name.clone(),
        }
    }
}

/// Tracks available for the current source. Replaced wholesale on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackCatalog {
    pub subtitles: Vec<TrackInfo>,
    pub audio: Vec<TrackInfo>,
}

/// Active subtitle and audio choice.
///
/// `subtitle == None` is the "disabled" sentinel; `audio == None` means the stream's
/// default rendition. Any `Some` id is guaranteed to exist in the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackSelection {
    pub subtitle: Option<TrackId>,
    pub audio: Option<TrackId>,
    subtitle_explicit: bool,
    audio_explicit: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Tracks {
    catalog: TrackCatalog,
    selection: TrackSelection,
}

impl Tracks {
    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &TrackSelection {
        &self.selection
    }

    /// Forget everything, including explicit user choices. Called on source change.
    pub fn reset(&mut self) {
        self.catalog = TrackCatalog::default();
        self.selection = TrackSelection::default();
    }

    /// Returns the subtitle id the engine should now show.
    pub fn replace_subtitles(&mut self, tracks: Vec<TrackInfo>) -> Option<TrackId> {
        debug!("Subtitle tracks updated: {}", tracks.len());
        self.catalog.subtitles = tracks;

        let keep = self.selection.subtitle_explicit
            && self
                .selection
                .subtitle
                .is_some_and(|id| self.catalog.subtitles.iter().any(|t| t.id == id));
        if !keep {
            self.selection.subtitle = None;
        }
        self.selection.subtitle
    }

    /// Returns the audio id the engine should now play.
    pub fn replace_audio(&mut self, tracks: Vec<TrackInfo>) -> Option<TrackId> {
        debug!("Audio tracks updated: {}", tracks.len());
        self.catalog.audio = tracks;

        let still_valid = self
            .selection
            .audio
            .is_some_and(|id| self.catalog.audio.iter().any(|t| t.id == id));
        if !(self.selection.audio_explicit && still_valid) {
            self.selection.audio_explicit = false;
            self.selection.audio = self
                .catalog
                .audio
                .iter()
                .find(|t| t.is_default)
                .or_else(|| self.catalog.audio.first())
                .map(|t| t.id);
        }
        self.selection.audio
    }

    pub fn select_subtitle(&mut self, id: Option<TrackId>) -> PlayerResult<()> {
        if let Some(id) = id
            && !self.catalog.subtitles.iter().any(|t| t.id == id)
        {
            return Err(PlayerError::UnknownTrack(format!("subtitle {}", id)));
        }
        self.selection.subtitle = id;
        self.selection.subtitle_explicit = true;
        Ok(())
    }

    pub fn select_audio(&mut self, id: TrackId) -> PlayerResult<()> {
        if !self.catalog.audio.iter().any(|t| t.id == id) {
            return Err(PlayerError::UnknownTrack(format!("audio {}", id)));
        }
        self.selection.audio = Some(id);
        self.selection.audio_explicit = true;
        Ok(())
    }

    /// Keyboard fast path: flip between "off" and the first subtitle track.
    /// Returns `None` when there is nothing to toggle.
    pub fn toggle_first_subtitle(&mut self) -> Option<Option<TrackId>> {
        let first = self.catalog.subtitles.first()?.id;
        let next = match self.selection.subtitle {
            Some(_) => None,
            None => Some(first),
        };
        self.selection.subtitle = next;
        self.selection.subtitle_explicit = true;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: TrackId, name: &str, is_default: bool) -> TrackInfo {
        TrackInfo {
            id,
            name: name.to_string(),
            language: None,
            is_default,
        }
    }

    #[test]
    fn test_subtitles_default_to_disabled() {
        let mut tracks = Tracks::default();
        let active = tracks.replace_subtitles(vec![track(0, "English", true)]);

        assert_eq!(active, None);
        assert_eq!(tracks.catalog().subtitles.len(), 1);
    }

    #[test]
    fn test_explicit_subtitle_survives_update() {
        let mut tracks = Tracks::default();
        tracks.replace_subtitles(vec![track(0, "English", false), track(1, "French", false)]);
        tracks.select_subtitle(Some(1)).unwrap();

        let active =
            tracks.replace_subtitles(vec![track(0, "English", false), track(1, "French", false)]);
        assert_eq!(active, Some(1));
    }

    #[test]
    fn test_catalog_replaced_not_merged() {
        let mut tracks = Tracks::default();
        tracks.replace_subtitles(vec![track(0, "English", false), track(1, "French", false)]);
        tracks.select_subtitle(Some(1)).unwrap();

        let active = tracks.replace_subtitles(vec![track(0, "German", false)]);
        assert_eq!(active, None);
        assert_eq!(tracks.catalog().subtitles, vec![track(0, "German", false)]);
    }

    #[test]
    fn test_audio_defaults_to_flagged_track() {
        let mut tracks = Tracks::default();
        let active = tracks.replace_audio(vec![track(0, "Commentary", false), track(1, "Main", true)]);
        assert_eq!(active, Some(1));

        let active = tracks.replace_audio(vec![track(4, "Only", false)]);
        assert_eq!(active, Some(4));
    }

    #[test]
    fn test_explicit_audio_kept_while_present() {
        let mut tracks = Tracks::default();
        tracks.replace_audio(vec![track(0, "Main", true), track(1, "Dub", false)]);
        tracks.select_audio(1).unwrap();

        assert_eq!(
            tracks.replace_audio(vec![track(0, "Main", true), track(1, "Dub", false)]),
            Some(1)
        );
        assert_eq!(tracks.replace_audio(vec![track(0, "Main", true)]), Some(0));
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut tracks = Tracks::default();
        tracks.replace_subtitles(vec![track(0, "English", false)]);

        assert!(tracks.select_subtitle(Some(3)).is_err());
        assert!(tracks.select_audio(0).is_err());
        assert!(tracks.select_subtitle(None).is_ok());
    }

    #[test]
    fn test_toggle_first_subtitle() {
        let mut tracks = Tracks::default();
        assert_eq!(tracks.toggle_first_subtitle(), None);

        tracks.replace_subtitles(vec![track(2, "English", false), track(3, "French", false)]);
        assert_eq!(tracks.toggle_first_subtitle(), Some(Some(2)));
        assert_eq!(tracks.toggle_first_subtitle(), Some(None));
    }

    #[test]
    fn test_reset_clears_explicit_choice() {
        let mut tracks = Tracks::default();
        tracks.replace_subtitles(vec![track(0, "English", false)]);
        tracks.select_subtitle(Some(0)).unwrap();
        tracks.reset();

        assert_eq!(tracks.replace_subtitles(vec![track(0, "English", false)]), None);
    }

    #[test]
    fn test_label_includes_language() {
        let mut info = track(0, "Main", false);
        info.language = Some("en".into());
        assert_eq!(info.label(), "Main (en)");
    }
}
