#![cfg(test)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::player::engine::{
    EngineConfig, EngineEventSink, EngineFactory, MediaElement, StreamingEngine,
};
use crate::player::types::{BufferedRange, ReadyState};
use crate::utils::{PlayerError, PlayerResult};

/// Ordered record of calls made on mocks, shared between engine and media element.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|e| e == entry)
    }
}

struct MediaState {
    current_time: f64,
    duration: Option<f64>,
    buffered: Vec<BufferedRange>,
    ready_state: ReadyState,
    play_rejections: u32,
}

pub struct MockMedia {
    log: CallLog,
    state: Mutex<MediaState>,
}

impl MockMedia {
    pub fn new(log: CallLog) -> Arc<Self> {
        Arc::new(Self {
            log,
            state: Mutex::new(MediaState {
                current_time: 0.0,
                duration: Some(120.0),
                buffered: vec![BufferedRange::new(0.0, 6.0)],
                ready_state: ReadyState::HaveEnoughData,
                play_rejections: 0,
            }),
        })
    }

    pub fn reject_next_plays(&self, count: u32) {
        self.state.lock().unwrap().play_rejections = count;
    }

    pub fn set_buffered(&self, ranges: Vec<BufferedRange>) {
        self.state.lock().unwrap().buffered = ranges;
    }

    pub fn set_time(&self, seconds: f64) {
        self.state.lock().unwrap().current_time = seconds;
    }

    pub fn set_ready_state(&self, ready_state: ReadyState) {
        self.state.lock().unwrap().ready_state = ready_state;
    }
}

#[async_trait]
impl MediaElement for MockMedia {
    async fn play(&self) -> PlayerResult<()> {
        self.log.push("media.play");
        let mut state = self.state.lock().unwrap();
        if state.play_rejections > 0 {
            state.play_rejections -= 1;
            return Err(PlayerError::PlaybackRejected("NotAllowedError".into()));
        }
        Ok(())
    }

    fn pause(&self) {
        self.log.push("media.pause");
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn set_current_time(&self, seconds: f64) {
        self.log.push(format!("media.seek {:.2}", seconds));
        self.state.lock().unwrap().current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().unwrap().duration
    }

    fn buffered(&self) -> Vec<BufferedRange> {
        self.state.lock().unwrap().buffered.clone()
    }

    fn ready_state(&self) -> ReadyState {
        self.state.lock().unwrap().ready_state
    }

    fn set_source(&self, url: &str) {
        self.log.push(format!("media.set_source {}", url));
    }

    fn clear_source(&self) {
        self.log.push("media.clear_source");
    }

    fn set_volume(&self, volume: f64) {
        self.log.push(format!("media.volume {:.2}", volume));
    }

    fn set_muted(&self, muted: bool) {
        self.log.push(format!("media.muted {}", muted));
    }

    fn set_playback_rate(&self, rate: f64) {
        self.log.push(format!("media.rate {:.2}", rate));
    }
}

pub struct MockEngine {
    id: usize,
    log: CallLog,
    level: Option<usize>,
    auto: bool,
}

impl StreamingEngine for MockEngine {
    fn load_source(&mut self, url: &str) {
        self.log.push(format!("engine{}.load {}", self.id, url));
    }

    fn start_load(&mut self) {
        self.log.push(format!("engine{}.start_load", self.id));
    }

    fn recover_media_error(&mut self) {
        self.log.push(format!("engine{}.recover_media_error", self.id));
    }

    fn destroy(&mut self) {
        self.log.push(format!("engine{}.destroy", self.id));
    }

    fn current_level(&self) -> Option<usize> {
        self.level
    }

    fn auto_level_enabled(&self) -> bool {
        self.auto
    }

    fn set_current_level(&mut self, level: Option<usize>) {
        self.log.push(format!("engine{}.level {:?}", self.id, level));
        self.auto = level.is_none();
        if level.is_some() {
            self.level = level;
        }
    }

    fn set_next_auto_level(&mut self, level: usize) {
        self.log.push(format!("engine{}.next_auto_level {}", self.id, level));
    }

    fn set_subtitle_track(&mut self, index: Option<usize>) {
        self.log.push(format!("engine{}.subtitle {:?}", self.id, index));
    }

    fn set_audio_track(&mut self, index: usize) {
        self.log.push(format!("engine{}.audio {}", self.id, index));
    }
}

pub struct MockFactory {
    log: CallLog,
    supported: bool,
    created: AtomicUsize,
    sinks: Mutex<Vec<EngineEventSink>>,
}

impl MockFactory {
    pub fn new(log: CallLog) -> Arc<Self> {
        Arc::new(Self::new_inner(log))
    }

    pub fn unsupported(log: CallLog) -> Arc<Self> {
        Arc::new(Self {
            supported: false,
            ..Self::new_inner(log)
        })
    }

    fn new_inner(log: CallLog) -> Self {
        Self {
            log,
            supported: true,
            created: AtomicUsize::new(0),
            sinks: Mutex::new(Vec::new()),
        }
    }

    /// Event sink handed to the most recent engine
    pub fn last_sink(&self) -> Option<EngineEventSink> {
        self.sinks.lock().unwrap().last().cloned()
    }
}

impl EngineFactory for MockFactory {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create(
        &self,
        _config: &EngineConfig,
        _media: Arc<dyn MediaElement>,
        events: EngineEventSink,
    ) -> PlayerResult<Box<dyn StreamingEngine>> {
        let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.push(format!("engine{}.create", id));
        self.sinks.lock().unwrap().push(events);
        Ok(Box::new(MockEngine {
            id,
            log: self.log.clone(),
            level: Some(2),
            auto: true,
        }))
    }
}
