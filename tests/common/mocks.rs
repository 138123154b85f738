use async_trait::async_trait;
use cinestream::player::{
    BufferedRange, EngineConfig, EngineEventSink, EngineFactory, MediaElement, ReadyState,
    StreamingEngine,
};
use cinestream::{PlayerError, PlayerResult};
use std::sync::{Arc, Mutex};

/// Calls made on the mocks, in order, shared by the engine and the media element.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn index_of(&self, call: &str) -> Option<usize> {
        self.0.lock().unwrap().iter().position(|c| c == call)
    }
}

/// Media element whose `play()` rejects a scripted number of times.
pub struct ScriptedMedia {
    recorder: Recorder,
    rejections: Mutex<u32>,
    buffered: Mutex<Vec<BufferedRange>>,
}

impl ScriptedMedia {
    pub fn new(recorder: Recorder) -> Arc<Self> {
        Arc::new(Self {
            recorder,
            rejections: Mutex::new(0),
            buffered: Mutex::new(vec![BufferedRange::new(0.0, 8.0)]),
        })
    }

    pub fn reject_plays(&self, count: u32) {
        *self.rejections.lock().unwrap() = count;
    }
}

#[async_trait]
impl MediaElement for ScriptedMedia {
    async fn play(&self) -> PlayerResult<()> {
        self.recorder.record("play");
        let mut rejections = self.rejections.lock().unwrap();
        if *rejections > 0 {
            *rejections -= 1;
            return Err(PlayerError::PlaybackRejected(
                "play() request was interrupted".to_string(),
            ));
        }
        Ok(())
    }

    fn pause(&self) {
        self.recorder.record("pause");
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn set_current_time(&self, seconds: f64) {
        self.recorder.record(format!("seek {:.2}", seconds));
    }

    fn duration(&self) -> Option<f64> {
        Some(5400.0)
    }

    fn buffered(&self) -> Vec<BufferedRange> {
        self.buffered.lock().unwrap().clone()
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }

    fn set_source(&self, url: &str) {
        self.recorder.record(format!("set_source {}", url));
    }

    fn clear_source(&self) {
        self.recorder.record("clear_source");
    }

    fn set_volume(&self, _volume: f64) {}

    fn set_muted(&self, _muted: bool) {}

    fn set_playback_rate(&self, _rate: f64) {}
}

struct RecordingEngine {
    name: String,
    recorder: Recorder,
}

impl StreamingEngine for RecordingEngine {
    fn load_source(&mut self, url: &str) {
        self.recorder.record(format!("{} load {}", self.name, url));
    }

    fn start_load(&mut self) {
        self.recorder.record(format!("{} start_load", self.name));
    }

    fn recover_media_error(&mut self) {
        self.recorder.record(format!("{} recover", self.name));
    }

    fn destroy(&mut self) {
        self.recorder.record(format!("{} destroy", self.name));
    }

    fn current_level(&self) -> Option<usize> {
        None
    }

    fn auto_level_enabled(&self) -> bool {
        true
    }

    fn set_current_level(&mut self, _level: Option<usize>) {}

    fn set_next_auto_level(&mut self, _level: usize) {}

    fn set_subtitle_track(&mut self, _index: Option<usize>) {}

    fn set_audio_track(&mut self, _index: usize) {}
}

/// Builds engines named `hls1`, `hls2`, ... and keeps their event sinks.
#[derive(Default)]
pub struct RecordingFactory {
    recorder: Recorder,
    sinks: Mutex<Vec<EngineEventSink>>,
}

impl RecordingFactory {
    pub fn new(recorder: Recorder) -> Arc<Self> {
        Arc::new(Self {
            recorder,
            sinks: Mutex::new(Vec::new()),
        })
    }

    pub fn latest_sink(&self) -> EngineEventSink {
        self.sinks
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no engine created yet")
    }
}

impl EngineFactory for RecordingFactory {
    fn is_supported(&self) -> bool {
        true
    }

    fn create(
        &self,
        _config: &EngineConfig,
        _media: Arc<dyn MediaElement>,
        events: EngineEventSink,
    ) -> PlayerResult<Box<dyn StreamingEngine>> {
        let mut sinks = self.sinks.lock().unwrap();
        sinks.push(events);
        let name = format!("hls{}", sinks.len());
        self.recorder.record(format!("{} create", name));
        Ok(Box::new(RecordingEngine {
            name,
            recorder: self.recorder.clone(),
        }))
    }
}
