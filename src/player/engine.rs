//! Seams to the media element and the third-party adaptive streaming engine.
//!
//! The engine's segment scheduling and bandwidth estimation stay behind
//! [`StreamingEngine`]; this crate only drives it.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::retry::BackoffPolicy;
use super::types::{BufferedRange, EngineEvent, ReadyState};
use crate::utils::PlayerResult;

/// Buffering and load-retry settings passed to every engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Forward buffer the engine tries to keep
    pub max_buffer_length: Duration,
    /// Hard ceiling on the forward buffer
    pub max_max_buffer_length: Duration,
    /// Played media kept behind the cursor
    pub back_buffer_length: Duration,
    pub fragment_loading: BackoffPolicy,
    pub manifest_loading: BackoffPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_buffer_length: Duration::from_secs(60),
            max_max_buffer_length: Duration::from_secs(120),
            back_buffer_length: Duration::from_secs(30),
            fragment_loading: BackoffPolicy::fragment(),
            manifest_loading: BackoffPolicy::manifest(),
        }
    }
}

/// The video surface. Shared between the controller and the autoplay task.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Resolves once playback actually starts; rejects on autoplay policy or errors.
    async fn play(&self) -> PlayerResult<()>;
    fn pause(&self);
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    fn duration(&self) -> Option<f64>;
    fn buffered(&self) -> Vec<BufferedRange>;
    fn ready_state(&self) -> ReadyState;
    /// Native playback without the engine.
    fn set_source(&self, url: &str);
    fn clear_source(&self);
    fn set_volume(&self, volume: f64);
    fn set_muted(&self, muted: bool);
    fn set_playback_rate(&self, rate: f64);
}

/// One engine instance bound to one media element for one source.
pub trait StreamingEngine: Send {
    fn load_source(&mut self, url: &str);
    /// Resume (or restart) segment loading.
    fn start_load(&mut self);
    fn recover_media_error(&mut self);
    /// Release listeners, buffers and network activity. The instance is unusable after.
    fn destroy(&mut self);

    fn current_level(&self) -> Option<usize>;
    fn auto_level_enabled(&self) -> bool;
    /// Pin a level; `None` hands control back to ABR.
    fn set_current_level(&mut self, level: Option<usize>);
    /// Cap the next ABR choice without leaving auto mode.
    fn set_next_auto_level(&mut self, level: usize);

    fn set_subtitle_track(&mut self, index: Option<usize>);
    fn set_audio_track(&mut self, index: usize);
}

/// Where an engine instance reports its signals. Tagged with the playback session so
/// events from an engine that has since been replaced are dropped.
#[derive(Debug, Clone)]
pub struct EngineEventSink {
    session_id: Uuid,
    tx: mpsc::UnboundedSender<(Uuid, EngineEvent)>,
}

impl EngineEventSink {
    pub fn new(session_id: Uuid, tx: mpsc::UnboundedSender<(Uuid, EngineEvent)>) -> Self {
        Self { session_id, tx }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Returns false once the controller is gone.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.tx.send((self.session_id, event)).is_ok()
    }
}

pub trait EngineFactory: Send + Sync {
    /// False when the platform lacks what the engine needs; playback falls back to native.
    fn is_supported(&self) -> bool;

    fn create(
        &self,
        config: &EngineConfig,
        media: Arc<dyn MediaElement>,
        events: EngineEventSink,
    ) -> PlayerResult<Box<dyn StreamingEngine>>;
}
