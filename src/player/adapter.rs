use std::sync::Arc;
use tracing::{debug, info, warn};

use super::engine::{EngineConfig, EngineEventSink, EngineFactory, MediaElement, StreamingEngine};
use super::source::{PlaybackSource, SourceKind};

/// What is currently driving the media element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Unbound,
    Engine,
    /// The element plays the URL itself (progressive file, or engine unsupported)
    Native,
}

enum Binding {
    Unbound,
    Engine(Box<dyn StreamingEngine>),
    Native,
}

/// Binds at most one engine instance to the media element at a time.
pub struct EngineAdapter {
    factory: Arc<dyn EngineFactory>,
    config: EngineConfig,
    media: Arc<dyn MediaElement>,
    binding: Binding,
}

impl EngineAdapter {
    pub fn new(
        factory: Arc<dyn EngineFactory>,
        config: EngineConfig,
        media: Arc<dyn MediaElement>,
    ) -> Self {
        Self {
            factory,
            config,
            media,
            binding: Binding::Unbound,
        }
    }

    pub fn kind(&self) -> BindingKind {
        match self.binding {
            Binding::Unbound => BindingKind::Unbound,
            Binding::Engine(_) => BindingKind::Engine,
            Binding::Native => BindingKind::Native,
        }
    }

    /// Bind `source`, fully tearing down the previous binding first.
    pub fn bind(&mut self, source: &PlaybackSource, events: EngineEventSink) -> BindingKind {
        self.teardown();

        if source.kind == SourceKind::Manifest && self.factory.is_supported() {
            match self
                .factory
                .create(&self.config, Arc::clone(&self.media), events)
            {
                Ok(mut engine) => {
                    info!("Binding streaming engine for {}", source.url);
                    engine.load_source(&source.url);
                    self.binding = Binding::Engine(engine);
                    return BindingKind::Engine;
                }
                Err(e) => {
                    warn!("Streaming engine construction failed, using native playback: {}", e);
                }
            }
        } else if source.kind == SourceKind::Manifest {
            info!("Streaming engine unsupported, using native playback");
        }

        debug!("Native playback for {}", source.url);
        self.media.set_source(&source.url);
        self.binding = Binding::Native;
        BindingKind::Native
    }

    /// Destroy the engine (or detach the native source). Idempotent.
    pub fn teardown(&mut self) {
        match std::mem::replace(&mut self.binding, Binding::Unbound) {
            Binding::Engine(mut engine) => {
                info!("Destroying streaming engine");
                engine.destroy();
                self.media.clear_source();
            }
            Binding::Native => {
                debug!("Detaching native source");
                self.media.clear_source();
            }
            Binding::Unbound => {}
        }
    }

    fn engine(&mut self) -> Option<&mut Box<dyn StreamingEngine>> {
        match &mut self.binding {
            Binding::Engine(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn start_load(&mut self) {
        if let Some(engine) = self.engine() {
            engine.start_load();
        }
    }

    pub fn recover_media_error(&mut self) {
        if let Some(engine) = self.engine() {
            engine.recover_media_error();
        }
    }

    pub fn current_level(&self) -> Option<usize> {
        match &self.binding {
            Binding::Engine(engine) => engine.current_level(),
            _ => None,
        }
    }

    pub fn auto_level_enabled(&self) -> bool {
        match &self.binding {
            Binding::Engine(engine) => engine.auto_level_enabled(),
            _ => false,
        }
    }

    pub fn set_current_level(&mut self, level: Option<usize>) {
        if let Some(engine) = self.engine() {
            engine.set_current_level(level);
        }
    }

    pub fn set_next_auto_level(&mut self, level: usize) {
        if let Some(engine) = self.engine() {
            engine.set_next_auto_level(level);
        }
    }

    pub fn set_subtitle_track(&mut self, index: Option<usize>) {
        if let Some(engine) = self.engine() {
            engine.set_subtitle_track(index);
        }
    }

    pub fn set_audio_track(&mut self, index: usize) {
        if let Some(engine) = self.engine() {
            engine.set_audio_track(index);
        }
    }
}

impl Drop for EngineAdapter {
    fn drop(&mut self) {
        self.teardown();
    }
}
