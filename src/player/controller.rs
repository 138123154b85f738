use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, mpsc, oneshot, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use super::adapter::{BindingKind, EngineAdapter};
use super::autoplay::{AutoplayOutcome, run_autoplay};
use super::engine::{EngineEventSink, EngineFactory, MediaElement};
use super::quality::QualityLevels;
use super::retry::AutoplayPolicy;
use super::source::{PlaybackSource, StreamSourceResolver};
use super::stall::{ErrorAction, PlaybackPhase, RecoveryPlan, StallMachine};
use super::status::PlaybackStatus;
use super::tracks::{TrackCatalog, TrackId, TrackSelection, Tracks};
use super::types::{EngineError, EngineErrorKind, EngineEvent, MediaEvent, buffered_ahead};
use crate::config::Config;
use crate::ui::player::{
    ControlsVisibility, Key, KeyAction, MenuState, OverlayMenu, VisibilityContext, action_for,
};
use crate::utils::{PlayerError, PlayerResult};

/// Commands that can be sent to the player controller
#[derive(Debug)]
pub enum PlayerCommand {
    /// Replace the current source
    LoadSource {
        url: String,
        content_id: Option<String>,
        respond_to: oneshot::Sender<PlayerResult<()>>,
    },
    /// Forwarded from the media element
    MediaEvent(MediaEvent),
    TogglePlay,
    Play,
    Pause,
    Seek {
        position: Duration,
    },
    /// Set volume (0.0 to 1.0)
    SetVolume {
        volume: f64,
    },
    ToggleMute,
    SetPlaybackRate {
        rate: f64,
    },
    ToggleFullscreen,
    ExitFullscreen,
    /// `None` disables subtitles
    SelectSubtitle {
        track: Option<TrackId>,
        respond_to: oneshot::Sender<PlayerResult<()>>,
    },
    SelectAudio {
        track: TrackId,
        respond_to: oneshot::Sender<PlayerResult<()>>,
    },
    /// `None` hands rendition choice back to ABR
    SelectQuality {
        level: Option<usize>,
        respond_to: oneshot::Sender<PlayerResult<()>>,
    },
    OpenMenu(OverlayMenu),
    ToggleMenu(OverlayMenu),
    MenuBack,
    /// Click outside or scroll
    CloseMenus,
    PointerActivity,
    KeyPress(Key),
    GetSnapshot {
        respond_to: oneshot::Sender<PlayerSnapshot>,
    },
    Close {
        respond_to: oneshot::Sender<()>,
    },
}

/// Everything the player chrome renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub session_id: Option<Uuid>,
    /// URL handed to the engine or element, after proxy rewriting
    pub source_url: Option<String>,
    pub phase: PlaybackPhase,
    pub status: PlaybackStatus,
    pub tracks: TrackCatalog,
    pub selection: TrackSelection,
    pub quality_label: String,
    pub quality_levels: Vec<String>,
    pub menu: OverlayMenu,
    pub controls_visible: bool,
    pub pause_overlay_visible: bool,
    /// Automated recovery is exhausted for this source
    pub unavailable: bool,
    pub closed: bool,
}

/// Initial playback gating for the current source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartGate {
    AwaitingMetadata,
    AwaitingBuffer,
    Released,
}

struct AutoplayTask {
    id: u64,
    cancel: CancellationToken,
}

/// Owns the media element binding and all playback state for one player view.
///
/// Every input (commands, media events, engine signals, autoplay results and timers)
/// is applied sequentially by [`PlayerController::run`].
pub struct PlayerController {
    receiver: mpsc::UnboundedReceiver<PlayerCommand>,
    resolver: StreamSourceResolver,
    adapter: EngineAdapter,
    media: Arc<dyn MediaElement>,
    source: Option<PlaybackSource>,

    status: PlaybackStatus,
    stall: StallMachine,
    tracks: Tracks,
    quality: QualityLevels,
    menus: MenuState,
    visibility: ControlsVisibility,
    unavailable: bool,
    closed: bool,

    min_start_buffer: f64,
    start_gate: StartGate,
    autoplay_policy: AutoplayPolicy,
    autoplay: Option<AutoplayTask>,
    autoplay_seq: u64,
    can_play: Arc<Notify>,

    engine_tx: mpsc::UnboundedSender<(Uuid, EngineEvent)>,
    engine_rx: mpsc::UnboundedReceiver<(Uuid, EngineEvent)>,
    autoplay_tx: mpsc::UnboundedSender<(u64, AutoplayOutcome)>,
    autoplay_rx: mpsc::UnboundedReceiver<(u64, AutoplayOutcome)>,
    snapshot_tx: watch::Sender<PlayerSnapshot>,
}

impl PlayerController {
    /// Create a new player controller bound to `media`
    pub fn new(
        config: &Config,
        factory: Arc<dyn EngineFactory>,
        media: Arc<dyn MediaElement>,
    ) -> (PlayerHandle, PlayerController) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let (autoplay_tx, autoplay_rx) = mpsc::unbounded_channel();

        let mut controller = PlayerController {
            receiver,
            resolver: StreamSourceResolver::new(config.api_base_url()),
            adapter: EngineAdapter::new(factory, config.engine_config(), Arc::clone(&media)),
            media,
            source: None,
            status: PlaybackStatus::default(),
            stall: StallMachine::new(config.playback.stall.clone()),
            tracks: Tracks::default(),
            quality: QualityLevels::default(),
            menus: MenuState::default(),
            visibility: ControlsVisibility::new(
                Duration::from_secs(config.ui.controls_hide_secs),
                Duration::from_secs(config.ui.pause_overlay_secs),
            ),
            unavailable: false,
            closed: false,
            min_start_buffer: config.playback.min_start_buffer_secs,
            start_gate: StartGate::Released,
            autoplay_policy: config.playback.autoplay.clone(),
            autoplay: None,
            autoplay_seq: 0,
            can_play: Arc::new(Notify::new()),
            engine_tx,
            engine_rx,
            autoplay_tx,
            autoplay_rx,
            snapshot_tx: watch::channel(PlayerSnapshot::empty()).0,
        };
        controller.publish();

        let handle = PlayerHandle {
            sender,
            snapshots: controller.snapshot_tx.subscribe(),
        };

        (handle, controller)
    }

    /// Run the controller event loop until closed or every handle is dropped
    pub async fn run(mut self) {
        debug!("PlayerController event loop started");

        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!("All player handles dropped");
                        self.close();
                    }
                },
                Some((session_id, event)) = self.engine_rx.recv() => {
                    self.handle_engine_event(session_id, event);
                }
                Some((task_id, outcome)) = self.autoplay_rx.recv() => {
                    self.handle_autoplay_outcome(task_id, outcome);
                }
                _ = wait_until(deadline) => {
                    self.tick(Instant::now());
                }
            }

            self.publish();
            if self.closed {
                break;
            }
        }

        debug!("PlayerController event loop terminated");
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        trace!("Player command: {:?}", command);

        if self.closed {
            match command {
                PlayerCommand::LoadSource { respond_to, .. }
                | PlayerCommand::SelectSubtitle { respond_to, .. }
                | PlayerCommand::SelectAudio { respond_to, .. }
                | PlayerCommand::SelectQuality { respond_to, .. } => {
                    let _ = respond_to.send(Err(PlayerError::Closed));
                }
                PlayerCommand::GetSnapshot { respond_to } => {
                    let _ = respond_to.send(self.snapshot());
                }
                PlayerCommand::Close { respond_to } => {
                    let _ = respond_to.send(());
                }
                other => debug!("Ignoring {:?} on closed player", other),
            }
            return;
        }

        match command {
            PlayerCommand::LoadSource {
                url,
                content_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.load_source(&url, content_id));
            }
            PlayerCommand::MediaEvent(event) => self.handle_media_event(event),
            PlayerCommand::TogglePlay => self.toggle_play(),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Seek { position } => self.seek(position),
            PlayerCommand::SetVolume { volume } => self.set_volume(volume),
            PlayerCommand::ToggleMute => self.toggle_mute(),
            PlayerCommand::SetPlaybackRate { rate } => self.set_playback_rate(rate),
            PlayerCommand::ToggleFullscreen => self.toggle_fullscreen(),
            PlayerCommand::ExitFullscreen => self.exit_fullscreen(),
            PlayerCommand::SelectSubtitle { track, respond_to } => {
                let _ = respond_to.send(self.select_subtitle(track));
            }
            PlayerCommand::SelectAudio { track, respond_to } => {
                let _ = respond_to.send(self.select_audio(track));
            }
            PlayerCommand::SelectQuality { level, respond_to } => {
                let _ = respond_to.send(self.select_quality(level));
            }
            PlayerCommand::OpenMenu(menu) => self.open_menu(menu),
            PlayerCommand::ToggleMenu(menu) => self.toggle_menu(menu),
            PlayerCommand::MenuBack => self.menu_back(),
            PlayerCommand::CloseMenus => self.close_menus(),
            PlayerCommand::PointerActivity => self.pointer_activity(),
            PlayerCommand::KeyPress(key) => self.key_press(key),
            PlayerCommand::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
            PlayerCommand::Close { respond_to } => {
                self.close();
                let _ = respond_to.send(());
            }
        }
    }

    /// Resolve and bind a new source. The previous engine is destroyed before the new
    /// one is built, and all per-source state goes back to defaults.
    pub fn load_source(&mut self, raw_url: &str, content_id: Option<String>) -> PlayerResult<()> {
        if self.closed {
            return Err(PlayerError::Closed);
        }

        let source = self.resolver.source(raw_url, content_id)?;
        info!(
            "Loading source {} (session {}, {:?})",
            source.url, source.session_id, source.kind
        );

        self.cancel_autoplay();
        self.status = PlaybackStatus {
            is_buffering: true,
            ..PlaybackStatus::default()
        };
        self.stall.reset();
        self.tracks.reset();
        self.quality = QualityLevels::default();
        self.menus.close_all();
        self.unavailable = false;
        self.can_play = Arc::new(Notify::new());
        self.start_gate = StartGate::AwaitingMetadata;

        let sink = EngineEventSink::new(source.session_id, self.engine_tx.clone());
        let binding = self.adapter.bind(&source, sink);
        debug!("Source bound via {:?}", binding);

        self.media.set_volume(self.status.volume);
        self.media.set_muted(self.status.is_muted);
        self.media.set_playback_rate(self.status.playback_rate);

        self.source = Some(source);
        self.sync_visibility();
        Ok(())
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if self.source.is_none() {
            trace!("Media event {:?} with no source bound", event);
            return;
        }

        match event {
            MediaEvent::LoadedMetadata => {
                self.status.set_duration_secs(self.media.duration());
                if self.start_gate == StartGate::AwaitingMetadata {
                    self.start_gate = StartGate::AwaitingBuffer;
                }
                self.try_release_start();
            }
            MediaEvent::Progress => self.try_release_start(),
            MediaEvent::CanPlay | MediaEvent::CanPlayThrough => {
                self.can_play.notify_one();
                if self.stall.is_stalled() {
                    self.stall.on_can_play();
                }
                self.status.is_buffering = false;
                self.try_release_start();
            }
            MediaEvent::Play => {}
            MediaEvent::Playing => {
                self.status.is_playing = true;
                self.status.is_buffering = false;
                self.stall.on_resumed();
            }
            MediaEvent::Pause => {
                self.status.is_playing = false;
                self.stall.on_paused();
            }
            MediaEvent::Waiting | MediaEvent::Stalled => self.on_waiting(),
            MediaEvent::Seeking => {}
            MediaEvent::Seeked | MediaEvent::TimeUpdate => {
                self.status.set_position_secs(self.media.current_time());
            }
            MediaEvent::DurationChange => {
                self.status.set_duration_secs(self.media.duration());
            }
            MediaEvent::VolumeChange { volume, muted } => {
                self.status.volume = volume;
                self.status.is_muted = muted;
            }
            MediaEvent::RateChange(rate) => self.status.playback_rate = rate,
            MediaEvent::Ended => {
                self.status.is_playing = false;
                self.status.is_buffering = false;
                self.stall.on_ended();
            }
            MediaEvent::Error(details) => {
                if self.adapter.kind() == BindingKind::Native {
                    self.apply_error(&EngineError::fatal(EngineErrorKind::Other, details));
                } else {
                    debug!("Media element error under engine control: {}", details);
                }
            }
        }

        self.sync_visibility();
    }

    pub fn handle_engine_event(&mut self, session_id: Uuid, event: EngineEvent) {
        let current = self.source.as_ref().map(|source| source.session_id);
        if current != Some(session_id) {
            debug!("Dropping engine event from stale session {}", session_id);
            return;
        }

        match event {
            EngineEvent::ManifestParsed => debug!("Manifest parsed"),
            EngineEvent::LevelsUpdated(levels) => self.quality.replace(levels),
            EngineEvent::LevelSwitched(level) => self.quality.record_switch(level),
            EngineEvent::SubtitleTracksUpdated(subtitles) => {
                let selected = self.tracks.replace_subtitles(subtitles);
                self.adapter.set_subtitle_track(selected);
            }
            EngineEvent::AudioTracksUpdated(audio) => {
                if let Some(selected) = self.tracks.replace_audio(audio) {
                    self.adapter.set_audio_track(selected);
                }
            }
            EngineEvent::Error(error) => self.apply_error(&error),
        }

        self.sync_visibility();
    }

    fn handle_autoplay_outcome(&mut self, task_id: u64, outcome: AutoplayOutcome) {
        match &self.autoplay {
            Some(task) if task.id == task_id => self.autoplay = None,
            _ => {
                trace!("Dropping outcome of superseded autoplay task {}", task_id);
                return;
            }
        }

        match outcome {
            AutoplayOutcome::Started { .. } => {
                self.status.is_playing = true;
                self.status.is_buffering = false;
                self.stall.on_resumed();
            }
            AutoplayOutcome::GaveUp { attempts } => {
                info!("Playback not started after {} attempts", attempts);
                self.status.is_playing = false;
                self.status.is_buffering = false;
            }
            AutoplayOutcome::Cancelled => {}
        }

        self.sync_visibility();
    }

    fn on_waiting(&mut self) {
        let abr_active = self.adapter.kind() == BindingKind::Engine
            && self.quality.is_auto()
            && self.adapter.auto_level_enabled();
        let position = self.media.current_time();
        let ranges = self.media.buffered();

        if let Some(plan) = self.stall.on_waiting(&ranges, position, abr_active) {
            self.status.is_buffering = true;
            self.apply_recovery(plan);
        }
    }

    fn apply_recovery(&mut self, plan: RecoveryPlan) {
        if let Some(cursor) = plan.cursor {
            self.media.set_current_time(cursor.target());
        }
        if plan.resume_loading {
            self.adapter.start_load();
        }
        if plan.step_down_quality
            && let Some(level) = self.quality.step_down_from(self.adapter.current_level())
        {
            info!("Stepping quality down to level {} after stall", level);
            self.adapter.set_next_auto_level(level);
        }
    }

    fn apply_error(&mut self, error: &EngineError) {
        match self.stall.on_engine_error(error) {
            ErrorAction::Ignore => {}
            ErrorAction::RestartLoad => self.adapter.start_load(),
            ErrorAction::RecoverMedia => self.adapter.recover_media_error(),
            ErrorAction::TearDown => {
                warn!("Playback unavailable: {}", error.details);
                self.cancel_autoplay();
                self.adapter.teardown();
                self.status.is_playing = false;
                self.status.is_buffering = false;
                self.unavailable = true;
            }
        }
    }

    fn try_release_start(&mut self) {
        if self.start_gate != StartGate::AwaitingBuffer {
            return;
        }

        let position = self.media.current_time();
        let ahead = buffered_ahead(&self.media.buffered(), position);
        let reaches_end = self
            .media
            .duration()
            .is_some_and(|duration| duration.is_finite() && position + ahead >= duration);

        if ahead >= self.min_start_buffer || reaches_end {
            debug!("Start buffer filled ({:.2}s ahead), starting playback", ahead);
            self.start_gate = StartGate::Released;
            self.start_autoplay();
        } else {
            trace!("Waiting for start buffer ({:.2}s ahead)", ahead);
        }
    }

    fn start_autoplay(&mut self) {
        if self.autoplay.is_some() || self.unavailable {
            return;
        }

        self.autoplay_seq += 1;
        let id = self.autoplay_seq;
        let cancel = CancellationToken::new();

        let media = Arc::clone(&self.media);
        let policy = self.autoplay_policy.clone();
        let can_play = Arc::clone(&self.can_play);
        let token = cancel.clone();
        let outcomes = self.autoplay_tx.clone();
        tokio::spawn(async move {
            let outcome = run_autoplay(media, policy, can_play, token).await;
            let _ = outcomes.send((id, outcome));
        });

        self.autoplay = Some(AutoplayTask { id, cancel });
    }

    fn cancel_autoplay(&mut self) {
        if let Some(task) = self.autoplay.take() {
            debug!("Cancelling autoplay task {}", task.id);
            task.cancel.cancel();
        }
    }

    pub fn play(&mut self) {
        if self.source.is_none() || self.unavailable {
            debug!("Nothing to play");
            return;
        }
        self.start_gate = StartGate::Released;
        self.start_autoplay();
        self.sync_visibility();
    }

    pub fn pause(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.start_gate = StartGate::Released;
        self.cancel_autoplay();
        self.media.pause();
        self.status.is_playing = false;
        self.stall.on_paused();
        if !self.stall.is_stalled() {
            self.status.is_buffering = false;
        }
        self.sync_visibility();
    }

    pub fn toggle_play(&mut self) {
        if self.status.is_playing || self.autoplay.is_some() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn seek(&mut self, position: Duration) {
        if self.source.is_none() {
            return;
        }
        let mut target = position.as_secs_f64();
        if let Some(duration) = self.media.duration().filter(|d| d.is_finite()) {
            target = target.min(duration);
        }
        self.media.set_current_time(target);
        self.status.set_position_secs(target);
    }

    pub fn set_volume(&mut self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.media.set_volume(volume);
        self.status.volume = volume;
    }

    pub fn toggle_mute(&mut self) {
        let muted = !self.status.is_muted;
        self.media.set_muted(muted);
        self.status.is_muted = muted;
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            warn!("Ignoring invalid playback rate {}", rate);
            return;
        }
        self.media.set_playback_rate(rate);
        self.status.playback_rate = rate;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.status.is_fullscreen = !self.status.is_fullscreen;
    }

    pub fn exit_fullscreen(&mut self) {
        self.status.is_fullscreen = false;
    }

    pub fn select_subtitle(&mut self, track: Option<TrackId>) -> PlayerResult<()> {
        self.tracks.select_subtitle(track)?;
        self.adapter.set_subtitle_track(track);
        self.close_menus();
        Ok(())
    }

    pub fn select_audio(&mut self, track: TrackId) -> PlayerResult<()> {
        self.tracks.select_audio(track)?;
        self.adapter.set_audio_track(track);
        self.close_menus();
        Ok(())
    }

    pub fn select_quality(&mut self, level: Option<usize>) -> PlayerResult<()> {
        if !self.quality.select(level) {
            return Err(PlayerError::UnknownTrack(format!(
                "quality level {:?}",
                level
            )));
        }
        self.adapter.set_current_level(level);
        self.close_menus();
        Ok(())
    }

    pub fn open_menu(&mut self, menu: OverlayMenu) {
        self.menus.open(menu);
        self.sync_visibility();
    }

    pub fn toggle_menu(&mut self, menu: OverlayMenu) {
        self.menus.toggle(menu);
        self.sync_visibility();
    }

    pub fn menu_back(&mut self) {
        self.menus.back();
        self.pointer_activity();
    }

    /// Click outside the menus or scroll: close everything and count as activity.
    pub fn close_menus(&mut self) {
        self.menus.close_all();
        self.pointer_activity();
    }

    pub fn pointer_activity(&mut self) {
        let ctx = self.visibility_context();
        self.visibility.on_activity(ctx, Instant::now());
    }

    pub fn key_press(&mut self, key: Key) {
        self.pointer_activity();

        match action_for(key, self.status.is_fullscreen) {
            Some(KeyAction::TogglePlay) => self.toggle_play(),
            Some(KeyAction::ToggleFullscreen) => self.toggle_fullscreen(),
            Some(KeyAction::ExitFullscreen) => self.exit_fullscreen(),
            Some(KeyAction::ToggleSubtitles) => {
                if let Some(selected) = self.tracks.toggle_first_subtitle() {
                    self.adapter.set_subtitle_track(selected);
                }
            }
            None => trace!("Unbound key {:?}", key),
        }
    }

    /// Fire due UI timers.
    pub fn tick(&mut self, now: Instant) {
        let ctx = self.visibility_context();
        self.visibility.tick(ctx, now);
    }

    /// Earliest pending UI timer
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            None
        } else {
            self.visibility.next_deadline()
        }
    }

    /// Terminal: stop timers, abort autoplay and destroy the engine.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        info!("Closing player");
        self.closed = true;
        self.cancel_autoplay();
        if self.source.take().is_some() {
            self.media.pause();
        }
        self.adapter.teardown();
        self.status.is_playing = false;
        self.status.is_buffering = false;
        self.menus.close_all();
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            session_id: self.source.as_ref().map(|source| source.session_id),
            source_url: self.source.as_ref().map(|source| source.url.clone()),
            phase: self.stall.phase(),
            status: self.status.clone(),
            tracks: self.tracks.catalog().clone(),
            selection: self.tracks.selection().clone(),
            quality_label: self.quality.current_label(),
            quality_levels: self.quality.levels().iter().map(|l| l.label()).collect(),
            menu: self.menus.active(),
            controls_visible: self.visibility.controls_visible(),
            pause_overlay_visible: self.visibility.pause_overlay_visible(),
            unavailable: self.unavailable,
            closed: self.closed,
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn visibility_context(&self) -> VisibilityContext {
        VisibilityContext {
            is_playing: self.status.is_playing,
            is_buffering: self.status.is_buffering,
            menu_open: self.menus.any_open(),
            unavailable: self.unavailable,
        }
    }

    fn sync_visibility(&mut self) {
        let ctx = self.visibility_context();
        self.visibility.sync(ctx, Instant::now());
    }
}

impl PlayerSnapshot {
    fn empty() -> Self {
        Self {
            session_id: None,
            source_url: None,
            phase: PlaybackPhase::Idle,
            status: PlaybackStatus::default(),
            tracks: TrackCatalog::default(),
            selection: TrackSelection::default(),
            quality_label: String::new(),
            quality_levels: Vec::new(),
            menu: OverlayMenu::None,
            controls_visible: true,
            pause_overlay_visible: false,
            unavailable: false,
            closed: false,
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Handle to send commands to the player controller
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<PlayerSnapshot>,
}

impl PlayerHandle {
    fn send(&self, command: PlayerCommand) -> PlayerResult<()> {
        self.sender
            .send(command)
            .map_err(|_| PlayerError::ControllerGone)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> PlayerCommand,
    ) -> PlayerResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.send(command(respond_to))?;
        response.await.map_err(|_| PlayerError::ControllerGone)
    }

    /// Receiver that sees every published [`PlayerSnapshot`]
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Load a new source, replacing the current one
    pub async fn load_source(&self, url: &str, content_id: Option<String>) -> PlayerResult<()> {
        self.request(|respond_to| PlayerCommand::LoadSource {
            url: url.to_string(),
            content_id,
            respond_to,
        })
        .await?
    }

    /// Forward a media element notification
    pub fn media_event(&self, event: MediaEvent) -> PlayerResult<()> {
        self.send(PlayerCommand::MediaEvent(event))
    }

    pub fn toggle_play(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::TogglePlay)
    }

    pub fn play(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn seek(&self, position: Duration) -> PlayerResult<()> {
        self.send(PlayerCommand::Seek { position })
    }

    pub fn set_volume(&self, volume: f64) -> PlayerResult<()> {
        self.send(PlayerCommand::SetVolume { volume })
    }

    pub fn toggle_mute(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::ToggleMute)
    }

    pub fn set_playback_rate(&self, rate: f64) -> PlayerResult<()> {
        self.send(PlayerCommand::SetPlaybackRate { rate })
    }

    pub fn toggle_fullscreen(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::ToggleFullscreen)
    }

    pub fn exit_fullscreen(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::ExitFullscreen)
    }

    pub async fn select_subtitle(&self, track: Option<TrackId>) -> PlayerResult<()> {
        self.request(|respond_to| PlayerCommand::SelectSubtitle { track, respond_to })
            .await?
    }

    pub async fn select_audio(&self, track: TrackId) -> PlayerResult<()> {
        self.request(|respond_to| PlayerCommand::SelectAudio { track, respond_to })
            .await?
    }

    pub async fn select_quality(&self, level: Option<usize>) -> PlayerResult<()> {
        self.request(|respond_to| PlayerCommand::SelectQuality { level, respond_to })
            .await?
    }

    pub fn open_menu(&self, menu: OverlayMenu) -> PlayerResult<()> {
        self.send(PlayerCommand::OpenMenu(menu))
    }

    pub fn toggle_menu(&self, menu: OverlayMenu) -> PlayerResult<()> {
        self.send(PlayerCommand::ToggleMenu(menu))
    }

    pub fn menu_back(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::MenuBack)
    }

    pub fn close_menus(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::CloseMenus)
    }

    pub fn pointer_activity(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::PointerActivity)
    }

    pub fn key_press(&self, key: Key) -> PlayerResult<()> {
        self.send(PlayerCommand::KeyPress(key))
    }

    /// Current state, after every command sent before this call was applied
    pub async fn snapshot(&self) -> PlayerResult<PlayerSnapshot> {
        self.request(|respond_to| PlayerCommand::GetSnapshot { respond_to })
            .await
    }

    /// Close the player. Resolves once the engine has been destroyed.
    pub async fn close(&self) -> PlayerResult<()> {
        self.request(|respond_to| PlayerCommand::Close { respond_to })
            .await
    }
}
