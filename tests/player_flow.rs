mod common;

use cinestream::PlayerError;
use cinestream::player::{EngineError, EngineErrorKind, EngineEvent, MediaEvent};
use cinestream::ui::player::OverlayMenu;
use common::TestPlayer;
use std::time::Duration;

const MANIFEST: &str = "https://cdn.example/video/master.m3u8";
const PROXIED: &str =
    "https://app.example.com/api/proxy/stream?url=https%3A%2F%2Fcdn.example%2Fvideo%2Fmaster.m3u8";

#[tokio::test(start_paused = true)]
async fn test_manifest_plays_through_proxy_after_rejected_autoplay() {
    let player = TestPlayer::spawn();
    player.media.reject_plays(2);

    player.handle.load_source(MANIFEST, None).await.unwrap();
    let snapshot = player.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.source_url.as_deref(), Some(PROXIED));
    assert!(snapshot.status.is_buffering);
    assert_eq!(player.recorder.count(&format!("hls1 load {}", PROXIED)), 1);

    player.handle.media_event(MediaEvent::LoadedMetadata).unwrap();

    let mut snapshots = player.handle.subscribe();
    let playing = tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|s| s.status.is_playing),
    )
    .await
    .expect("playback never started")
    .unwrap()
    .clone();

    assert!(!playing.status.is_buffering);
    assert_eq!(player.recorder.count("play"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_source_change_destroys_previous_engine_first() {
    let player = TestPlayer::spawn();

    player.handle.load_source(MANIFEST, None).await.unwrap();
    player
        .handle
        .load_source("https://cdn.example/trailer/index.m3u8", None)
        .await
        .unwrap();

    let destroyed = player.recorder.index_of("hls1 destroy").unwrap();
    let created = player.recorder.index_of("hls2 create").unwrap();
    assert!(destroyed < created);
    assert_eq!(player.recorder.count("hls1 destroy"), 1);
    assert_eq!(player.recorder.count("hls2 destroy"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_network_fatal_restarts_load_every_time() {
    let player = TestPlayer::spawn();
    player.handle.load_source(MANIFEST, None).await.unwrap();
    let sink = player.factory.latest_sink();

    sink.emit(EngineEvent::Error(EngineError::fatal(
        EngineErrorKind::Network,
        "manifestLoadError",
    )));
    player.wait_for_calls("hls1 start_load", 1).await;

    sink.emit(EngineEvent::Error(EngineError::fatal(
        EngineErrorKind::Network,
        "fragLoadTimeOut",
    )));
    player.wait_for_calls("hls1 start_load", 2).await;

    assert_eq!(player.recorder.count("hls1 destroy"), 0);
    assert!(!player.handle.snapshot().await.unwrap().unavailable);
}

#[tokio::test(start_paused = true)]
async fn test_progressive_source_plays_natively() {
    let player = TestPlayer::spawn();

    player
        .handle
        .load_source("https://cdn.example/movie.mp4", Some("m42".to_string()))
        .await
        .unwrap();

    assert_eq!(
        player.recorder.count("set_source https://cdn.example/movie.mp4"),
        1
    );
    assert!(
        player
            .recorder
            .calls()
            .iter()
            .all(|call| !call.ends_with("create"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_menus_are_exclusive_and_hold_controls() {
    let player = TestPlayer::spawn();
    player.handle.load_source(MANIFEST, None).await.unwrap();
    player.handle.media_event(MediaEvent::Playing).unwrap();

    player.handle.open_menu(OverlayMenu::Sources).unwrap();
    player.handle.open_menu(OverlayMenu::Settings).unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;

    let snapshot = player.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.menu, OverlayMenu::Settings);
    assert!(snapshot.controls_visible);

    player.handle.close_menus().unwrap();
    tokio::time::sleep(Duration::from_secs(11)).await;
    let snapshot = player.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.menu, OverlayMenu::None);
    assert!(!snapshot.controls_visible);
}

#[tokio::test(start_paused = true)]
async fn test_close_is_terminal() {
    let player = TestPlayer::spawn();
    player.handle.load_source(MANIFEST, None).await.unwrap();

    player.handle.close().await.unwrap();

    assert_eq!(player.recorder.count("hls1 destroy"), 1);
    assert!(player.handle.subscribe().borrow().closed);
    let reload = player.handle.load_source(MANIFEST, None).await;
    assert!(matches!(
        reload,
        Err(PlayerError::Closed | PlayerError::ControllerGone)
    ));
    assert_eq!(player.recorder.count("hls2 create"), 0);
}
