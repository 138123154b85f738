pub mod mocks;

use cinestream::{Config, PlayerController, PlayerHandle};
use mocks::{Recorder, RecordingFactory, ScriptedMedia};
use std::sync::Arc;
use std::time::Duration;

pub const API_BASE: &str = "https://app.example.com/api";

pub struct TestPlayer {
    pub handle: PlayerHandle,
    pub recorder: Recorder,
    pub factory: Arc<RecordingFactory>,
    pub media: Arc<ScriptedMedia>,
}

impl TestPlayer {
    /// Controller running on its own task, with a config pointing at [`API_BASE`].
    pub fn spawn() -> Self {
        let mut config = Config::default();
        config.api.base_url = API_BASE.to_string();

        let recorder = Recorder::default();
        let factory = RecordingFactory::new(recorder.clone());
        let media = ScriptedMedia::new(recorder.clone());
        let (handle, controller) =
            PlayerController::new(&config, factory.clone(), media.clone());
        tokio::spawn(controller.run());

        Self {
            handle,
            recorder,
            factory,
            media,
        }
    }

    /// Wait (in virtual time) until `call` has been recorded `times` times.
    pub async fn wait_for_calls(&self, call: &str, times: usize) {
        for _ in 0..100 {
            if self.recorder.count(call) >= times {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} x {:?}, recorded {:?}",
            times,
            call,
            self.recorder.calls()
        );
    }
}
