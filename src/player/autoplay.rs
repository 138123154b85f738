use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::engine::MediaElement;
use super::retry::AutoplayPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayOutcome {
    Started { attempts: u32 },
    /// Every attempt was rejected; playback simply does not start.
    GaveUp { attempts: u32 },
    Cancelled,
}

/// Try to start playback, retrying rejected `play()` calls.
///
/// A rejection while the element is not ready waits once for `can_play` before the
/// next attempt. Other rejections back off linearly per `policy`. The loop never
/// exceeds `policy.max_attempts` calls to `play()`.
pub async fn run_autoplay(
    media: Arc<dyn MediaElement>,
    policy: AutoplayPolicy,
    can_play: Arc<Notify>,
    cancel: CancellationToken,
) -> AutoplayOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut waited_for_ready = false;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = tokio::select! {
            _ = cancel.cancelled() => return AutoplayOutcome::Cancelled,
            result = media.play() => result,
        };

        let error = match result {
            Ok(()) => {
                info!("Autoplay started after {} attempt(s)", attempt);
                return AutoplayOutcome::Started { attempts: attempt };
            }
            Err(e) => e,
        };

        if attempt >= max_attempts {
            warn!("Autoplay gave up after {} attempts: {}", attempt, error);
            return AutoplayOutcome::GaveUp { attempts: attempt };
        }

        if !waited_for_ready && !media.ready_state().can_play() {
            waited_for_ready = true;
            debug!("play() rejected before media was ready, waiting for canplay");
            tokio::select! {
                _ = cancel.cancelled() => return AutoplayOutcome::Cancelled,
                _ = can_play.notified() => {}
            }
        } else {
            let delay = policy.delay_after(attempt);
            debug!(
                "play() rejected (attempt {}/{}), retrying in {:?}: {}",
                attempt, max_attempts, delay, error
            );
            tokio::select! {
                _ = cancel.cancelled() => return AutoplayOutcome::Cancelled,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
