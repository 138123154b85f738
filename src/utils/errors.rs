use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("Invalid source URL: {0}")]
    InvalidSource(String),

    #[error("Streaming engine error: {0}")]
    Engine(String),

    #[error("Media element error: {0}")]
    Media(String),

    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Player has been closed")]
    Closed,

    #[error("Player controller is gone")]
    ControllerGone,
}

pub type PlayerResult<T> = std::result::Result<T, PlayerError>;
