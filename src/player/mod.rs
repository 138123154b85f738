pub mod adapter;
pub mod autoplay;
pub mod controller;
pub mod engine;
pub mod quality;
pub mod retry;
pub mod source;
pub mod stall;
pub mod status;
pub mod tracks;
pub mod types;

pub use adapter::{BindingKind, EngineAdapter};
pub use controller::{PlayerCommand, PlayerController, PlayerHandle, PlayerSnapshot};
pub use engine::{EngineConfig, EngineEventSink, EngineFactory, MediaElement, StreamingEngine};
pub use quality::{QualityLevel, QualityMode};
pub use source::{PlaybackSource, SourceKind, StreamSourceResolver};
pub use stall::PlaybackPhase;
pub use status::PlaybackStatus;
pub use tracks::{TrackCatalog, TrackId, TrackInfo, TrackSelection};
pub use types::{BufferedRange, EngineError, EngineErrorKind, EngineEvent, MediaEvent, ReadyState};
