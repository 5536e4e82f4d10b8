//! Adreel upload pipeline
//!
//! Uploads media files to a first ad account, waits for the marketing platform to finish
//! processing them, records the result, then replicates the same files across the remaining
//! requested accounts with bounded concurrency.

pub mod fetch;
pub mod linker;
pub mod orchestrator;
pub mod persistence;
pub mod pipeline;
pub mod poller;
pub mod scratch;

pub use fetch::{HttpMediaFetcher, MediaFetcher};
pub use linker::{AssetRef, FanOutLinker};
pub use orchestrator::{AccountUpload, UploadOrchestrator, UploadOutcome, UploadedMedia};
pub use persistence::LinkPersistenceAdapter;
pub use pipeline::MediaPipeline;
pub use poller::{PollOutcome, PollerConfig, StatusPoller};
pub use scratch::ScratchDir;
