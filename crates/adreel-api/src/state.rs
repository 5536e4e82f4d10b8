//! Application state shared by every handler.

use adreel_core::{Config, FileValidator};
use adreel_pipeline::{MediaPipeline, ScratchDir};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: MediaPipeline,
    pub validator: FileValidator,
}

impl AppState {
    pub fn scratch(&self) -> &ScratchDir {
        self.pipeline.scratch()
    }
}
