//! Pipeline error types.

use crate::build::output::OutputError;
use crate::build::render::RenderError;

/// Errors that can occur while processing a project.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("template rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
