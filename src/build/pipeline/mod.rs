//! Project processing pipeline.
//!
//! Each project goes through a series of stages:
//! 1. Extract (README features and technology tags)
//! 2. Docs (load and render every configured document)
//! 3. Template (assemble the page)
//! 4. Write (page, docs and manifest to disk)

mod context;
mod error;
mod project;
mod stages;

pub use context::PipelineContext;
pub use error::PipelineError;
pub use project::ProcessingProject;

use stages::{DocsStage, ExtractStage, TemplateStage, WriteStage};

/// A stage in the project processing pipeline.
///
/// Stages run in order on one project at a time and modify it in place
/// before passing it to the next stage.
pub trait Stage {
    /// Unique name for this stage, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Process a project through this stage.
    fn process(
        &self,
        project: &mut ProcessingProject<'_>,
        ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError>;
}

/// The project processing pipeline.
///
/// The default pipeline is: extract → docs → template → write.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(ExtractStage);
        pipeline.add_stage(DocsStage);
        pipeline.add_stage(TemplateStage);
        pipeline.add_stage(WriteStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Run every stage on a project, stopping at the first error.
    pub fn run(
        &self,
        project: &mut ProcessingProject<'_>,
        ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), project = %project.slug(), "running stage");
            stage.process(project, ctx)?;
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
