//! README extraction stage.

use crate::build::extract::{extract_features, extract_tech_tags};
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingProject, Stage};

/// Stage that loads the README and extracts features and technology tags.
///
/// A README that cannot be loaded is not an error here: the project simply
/// gets no features and no tags, and the docs stage renders its fallback.
pub struct ExtractStage;

impl Stage for ExtractStage {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn process(
        &self,
        project: &mut ProcessingProject<'_>,
        _ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError> {
        match project.source.load_readme() {
            Ok(readme) => {
                project.features = extract_features(&readme);
                project.tech_tags = extract_tech_tags(&readme);
                project.readme = Some(readme);
            }
            Err(e) => {
                tracing::warn!(project = %project.slug(), error = %e, "could not load README");
                project.features.clear();
                project.tech_tags.clear();
                project.readme = None;
            }
        }

        tracing::info!(
            project = %project.slug(),
            features = project.features.len(),
            tags = project.tech_tags.len(),
            "extracted README content"
        );
        Ok(())
    }
}
