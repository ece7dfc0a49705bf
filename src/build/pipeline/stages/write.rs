//! File writing stage.
//!
//! Writes the page, the markdown sources and the manifest to the project's
//! output folder.

use crate::build::output::{Manifest, ProjectOutput};
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingProject, Stage};

/// Stage that writes a rendered project to `<output_root>/projects/<slug>/`.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        project: &mut ProcessingProject<'_>,
        ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError> {
        let html = project.output_html.as_ref().ok_or_else(|| {
            PipelineError::stage(
                "write",
                format!(
                    "project '{}' has no output HTML (was template stage run?)",
                    project.slug()
                ),
            )
        })?;

        let output = ProjectOutput::new(ctx.output_root, project.slug());
        let index_path = output.write_page(html)?;

        let copied = output.copy_docs(&project.local_doc_files)?;
        for doc in &project.docs {
            if let Some(raw) = &doc.raw {
                output.write_doc(doc.reference.file_name(), raw)?;
            }
        }
        if copied > 0 {
            tracing::info!(dir = %output.dir().display(), files = copied, "copied docs folder");
        }

        output.write_manifest(&Manifest::new(project.config(), &ctx.generated_at))?;

        project.index_path = Some(index_path);
        Ok(())
    }
}
