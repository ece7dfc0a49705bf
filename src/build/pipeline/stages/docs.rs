//! Document rendering stage.

use crate::build::document::{LoadedDocument, section_ids};
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingProject, Stage};
use crate::build::source::markdown_files;

const README_PATH: &str = "README.md";

/// Stage that loads and renders every configured document.
///
/// Documents that fail to load become fallback sections; this stage itself
/// never fails. The README loaded by the extract stage is reused rather than
/// fetched twice.
///
/// For local sources, the top-level markdown files of the repository's
/// `docs/` folder are collected for copying as well.
pub struct DocsStage;

impl Stage for DocsStage {
    fn name(&self) -> &'static str {
        "docs"
    }

    fn process(
        &self,
        project: &mut ProcessingProject<'_>,
        ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError> {
        let config = project.config();
        let ids = section_ids(config.docs.iter().map(|doc| doc.title.as_str()));
        let mut docs = Vec::with_capacity(config.docs.len());

        for (doc, id) in config.docs.iter().zip(ids) {
            let loaded = match (&project.readme, doc.path.trim_start_matches('/')) {
                (Some(readme), README_PATH) => LoadedDocument::rendered(
                    &project.source,
                    doc,
                    id,
                    readme.clone(),
                    ctx.highlighter,
                ),
                _ => LoadedDocument::load(&project.source, doc, id, ctx.highlighter),
            };
            docs.push(loaded);
        }
        project.docs = docs;

        if let Some(docs_dir) = project.source.local_docs_dir() {
            project.local_doc_files = markdown_files(&docs_dir).unwrap_or_else(|e| {
                tracing::warn!(dir = %docs_dir.display(), error = %e, "could not list docs folder");
                Vec::new()
            });
        }

        Ok(())
    }
}
