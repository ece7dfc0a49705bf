//! Page template rendering stage.
//!
//! Assembles the extracted features, tags and rendered documents into the
//! snapshot page.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingProject, Stage};
use crate::build::render::{PageContext, format_timestamp};

/// Stage that applies the page template.
///
/// After this stage, `project.output_html` contains the complete HTML page.
pub struct TemplateStage;

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "template"
    }

    fn process(
        &self,
        project: &mut ProcessingProject<'_>,
        ctx: &PipelineContext<'_>,
    ) -> Result<(), PipelineError> {
        let page_context = PageContext {
            site: ctx.site.clone(),
            project: project.config().into(),
            features: project.features.clone(),
            tech_tags: project.tech_tags.clone(),
            docs: project.docs.iter().map(|d| d.section.clone()).collect(),
            docs_folder: project.has_docs_folder(),
            generated_at: format_timestamp(&ctx.generated_at),
            highlight_css: ctx.highlight_css.clone(),
        };

        let html = ctx.renderer.render_page(&page_context)?;
        project.output_html = Some(html);

        Ok(())
    }
}
