//! Pipeline context for sharing state across stages.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::build::highlight::SyntaxHighlighter;
use crate::build::render::Renderer;
use crate::config::SiteConfig;

/// Shared context for pipeline stages.
///
/// Everything here is read-only and the same for every project in a build.
pub struct PipelineContext<'a> {
    /// Root that `projects/<slug>/` is written under
    pub output_root: &'a Path,

    /// Site-wide settings (author, portfolio link)
    pub site: &'a SiteConfig,

    /// Syntax highlighter for code blocks
    pub highlighter: &'a SyntaxHighlighter,

    /// Page template renderer
    pub renderer: &'a Renderer,

    /// Build start time, shared by every page and manifest of the run
    pub generated_at: DateTime<Utc>,

    /// Highlighter theme CSS, embedded in every page
    pub highlight_css: Option<String>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        output_root: &'a Path,
        site: &'a SiteConfig,
        highlighter: &'a SyntaxHighlighter,
        renderer: &'a Renderer,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            output_root,
            site,
            highlighter,
            renderer,
            generated_at,
            highlight_css: highlighter.theme_css(),
        }
    }
}
