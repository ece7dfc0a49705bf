use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};

use super::document::DocSection;
use super::extract::Feature;
use crate::config::{ProjectConfig, SiteConfig};
use crate::util::escape_html;

/// Name of the page template, in the theme's `templates/` directory or
/// compiled in.
pub const PAGE_TEMPLATE: &str = "snapshot.html";

const BUILTIN_PAGE_TEMPLATE: &str = include_str!("../../templates/snapshot.html");

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("theme not found: {0}")]
    ThemeNotFound(String),

    #[error("theme {0} has no {PAGE_TEMPLATE} template")]
    TemplateMissing(String),
}

/// The page renderer, wrapping Tera.
///
/// Autoescaping is on for the page template, so every config or README
/// value is escaped unless the template marks it `safe`; only rendered
/// markdown fragments and highlighter CSS are.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a renderer from the compiled-in page template.
    pub fn builtin() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, BUILTIN_PAGE_TEMPLATE)?;
        Ok(Self::with_tera(tera))
    }

    /// Create a renderer loading templates from the given theme directory.
    pub fn from_theme(theme_path: &Path) -> Result<Self, RenderError> {
        let templates_path = theme_path.join("templates");
        if !templates_path.exists() {
            return Err(RenderError::ThemeNotFound(theme_path.display().to_string()));
        }

        let glob = templates_path.join("**/*.html");
        let glob_str = glob.to_string_lossy();
        let tera = Tera::new(&glob_str)?;

        if !tera.get_template_names().any(|name| name == PAGE_TEMPLATE) {
            return Err(RenderError::TemplateMissing(
                theme_path.display().to_string(),
            ));
        }

        Ok(Self::with_tera(tera))
    }

    /// Use a theme directory when one is given, the built-in template otherwise.
    pub fn new(theme_path: Option<&Path>) -> Result<Self, RenderError> {
        match theme_path {
            Some(path) => Self::from_theme(path),
            None => Self::builtin(),
        }
    }

    fn with_tera(mut tera: Tera) -> Self {
        tera.set_escape_fn(escape_html);
        Self { tera }
    }

    /// Render a snapshot page with the given context.
    pub fn render_page(&self, context: &PageContext) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", &context.site);
        tera_context.insert("project", &context.project);
        tera_context.insert("features", &context.features);
        tera_context.insert("tech_tags", &context.tech_tags);
        tera_context.insert("docs", &context.docs);
        tera_context.insert("docs_folder", &context.docs_folder);
        tera_context.insert("generated_at", &context.generated_at);
        tera_context.insert("highlight_css", &context.highlight_css);

        Ok(self.tera.render(PAGE_TEMPLATE, &tera_context)?)
    }
}

/// Context passed to the page template.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub site: SiteConfig,
    pub project: ProjectContext,
    pub features: Vec<Feature>,
    pub tech_tags: Vec<&'static str>,
    pub docs: Vec<DocSection>,
    /// Whether markdown sources were copied next to the page
    pub docs_folder: bool,
    /// Human-readable generation time; the only non-deterministic value
    pub generated_at: String,
    pub highlight_css: Option<String>,
}

/// Project-level information for the template.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub repository_url: String,
    pub app_store_url: Option<String>,
    pub accent_color: String,
}

impl From<&ProjectConfig> for ProjectContext {
    fn from(project: &ProjectConfig) -> Self {
        Self {
            slug: project.slug.clone(),
            title: project.title.clone(),
            tagline: project.tagline.clone(),
            repository_url: project.repository_url.clone(),
            app_store_url: project
                .app_store_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            accent_color: project.accent_color.clone(),
        }
    }
}

/// Format the generation timestamp shown in the page footer.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}
