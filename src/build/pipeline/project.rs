//! Project state carried through the pipeline.

use std::path::PathBuf;

use crate::build::document::LoadedDocument;
use crate::build::extract::Feature;
use crate::build::source::ResolvedSource;
use crate::config::ProjectConfig;

/// A project being processed through the pipeline.
///
/// Starts with only a resolved source; each stage fills in more:
///
/// 1. After extract: `readme`, `features`, `tech_tags`
/// 2. After docs: `docs`, `local_doc_files`
/// 3. After template: `output_html`
/// 4. After write: `index_path`
pub struct ProcessingProject<'a> {
    pub source: ResolvedSource<'a>,

    /// README text, if it could be loaded
    pub readme: Option<String>,

    pub features: Vec<Feature>,
    pub tech_tags: Vec<&'static str>,

    /// One entry per configured document, in configured order
    pub docs: Vec<LoadedDocument>,

    /// Markdown files from a local `docs/` folder, copied verbatim
    pub local_doc_files: Vec<PathBuf>,

    /// Final page HTML; None until the template stage runs
    pub output_html: Option<String>,

    /// Where `index.html` was written; None until the write stage runs
    pub index_path: Option<PathBuf>,
}

impl<'a> ProcessingProject<'a> {
    pub fn new(source: ResolvedSource<'a>) -> Self {
        Self {
            source,
            readme: None,
            features: Vec::new(),
            tech_tags: Vec::new(),
            docs: Vec::new(),
            local_doc_files: Vec::new(),
            output_html: None,
            index_path: None,
        }
    }

    pub fn config(&self) -> &'a ProjectConfig {
        self.source.project
    }

    pub fn slug(&self) -> &'a str {
        &self.source.project.slug
    }

    /// Whether any markdown will be copied into the project's `docs/` folder.
    pub fn has_docs_folder(&self) -> bool {
        !self.local_doc_files.is_empty() || self.docs.iter().any(|d| d.raw.is_some())
    }

    /// Number of configured documents that fell back to the placeholder.
    pub fn missing_documents(&self) -> usize {
        self.docs.iter().filter(|d| d.section.missing).count()
    }
}
