use std::collections::HashSet;

use serde::Serialize;

use super::highlight::SyntaxHighlighter;
use super::markdown::{TocEntry, render_markdown_with_prefix};
use super::source::{ResolvedSource, SourceError};
use crate::config::DocumentReference;
use crate::util::{escape_html, slugify};

// =============================================================================
// Document sections
// =============================================================================

/// One configured document, rendered (or substituted) for the page.
#[derive(Debug, Clone, Serialize)]
pub struct DocSection {
    pub title: String,
    /// In-page anchor id ("doc-roadmap")
    pub id: String,
    /// Repository path the section was loaded from
    pub path: String,
    /// Browsable link to the source file
    pub source_url: String,
    /// Rendered HTML fragment, or the fallback fragment
    pub html: String,
    pub toc: Vec<TocEntry>,
    /// True when the document could not be loaded
    pub missing: bool,
}

/// A document section together with the raw text it was rendered from.
///
/// The raw text is kept so the output writer can copy it into `docs/`.
#[derive(Debug)]
pub struct LoadedDocument {
    pub reference: DocumentReference,
    pub section: DocSection,
    pub raw: Option<String>,
}

impl LoadedDocument {
    /// Load and render a document. A load failure never propagates: it is
    /// turned into a fallback section that is marked missing.
    pub fn load(
        source: &ResolvedSource<'_>,
        doc: &DocumentReference,
        id: String,
        highlighter: &SyntaxHighlighter,
    ) -> Self {
        match source.load(doc) {
            Ok(raw) => Self::rendered(source, doc, id, raw, highlighter),
            Err(e) => Self::failed(source, doc, id, &e),
        }
    }

    /// Render already-loaded text.
    pub fn rendered(
        source: &ResolvedSource<'_>,
        doc: &DocumentReference,
        id: String,
        raw: String,
        highlighter: &SyntaxHighlighter,
    ) -> Self {
        let output = render_markdown_with_prefix(&raw, highlighter, &id);
        Self {
            reference: doc.clone(),
            section: DocSection {
                title: doc.title.clone(),
                id,
                path: doc.path.clone(),
                source_url: source.view_url(&doc.path),
                html: output.html,
                toc: output.toc,
                missing: false,
            },
            raw: Some(raw),
        }
    }

    /// Substitute the fallback fragment for a document that failed to load.
    pub fn failed(
        source: &ResolvedSource<'_>,
        doc: &DocumentReference,
        id: String,
        error: &SourceError,
    ) -> Self {
        tracing::warn!(path = %doc.path, error = %error, "could not load document");
        Self {
            reference: doc.clone(),
            section: DocSection {
                title: doc.title.clone(),
                id,
                path: doc.path.clone(),
                source_url: source.view_url(&doc.path),
                html: fallback_fragment(&doc.path, &error.to_string()),
                toc: Vec::new(),
                missing: true,
            },
            raw: None,
        }
    }
}

/// Anchor id of a document section ("Roadmap" -> "doc-roadmap").
fn section_id(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "doc".to_string()
    } else {
        format!("doc-{slug}")
    }
}

/// Anchor ids for a page's documents, in display order.
///
/// Documents with the same title get numbered ids ("doc-notes",
/// "doc-notes-1") so every section anchor on the page is unique.
pub fn section_ids<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    titles
        .into_iter()
        .map(|title| {
            let base = section_id(title);
            let mut id = base.clone();
            let mut suffix = 1;
            while used.contains(&id) {
                id = format!("{base}-{suffix}");
                suffix += 1;
            }
            used.insert(id.clone());
            id
        })
        .collect()
}

/// HTML shown in place of a document that could not be retrieved.
///
/// Both the path and the error message are escaped so a hostile error body
/// cannot break the page structure.
pub fn fallback_fragment(path: &str, error: &str) -> String {
    format!(
        "<p><strong>Could not load this document.</strong></p>\n<p>Path: <code>{}</code></p>\n<p>{}</p>\n",
        escape_html(path),
        escape_html(error)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::source::tests::StaticFetcher;
    use crate::config::default_config;

    #[test]
    fn test_section_id() {
        assert_eq!(section_id("README"), "doc-readme");
        assert_eq!(section_id("Getting Started"), "doc-getting-started");
        assert_eq!(section_id("!!!"), "doc");
    }

    #[test]
    fn test_section_ids_are_unique() {
        assert_eq!(
            section_ids(["Notes", "Roadmap", "Notes", "notes"]),
            vec!["doc-notes", "doc-roadmap", "doc-notes-1", "doc-notes-2"]
        );
    }

    #[test]
    fn test_fallback_fragment_escapes_error() {
        let html = fallback_fragment("docs/ROADMAP.md", "<b>boom</b> & \"more\"");
        assert!(html.contains("<code>docs/ROADMAP.md</code>"));
        assert!(html.contains("&lt;b&gt;boom&lt;/b&gt; &amp; &quot;more&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_load_missing_remote_document() {
        let config = default_config();
        let project = &config.projects[0];
        let fetcher = StaticFetcher::default();
        let source = ResolvedSource::resolve(project, &fetcher).unwrap();
        let doc = DocumentReference::new("Roadmap", "docs/NOPE.md");

        let loaded = LoadedDocument::load(
            &source,
            &doc,
            "doc-roadmap".to_string(),
            &SyntaxHighlighter::default(),
        );

        assert!(loaded.section.missing);
        assert_eq!(loaded.section.id, "doc-roadmap");
        assert!(loaded.raw.is_none());
        assert!(loaded.section.html.contains("docs/NOPE.md"));
        assert!(loaded.section.html.contains("Could not load this document."));
        assert!(loaded.section.html.contains("HTTP 404"));
    }

    #[test]
    fn test_load_present_remote_document() {
        let config = default_config();
        let project = &config.projects[0];
        let fetcher = StaticFetcher::default().with(
            "https://raw.githubusercontent.com/Gunnarguy/OpenResponses/main/docs/ROADMAP.md",
            "## Next\n\nShip it.",
        );
        let source = ResolvedSource::resolve(project, &fetcher).unwrap();
        let doc = DocumentReference::new("Roadmap", "docs/ROADMAP.md");

        let loaded = LoadedDocument::load(
            &source,
            &doc,
            "doc-roadmap".to_string(),
            &SyntaxHighlighter::default(),
        );

        assert!(!loaded.section.missing);
        assert_eq!(loaded.section.id, "doc-roadmap");
        assert_eq!(loaded.section.toc[0].id, "doc-roadmap-next");
        assert!(loaded.section.html.contains("<p>Ship it.</p>"));
        assert_eq!(loaded.raw.as_deref(), Some("## Next\n\nShip it."));
    }
}
