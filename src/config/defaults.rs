//! The compiled-in project table.

use super::types::{DocumentReference, ProjectConfig, ProjectSource, SiteConfig, SnapshotConfig};

const OWNER: &str = "Gunnarguy";

/// Documents rendered for every project in the built-in table.
fn standard_docs() -> Vec<DocumentReference> {
    vec![
        DocumentReference::new("README", "README.md"),
        DocumentReference::new("Roadmap", "docs/ROADMAP.md"),
        DocumentReference::new("Architecture", "docs/ARCHITECTURE.md"),
    ]
}

fn project(
    slug: &str,
    title: &str,
    tagline: &str,
    repo: &str,
    app_store_url: Option<&str>,
    accent_color: &str,
) -> ProjectConfig {
    ProjectConfig {
        slug: slug.to_string(),
        title: title.to_string(),
        tagline: tagline.to_string(),
        app_store_url: app_store_url.map(str::to_string),
        repository_url: format!("https://github.com/{OWNER}/{repo}"),
        accent_color: accent_color.to_string(),
        source: ProjectSource::remote(OWNER, repo, "main"),
        docs: standard_docs(),
    }
}

/// The built-in configuration used when no config file is given.
pub fn default_config() -> SnapshotConfig {
    SnapshotConfig {
        site: SiteConfig::default(),
        projects: vec![
            project(
                "openresponses",
                "OpenResponses",
                "SwiftUI-powered AI assistant for the OpenAI Responses API with computer use, code interpreter, and MCP integrations.",
                "OpenResponses",
                None,
                "#6366f1",
            ),
            project(
                "openintelligence",
                "OpenIntelligence",
                "On-device RAG engine for iOS with Vision OCR, Apple Intelligence routing, and privacy-first telemetry.",
                "OpenIntelligence",
                Some("https://apps.apple.com/us/app/openintelligence/id6756559175"),
                "#10b981",
            ),
            project(
                "opencone",
                "OpenCone",
                "App Store RAG pipeline combining Pinecone serverless indexes with streaming Responses answers.",
                "OpenCone",
                Some("https://apps.apple.com/us/app/opencone/id6744467668"),
                "#f59e0b",
            ),
            project(
                "openassistant",
                "OpenAssistant",
                "Legacy Assistants v2 client with tool coverage, vector stores, and threaded chat UI.",
                "OpenAssistant",
                Some("https://apps.apple.com/us/app/openassistant/id6692613772"),
                "#8b5cf6",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = default_config();
        assert_eq!(config.projects.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_projects_are_remote() {
        let config = default_config();
        for project in &config.projects {
            assert!(
                matches!(project.source, ProjectSource::Remote { .. }),
                "{} should be remote",
                project.slug
            );
            assert_eq!(project.docs.len(), 3);
            assert_eq!(project.docs[0].path, "README.md");
        }
    }

    #[test]
    fn test_openresponses_has_no_app_store_url() {
        let config = default_config();
        let openresponses = &config.projects[0];
        assert_eq!(openresponses.slug, "openresponses");
        assert!(openresponses.app_store_url.is_none());
    }
}
