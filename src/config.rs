//! Configuration loading and types for snapfolio.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - The compiled-in project table (`defaults`)
//! - Loading configs from files (`load`)

mod defaults;
mod load;
mod types;

use std::collections::{HashMap, HashSet};

// Re-export all types for convenient access
pub use defaults::default_config;
pub use types::{DocumentReference, ProjectConfig, ProjectSource, SiteConfig, SnapshotConfig};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Validation
// =============================================================================

impl SnapshotConfig {
    /// Check the invariants the builder relies on.
    ///
    /// Every slug is URL-safe and unique. Every document has a title and a
    /// path, and no two documents of a project would be copied to the same
    /// file in `docs/`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projects.is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'projects' list must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !is_url_safe_slug(&project.slug) {
                return Err(ConfigError::Validation(format!(
                    "invalid config: slug '{}' must be non-empty and contain only a-z, 0-9 and '-'",
                    project.slug
                )));
            }
            if !seen.insert(project.slug.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "invalid config: duplicate project slug '{}'",
                    project.slug
                )));
            }
            let mut file_names: HashMap<&str, &str> = HashMap::new();
            for doc in &project.docs {
                if doc.title.trim().is_empty() || doc.path.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "invalid config: project '{}' has a document without a title or path",
                        project.slug
                    )));
                }
                if let Some(other) = file_names.insert(doc.file_name(), &doc.path)
                    && other != doc.path
                {
                    return Err(ConfigError::Validation(format!(
                        "invalid config: project '{}' documents '{}' and '{}' would both be copied to docs/{}",
                        project.slug,
                        other,
                        doc.path,
                        doc.file_name()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
