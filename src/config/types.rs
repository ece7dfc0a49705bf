//! Configuration type definitions.
//!
//! This module contains the data structures describing the snapshot site and
//! the projects it is generated from. These types are pure data - no I/O.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Top-level config
// =============================================================================

/// The complete generator configuration: site chrome plus the ordered
/// project table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub site: SiteConfig,
    pub projects: Vec<ProjectConfig>,
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Portfolio owner, shown in titles and the footer
    #[serde(default = "default_author")]
    pub author: String,
    /// Link back to the portfolio, relative to a generated page
    #[serde(default = "default_portfolio_url")]
    pub portfolio_url: String,
    /// Name of the project series shown in the footer
    #[serde(default = "default_series")]
    pub series: String,
}

fn default_author() -> String {
    "Gunnar Hostetler".to_string()
}

fn default_portfolio_url() -> String {
    "../../index.html".to_string()
}

fn default_series() -> String {
    "Open- Series".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
            portfolio_url: default_portfolio_url(),
            series: default_series(),
        }
    }
}

// =============================================================================
// Project configuration
// =============================================================================

/// One project that gets a snapshot page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// URL-safe identifier, used as the output directory name
    pub slug: String,
    pub title: String,
    pub tagline: String,
    /// App Store listing; the App Store button is only rendered when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store_url: Option<String>,
    /// Public repository URL for the "View on GitHub" button
    pub repository_url: String,
    /// CSS accent colour for the page
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    /// Where the documents are read from
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub source: ProjectSource,
    /// Documents rendered into the page, in display order
    #[serde(default = "default_docs")]
    pub docs: Vec<DocumentReference>,
}

fn default_accent_color() -> String {
    "#6366f1".to_string()
}

fn default_docs() -> Vec<DocumentReference> {
    vec![DocumentReference::new("README", "README.md")]
}

// =============================================================================
// Source configuration
// =============================================================================

/// Where a project's documents come from.
///
/// YAML formats:
/// ```yaml
/// # Local checkout
/// source:
///   local:
///     repo_path: ~/src/OpenCone
///
/// # Raw files over HTTP
/// source:
///   remote:
///     owner: Gunnarguy
///     repo: OpenCone
///     ref: main
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSource {
    /// A repository checked out on the local filesystem
    Local { repo_path: PathBuf },
    /// A repository served through a raw-content host
    Remote {
        owner: String,
        repo: String,
        #[serde(rename = "ref", default = "default_ref")]
        git_ref: String,
        #[serde(default = "default_raw_host")]
        host: String,
    },
}

fn default_ref() -> String {
    "main".to_string()
}

fn default_raw_host() -> String {
    "raw.githubusercontent.com".to_string()
}

impl ProjectSource {
    /// Create a remote source on the default raw host.
    pub fn remote(owner: &str, repo: &str, git_ref: &str) -> Self {
        ProjectSource::Remote {
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref: git_ref.to_string(),
            host: default_raw_host(),
        }
    }
}

/// A document inside a project's repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub title: String,
    /// Path relative to the repository root (e.g. "docs/ROADMAP.md")
    pub path: String,
}

impl DocumentReference {
    pub fn new(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
        }
    }

    /// The final path component, used as the file name in the copied docs.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}
