use std::path::{Path, PathBuf};
use std::time::Duration;

use ureq::Agent;

use crate::config::{DocumentReference, ProjectConfig, ProjectSource};

/// Timeout for a single raw-content request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "snapshot-generator";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("repository not found: {0}")]
    RepoNotFound(PathBuf),

    #[error("README.md not found in {0}")]
    ReadmeNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
}

impl SourceError {
    /// Whether the whole project should be skipped rather than rendered with
    /// fallback sections.
    pub fn is_missing_source(&self) -> bool {
        matches!(
            self,
            SourceError::RepoNotFound(_) | SourceError::ReadmeNotFound(_)
        )
    }
}

// =============================================================================
// Raw fetching
// =============================================================================

/// Fetches the text of a raw-content URL.
pub trait RawFetcher {
    fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Blocking HTTP fetcher with a fixed global timeout and no retries.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(FETCH_TIMEOUT)
    }
}

impl RawFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, SourceError> {
        let fetch_error = |e: ureq::Error| SourceError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(fetch_error)?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(SourceError::Http {
                url: url.to_string(),
                status,
            });
        }

        response.into_body().read_to_string().map_err(fetch_error)
    }
}

// =============================================================================
// Resolved source
// =============================================================================

/// A project's source after resolution: local sources have been checked for
/// a repository and README, remote sources are taken on trust.
pub struct ResolvedSource<'a> {
    pub project: &'a ProjectConfig,
    fetcher: &'a dyn RawFetcher,
}

impl<'a> ResolvedSource<'a> {
    /// Resolve a project's source.
    ///
    /// For local sources, this validates that the repository directory and
    /// its `README.md` exist. Remote sources are only contacted on `load`.
    pub fn resolve(
        project: &'a ProjectConfig,
        fetcher: &'a dyn RawFetcher,
    ) -> Result<Self, SourceError> {
        if let ProjectSource::Local { repo_path } = &project.source {
            if !repo_path.is_dir() {
                return Err(SourceError::RepoNotFound(repo_path.clone()));
            }
            if !repo_path.join("README.md").is_file() {
                return Err(SourceError::ReadmeNotFound(repo_path.clone()));
            }
        }
        Ok(Self { project, fetcher })
    }

    /// Load a document's text.
    pub fn load(&self, doc: &DocumentReference) -> Result<String, SourceError> {
        match &self.project.source {
            ProjectSource::Local { repo_path } => {
                let path = repo_path.join(&doc.path);
                std::fs::read_to_string(&path).map_err(|e| SourceError::Read { path, source: e })
            }
            ProjectSource::Remote { .. } => self.fetcher.fetch(&self.raw_url(&doc.path)),
        }
    }

    /// Load the README, which feeds feature and tag extraction.
    pub fn load_readme(&self) -> Result<String, SourceError> {
        self.load(&DocumentReference::new("README", "README.md"))
    }

    /// The raw-content URL of a repository path (remote sources only).
    /// "docs/ROADMAP.md" -> "https://raw.githubusercontent.com/owner/repo/main/docs/ROADMAP.md"
    pub fn raw_url(&self, path: &str) -> String {
        match &self.project.source {
            ProjectSource::Remote {
                owner,
                repo,
                git_ref,
                host,
            } => format!(
                "https://{host}/{owner}/{repo}/{git_ref}/{}",
                path.trim_start_matches('/')
            ),
            ProjectSource::Local { repo_path } => repo_path.join(path).display().to_string(),
        }
    }

    /// A browsable link to a repository file.
    pub fn view_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let repo_url = self.project.repository_url.trim_end_matches('/');
        match &self.project.source {
            ProjectSource::Remote { git_ref, .. } => format!("{repo_url}/blob/{git_ref}/{path}"),
            ProjectSource::Local { .. } => format!("{repo_url}/blob/HEAD/{path}"),
        }
    }

    /// The local `docs/` directory, if this is a local source that has one.
    pub fn local_docs_dir(&self) -> Option<PathBuf> {
        match &self.project.source {
            ProjectSource::Local { repo_path } => {
                let docs = repo_path.join("docs");
                docs.is_dir().then_some(docs)
            }
            ProjectSource::Remote { .. } => None,
        }
    }
}

/// Top-level markdown files in a directory, sorted by name.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| SourceError::Read {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SourceError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let is_markdown = path.extension().and_then(|e| e.to_str()) == Some("md");
        if path.is_file() && is_markdown {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::default_config;

    /// In-memory fetcher keyed by URL; unknown URLs are a 404.
    #[derive(Default)]
    pub(crate) struct StaticFetcher {
        pub pages: HashMap<String, String>,
    }

    impl StaticFetcher {
        pub(crate) fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl RawFetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<String, SourceError> {
            self.pages.get(url).cloned().ok_or_else(|| SourceError::Http {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn opencone() -> ProjectConfig {
        default_config()
            .projects
            .into_iter()
            .find(|p| p.slug == "opencone")
            .unwrap()
    }

    fn local_project(repo_path: &Path) -> ProjectConfig {
        ProjectConfig {
            source: ProjectSource::Local {
                repo_path: repo_path.to_path_buf(),
            },
            ..opencone()
        }
    }

    #[test]
    fn test_remote_urls() {
        let project = opencone();
        let fetcher = StaticFetcher::default();
        let source = ResolvedSource::resolve(&project, &fetcher).unwrap();

        assert_eq!(
            source.raw_url("docs/ROADMAP.md"),
            "https://raw.githubusercontent.com/Gunnarguy/OpenCone/main/docs/ROADMAP.md"
        );
        assert_eq!(
            source.view_url("README.md"),
            "https://github.com/Gunnarguy/OpenCone/blob/main/README.md"
        );
    }

    #[test]
    fn test_remote_load_uses_fetcher() {
        let project = opencone();
        let fetcher = StaticFetcher::default().with(
            "https://raw.githubusercontent.com/Gunnarguy/OpenCone/main/README.md",
            "# OpenCone",
        );
        let source = ResolvedSource::resolve(&project, &fetcher).unwrap();

        assert_eq!(source.load_readme().unwrap(), "# OpenCone");
        let err = source
            .load(&DocumentReference::new("Roadmap", "docs/ROADMAP.md"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 404, .. }));
        assert!(!err.is_missing_source());
    }

    #[test]
    fn test_local_missing_repo() {
        let project = local_project(Path::new("/nonexistent/snapfolio/repo"));
        let fetcher = StaticFetcher::default();
        let err = ResolvedSource::resolve(&project, &fetcher).err().unwrap();
        assert!(matches!(err, SourceError::RepoNotFound(_)));
        assert!(err.is_missing_source());
    }

    #[test]
    fn test_local_missing_readme() {
        let dir = tempfile::tempdir().unwrap();
        let project = local_project(dir.path());
        let fetcher = StaticFetcher::default();
        let err = ResolvedSource::resolve(&project, &fetcher).err().unwrap();
        assert!(matches!(err, SourceError::ReadmeNotFound(_)));
    }

    #[test]
    fn test_local_load_and_docs_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# Local").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/B.md"), "b").unwrap();
        std::fs::write(dir.path().join("docs/A.md"), "a").unwrap();
        std::fs::write(dir.path().join("docs/image.png"), "png").unwrap();

        let project = local_project(dir.path());
        let fetcher = StaticFetcher::default();
        let source = ResolvedSource::resolve(&project, &fetcher).unwrap();

        assert_eq!(source.load_readme().unwrap(), "# Local");
        assert_eq!(
            source.view_url("docs/A.md"),
            "https://github.com/Gunnarguy/OpenCone/blob/HEAD/docs/A.md"
        );

        let docs_dir = source.local_docs_dir().unwrap();
        let names: Vec<_> = markdown_files(&docs_dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.md", "B.md"]);
    }
}
