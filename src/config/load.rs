//! Configuration loading from files.
//!
//! This module handles reading and parsing configuration files.

use std::path::Path;

use super::{ConfigError, SnapshotConfig, default_config};

impl SnapshotConfig {
    /// Load the config from the command line argument, defaulting to the
    /// compiled-in project table.
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None => default_config(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the config from a YAML file
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    pub(crate) fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectSource;

    const LOCAL_CONFIG: &str = r##"
site:
  author: Jane Doe
projects:
  - slug: widget
    title: Widget
    tagline: A <small> widget.
    repository_url: https://github.com/jane/widget
    accent_color: "#ff0000"
    source:
      local:
        repo_path: /tmp/widget
    docs:
      - title: README
        path: README.md
      - title: Design Notes
        path: docs/DESIGN.md
"##;

    #[test]
    fn test_parse_local_project() {
        let config = SnapshotConfig::from_yaml(LOCAL_CONFIG).unwrap();
        assert_eq!(config.site.author, "Jane Doe");
        assert_eq!(config.site.portfolio_url, "../../index.html");

        let project = &config.projects[0];
        assert_eq!(project.slug, "widget");
        assert!(project.app_store_url.is_none());
        assert_eq!(project.accent_color, "#ff0000");
        assert_eq!(project.docs.len(), 2);
        assert_eq!(project.docs[1].file_name(), "DESIGN.md");
        match &project.source {
            ProjectSource::Local { repo_path } => assert_eq!(repo_path, Path::new("/tmp/widget")),
            other => panic!("expected local source, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_remote_defaults() {
        let yaml = r#"
projects:
  - slug: opencone
    title: OpenCone
    tagline: RAG on iOS
    repository_url: https://github.com/Gunnarguy/OpenCone
    source:
      remote:
        owner: Gunnarguy
        repo: OpenCone
"#;
        let config = SnapshotConfig::from_yaml(yaml).unwrap();
        let project = &config.projects[0];
        assert_eq!(project.accent_color, "#6366f1");
        assert_eq!(project.docs.len(), 1);
        match &project.source {
            ProjectSource::Remote { git_ref, host, .. } => {
                assert_eq!(git_ref, "main");
                assert_eq!(host, "raw.githubusercontent.com");
            }
            other => panic!("expected remote source, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = SnapshotConfig::load_from_arg(Some(Path::new("/nonexistent/snapfolio.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = SnapshotConfig::load_from_arg(None).unwrap();
        assert_eq!(config.projects.len(), 4);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SnapshotConfig::from_yaml("projects: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
