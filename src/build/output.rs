use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;

/// Directory under the output root that holds one folder per project.
pub const PROJECTS_DIR: &str = "projects";

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Per-project metadata written next to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub project: String,
    pub title: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub source_repo: String,
}

impl Manifest {
    pub fn new(project: &ProjectConfig, generated_at: &DateTime<Utc>) -> Self {
        Self {
            project: project.slug.clone(),
            title: project.title.clone(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            source_repo: project.repository_url.clone(),
        }
    }
}

/// The output folder of a single project: `<output_root>/projects/<slug>/`.
///
/// Writes overwrite whatever a previous run left behind, so rerunning a
/// build is idempotent. Nothing is staged; a failure part-way leaves the
/// files written so far in place.
#[derive(Debug, Clone)]
pub struct ProjectOutput {
    dir: PathBuf,
}

impl ProjectOutput {
    pub fn new(output_root: &Path, slug: &str) -> Self {
        Self {
            dir: project_dir(output_root, slug),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.dir.join("docs")
    }

    /// Write the rendered page as `index.html`.
    pub fn write_page(&self, html: &str) -> Result<PathBuf, OutputError> {
        let path = self.dir.join("index.html");
        write_file(&path, html)?;
        Ok(path)
    }

    /// Write a loaded document's markdown as `docs/<file_name>`.
    pub fn write_doc(&self, file_name: &str, contents: &str) -> Result<(), OutputError> {
        write_file(&self.docs_dir().join(file_name), contents)
    }

    /// Copy markdown files into `docs/`, keeping their file names.
    ///
    /// Returns the number of files copied.
    pub fn copy_docs(&self, files: &[PathBuf]) -> Result<usize, OutputError> {
        let mut copied = 0;
        for src in files {
            let Some(name) = src.file_name() else {
                continue;
            };
            let contents = std::fs::read_to_string(src).map_err(|e| OutputError::Read {
                path: src.clone(),
                source: e,
            })?;
            write_file(&self.docs_dir().join(name), &contents)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Write `manifest.json` as pretty-printed JSON.
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<(), OutputError> {
        let json = serde_json::to_string_pretty(manifest)?;
        write_file(&self.dir.join("manifest.json"), &json)
    }
}

/// The folder a project is written to.
pub fn project_dir(output_root: &Path, slug: &str) -> PathBuf {
    output_root.join(PROJECTS_DIR).join(slug)
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    let write_error = |e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)
}
