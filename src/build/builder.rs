use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::{ProjectConfig, SnapshotConfig};

use super::highlight::SyntaxHighlighter;
use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingProject};
use super::render::Renderer;
use super::source::{RawFetcher, ResolvedSource, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

/// Totals for a whole build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub output_root: PathBuf,
    /// Projects whose page was written
    pub written: usize,
    /// Projects skipped because their local source is missing
    pub skipped: usize,
    /// Projects that hit an error part-way
    pub failed: usize,
    /// Configured documents rendered with the fallback fragment
    pub missing_documents: usize,
}

enum ProjectOutcome {
    Written {
        index_path: PathBuf,
        missing_documents: usize,
    },
    Skipped(SourceError),
}

pub struct Builder {
    config: SnapshotConfig,
    output_root: PathBuf,
    renderer: Renderer,
    highlighter: SyntaxHighlighter,
    fetcher: Box<dyn RawFetcher>,
    pipeline: Pipeline,
}

impl Builder {
    pub fn new(
        config: SnapshotConfig,
        output_root: PathBuf,
        renderer: Renderer,
        fetcher: Box<dyn RawFetcher>,
    ) -> Self {
        Self {
            config,
            output_root,
            renderer,
            highlighter: SyntaxHighlighter::default(),
            fetcher,
            pipeline: Pipeline::default_pipeline(),
        }
    }

    /// Build every configured project, stamped with the current time.
    pub fn build(&self) -> BuildResult {
        self.build_at(Utc::now())
    }

    /// Build every configured project in order.
    ///
    /// Projects are independent: a skipped or failed project is reported and
    /// counted, and the build moves on to the next one.
    pub fn build_at(&self, generated_at: DateTime<Utc>) -> BuildResult {
        let ctx = PipelineContext::new(
            &self.output_root,
            &self.config.site,
            &self.highlighter,
            &self.renderer,
            generated_at,
        );

        let mut result = BuildResult {
            output_root: self.output_root.clone(),
            ..Default::default()
        };

        for project in &self.config.projects {
            println!("Processing {}...", project.title);

            match self.build_project(project, &ctx) {
                Ok(ProjectOutcome::Written {
                    index_path,
                    missing_documents,
                }) => {
                    result.written += 1;
                    result.missing_documents += missing_documents;
                    if missing_documents > 0 {
                        println!(
                            "  wrote {} ({} document(s) missing)",
                            index_path.display(),
                            missing_documents
                        );
                    } else {
                        println!("  wrote {}", index_path.display());
                    }
                }
                Ok(ProjectOutcome::Skipped(e)) => {
                    tracing::warn!(project = %project.slug, error = %e, "skipping project");
                    println!("  skipped {}: {}", project.slug, e);
                    result.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(project = %project.slug, error = %e, "project failed");
                    println!("  failed {}: {}", project.slug, e);
                    result.failed += 1;
                }
            }
        }

        result
    }

    fn build_project(
        &self,
        project: &ProjectConfig,
        ctx: &PipelineContext<'_>,
    ) -> Result<ProjectOutcome, BuildError> {
        let source = match ResolvedSource::resolve(project, self.fetcher.as_ref()) {
            Ok(source) => source,
            Err(e) if e.is_missing_source() => return Ok(ProjectOutcome::Skipped(e)),
            Err(e) => return Err(e.into()),
        };

        let mut processing = ProcessingProject::new(source);
        self.pipeline.run(&mut processing, ctx)?;

        let index_path = processing
            .index_path
            .clone()
            .ok_or_else(|| PipelineError::stage("write", "no page was written"))?;

        Ok(ProjectOutcome::Written {
            index_path,
            missing_documents: processing.missing_documents(),
        })
    }
}
