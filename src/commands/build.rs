use crate::{
    BuildArgs, GlobalArgs,
    build::{Builder, Renderer, source::HttpFetcher},
    config::SnapshotConfig,
};

pub fn run(global: &GlobalArgs, args: &BuildArgs) -> Result<(), anyhow::Error> {
    // Startup: a bad config or template is the only fatal error
    let config = SnapshotConfig::load_from_arg(global.config_file.as_deref())?;
    let renderer = Renderer::new(args.templates.as_deref())?;

    let builder = Builder::new(
        config,
        global.output.clone(),
        renderer,
        Box::new(HttpFetcher::default()),
    );
    let result = builder.build();

    let projects_dir = result.output_root.join("projects");
    let display_path = projects_dir.canonicalize().unwrap_or(projects_dir);
    println!(
        "Wrote {} project(s) to {} ({} skipped, {} failed, {} missing document(s))",
        result.written,
        display_path.display(),
        result.skipped,
        result.failed,
        result.missing_documents
    );

    Ok(())
}
