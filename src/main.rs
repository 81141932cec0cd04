use anyhow::Context;
use clap::Parser;
use project_bundle::{Config, Pipeline};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "project-bundle",
    version,
    author,
    about = "Bundle project code files into a single Markdown file for AI prompts",
    long_about = "Bundle project code files into a single Markdown file for AI prompts.\n\n\
    This tool walks a directory, skips anything matched by .gitignore or the built-in \
    exclusions (dependency folders, build output, binary media), keeps files whose \
    extension is on the allow-list, and writes them into one Markdown document with a \
    fenced, language-tagged block per file. An existing output file is overwritten.\n\n\
    USAGE EXAMPLES:\n  \
      # Bundle the current directory\n  \
      project-bundle\n\n  \
      # Bundle a specific project\n  \
      project-bundle --root ./my-project --output context.md\n\n  \
      # Only Python and JavaScript\n  \
      project-bundle --include .py .js\n\n  \
      # Skip test fixtures as well\n  \
      project-bundle --exclude fixtures '*.snap'"
)]
struct Cli {
    /// Root directory of the project to bundle
    #[arg(short, long, default_value = ".", value_name = "PATH")]
    root: PathBuf,

    /// Output Markdown file (overwritten if it exists)
    #[arg(short, long, default_value = "project_bundle.md", value_name = "PATH")]
    output: PathBuf,

    /// Space-separated list of file extensions to include (e.g. .py .js .html)
    ///
    /// Case-insensitive; the leading dot is optional. Entries that mix case
    /// or contain an inner dot, such as Dockerfile or CMakeLists.txt, match
    /// files with that exact name.
    /// Defaults to a built-in list of common source and text types.
    #[arg(short, long, num_args = 1.., value_name = "EXT")]
    include: Vec<String>,

    /// Additional ignore patterns (gitignore-style globs)
    #[arg(short, long, num_args = 1.., value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Do not read .gitignore from the root directory
    #[arg(long)]
    no_ignore_file: bool,

    /// Dry run (list files, don't write the bundle)
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = Config::builder()
        .root_dir(cli.root)
        .output_path(cli.output)
        .exclude(cli.exclude)
        .use_ignore_file(!cli.no_ignore_file)
        .dry_run(cli.dry_run);

    if !cli.include.is_empty() {
        builder = builder.include(cli.include);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Bundling failed")?;

    stats.print_summary();

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbosity {
            0 => EnvFilter::new("project_bundle=info"),
            1 => EnvFilter::new("project_bundle=debug"),
            _ => EnvFilter::new("project_bundle=trace"),
        },
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
