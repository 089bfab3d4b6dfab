/// The Big IDEA:
/// Writing YUIDoc blocks by hand is tedious, and most of a block is
/// boilerplate that can be read straight off the declaration: the
/// name, the parameters, whether it is a class. This tool walks a
/// JavaScript/TypeScript file line by line, recognizes declarations
/// with plain pattern matching (no parser), and drops a skeleton
/// comment above every one that does not have a comment yet. Existing
/// comments are kept and only re-indented, so running it twice is safe.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yuidoc_gen::utils::{self, GenerateOptions};

#[derive(Parser)]
#[command(name = "yuidoc-gen")]
#[command(about = "Generate YUIDoc comment skeletons above JavaScript declarations")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./.yuidoc-gen.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Generate comments for a file
    Generate {
        file: PathBuf,
        /// Only scan these lines, 1-based and inclusive (e.g. 10:42)
        #[arg(long)]
        lines: Option<String>,
        /// Compute the edits without writing the file
        #[arg(long)]
        dry_run: bool,
        /// Print the planned edits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fail if a file has declarations without comments
    Check { file: PathBuf },
    /// Validate the configuration file
    ValidateConfig,
    /// Export the configuration in another format
    ExportConfig {
        file: PathBuf,
        /// toml, json or yaml
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let manager = utils::config_manager(cli.config)?;

    match cli.command {
        Commands::Init => utils::initialize_config(&manager),
        Commands::Generate {
            file,
            lines,
            dry_run,
            json,
        } => {
            let options = GenerateOptions {
                lines,
                dry_run,
                json,
            };
            utils::generate_file(&manager, &file, &options, cli.verbose).map(|_| ())
        }
        Commands::Check { file } => utils::check_file(&manager, &file),
        Commands::ValidateConfig => utils::validate_config(&manager),
        Commands::ExportConfig { file, format } => utils::export_config(&manager, &file, &format),
    }
}
