//! prepare - stage pre-built third-party libraries
//!
//! Usage:
//!   prepare                  Fetch, extract and replace (same as `prepare run`)
//!   prepare fetch            Only make sure the archive is present
//!   prepare list             Show what each extraction rule matches
//!   prepare hash             Print digests of the cached archive
//!   prepare clean            Delete the cached archive

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use quetoo_prepare::{FetchOptions, FetchOutcome, Manifest, Stager, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prepare")]
#[command(about = "Fetch and stage pre-built third-party libraries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Working directory all manifest paths are relative to
    #[arg(short = 'C', long = "dir", global = true, env = "PREPARE_DIR", default_value = ".")]
    dir: PathBuf,

    /// TOML manifest to stage instead of the built-in OpenAL one
    #[arg(short, long, global = true, env = "PREPARE_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Never touch the network
    #[arg(long, global = true, conflicts_with = "refresh")]
    offline: bool,

    /// Re-download the archive even if it is cached
    #[arg(long, global = true)]
    refresh: bool,

    /// Check a cached archive is a readable zip before reusing it
    #[arg(long, global = true)]
    verify_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, extract and replace
    Run,

    /// Only make sure the archive is present
    Fetch,

    /// Show which archive entries each rule would extract
    List,

    /// Print digests of the cached archive
    Hash,

    /// Delete the cached archive
    Clean,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let manifest = match &cli.manifest {
        Some(path) => Manifest::load(path)
            .with_context(|| format!("Failed to load manifest: {}", path.display()))?,
        None => Manifest::openal(),
    };

    std::fs::create_dir_all(&cli.dir)
        .with_context(|| format!("Failed to create working directory: {}", cli.dir.display()))?;

    let stager = Stager::new(&cli.dir, manifest).with_fetch_options(FetchOptions {
        offline: cli.offline,
        refresh: cli.refresh,
        verify_cache: cli.verify_cache,
    });

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let report = stager
                .run()
                .with_context(|| format!("Failed to stage {}", stager.manifest().name))?;
            if let FetchOutcome::Downloaded { bytes } = report.fetch {
                output::info(&format!("downloaded {} bytes", bytes));
            }
        }

        Commands::Fetch => match stager.fetch()? {
            FetchOutcome::Cached => output::info("archive already present"),
            FetchOutcome::Downloaded { bytes } => output::success(&format!(
                "fetched {} ({} bytes)",
                stager.archive_path().display(),
                bytes
            )),
        },

        Commands::List => {
            let matches = stager.list().with_context(|| {
                format!(
                    "Failed to read {} (run `prepare fetch` first)",
                    stager.archive_path().display()
                )
            })?;
            for m in matches {
                output::info(&format!("{} -> {}", m.rule.pattern, m.rule.dest.display().bold()));
                if m.entries.is_empty() {
                    println!("  {}", "(no matches)".red());
                }
                for entry in m.entries {
                    println!("  {} {}", "-".cyan(), entry);
                }
            }
        }

        Commands::Hash => {
            let hashes = stager.hash()?;
            println!("sha256 = \"{}\"", hashes.sha256);
            println!("sha512 = \"{}\"", hashes.sha512);
            println!("blake3 = \"{}\"", hashes.blake3);
        }

        Commands::Clean => {
            if stager.clean()? {
                output::success(&format!("removed {}", stager.archive_path().display()));
            } else {
                output::skip("no cached archive");
            }
        }
    }

    Ok(())
}
