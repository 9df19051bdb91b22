//! swarm-sync - Main entry point
//!
//! Builds the file list, then uploads and downloads it through swarm-cli.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use swarm_sync::config::DEFAULT_SETTINGS_PATH;
use swarm_sync::filelist::{generate_filelist, DEFAULT_FILELIST};
use swarm_sync::shutdown::ShutdownCoordinator;
use swarm_sync::swarm::SwarmCli;
use swarm_sync::transfer::{Downloader, Uploader};
use swarm_sync::{utils, Manifest, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a file list with size and SHA-256 for every file in a folder
    Filelist {
        /// Path to the folder
        path: PathBuf,

        /// Look into subfolders
        #[arg(short = 'R', long)]
        recursive: bool,

        /// Output filename for the JSON file list
        #[arg(short = 'F', long = "filename", default_value = DEFAULT_FILELIST)]
        output: PathBuf,
    },

    /// Upload the files of the file list
    Upload {
        /// Path to settings TOML file
        #[arg(short = 'S', long, default_value = DEFAULT_SETTINGS_PATH)]
        settings: PathBuf,
    },

    /// Download uploaded files and verify their SHA-256
    Download {
        /// Path to settings TOML file
        #[arg(short = 'S', long, default_value = DEFAULT_SETTINGS_PATH)]
        settings: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Filelist {
            path,
            recursive,
            output,
        } => {
            utils::logger::init(args.log_level.as_deref().unwrap_or("info"))?;
            generate_filelist(&path, recursive, &output)
                .with_context(|| format!("Failed to generate file list for {}", path.display()))?;
            println!("File list generated: {}", output.display());
        }
        Command::Upload { settings } => {
            let (settings, mut manifest) = startup(&settings, args.log_level.as_deref())?;
            settings.validate_for_upload()?;

            let shutdown = ShutdownCoordinator::new();
            let _listener = shutdown.listen();

            let uploader =
                Uploader::with_cancel(SwarmCli::new(&settings.swarm), &settings, shutdown.token());
            let summary = uploader.run(&mut manifest).await?;
            println!("{}", summary.render());
        }
        Command::Download { settings } => {
            let (settings, mut manifest) = startup(&settings, args.log_level.as_deref())?;

            let shutdown = ShutdownCoordinator::new();
            let _listener = shutdown.listen();

            let downloader =
                Downloader::with_cancel(SwarmCli::new(&settings.swarm), &settings, shutdown.token());
            let summary = downloader.run(&mut manifest).await?;
            println!("{}", summary.render());
        }
    }

    Ok(())
}

/// Load settings, initialize logging and read the manifest they point at
fn startup(settings_path: &Path, log_level: Option<&str>) -> Result<(Settings, Manifest)> {
    let settings = Settings::from_file(settings_path)?;

    let log_level = log_level.unwrap_or(settings.log.level.as_str());
    utils::logger::init(log_level)?;

    tracing::info!(
        "Starting swarm-sync v{} (manifest: {})",
        env!("CARGO_PKG_VERSION"),
        settings.manifest.path.display()
    );

    let manifest = Manifest::load(&settings.manifest.path)?;
    Ok((settings, manifest))
}
