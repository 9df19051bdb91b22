use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swarm_report::csv_report::write_report_file;
use swarm_report::html::{write_page, PageContent};
use swarm_sync::config::DEFAULT_SETTINGS_PATH;
use swarm_sync::{Manifest, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render reports from a swarm-sync file list")]
struct Args {
    /// Path to settings TOML file
    #[arg(short = 'S', long, global = true, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// HTML table of uploaded files with gateway links
    Html {
        /// Output file (defaults to page.output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// CSV summary of upload and download history
    Csv {
        /// File list to report on instead of the one in the settings
        #[arg(short = 'F', long)]
        filelist: Option<PathBuf>,

        /// Output file (defaults to report.csv_output_path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Html { output } => {
            let settings = Settings::from_file(&args.settings)?;
            tracing::info!("Loading manifest {}", settings.manifest.path.display());
            let manifest = Manifest::load(&settings.manifest.path)?;
            let content = PageContent::load(&settings.page, &settings.swarm)?;

            let output = output.unwrap_or(settings.page.output_path);
            write_page(&manifest, &content, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("HTML page generated: {}", output.display());
        }
        Command::Csv { filelist, output } => {
            // An explicit file list makes the settings file optional
            let settings = match &filelist {
                Some(_) if !args.settings.exists() => Settings::default(),
                _ => Settings::from_file(&args.settings)?,
            };
            let filelist = filelist.unwrap_or(settings.manifest.path);
            println!("Generating report based on {}.", filelist.display());

            let manifest = Manifest::load(&filelist)?;
            let output = output.unwrap_or(settings.report.csv_output_path);
            write_report_file(&manifest, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Report successfully generated and saved as {}.", output.display());
        }
    }

    Ok(())
}
