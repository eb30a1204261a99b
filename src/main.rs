mod archive;
mod batch;
mod decode;
mod error;
mod parser;
mod record;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::parser::lexicon::Lexicon;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "post_archiver", about = "Archive forum posts as redacted, classified JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every HTML page in the input directory and zip the records
    Run {
        /// Directory holding *.html / *.htm pages
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory for JSON records (cleared first)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Zip archive to produce
        #[arg(short, long)]
        archive: Option<PathBuf>,
        /// JSON lexicon replacing the built-in keyword tables
        #[arg(short, long)]
        lexicon: Option<PathBuf>,
        /// Write JSON records only
        #[arg(long)]
        no_archive: bool,
    },
    /// Convert one page and print its record
    Parse {
        file: PathBuf,
        #[arg(short, long)]
        lexicon: Option<PathBuf>,
    },
    /// Print the effective keyword tables as JSON
    Lexicon {
        #[arg(short, long)]
        lexicon: Option<PathBuf>,
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

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            archive,
            lexicon,
            no_archive,
        } => {
            let settings = settings.with_overrides(input, output, archive, lexicon);
            info!(settings = ?settings, "Starting batch");
            let lexicon = Lexicon::resolve(settings.lexicon.as_deref())?;

            if !settings.input_dir.exists() {
                std::fs::create_dir_all(&settings.input_dir)
                    .with_context(|| format!("Failed to create {}", settings.input_dir.display()))?;
                println!("Created {}, but it is empty.", settings.input_dir.display());
                return Ok(());
            }

            let files = batch::discover(&settings.input_dir)?;
            if files.is_empty() {
                println!("No HTML files found in {}.", settings.input_dir.display());
                return Ok(());
            }

            batch::reset_output_dir(&settings.output_dir)?;
            println!("Found {} HTML files. Processing...", files.len());
            let report = batch::run(&files, &settings.output_dir, &lexicon, settings.chunk_size);
            println!("progress: {}/{}", report.total, report.total);
            report.print();
            println!("files: {}", settings.output_dir.display());

            if !no_archive {
                let n = archive::package(&settings.output_dir, &settings.archive_path)?;
                println!("zip: {} ({} records)", settings.archive_path.display(), n);
            }
            Ok(())
        }
        Commands::Parse { file, lexicon } => {
            let lexicon = Lexicon::resolve(lexicon.or(settings.lexicon).as_deref())?;
            let record = batch::process_path(&file, &lexicon)?;
            eprintln!("{}", record.filename());
            println!("{}", record.to_json()?);
            Ok(())
        }
        Commands::Lexicon { lexicon } => {
            let lexicon = Lexicon::resolve(lexicon.or(settings.lexicon).as_deref())?;
            println!("{}", serde_json::to_string_pretty(&lexicon)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
