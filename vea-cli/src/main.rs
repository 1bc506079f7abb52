use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vea_ingest::parsers::vea_report::EXPECTED_STUDENTS;

mod config;
mod extract;
mod load;

#[derive(Parser, Debug)]
#[command(name = "vea", version, about = "VEA score report extractor and database loader")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull candidate rows out of the score report PDF into a CSV
    Extract {
        /// Score report PDF
        #[arg(long, default_value = extract::DEFAULT_PDF)]
        pdf: PathBuf,

        /// Output CSV
        #[arg(long, default_value = extract::DEFAULT_OUT)]
        out: PathBuf,

        /// Number of candidates the report should contain
        #[arg(long, default_value_t = EXPECTED_STUDENTS)]
        expected: usize,
    },

    /// Load a results CSV into the database (settings from DB_* / .env)
    Load {
        /// Path to the CSV file
        #[arg(long, default_value = load::DEFAULT_CSV)]
        csv: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract { pdf, out, expected } => extract::run_extract(&pdf, &out, expected)?,
        Command::Load { csv } => load::run_load(&csv).await?,
    }

    Ok(())
}
