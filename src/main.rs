use clap::Parser;
use convert::{convert, Config};
use std::path::PathBuf;

mod compute;
mod convert;
mod data;
mod parse;
mod read;
mod write;

/// Consolidates point-of-sale CSV exports into a single JSON file of tickets.
#[derive(Debug, Parser)]
#[command(name = "tickets")]
struct Cli {
    /// Directory holding the `.csv` exports
    #[arg(long, default_value = "Data")]
    input: PathBuf,

    /// Directory receiving `tickets_consolidated.json`
    #[arg(long, default_value = "Data/json_output")]
    output: PathBuf,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();
    let cli = Cli::parse();
    let report = convert(&Config {
        input_dir: cli.input,
        output_dir: cli.output,
    })?;

    println!("Wrote {}", report.output_path.display());
    println!("Tickets: {}", report.tickets);
    println!("Distinct stores: {}", report.stores);
    println!("Articles: {}", report.articles);
    if report.skipped_rows() > 0 || report.skipped_articles() > 0 {
        println!(
            "Skipped: {} rows, {} articles",
            report.skipped_rows(),
            report.skipped_articles()
        );
    }
    for file in report.failed_files() {
        println!(
            "Failed: {} after {} rows: {}",
            file.path.display(),
            file.rows(),
            file.error.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
