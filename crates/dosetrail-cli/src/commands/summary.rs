use clap::Args;
use std::path::PathBuf;

use dosetrail_core::{summarize_doses, Config};

use super::input::{load_ingestions, load_substances};

#[derive(Args)]
pub struct SummaryArgs {
    /// JSON file with an array of ingestions
    #[arg(long)]
    ingestions: PathBuf,
    /// Substance table (defaults to data.substances_path)
    #[arg(long)]
    substances: Option<PathBuf>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let table = load_substances(args.substances.as_deref(), &config)?;
    let ingestions = load_ingestions(&args.ingestions)?;

    let summaries = summarize_doses(&ingestions, &table);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for s in &summaries {
        let class = s
            .classification
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let total = if s.has_unknown_dose {
            format!(">= {} {}", s.total_dose, s.units)
        } else {
            format!("{} {}", s.total_dose, s.units)
        };
        println!(
            "{:<20} {:<16} {:>2}x  {}",
            s.substance_name, total, s.ingestion_count, class
        );
    }
    Ok(())
}
