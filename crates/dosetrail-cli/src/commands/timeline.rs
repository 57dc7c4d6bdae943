//! Timeline command: lays out ingestions and prints the geometry.

use clap::Args;
use std::path::PathBuf;

use dosetrail_core::{Config, TimelineBuilder};

use super::input::{load_ingestions, load_substances};

#[derive(Args)]
pub struct TimelineArgs {
    /// JSON file with an array of ingestions
    #[arg(long)]
    ingestions: PathBuf,
    /// Substance table (defaults to data.substances_path)
    #[arg(long)]
    substances: Option<PathBuf>,
    /// Print the full geometry as JSON
    #[arg(long)]
    json: bool,
    /// Do not append the trailing margin
    #[arg(long)]
    no_margin: bool,
    /// Chart width in cells
    #[arg(long, default_value_t = 60)]
    width: usize,
}

pub fn run(args: TimelineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let table = load_substances(args.substances.as_deref(), &config)?;
    let ingestions = load_ingestions(&args.ingestions)?;

    let mut timeline_config = config.timeline.clone();
    if args.no_margin {
        timeline_config.add_trailing_margin = false;
    }

    let timeline = TimelineBuilder::new(timeline_config).build(&ingestions, &table)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    } else {
        println!("{}", timeline.render_ascii_chart(args.width));
    }
    Ok(())
}
