//! Classify command: dose badge for a single dose.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use dosetrail_core::{AdministrationRoute, Config, DoseClass, SubstanceRepository};

use super::input::load_substances;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Substance name
    #[arg(long)]
    substance: String,
    /// Route of administration (oral, insufflated, ...)
    #[arg(long, default_value = "oral")]
    route: AdministrationRoute,
    /// Dose amount
    #[arg(long)]
    dose: f64,
    /// Dose units
    #[arg(long, default_value = "mg")]
    units: String,
    /// Substance table (defaults to data.substances_path)
    #[arg(long)]
    substances: Option<PathBuf>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Classification<'a> {
    substance: &'a str,
    route: AdministrationRoute,
    dose: f64,
    units: &'a str,
    class: Option<DoseClass>,
}

pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let table = load_substances(args.substances.as_deref(), &config)?;

    let roa_dose = table
        .roa_dose(&args.substance, args.route)
        .ok_or_else(|| format!("no dose data for {} ({})", args.substance, args.route))?;
    let class = roa_dose.classify_with_units(args.dose, &args.units);

    if args.json {
        let out = Classification {
            substance: &args.substance,
            route: args.route,
            dose: args.dose,
            units: &args.units,
            class,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match class {
            Some(class) => println!("{class}"),
            None => println!("unclassified"),
        }
    }
    Ok(())
}
