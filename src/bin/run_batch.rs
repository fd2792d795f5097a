//! Value every company in a CSV of assumption sets
//!
//! Entries are valued in parallel; invalid rows are reported in the summary
//! instead of aborting the run.

use anyhow::{Context, Result};
use clap::Parser;
use dcf_valuation::assumptions::loader::load_batch_csv;
use dcf_valuation::batch::value_batch;
use dcf_valuation::report::write_batch_csv;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_batch")]
#[command(about = "Parallel DCF valuation of many assumption sets")]
struct Args {
    /// Input CSV, one company per row
    input: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_valuation_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let entries = load_batch_csv(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    println!("Loaded {} assumption sets in {:?}", entries.len(), start.elapsed());

    let value_start = Instant::now();
    let outcomes = value_batch(&entries);
    println!("Valuations complete in {:?}", value_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_batch_csv(&outcomes, file)?;
    println!("Output written to {}", args.output.display());

    println!("\nBatch Summary:");
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => println!("  {:<20} EV={:>14.2}", outcome.name, result.enterprise_value),
            Err(err) => println!("  {:<20} {}", outcome.name, err),
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
