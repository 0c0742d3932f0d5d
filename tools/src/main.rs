//! sim-runner: headless runner for the epidemic simulation.
//!
//! Usage:
//!   sim-runner --seed 12345 --days 120 --results results.tsv
//!   sim-runner --config data/scenario.json --report --db run.db

mod report;

use anyhow::{Context, Result};
use epidemic_core::{engine::SimEngine, store::SimStore, NoopObserver, SimConfig};
use report::ReportPrinter;
use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

const USAGE: &str = "\
sim-runner: day-by-day epidemic simulation

Options:
  --config <file>    JSON scenario (default ./data/scenario.json)
  --seed <u64>       master seed (default 42)
  --days <n>         override simulation_days
  --results <file>   write the tab-separated results table
  --db <path>        persist events and snapshots to SQLite
  --run-id <id>      run identifier (default: random uuid)
  --report           print a report block after every day
  --quiet            skip the run summary
  --help             print this message";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if has_flag(&args, "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let seed = parse_arg::<u64>(&args, "--seed")?.unwrap_or(42);
    let report = has_flag(&args, "--report");
    let quiet = has_flag(&args, "--quiet");
    let results = arg_value(&args, "--results");
    let db = arg_value(&args, "--db");

    let config_path = arg_value(&args, "--config").unwrap_or("./data/scenario.json");
    let mut config = SimConfig::load(config_path)?;
    if let Some(days) = parse_arg::<u64>(&args, "--days")? {
        config.population.simulation_days = days;
    }

    let run_id = arg_value(&args, "--run-id")
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    if !quiet {
        println!("epidemic sim-runner");
        println!("  run_id:     {run_id}");
        println!("  seed:       {seed}");
        println!("  config:     {config_path}");
        println!("  population: {}", config.population.total_population);
        println!("  days:       {}", config.population.simulation_days);
        println!("  db:         {}", db.unwrap_or("(none)"));
        println!();
    }

    let mut engine = SimEngine::build(run_id.clone(), seed, config)?;
    if let Some(path) = db {
        let store = SimStore::open(path)?;
        store.migrate()?;
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        engine.attach_store(store);
    }

    if report {
        let mut printer = ReportPrinter::new(io::stdout().lock());
        engine.run(&mut printer)?;
        printer.finish()?;
    } else {
        engine.run(&mut NoopObserver)?;
    }

    if let Some(path) = results {
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        let mut out = BufWriter::new(file);
        report::write_results(&mut out, engine.archive().as_slice())?;
        out.flush()?;
        log::info!("wrote {} result rows to {path}", engine.archive().len());
    }

    if !quiet {
        print_summary(&engine)?;
    }
    Ok(())
}

fn print_summary(engine: &SimEngine) -> Result<()> {
    let archive = engine.archive();
    let peak = archive.iter().max_by_key(|s| s.sick());

    println!("=== RUN SUMMARY ===");
    println!("  run_id:         {}", engine.run_id);
    println!("  days run:       {}", engine.clock.current_day);
    if let Some(last) = archive.latest() {
        println!("  healthy:        {}", last.healthy());
        println!("  still sick:     {}", last.sick());
        println!("  dead:           {}", last.dead);
        println!("  waiting beds:   {}", last.severe_waiting_for_bed);
    }
    if let Some(peak) = peak {
        println!("  peak sick:      {} (day {})", peak.sick(), peak.day);
    }
    if let Some(store) = engine.store() {
        println!("  events logged:  {}", store.event_count(&engine.run_id)?);
    }
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Value of `flag`, if given. A value that does not parse is an error.
fn parse_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    arg_value(args, flag)
        .map(|v| {
            v.parse()
                .with_context(|| format!("{flag} expects a number, got {v:?}"))
        })
        .transpose()
}
