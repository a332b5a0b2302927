//! Headless level explorer
//!
//! Starts a level against a recording host, walks a simulated player through
//! every door it can reach and prints the resulting map and summary.

mod explore;
mod map;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pd_core::host::PlayerStats;
use pd_core::{GameRng, GenConfig, GenResult, Generator, LevelSummary, RecordingHost};

/// Explore a procedurally generated level without an engine
#[derive(Parser, Debug)]
#[command(name = "pd-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level seed; random when omitted
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// TOML file overriding generation settings
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Stop after opening this many doors
    #[arg(short = 'n', long = "max-doors")]
    max_doors: Option<usize>,

    /// Print the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Simulated player health
    #[arg(long = "health", default_value_t = 100)]
    health: i32,

    /// Simulated player accuracy, damage per hundred shots
    #[arg(long = "accuracy", default_value_t = 0)]
    accuracy: u32,
}

#[derive(Debug, Serialize)]
struct Report {
    summary: LevelSummary,
    doors_opened: usize,
    items: usize,
    monsters: usize,
    map: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> GenResult<Report> {
    let config = match &args.config {
        Some(path) => GenConfig::load(path)?,
        None => GenConfig::default(),
    };
    let seed = args
        .seed
        .unwrap_or_else(|| GameRng::from_entropy().seed());

    let mut host = RecordingHost::with_player(PlayerStats {
        health: args.health,
        shots_fired: 100,
        damage_dealt: args.accuracy,
    });
    let mut generator = Generator::start_level(config, seed, &mut host)?;
    let doors_opened = explore::explore(
        &mut generator,
        &mut host,
        args.max_doors.unwrap_or(usize::MAX),
    );

    let map = map::render_rows(generator.state());
    Ok(Report {
        summary: generator.finish(),
        doors_opened,
        items: host.items().count(),
        monsters: host.monsters().count(),
        map,
    })
}

fn print_text(report: &Report) {
    for row in &report.map {
        println!("{row}");
    }
    println!();

    let summary = &report.summary;
    println!("seed:          {}", summary.seed);
    println!("doors opened:  {}", report.doors_opened);
    println!("progression:   {}", summary.progression);
    println!("frontier:      {}", summary.frontier);
    println!(
        "sections:      {} generated, {} built",
        summary.generated, summary.instantiated
    );
    match summary.exit_section {
        Some(id) => println!("exit:          section {}", id.0),
        None => println!("exit:          none"),
    }
    if summary.fallback_exit {
        println!("               (forced after the frontier ran out)");
    }
    println!(
        "entities:      {} ({} items, {} monsters)",
        summary.entities_spawned, report.items, report.monsters
    );
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("pd-sim: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("pd-sim: could not encode report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_text(&report);
    }
    ExitCode::SUCCESS
}
