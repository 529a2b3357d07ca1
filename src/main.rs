use chrono::NaiveDate;
use clap::Parser;
use log::info;

use crew_rostering::cli::{Cli, VariantArgs};
use crew_rostering::optimizer::archimedes::AoaParams;
use crew_rostering::optimizer::chicken_swarm::CsoParams;
use crew_rostering::orchestrator::{self, RunConfig, Variant};
use crew_rostering::report;
use crew_rostering::{ingest, RosterError};

const REST_PERIOD_MINUTES: i64 = 660;
const TIMESPAN_DAYS: i64 = 7;
const MINIMUM_DAYS_OFF: i64 = 2;

fn run(cli: Cli) -> Result<(), RosterError> {
    let start_date = NaiveDate::parse_from_str(&cli.start_date, "%Y-%m-%d")?;
    let end_date = NaiveDate::parse_from_str(&cli.end_date, "%Y-%m-%d")?;
    let window_start = start_date.and_hms_opt(0, 0, 0).unwrap();
    let window_end = end_date.and_hms_opt(23, 59, 59).unwrap();
    let schedule_days = (end_date - start_date).num_days().max(0) as usize + 1;

    let pairings = ingest::read_pairings(&cli.filename, window_start)?;
    let pairings = ingest::filter_and_sort(pairings, window_start, window_end);
    info!("ingested {} pairings inside the schedule window", pairings.len());

    let config = RunConfig {
        num_pilots: cli.pilots as usize,
        schedule_days,
        rest_period_minutes: REST_PERIOD_MINUTES,
        timespan_days: TIMESPAN_DAYS,
        minimum_days_off: MINIMUM_DAYS_OFF,
        max_generations: cli.generations,
        seed: cli.seed(),
    };

    let variant = match cli.variant {
        VariantArgs::MultiCso { chickens, fl } => Variant::MultiCso(CsoParams {
            agents: chickens as usize,
            fl,
        }),
        VariantArgs::Aoa { objects, c1, c2, c3, c4 } => Variant::Aoa(AoaParams {
            agents: objects as usize,
            c1,
            c2,
            c3,
            c4,
        }),
    };

    let report = orchestrator::run(pairings, config, variant);

    if let Some(parent) = cli.results.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&cli.results, report::render_text(&report))?;
    println!("{}", report::render_text(&report));
    println!("{}", report.to_json()?);

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
