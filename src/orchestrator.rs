//! Builds the airline, graph, and population, runs the selected
//! optimizer variant, and assembles the final report.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::airline::{self, Airline};
use crate::graph::PairingGraph;
use crate::optimizer::archimedes::{self, AoaParams};
use crate::optimizer::chicken_swarm::{self, CsoParams};
use crate::optimizer::OptimizerOutput;
use crate::pairing::Pairing;
use crate::report::{PilotReport, Report};

/// Which update rule drives the population loop.
pub enum Variant {
    Aoa(AoaParams),
    MultiCso(CsoParams),
}

pub struct RunConfig {
    pub num_pilots: usize,
    pub schedule_days: usize,
    pub rest_period_minutes: i64,
    pub timespan_days: i64,
    pub minimum_days_off: i64,
    pub max_generations: u32,
    pub seed: Option<u64>,
}

/// Runs the full pipeline: builds the airline and graph, drives the
/// chosen optimizer, and produces the structured report.
pub fn run(pairs: Vec<Pairing>, config: RunConfig, variant: Variant) -> Report {
    let total_pairs = pairs.len();
    let airline = Airline::new(
        pairs,
        config.num_pilots,
        config.schedule_days,
        config.rest_period_minutes,
        config.timespan_days,
        config.minimum_days_off,
    );
    info!(
        "airline ready: {} pairings, {} pilots, average workload {:.1} min",
        total_pairs, config.num_pilots, airline.average_workload
    );

    let graph = PairingGraph::new();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let OptimizerOutput { best, metrics } = match variant {
        Variant::Aoa(params) => archimedes::run(&airline, graph, &params, config.max_generations, &mut rng),
        Variant::MultiCso(params) => chicken_swarm::run(&airline, graph, &params, config.max_generations, &mut rng),
    };

    for (i, stats) in metrics.iterations.iter().enumerate() {
        if i % 50 == 0 {
            info!(
                "generation {}/{}: best={:.2} jumps={}",
                i, config.max_generations, stats.best_cost, metrics.jumps
            );
        }
    }

    let mut valid = best.valid;
    let mut pilot_reports = Vec::with_capacity(best.pilots.len());
    for pilot in &best.pilots {
        for (idx, pairing) in pilot.assigned().iter().enumerate() {
            if idx > 0 {
                let prev = &pilot.assigned()[idx - 1];
                let gap = (pairing.start() - prev.end()).num_minutes();
                if gap < config.rest_period_minutes {
                    warn!(
                        "pilot {}: rest violation between pairing {} and {}",
                        pilot.id(),
                        prev.id(),
                        pairing.id()
                    );
                    valid = false;
                }
            }
        }
        if !airline::check_days_off(pilot, config.timespan_days, config.minimum_days_off) {
            warn!("pilot {}: days-off violation in final solution", pilot.id());
            valid = false;
        }

        pilot_reports.push(PilotReport {
            pilot_id: pilot.id(),
            flight_time_minutes: pilot.flight_time(),
            deviation: pilot.flight_time() - airline.average_workload,
            pairing_ids: pilot.assigned().iter().map(Pairing::id).collect(),
        });
    }

    let coverage = best.condensed.iter().filter(|c| c.is_some()).count();

    Report {
        assignments: pilot_reports,
        global_cost: best.cost / crate::fitness::UNIT_COST,
        pairs_total: total_pairs,
        pairs_covered: coverage,
        iteration_trace: metrics.iterations,
        jumps: metrics.jumps,
        valid,
    }
}
