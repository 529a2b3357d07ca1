//! Chronological greedy solution constructor with roulette-wheel
//! selection over legal candidate pilots.

use rand::Rng;

use crate::airline::Airline;
use crate::graph::PairingGraph;
use crate::pilot::Pilot;

/// Virtual node id used only to look up an edge position for "this is the
/// pilot's first assignment". No [`Pairing`](crate::pairing::Pairing) or
/// pilot-roster entry is ever created for it — unlike the original
/// sentinel root, it exists solely as a graph lookup key, so the pilot
/// and pairing models stay sentinel-free.
pub const ROOT: u32 = u32::MAX;

/// Output of one construction pass for one agent.
pub struct ConstructionResult {
    pub pilots: Vec<Pilot>,
    /// One entry per pairing in `airline.pairs` order; `None` if the
    /// pairing could not be legally assigned to any pilot.
    pub condensed: Vec<Option<u32>>,
    pub valid: bool,
}

struct Candidate {
    pilot_idx: usize,
    insert_idx: usize,
    weight: f64,
}

/// Greedily builds one candidate solution for `agent`, reading edge
/// weights from `graph` (never creating edges — that is the optimizer's
/// job once every agent's solution for the generation is known).
pub fn construct(airline: &Airline, graph: &PairingGraph, agent: usize, rng: &mut impl Rng) -> ConstructionResult {
    let mut pilots: Vec<Pilot> = (0..airline.num_pilots)
        .map(|id| Pilot::new(id as u32, airline.schedule_days))
        .collect();
    let mut condensed = Vec::with_capacity(airline.pairs.len());
    let mut valid = true;

    for pair in &airline.pairs {
        let mut candidates = Vec::new();
        for (pilot_idx, pilot) in pilots.iter_mut().enumerate() {
            let Some(insert_idx) = airline.rest_period_rule(pilot.assigned(), pair) else {
                continue;
            };
            if !airline.days_off_rule(pilot, pair, true) {
                continue;
            }

            let src = pilot.last().map(|p| p.id()).unwrap_or(ROOT);
            let p = graph.position_or_default(src, pair.id(), agent);
            let weight = match pilot.last() {
                None => p,
                Some(prev) => {
                    let gap_hours = (pair.start() - prev.end()).num_minutes() as f64 / 60.0;
                    p / (gap_hours - airline.rest_period_minutes as f64 / 60.0 + 1.0)
                }
            };
            candidates.push(Candidate {
                pilot_idx,
                insert_idx,
                weight,
            });
        }

        match roulette_select(&candidates, rng) {
            Some(choice) => {
                let pilot_id = pilots[choice.pilot_idx].id();
                pilots[choice.pilot_idx].add(pair.clone(), choice.insert_idx);
                condensed.push(Some(pilot_id));
            }
            None => {
                valid = false;
                condensed.push(None);
            }
        }
    }

    airline.equalize(&mut pilots);
    if valid {
        airline.equalize(&mut pilots);
    }

    ConstructionResult {
        pilots,
        condensed,
        valid,
    }
}

/// Fitness-proportionate selection among candidates, after shifting all
/// weights so the minimum is zero (weights may be negative when the
/// compactness factor's denominator is small).
fn roulette_select(candidates: &[Candidate], rng: &mut impl Rng) -> Option<&Candidate> {
    if candidates.is_empty() {
        return None;
    }
    let min_weight = candidates.iter().map(|c| c.weight).fold(f64::INFINITY, f64::min);
    let offset = min_weight.min(0.0);
    let total: f64 = candidates.iter().map(|c| c.weight - offset).sum();

    if total <= 0.0 {
        return candidates.first();
    }

    let mut draw = rng.gen_range(0.0..total);
    for candidate in candidates {
        draw -= candidate.weight - offset;
        if draw <= 0.0 {
            return Some(candidate);
        }
    }
    candidates.last()
}
