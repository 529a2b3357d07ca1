//! Population-based optimizer core shared by both update rules.
//!
//! Each generation: gather the edges referenced by the population's
//! current accepted solutions, lazily create any missing ones (variant
//! picks the initialization), update positions on those edges, rebuild
//! every agent's proposal, and commit proposals that strictly improve
//! fitness.

pub mod archimedes;
pub mod chicken_swarm;

use std::collections::HashSet;

use rand::Rng;

use crate::airline::Airline;
use crate::construction::{self, ConstructionResult, ROOT};
use crate::fitness;
use crate::graph::PairingGraph;
use crate::metrics::Metrics;
use crate::pilot::Pilot;

/// One population member: its currently accepted solution plus score.
///
/// `cost` is the internal per-agent bookkeeping value, scaled by
/// [`fitness::UNIT_COST`] (matching the original's internal cost copy); the
/// final report divides this back out to report the raw deviation.
#[derive(Clone)]
pub struct Agent {
    pub pilots: Vec<Pilot>,
    pub condensed: Vec<Option<u32>>,
    pub valid: bool,
    pub fitness: f64,
    pub cost: f64,
}

impl Agent {
    fn from_construction(airline: &Airline, result: ConstructionResult) -> Self {
        let covered = result.condensed.iter().filter(|c| c.is_some()).count();
        let scored = fitness::evaluate(
            &result.pilots,
            airline.average_workload,
            airline.pairs.len(),
            covered,
        );
        Self {
            pilots: result.pilots,
            condensed: result.condensed,
            valid: result.valid,
            fitness: scored.fitness,
            cost: scored.cost * fitness::UNIT_COST,
        }
    }

    fn rescore(&mut self, airline: &Airline) {
        let covered = self.condensed.iter().filter(|c| c.is_some()).count();
        let scored = fitness::evaluate(&self.pilots, airline.average_workload, airline.pairs.len(), covered);
        self.fitness = scored.fitness;
        self.cost = scored.cost * fitness::UNIT_COST;
    }
}

/// Final result of a complete optimizer run.
pub struct OptimizerOutput {
    pub best: Agent,
    pub metrics: Metrics,
}

fn initial_population(airline: &Airline, graph: &PairingGraph, num_agents: usize, rng: &mut impl Rng) -> Vec<Agent> {
    (0..num_agents)
        .map(|k| Agent::from_construction(airline, construction::construct(airline, graph, k, rng)))
        .collect()
}

/// Distinct `(src, goal)` edges referenced by any agent's current
/// accepted solution: one edge per adjacency in each pilot's
/// chronological duty list, rooted at [`construction::ROOT`].
fn referenced_edges(agents: &[Agent]) -> Vec<(u32, u32)> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for agent in agents {
        for pilot in &agent.pilots {
            let mut prev = ROOT;
            for pairing in pilot.assigned() {
                let key = (prev, pairing.id());
                if seen.insert(key) {
                    edges.push(key);
                }
                prev = pairing.id();
            }
        }
    }
    edges
}

/// Rebuilds every agent's proposal and commits it when it strictly
/// improves that agent's stored fitness. Returns the number of commits
/// that also improved the population-wide best fitness (jumps).
fn reconstruct_and_commit(
    airline: &Airline,
    graph: &PairingGraph,
    agents: &mut [Agent],
    best_fitness: &mut f64,
    rng: &mut impl Rng,
) -> u32 {
    let mut jumps = 0;
    for (k, agent) in agents.iter_mut().enumerate() {
        let proposal = Agent::from_construction(airline, construction::construct(airline, graph, k, rng));
        if proposal.fitness > agent.fitness {
            *agent = proposal;
            if agent.fitness > *best_fitness {
                *best_fitness = agent.fitness;
                jumps += 1;
            }
        }
    }
    jumps
}

/// Index of the agent with the highest fitness.
fn best_index(agents: &[Agent]) -> usize {
    agents
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.fitness.partial_cmp(&b.1.fitness).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Picks a uniformly random agent index distinct from `exclude` (falls
/// back to `exclude` itself when the population has only one member).
fn random_other(n: usize, exclude: usize, rng: &mut impl Rng) -> usize {
    if n <= 1 {
        return exclude;
    }
    loop {
        let candidate = rng.gen_range(0..n);
        if candidate != exclude {
            return candidate;
        }
    }
}

/// Final step shared by both variants: one more equalization pass per
/// agent, re-scoring, and a descending sort by fitness.
fn finalize(airline: &Airline, agents: &mut Vec<Agent>) {
    for agent in agents.iter_mut() {
        airline.equalize(&mut agent.pilots);
        agent.rescore(airline);
    }
    agents.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
}

fn pair_ids(airline: &Airline) -> Vec<u32> {
    airline.pairs.iter().map(|p| p.id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn random_other_avoids_excluded_index() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let picked = random_other(4, 2, &mut rng);
            assert_ne!(picked, 2);
        }
    }

    #[test]
    fn random_other_single_agent_returns_self() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert_eq!(random_other(1, 0, &mut rng), 0);
    }
}
