//! Chicken-Swarm Optimization (multi-CSO) variant.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::airline::Airline;
use crate::graph::PairingGraph;
use crate::metrics::Metrics;

use super::{best_index, finalize, initial_population, pair_ids, reconstruct_and_commit, OptimizerOutput};

const EPSILON: f64 = 1e-11;

#[derive(Debug, Clone, Copy)]
pub struct CsoParams {
    pub agents: usize,
    pub fl: f64,
}

pub fn run(
    airline: &Airline,
    mut graph: PairingGraph,
    params: &CsoParams,
    max_generations: u32,
    rng: &mut impl Rng,
) -> OptimizerOutput {
    let n = params.agents;
    let mut agents = initial_population(airline, &graph, n, rng);

    let pair_id_list = pair_ids(airline);
    let mut metrics = Metrics::new();
    metrics.record(
        agents.iter().map(|a| (a.condensed.as_slice(), a.cost, a.valid)),
        &pair_id_list,
    );
    let mut best_fitness = agents[best_index(&agents)].fitness;

    for _t in 1..max_generations {
        let fitnesses: Vec<f64> = agents.iter().map(|a| a.fitness).collect();

        let mut picks = Vec::with_capacity(n);
        for k in 0..n {
            picks.push(distinct_others(n, k, rng));
        }

        let edges = super::referenced_edges(&agents);
        for (src, goal) in &edges {
            let edge = graph.ensure_edge(*src, *goal, n, || 1.0);
            for k in 0..n {
                let [r1, r2, r3, r4] = picks[k];
                let self_fit = fitnesses[k];
                let denom = self_fit.abs() + EPSILON;

                let s1 = ((self_fit - fitnesses[r1]) / denom).exp();
                let s2 = (fitnesses[r2] - self_fit).exp();
                let sigma = if fitnesses[r3] >= self_fit {
                    1.0
                } else {
                    ((fitnesses[r3] - self_fit) / denom).exp()
                };

                let rand_u: f64 = rng.gen_range(0.0..1.0);
                let normal = Normal::new(0.0, sigma.max(1e-12)).unwrap();
                let rand_n: f64 = normal.sample(rng);

                let pos = graph.position(edge, k).unwrap_or(1.0);
                let r1_pos = graph.position(edge, r1).unwrap_or(1.0);
                let r2_pos = graph.position(edge, r2).unwrap_or(1.0);
                let r4_pos = graph.position(edge, r4).unwrap_or(1.0);

                let mut updated = pos + s1 * rand_u * (r1_pos - pos) + s2 * rand_u * (r2_pos - pos);
                updated *= 1.0 + rand_n;
                updated += params.fl * (r4_pos - updated);

                graph.set_position(edge, k, updated);
            }
        }

        let jumps = reconstruct_and_commit(airline, &graph, &mut agents, &mut best_fitness, rng);
        metrics.jumps += jumps;
        metrics.record(
            agents.iter().map(|a| (a.condensed.as_slice(), a.cost, a.valid)),
            &pair_id_list,
        );
    }

    finalize(airline, &mut agents);
    let best = agents.remove(0);
    OptimizerOutput { best, metrics }
}

/// Picks four agent indices, each excluding `k` and every index already
/// picked for an earlier slot (falls back to repeating `k` once the
/// population is too small to supply a fresh one), mirroring the
/// original's draw-then-remove-from-the-candidate-list discipline.
fn distinct_others(n: usize, k: usize, rng: &mut impl Rng) -> [usize; 4] {
    let mut result = [k; 4];
    let mut excluded = vec![k];
    for slot in result.iter_mut() {
        if excluded.len() >= n {
            *slot = k;
            continue;
        }
        loop {
            let candidate = rng.gen_range(0..n);
            if !excluded.contains(&candidate) {
                *slot = candidate;
                excluded.push(candidate);
                break;
            }
        }
    }
    result
}
