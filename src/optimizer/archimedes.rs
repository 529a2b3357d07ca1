//! Archimedes Optimization Algorithm (AOA) variant.

use rand::Rng;

use crate::airline::Airline;
use crate::graph::PairingGraph;
use crate::metrics::Metrics;

use super::{best_index, finalize, initial_population, pair_ids, random_other, reconstruct_and_commit, OptimizerOutput};

#[derive(Debug, Clone, Copy)]
pub struct AoaParams {
    pub agents: usize,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
}

#[derive(Debug, Clone, Copy)]
struct AoaState {
    density: f64,
    volume: f64,
    acceleration: f64,
}

pub fn run(
    airline: &Airline,
    mut graph: PairingGraph,
    params: &AoaParams,
    max_generations: u32,
    rng: &mut impl Rng,
) -> OptimizerOutput {
    let n = params.agents;
    let mut agents = initial_population(airline, &graph, n, rng);
    let mut states: Vec<AoaState> = (0..n)
        .map(|_| AoaState {
            density: rng.gen_range(0.0..1.0),
            volume: rng.gen_range(0.0..1.0),
            acceleration: rng.gen_range(0.0..1.0),
        })
        .collect();

    let pair_id_list = pair_ids(airline);
    let mut metrics = Metrics::new();
    metrics.record(
        agents.iter().map(|a| (a.condensed.as_slice(), a.cost, a.valid)),
        &pair_id_list,
    );
    let mut best_fitness = agents[best_index(&agents)].fitness;

    for t in 1..max_generations {
        let tf = ((t as f64 - max_generations as f64) / max_generations as f64).exp();
        let d = ((max_generations as f64 - t as f64) / max_generations as f64).exp()
            - t as f64 / max_generations as f64;
        let p = 2.0 * rng.gen_range(0.0..1.0) - params.c4;
        let f_sign = if p <= 0.5 { 1.0 } else { -1.0 };
        let tt = params.c3 * tf;

        let best_idx = best_index(&agents);
        let prev_states = states.clone();
        let best_snapshot = prev_states[best_idx];

        let mut raw_accel = vec![0.0; n];
        let mut new_density = vec![0.0; n];
        let mut new_volume = vec![0.0; n];
        let mut random_obj = vec![0usize; n];

        for k in 0..n {
            let r_density: f64 = rng.gen_range(0.0..1.0);
            let r_volume: f64 = rng.gen_range(0.0..1.0);
            let density = prev_states[k].density + r_density * (best_snapshot.density - prev_states[k].density);
            let volume = prev_states[k].volume + r_volume * (best_snapshot.volume - prev_states[k].volume);
            new_density[k] = density;
            new_volume[k] = volume;

            let obj_idx = random_other(n, k, rng);
            random_obj[k] = obj_idx;
            let u = if tf > 0.5 { best_snapshot } else { prev_states[obj_idx] };
            raw_accel[k] = (u.density + u.volume * u.acceleration) / (density * volume);
        }

        let min_a = raw_accel.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_a = raw_accel.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let spread = max_a - min_a;
        for k in 0..n {
            let normalized = if spread.abs() < f64::EPSILON {
                0.55
            } else {
                0.9 * (raw_accel[k] - min_a) / spread + 0.1
            };
            states[k] = AoaState {
                density: new_density[k],
                volume: new_volume[k],
                acceleration: normalized,
            };
        }

        let edges = super::referenced_edges(&agents);
        for (src, goal) in &edges {
            let edge = graph.ensure_edge(*src, *goal, n, || rng.gen_range(0.95..1.0));
            let best_pos = graph.position(edge, best_idx).unwrap_or(1.0);
            for k in 0..n {
                let pos = graph.position(edge, k).unwrap_or(1.0);
                let accel = states[k].acceleration;
                let rand_u: f64 = rng.gen_range(0.0..1.0);
                let updated = if tf <= 0.5 {
                    let other_pos = graph.position(edge, random_obj[k]).unwrap_or(1.0);
                    pos + params.c1 * rand_u * accel * d * (other_pos - pos)
                } else {
                    best_pos + f_sign * params.c2 * rand_u * accel * d * (tt * best_pos - pos)
                };
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
