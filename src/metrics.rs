//! Per-iteration optimizer metrics: best/worst/average cost, jump count,
//! unique-solution hashing, and average pairwise similarity.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// Snapshot of one generation's population statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationStats {
    pub best_cost: f64,
    pub worst_cost: f64,
    pub average_cost: f64,
    pub valid_solutions: usize,
    pub unique_solutions: usize,
    pub average_similarity: f64,
}

/// Accumulates iteration statistics and the running best/jump count
/// across an entire optimizer run.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub iterations: Vec<IterationStats>,
    pub jumps: u32,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one generation's statistics from each agent's condensed
    /// solution, cost, and validity. `pair_ids` gives the real pairing id
    /// at each position of every `condensed` vector (they share the same
    /// chronological ordering).
    pub fn record<'a, I>(&mut self, agents: I, pair_ids: &[u32])
    where
        I: IntoIterator<Item = (&'a [Option<u32>], f64, bool)>,
    {
        let mut costs = Vec::new();
        let mut valid = 0usize;
        let mut encodings = Vec::new();

        for (condensed, cost, is_valid) in agents {
            costs.push(cost);
            if is_valid {
                valid += 1;
            }
            encodings.push(encode_solution(condensed, pair_ids));
        }

        let best = costs.iter().cloned().fold(f64::INFINITY, f64::min);
        let worst = costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let average = if costs.is_empty() {
            0.0
        } else {
            costs.iter().sum::<f64>() / costs.len() as f64
        };

        let unique: HashSet<&Vec<Option<u32>>> = encodings.iter().collect();
        let average_similarity = average_pairwise_similarity(&encodings);

        self.iterations.push(IterationStats {
            best_cost: best,
            worst_cost: worst,
            average_cost: average,
            valid_solutions: valid,
            unique_solutions: unique.len(),
            average_similarity,
        });
    }
}

/// Builds the collapsed solution encoding used for hashing and similarity:
/// each pilot id is replaced by the id of the first non-root pairing it
/// was assigned (collapsing pilot-permutation symmetries), then the
/// condensed assignment is rewritten with those labels. `pair_ids[i]` is
/// the real pairing id corresponding to `condensed[i]`.
pub fn encode_solution(condensed: &[Option<u32>], pair_ids: &[u32]) -> Vec<Option<u32>> {
    // `condensed` is already in chronological pairing order, so the first
    // occurrence of a pilot id marks that pilot's first-assigned pairing.
    let mut first_pair_of_pilot: HashMap<u32, u32> = HashMap::new();
    let mut result = Vec::with_capacity(condensed.len());
    for (idx, entry) in condensed.iter().enumerate() {
        match entry {
            None => result.push(None),
            Some(pilot_id) => {
                let label = *first_pair_of_pilot
                    .entry(*pilot_id)
                    .or_insert(pair_ids[idx]);
                result.push(Some(label));
            }
        }
    }
    result
}

/// `diff = (L - S) + |{ i < S : A[i] != B[i] }|`; `similarity = (1 -
/// diff/L) * 100`, where `L = max(|A|,|B|)`, `S = min(|A|,|B|)`.
pub fn similarity(a: &[Option<u32>], b: &[Option<u32>]) -> f64 {
    let l = a.len().max(b.len());
    let s = a.len().min(b.len());
    if l == 0 {
        return 100.0;
    }
    let mismatches = (0..s).filter(|&i| a[i] != b[i]).count();
    let diff = (l - s) + mismatches;
    (1.0 - diff as f64 / l as f64) * 100.0
}

fn average_pairwise_similarity(encodings: &[Vec<Option<u32>>]) -> f64 {
    let n = encodings.len();
    if n < 2 {
        return 100.0;
    }
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += similarity(&encodings[i], &encodings[j]);
            pairs += 1;
        }
    }
    total / pairs as f64
}
