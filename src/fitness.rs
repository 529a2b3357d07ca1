//! Maps a candidate solution to a (fitness, cost) pair.

use crate::pilot::Pilot;

/// Scale applied to raw flight-time deviation for the optimizer's internal
/// per-agent cost bookkeeping (generation best/worst/average trace). Not
/// applied here: `evaluate`'s `cost` is the raw deviation, matching the
/// original `FitnessFunction`'s `cost := deviation`. The optimizer scales it
/// up for its own trace and the final report divides it back out.
pub const UNIT_COST: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessResult {
    pub fitness: f64,
    pub cost: f64,
    pub deviation: f64,
}

/// Scores one candidate solution.
///
/// `fitness` rewards both low deviation from `average_workload` and high
/// pairing coverage; higher is better. The constants `750` and `0.75`
/// trade those two terms off against each other and are part of the
/// objective's definition, not tunable parameters. `cost` is the raw
/// summed deviation, unscaled.
pub fn evaluate(
    pilots: &[Pilot],
    average_workload: f64,
    total_pairs: usize,
    pairs_covered: usize,
) -> FitnessResult {
    let deviation: f64 = pilots
        .iter()
        .map(|p| (p.flight_time() - average_workload).abs())
        .sum();
    let fitness = 1.0 / ((deviation + 1.0) / 750.0)
        + 0.75 / (total_pairs as f64 - pairs_covered as f64 + 1.0);
    FitnessResult {
        fitness,
        cost: deviation,
        deviation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_deviation_full_coverage_maximizes_fitness_term() {
        let pilots = vec![Pilot::new(0, 5), Pilot::new(1, 5)];
        let result = evaluate(&pilots, 0.0, 10, 10);
        assert_eq!(result.deviation, 0.0);
        assert_eq!(result.cost, 0.0);
        assert_eq!(result.fitness, 750.0 + 0.75);
    }

    #[test]
    fn missing_coverage_reduces_fitness() {
        let pilots = vec![Pilot::new(0, 5)];
        let full = evaluate(&pilots, 0.0, 10, 10).fitness;
        let partial = evaluate(&pilots, 0.0, 10, 5).fitness;
        assert!(partial < full);
    }

    #[test]
    fn higher_deviation_reduces_fitness() {
        use crate::pairing::PairingBuilder;
        use chrono::NaiveDate;

        let epoch = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut b = PairingBuilder::new(1);
        b.add_leg(1, epoch, epoch + chrono::Duration::hours(2)).unwrap();
        let pairing = b.build(epoch).unwrap();

        let mut p0 = Pilot::new(0, 5);
        p0.add(pairing, 0);

        let low_dev = evaluate(&[Pilot::new(0, 5)], 0.0, 1, 1).fitness;
        let high_dev = evaluate(&[p0], 0.0, 1, 1).fitness;
        assert!(high_dev < low_dev);
    }
}
