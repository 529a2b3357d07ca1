//! Structured output: one JSON/text report describing the winning
//! roster, its cost, and the optimizer's generation-by-generation trace.

use serde::Serialize;

use crate::metrics::IterationStats;

/// One pilot's final duty assignment.
#[derive(Debug, Clone, Serialize)]
pub struct PilotReport {
    pub pilot_id: u32,
    pub flight_time_minutes: f64,
    pub deviation: f64,
    pub pairing_ids: Vec<u32>,
}

/// The full result of one optimizer run, ready to serialize or render.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub assignments: Vec<PilotReport>,
    pub global_cost: f64,
    pub pairs_total: usize,
    pub pairs_covered: usize,
    pub iteration_trace: Vec<IterationStats>,
    pub jumps: u32,
    pub valid: bool,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text table: one line per pilot, then a summary footer.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10}{:>16}{:>12}  pairings\n",
        "pilot", "flight_minutes", "deviation"
    ));
    for pilot in &report.assignments {
        out.push_str(&format!(
            "{:<10}{:>16.1}{:>12.1}  {:?}\n",
            pilot.pilot_id, pilot.flight_time_minutes, pilot.deviation, pilot.pairing_ids
        ));
    }
    out.push_str(&format!(
        "\ncost={:.3} coverage={}/{} jumps={} valid={}\n",
        report.global_cost, report.pairs_covered, report.pairs_total, report.jumps, report.valid
    ));
    out
}
