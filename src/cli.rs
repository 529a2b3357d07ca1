//! Command-line surface: global scheduling parameters plus a subcommand
//! selecting which population update rule drives the search.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "crew-rostering", about = "Airline crew rostering via population-based metaheuristics")]
pub struct Cli {
    /// Path to the semicolon-separated pairing file.
    #[arg(long)]
    pub filename: std::path::PathBuf,

    /// Path the rendered report is written to.
    #[arg(long, default_value = "output/Output.txt")]
    pub results: std::path::PathBuf,

    /// First day of the scheduling window, `YYYY-MM-DD`.
    #[arg(long)]
    pub start_date: String,

    /// Last day of the scheduling window, `YYYY-MM-DD`.
    #[arg(long)]
    pub end_date: String,

    /// Number of pilots available to staff the roster.
    #[arg(long, default_value_t = 45)]
    pub pilots: u32,

    /// RNG seed; `-1` draws from system entropy.
    #[arg(long, default_value_t = -1)]
    pub seed: i64,

    /// Number of generations to run.
    #[arg(long, default_value_t = 150)]
    pub generations: u32,

    #[command(subcommand)]
    pub variant: VariantArgs,
}

#[derive(Debug, Subcommand)]
pub enum VariantArgs {
    /// Multi-population Chicken Swarm Optimization.
    MultiCso {
        #[arg(long, default_value_t = 20)]
        chickens: u32,
        #[arg(long, default_value_t = 0.5)]
        fl: f64,
    },
    /// Archimedes Optimization Algorithm.
    Aoa {
        #[arg(long, default_value_t = 20)]
        objects: u32,
        #[arg(long, default_value_t = 2.0)]
        c1: f64,
        #[arg(long, default_value_t = 6.0)]
        c2: f64,
        #[arg(long, default_value_t = 1.0)]
        c3: f64,
        #[arg(long, default_value_t = 0.5)]
        c4: f64,
    },
}

impl Cli {
    pub fn seed(&self) -> Option<u64> {
        if self.seed < 0 {
            None
        } else {
            Some(self.seed as u64)
        }
    }
}
