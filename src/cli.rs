//! CLI argument parsing for the eld-planner-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "eld-planner-worker", about = "ELD trip planner and HOS log worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a single trip and print the result as JSON
    Plan {
        /// Driver's current location
        #[arg(long)]
        current: String,
        /// Pickup address
        #[arg(long)]
        pickup: String,
        /// Dropoff address
        #[arg(long)]
        dropoff: String,
        /// Hours already used in the current cycle
        #[arg(long, default_value_t = 0.0)]
        cycle_used: f64,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}
