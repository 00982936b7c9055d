use std::io::{self, BufReader};

use anyhow::Result;
use clap::Parser;
use cute_atm::{atm_shell::Service, credential::RngPinGenerator};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Interactive in-memory ATM. All state is lost on exit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for PIN generation, makes issued PINs reproducible
    #[arg(long)]
    seed: Option<u64>,

    /// Print a CSV summary of every account on exit
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    // logs go to stderr so they never mix with the menu
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let pins = match args.seed {
        Some(seed) => {
            info!(seed, "using seeded PIN generator");
            RngPinGenerator::seeded(seed)
        }
        None => RngPinGenerator::from_entropy(),
    };

    let service = Service {
        input: BufReader::new(io::stdin()),
        output: &mut io::stdout(),
        pins,
        summary: args.summary,
    };
    service.run()
}
