//! Headless trainer: evolves cars on a track file and prints one line per
//! generation.
//!
//! Usage:
//!   cargo run --release -- --track tracks/track3.json
//!   RUST_LOG=trackevo=debug cargo run --release -- --track t.json --params p.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use trackevo::simulation::params::Params;
use trackevo::simulation::track;
use trackevo::simulation::trainer::Trainer;

#[derive(Parser)]
#[command(name = "trackevo")]
#[command(about = "Evolve neural-network cars that drive around a track")]
struct Args {
    /// JSON track file (list of {x, y, angle, width, height} segments)
    #[arg(long)]
    track: PathBuf,
    /// JSON parameter file; missing fields use the defaults
    #[arg(long)]
    params: Option<PathBuf>,
    /// Number of generations to run (defaults to `num_generations`)
    #[arg(long)]
    generations: Option<u32>,
    /// Seed for the random source
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let params = match &args.params {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?,
        None => Params::default(),
    };
    let descriptors = track::load_descriptors(&args.track)?;

    let mut trainer = Trainer::new(&params, &descriptors, args.seed)?;
    let generations = args.generations.unwrap_or(params.num_generations);

    println!("Evolving {} cars for {} generations", params.pop_size, generations);

    for _ in 0..generations {
        let summary = trainer.run_generation()?;
        println!(
            "gen {:>4} | ticks {:>6} | fitness {:>7.3} (mean {:>6.3}) | distance {:>8.1} | speed {:>5.2} | turn {:>5.2}",
            summary.generation,
            summary.ticks,
            summary.best_fitness,
            summary.mean_fitness,
            summary.best_distance,
            summary.best_speed,
            summary.best_angular_velocity,
        );
    }

    Ok(())
}
