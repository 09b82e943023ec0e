use anyhow::Result;
use clap::Parser;
use menagerie_core::config::AppConfig;
use menagerie_core::metrics::init_logging;
use menagerie_lib::report;
use menagerie_lib::runner::{run_headless, run_realtime};
use menagerie_lib::Simulation;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a save file instead of fresh founders
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final population here (.json, .gz or .rkyv)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Import a gene pool before running
    #[arg(long)]
    import: Option<PathBuf>,

    /// Export the final population as a gene pool
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the family tree of the newest individual
    #[arg(long)]
    family_tree: bool,

    /// Write the full ancestry graph as Graphviz DOT
    #[arg(long)]
    family_tree_dot: Option<PathBuf>,

    /// Pace ticks by wall-clock time
    #[arg(long)]
    realtime: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    let mut sim = if args.load.is_some() {
        Simulation::empty(config)?
    } else {
        Simulation::new(config)?
    };

    if let Some(path) = &args.load {
        for warning in sim.load_from(path)? {
            tracing::warn!(%warning, "Load warning");
        }
    }
    if let Some(path) = &args.import {
        let report = sim.import_pool_file(path)?;
        for skipped in &report.skipped {
            tracing::warn!(%skipped, "Import record skipped");
        }
    }

    if args.realtime {
        run_realtime(&mut sim, args.ticks, args.tick_ms).await;
    } else {
        run_headless(&mut sim, args.ticks, args.tick_ms as f64);
    }

    println!("{}", report::population_summary(&sim.population));
    println!(
        "tick {}  population {}  births {}  culls {}  food {}  wall {:.2?}",
        sim.tick,
        sim.population.len(),
        sim.log.births(),
        sim.log.culls(),
        sim.feeding.len(),
        sim.metrics.elapsed()
    );

    if args.family_tree {
        if let Some(newest) = sim.population.iter().max_by_key(|ind| ind.born_at_ms) {
            let tree = sim.ancestry();
            println!("{}", report::family_tree(&tree, &newest.id, 4));
            println!("{}", report::lineage_summary(&tree, &newest.id, 4));
        }
    }
    if let Some(path) = &args.family_tree_dot {
        std::fs::write(path, sim.ancestry().to_dot())?;
        tracing::info!(path = %path.display(), "Ancestry graph written");
    }
    if let Some(path) = &args.save {
        sim.save_to(path)?;
    }
    if let Some(path) = &args.export {
        menagerie_io::exchange::write_pool(&sim.export_pool(&[])?, path)?;
    }

    Ok(())
}
