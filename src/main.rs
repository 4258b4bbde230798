//! locator-map: command-line entrypoint
//!
//! Parses arguments, renders the requested map and prints a short report.

use anyhow::Result;
use clap::Parser;
use locator_map::{run, Args};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let start_time = Instant::now();
    let outcome = run(&args)?;

    if let Some(stats) = outcome.clusters {
        println!("\n=== Cluster Statistics ===");
        println!("Points: {}", stats.points);
        println!("Markers: {}", stats.clusters);
        println!("Largest cluster: {} points", stats.largest);
    }

    println!(
        "\n✓ Map saved to: {} ({}x{} px)",
        outcome.path.display(),
        outcome.width_px,
        outcome.height_px
    );
    if args.verbose {
        println!("  Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(())
}
