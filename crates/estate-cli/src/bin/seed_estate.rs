//! Seed a running estate server from a layout file.

use anyhow::{bail, Context};
use clap::Parser;
use estate_cli::{load_layout, sample_layout};
use estate_sdk::EstateClient;
use std::path::PathBuf;

/// Create an estate on the server, plant its trees, and print the drone plan
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Estate server URL
    #[arg(long, default_value = "http://localhost:1323")]
    url: String,

    /// Estate layout JSON file
    #[arg(long, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// Built-in layout (strip, grove)
    #[arg(long)]
    sample: Option<String>,

    /// Drone range; prints where the drone comes to rest
    #[arg(long)]
    max_distance: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let layout = match (&args.file, &args.sample) {
        (Some(path), _) => load_layout(path)?,
        (None, Some(name)) => {
            sample_layout(name).with_context(|| format!("unknown sample layout '{}'", name))?
        }
        (None, None) => bail!("either --file or --sample is required"),
    };

    println!("Connecting to estate server at {}...", args.url);
    let client = EstateClient::new(&args.url);

    let estate_id = client
        .create_estate(layout.width, layout.length)
        .await
        .context("failed to create estate")?;
    println!("Created estate {} ({}x{})", estate_id, layout.width, layout.length);

    let mut planted = 0;
    for tree in &layout.trees {
        match client.plant_tree(&estate_id, tree.x, tree.y, tree.height).await {
            Ok(_) => planted += 1,
            Err(e) => eprintln!(
                "Failed to plant tree at ({}, {}) height {}: {}",
                tree.x, tree.y, tree.height, e
            ),
        }
    }
    println!("Planted {}/{} trees", planted, layout.trees.len());

    let stats = client.stats(&estate_id).await?;
    println!(
        "Stats: count={} min={} max={} median={}",
        stats.count, stats.min, stats.max, stats.median
    );

    let plan = client.drone_plan(&estate_id, args.max_distance).await?;
    println!("Patrol distance: {}", plan.distance);
    if let Some(rest) = plan.rest {
        println!("Drone rests at ({}, {})", rest.x, rest.y);
    }
    Ok(())
}
