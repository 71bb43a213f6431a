//! Plan a patrol offline from an estate file or a built-in sample.

use anyhow::{bail, Context};
use clap::Parser;
use estate_cli::{load_layout, report::render_plan, sample_layout};
use estate_core::{plan_patrol, PatrolConfig, PlantingRules, StepDistance};
use std::path::PathBuf;

/// Compute tree statistics and the drone patrol route for an estate
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Estate layout JSON file
    #[arg(long, conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// Built-in layout (strip, grove)
    #[arg(long)]
    sample: Option<String>,

    /// Height kept above each tree top
    #[arg(long, default_value_t = 1)]
    clearance: u32,

    /// Horizontal distance between adjacent plots
    #[arg(long, default_value_t = 10)]
    plot_distance: u32,

    /// Report each step's own leg distance instead of the last vertical move
    #[arg(long)]
    leg_distances: bool,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let layout = match (&args.file, &args.sample) {
        (Some(path), _) => load_layout(path)?,
        (None, Some(name)) => {
            sample_layout(name).with_context(|| format!("unknown sample layout '{}'", name))?
        }
        (None, None) => bail!("either --file or --sample is required"),
    };

    let rules = PlantingRules::default();
    rules.validate_estate(layout.width as i64, layout.length as i64)?;
    for tree in &layout.trees {
        rules.validate_tree(
            layout.dimensions(),
            tree.x as i64,
            tree.y as i64,
            tree.height as i64,
        )?;
    }

    let config = PatrolConfig {
        monitor_clearance: args.clearance,
        plot_distance: args.plot_distance,
        step_distance: if args.leg_distances {
            StepDistance::Leg
        } else {
            StepDistance::CarryVertical
        },
        ..PatrolConfig::default()
    };
    let plan = plan_patrol(layout.dimensions(), &layout.trees, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Estate {}x{}", layout.width, layout.length);
        print!("{}", render_plan(&plan));
        println!("route: {}", plan.encoded_route());
    }
    Ok(())
}
