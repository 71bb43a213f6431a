//! Plain-text rendering of a patrol plan.

use estate_core::PatrolPlan;
use std::fmt::Write;

/// Summary lines followed by one row per step.
pub fn render_plan(plan: &PatrolPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "trees: {}  min: {}  max: {}  median: {}",
        plan.tree_count, plan.stats.min, plan.stats.max, plan.stats.median
    );
    let _ = writeln!(
        out,
        "distance: {} (traced {}, final descent {})",
        plan.total_distance,
        plan.traced_distance(),
        plan.final_descent
    );
    let _ = writeln!(
        out,
        "{:>6} {:>6} {:>6} {:>4} {:>8} {:>10}",
        "step", "x", "y", "dir", "dist", "total"
    );
    for step in &plan.steps {
        let _ = writeln!(
            out,
            "{:>6} {:>6} {:>6} {:>4} {:>8} {:>10}",
            step.number, step.x, step.y, step.direction, step.distance, step.cumulative
        );
    }
    out
}
