//! Route trace encoding, decoding and battery-limited rest position.
//!
//! A route is stored as `step,x,y,direction,distance,cumulative;` per leg.

use crate::error::TraceParseError;
use crate::models::{EstateDimensions, PlotPosition};
use crate::patrol::{Direction, Step};
use std::fmt::Write;

pub fn encode_route(steps: &[Step]) -> String {
    let mut out = String::with_capacity(steps.len() * 16);
    for step in steps {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "{},{},{},{},{},{};",
            step.number, step.x, step.y, step.direction, step.distance, step.cumulative
        );
    }
    out
}

pub fn decode_route(route: &str) -> Result<Vec<Step>, TraceParseError> {
    route
        .split(';')
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .enumerate()
        .map(|(i, record)| decode_step(i + 1, record))
        .collect()
}

fn decode_step(record: usize, raw: &str) -> Result<Step, TraceParseError> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if fields.len() != 6 {
        return Err(TraceParseError::FieldCount {
            record,
            found: fields.len(),
        });
    }

    let direction =
        Direction::from_code(fields[3]).ok_or_else(|| TraceParseError::UnknownDirection {
            record,
            code: fields[3].to_string(),
        })?;

    Ok(Step {
        number: number(record, "step", fields[0])?,
        x: number(record, "x", fields[1])?,
        y: number(record, "y", fields[2])?,
        direction,
        distance: number(record, "distance", fields[4])?,
        cumulative: number(record, "cumulative", fields[5])?,
    })
}

fn number<T: std::str::FromStr>(
    record: usize,
    field: &'static str,
    value: &str,
) -> Result<T, TraceParseError> {
    value.parse().map_err(|_| TraceParseError::InvalidNumber {
        record,
        field,
        value: value.to_string(),
    })
}

/// Plot where the drone stops when its battery allows only `max_distance`.
///
/// With enough range it finishes the scan. Otherwise it rests at the last leg
/// reachable within range, or at the start plot when none is.
pub fn rest_position(
    steps: &[Step],
    dimensions: EstateDimensions,
    total_distance: u64,
    max_distance: u64,
) -> PlotPosition {
    if max_distance >= total_distance {
        return dimensions.final_plot();
    }

    let mut rest = PlotPosition { x: 1, y: 1 };
    for step in steps {
        if step.cumulative > max_distance {
            break;
        }
        rest = PlotPosition { x: step.x, y: step.y };
        if step.cumulative == max_distance {
            break;
        }
    }
    rest
}
