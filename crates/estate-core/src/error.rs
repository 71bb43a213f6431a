//! Error types for planning, validation and route decoding.

use thiserror::Error;

/// Failures of a single patrol planning call. All are terminal for the given input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatrolError {
    #[error("invalid estate value: width {width}, length {length}")]
    InvalidEstate { width: u32, length: u32 },

    #[error("estate has {plots} plots, more than the {max} that can be planned")]
    TooManyPlots { plots: u64, max: u64 },

    #[error("no trees found in estate")]
    NoTrees,

    #[error("tree at ({x}, {y}) lies outside a {width}x{length} estate")]
    TreeOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        length: u32,
    },
}

/// Rejected estate or tree input, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid value width: {value} (allowed 1..={max})")]
    Width { value: i64, max: u32 },

    #[error("invalid value length: {value} (allowed 1..={max})")]
    Length { value: i64, max: u32 },

    #[error("invalid value area: {width}x{length} exceeds {max} plots")]
    Area { width: u32, length: u32, max: u64 },

    #[error("invalid value height: {value} (allowed {min}..={max})")]
    Height { value: i64, min: u32, max: u32 },

    #[error("invalid value x: {value} (allowed 1..={max})")]
    X { value: i64, max: u32 },

    #[error("invalid value y: {value} (allowed 1..={max})")]
    Y { value: i64, max: u32 },
}

/// A stored route string that does not decode into steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceParseError {
    #[error("record {record}: expected 6 fields, found {found}")]
    FieldCount { record: usize, found: usize },

    #[error("record {record}: invalid {field} '{value}'")]
    InvalidNumber {
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("record {record}: unknown direction code '{code}'")]
    UnknownDirection { record: usize, code: String },
}
