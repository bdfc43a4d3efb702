/// Error types for the dependable-yield core
use thiserror::Error;

/// Errors raised by the core series operations.
///
/// Missing observations are never reported here; they travel through the
/// data as `None` values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum YieldError {
    /// Percentile outside `[0, 1]` (or NaN)
    #[error("Invalid percentile {0}: must lie within [0, 1]")]
    InvalidPercentile(f64),

    /// A requested column is absent, has the wrong length, or none were requested
    #[error("Column mismatch in {table}: {detail}")]
    ColumnMismatch { table: String, detail: String },

    /// Threshold list is not strictly increasing
    #[error("Thresholds must be strictly increasing: {previous} is followed by {next} at position {position}")]
    NonMonotonicThresholds {
        position: usize,
        previous: f64,
        next: f64,
    },

    /// Series dates are unordered or dates and values disagree in length
    #[error("Malformed series {name}: {detail}")]
    MalformedSeries { name: String, detail: String },

    /// Two tables being combined do not share a date axis
    #[error("Date axis of {name} does not match the other junctions")]
    AxisMismatch { name: String },
}

/// Type alias for Results using YieldError
pub type Result<T> = std::result::Result<T, YieldError>;
