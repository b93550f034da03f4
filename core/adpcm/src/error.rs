use thiserror::Error;

/// Result type alias for ADPCM codec operations.
pub type Result<T> = std::result::Result<T, AdpcmError>;

/// Errors raised while building or applying a predictor table.
#[derive(Debug, Error)]
pub enum AdpcmError {
    /// The raw coefficient values read from a codebook chunk don't match
    /// `npredictors * order * 8`, the count `order`/`npredictors` imply.
    #[error("codebook has {actual} raw coefficients, expected {expected} for order {order} and {npredictors} predictors")]
    RawTableSizeMismatch {
        expected: usize,
        actual: usize,
        order: usize,
        npredictors: usize,
    },

    /// `order` or `npredictors` were zero or otherwise unusable.
    #[error("invalid codebook shape: order={order}, npredictors={npredictors}")]
    InvalidShape { order: usize, npredictors: usize },
}

impl AdpcmError {
    pub fn raw_table_size_mismatch(expected: usize, actual: usize, order: usize, npredictors: usize) -> Self {
        AdpcmError::RawTableSizeMismatch {
            expected,
            actual,
            order,
            npredictors,
        }
    }
}
