use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodebookError>;

/// Errors from LPC/LBG estimation. The caller is expected to treat these
/// as "skip this training vector" or "skip this sample", never as a
/// process-fatal condition.
#[derive(Debug, Error)]
pub enum CodebookError {
    /// The autocorrelation matrix was singular or numerically degenerate.
    #[error("autocorrelation matrix is singular or ill-conditioned")]
    SingularMatrix,

    /// A reflection-coefficient conversion divided by zero.
    #[error("reflection coefficient conversion hit a zero divisor")]
    ZeroDivisor,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Aiff(#[from] aiff::AiffError),

    #[error(transparent)]
    Adpcm(#[from] adpcm::AdpcmError),
}
