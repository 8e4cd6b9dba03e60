use thiserror::Error;

/// Array shapes that do not fit the operation they were handed to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("sample shape {found:?} does not match the feature shape {expected:?}")]
    Mismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("batch has no leading batch axis")]
    MissingBatchAxis,

    #[error("expected an array of rank >= {min}, got rank {found}")]
    Rank { min: usize, found: usize },

    #[error("reducing the channel axis of a rank-{found} array does not leave a 2-D map")]
    NotAMap { found: usize },

    #[error("cannot resample an empty {height}x{width} map")]
    EmptyMap { height: usize, width: usize },

    #[error("target shape must be two positive integers, got {found:?}")]
    TargetShape { found: Vec<usize> },

    #[error("snapshot field `{field}` has shape {found:?}, expected {expected:?}")]
    Inconsistent {
        field: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

/// Accessors called before the estimator has seen enough samples, or state
/// that breaks the counting invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("`{operation}` needs at least {required} sample(s), {seen} seen")]
    NotEnoughSamples {
        operation: &'static str,
        required: u64,
        seen: u64,
    },

    #[error("nonzero count {count} exceeds sample count {samples}")]
    CountExceedsSamples { count: u64, samples: u64 },

    #[error("snapshot with {samples} sample(s) is missing `{field}`")]
    IncompleteSnapshot { field: &'static str, samples: u64 },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
