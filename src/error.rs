//! Error type shared by the problem model and the solver.

use thiserror::Error;

/// Errors raised while building or solving a routing problem.
///
/// Validation failures are reported eagerly by the mutating call that
/// caused them; feasibility can only be judged on the assembled model and is
/// reported by [`Input::solve`](crate::input::Input::solve).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An amount vector length disagrees with the model's dimension.
    #[error("amount dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension fixed by the first job or vehicle.
        expected: usize,
        /// Dimension of the rejected amount.
        found: usize,
    },
    /// The cost matrix is not square or too small for a referenced location.
    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),
    /// An accessor was given an index beyond the catalog or matrix bounds.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Size of the indexed collection.
        len: usize,
    },
    /// `solve` was called without any job.
    #[error("no job to route")]
    EmptyProblem,
    /// No assignment can satisfy every job.
    #[error("infeasible problem: {0}")]
    InfeasibleProblem(String),
    /// `solve` was called without any vehicle.
    #[error("no vehicle available")]
    NoVehicle,
    /// A cost matrix has already been installed.
    #[error("cost matrix already set")]
    MatrixAlreadySet,
    /// Neither a matrix nor a provider is available.
    #[error("no cost matrix set and no provider to compute one")]
    MissingMatrix,
    /// The model is frozen once solving began.
    #[error("problem model is frozen")]
    ModelFrozen,
    /// A model instance can be solved once.
    #[error("problem model was already solved")]
    AlreadySolved,
    /// A job or vehicle id was registered twice.
    #[error("duplicate {kind} id {id}")]
    DuplicateId {
        /// "job" or "vehicle".
        kind: &'static str,
        /// Offending id.
        id: u64,
    },
    /// A provider needed coordinates for a location that has none.
    #[error("location {0} has no coordinates")]
    MissingCoordinates(usize),
    /// Route costs could exceed the range used for move gains.
    #[error("cost upper bound {0} is too large")]
    CostOverflow(u128),
    /// Summed job amounts leave the `i64` range in the given dimension.
    #[error("job amounts overflow in dimension {0}")]
    AmountOverflow(usize),
    /// `solve` needs at least one worker thread.
    #[error("thread count must be at least 1")]
    InvalidThreadCount,
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
