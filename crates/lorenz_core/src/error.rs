use thiserror::Error;

/// Errors surfaced synchronously at the parameter-setting boundary.
///
/// Floating-point overflow and NaN inside `step` are deliberately not
/// represented here; they propagate through the computation so a caller
/// can detect instability in the output. Point arity cannot mismatch at
/// runtime: `Point3` fixes it in the type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A caller supplied an out-of-domain parameter: expansion order
    /// below 2, non-positive time step, or a non-finite equation scalar.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A solver was requested under a name the session does not know.
    #[error("unknown solver: {0}")]
    UnknownSolver(String),
}
