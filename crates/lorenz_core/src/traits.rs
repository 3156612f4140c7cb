use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

use crate::error::CoreError;
use crate::lorenz::{LorenzParameters, Point3};

/// A trait for types that can be used as scalars in the integrator core.
/// Must support basic arithmetic, debug printing, and conversion from f64.
///
/// The steppers assume at least 64-bit precision: the Taylor recurrence
/// produces intermediate coefficients that grow combinatorially with the
/// expansion order, so narrower types overflow much earlier.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Common contract for solvers that advance one phase-space point by a
/// fixed time increment.
///
/// Steppers are interchangeable behind this trait: a driver picks one and
/// calls `step` repeatedly without knowing which algorithm is active.
/// Solver-specific parameters (expansion order, step size) live on the
/// concrete types; the shared Lorenz equation is reachable from every
/// stepper built against it.
pub trait Stepper<T: Scalar> {
    /// Advances `point` by one step. Pure given the current parameters;
    /// the caller keeps ownership of its trajectory.
    ///
    /// NaN or infinite components propagate through the arithmetic
    /// unchanged. That is the expected numerical-instability signal, not
    /// an error condition.
    fn step(&self, point: Point3<T>) -> Point3<T>;

    /// Current parameters of the shared Lorenz equation.
    fn lorenz_params(&self) -> LorenzParameters<T>;

    /// Replaces all three equation parameters atomically. The change is
    /// visible to every stepper sharing the same equation.
    fn set_lorenz_params(&self, params: LorenzParameters<T>) -> Result<(), CoreError>;
}
