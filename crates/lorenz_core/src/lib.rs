pub mod error;
pub mod lorenz;
pub mod session;
/// The `lorenz_core` crate computes successive points on trajectories of
/// the Lorenz system with two interchangeable fixed-step integrators.
/// It is generic over the scalar type (`f64` is the intended default) and
/// carries no I/O: a visualization or driver layer consumes it through
/// the `Stepper` contract and the `Session` wiring.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `Stepper` (the common step contract).
/// - **Lorenz**: `Point3`, `LorenzParameters`, and the `LorenzField` vector-field evaluator.
/// - **Solvers**: a configurable-order Taylor-series stepper built on a
///   Cauchy-product recurrence, and the classic Runge-Kutta 4th order stepper.
/// - **Session**: one shared equation, both steppers, and the trajectory buffer a driver renders from.
pub mod solvers;
pub mod traits;
