//! Headless session wiring for a trajectory driver.
//!
//! A visualization or driver layer owns exactly one of these per run: it
//! holds the single shared Lorenz equation, one stepper of each kind built
//! against it, and the append-only trajectory buffer the driver renders
//! from. The driver ticks `advance` (once, or ten times for a fast-forward
//! control) and may pause by simply not calling it; the session itself has
//! no timers and no notion of suspension.

use anyhow::{Context, Result};

use crate::error::CoreError;
use crate::lorenz::{LorenzField, LorenzParameters, Point3, SharedField};
use crate::solvers::{Rk4Parameters, Rk4Stepper, TaylorParameters, TaylorStepper};
use crate::traits::{Scalar, Stepper};

/// The solvers a session can drive, selectable by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverChoice {
    Taylor,
    RungeKutta,
}

impl SolverChoice {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "Taylor" => Ok(Self::Taylor),
            "Runge-Kutta" => Ok(Self::RungeKutta),
            other => Err(CoreError::UnknownSolver(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Taylor => "Taylor",
            Self::RungeKutta => "Runge-Kutta",
        }
    }
}

/// One running integration session: a shared equation, both steppers, and
/// the trajectory computed so far.
pub struct Session<T: Scalar> {
    field: SharedField<T>,
    taylor: TaylorStepper<T>,
    runge_kutta: Rk4Stepper<T>,
    active: SolverChoice,
    begin: Point3<T>,
    trajectory: Vec<Point3<T>>,
}

impl<T: Scalar> Session<T> {
    /// Builds a session around a default equation (sigma = 10, rho = 28,
    /// beta = 8/3) with both steppers referencing that same equation.
    /// The Taylor stepper starts active.
    pub fn new(begin: Point3<T>) -> Self {
        let field = LorenzField::default().into_shared();
        Self {
            taylor: TaylorStepper::new(field.clone()),
            runge_kutta: Rk4Stepper::new(field.clone()),
            field,
            active: SolverChoice::Taylor,
            begin,
            trajectory: vec![begin],
        }
    }

    pub fn active_solver(&self) -> SolverChoice {
        self.active
    }

    /// Switches the active stepper by display name. Both steppers keep
    /// observing the same equation, so switching never loses parameter
    /// edits made while the other was active.
    pub fn select_solver(&mut self, name: &str) -> Result<()> {
        self.active = SolverChoice::from_name(name).context("Failed to select solver.")?;
        Ok(())
    }

    /// Appends `count` step results to the trajectory, each computed from
    /// the previously appended point, and returns the new last point.
    pub fn advance(&mut self, count: usize) -> Point3<T> {
        for _ in 0..count {
            let next = match self.active {
                SolverChoice::Taylor => self.taylor.step(self.last()),
                SolverChoice::RungeKutta => self.runge_kutta.step(self.last()),
            };
            self.trajectory.push(next);
        }
        self.last()
    }

    pub fn last(&self) -> Point3<T> {
        // The buffer always holds at least the initial point.
        *self.trajectory.last().expect("trajectory is never empty")
    }

    pub fn trajectory(&self) -> &[Point3<T>] {
        &self.trajectory
    }

    pub fn initial_point(&self) -> Point3<T> {
        self.begin
    }

    /// Restarts the trajectory from a new initial point. Solver and
    /// equation parameters are untouched.
    pub fn set_initial_point(&mut self, begin: Point3<T>) {
        self.begin = begin;
        self.trajectory.clear();
        self.trajectory.push(begin);
    }

    pub fn lorenz_params(&self) -> LorenzParameters<T> {
        self.field.borrow().params()
    }

    /// Applies an equation-parameter form submission. All three scalars
    /// are replaced at once; a rejected submission changes nothing.
    pub fn set_lorenz_params(&mut self, params: LorenzParameters<T>) -> Result<()> {
        self.field
            .borrow_mut()
            .set_params(params)
            .context("Failed to update Lorenz equation parameters.")?;
        Ok(())
    }

    pub fn taylor_params(&self) -> TaylorParameters<T> {
        self.taylor.solver_params()
    }

    pub fn set_taylor_params(&mut self, params: TaylorParameters<T>) -> Result<()> {
        self.taylor
            .set_solver_params(params)
            .context("Failed to update Taylor solver parameters.")?;
        Ok(())
    }

    pub fn rk4_params(&self) -> Rk4Parameters<T> {
        self.runge_kutta.solver_params()
    }

    pub fn set_rk4_params(&mut self, params: Rk4Parameters<T>) -> Result<()> {
        self.runge_kutta
            .set_solver_params(params)
            .context("Failed to update Runge-Kutta solver parameters.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SolverChoice};
    use crate::lorenz::{LorenzParameters, Point3};
    use crate::solvers::TaylorParameters;

    fn session() -> Session<f64> {
        Session::new(Point3::new(1.0, 1.0, 1.0))
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn new_session_starts_with_taylor_and_the_initial_point() {
        let s = session();
        assert_eq!(s.active_solver(), SolverChoice::Taylor);
        assert_eq!(s.trajectory().len(), 1);
        assert_eq!(s.last(), Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn advance_appends_one_point_per_step() {
        let mut s = session();
        let last = s.advance(10);
        assert_eq!(s.trajectory().len(), 11);
        assert_eq!(s.last(), last);
        assert!(last.is_finite());
    }

    #[test]
    fn advance_zero_is_a_no_op() {
        let mut s = session();
        let last = s.advance(0);
        assert_eq!(s.trajectory().len(), 1);
        assert_eq!(last, s.initial_point());
    }

    #[test]
    fn select_solver_accepts_both_display_names() {
        let mut s = session();
        s.select_solver("Runge-Kutta").expect("known solver");
        assert_eq!(s.active_solver(), SolverChoice::RungeKutta);
        s.select_solver("Taylor").expect("known solver");
        assert_eq!(s.active_solver(), SolverChoice::Taylor);
    }

    #[test]
    fn select_solver_rejects_unknown_names() {
        let mut s = session();
        assert_err_contains(s.select_solver("Euler"), "unknown solver");
        assert_eq!(s.active_solver(), SolverChoice::Taylor);
    }

    #[test]
    fn solver_switch_does_not_reset_the_trajectory() {
        let mut s = session();
        s.advance(5);
        s.select_solver("Runge-Kutta").expect("known solver");
        assert_eq!(s.trajectory().len(), 6);
        s.advance(5);
        assert_eq!(s.trajectory().len(), 11);
    }

    #[test]
    fn set_initial_point_resets_the_buffer_but_not_the_parameters() {
        let mut s = session();
        s.set_taylor_params(TaylorParameters {
            order: 6,
            time_step: 0.005,
        })
        .expect("valid parameters");
        s.advance(4);

        s.set_initial_point(Point3::new(0.5, 0.5, 0.5));

        assert_eq!(s.trajectory().len(), 1);
        assert_eq!(s.last(), Point3::new(0.5, 0.5, 0.5));
        assert_eq!(s.taylor_params().order, 6);
        assert_eq!(s.taylor_params().time_step, 0.005);
    }

    #[test]
    fn equation_edits_are_visible_regardless_of_active_solver() {
        let mut s = session();
        s.set_lorenz_params(LorenzParameters::new(14.0, 28.0, 8.0 / 3.0))
            .expect("finite parameters");
        s.select_solver("Runge-Kutta").expect("known solver");
        assert_eq!(s.lorenz_params().sigma, 14.0);
    }

    #[test]
    fn rejected_parameter_forms_change_nothing() {
        let mut s = session();
        let before = s.lorenz_params();

        assert_err_contains(
            s.set_lorenz_params(LorenzParameters::new(f64::NAN, 28.0, 8.0 / 3.0)),
            "invalid parameter",
        );
        assert_eq!(s.lorenz_params(), before);

        assert_err_contains(
            s.set_taylor_params(TaylorParameters {
                order: 1,
                time_step: 0.01,
            }),
            "at least 2",
        );
        assert_eq!(s.taylor_params().order, 4);
    }

    #[test]
    fn both_steppers_drive_the_same_equation_instance() {
        let mut s = session();
        s.advance(1);
        let with_default_sigma = s.last();

        s.set_initial_point(Point3::new(1.0, 1.0, 1.0));
        s.set_lorenz_params(LorenzParameters::new(5.0, 28.0, 8.0 / 3.0))
            .expect("finite parameters");
        s.select_solver("Runge-Kutta").expect("known solver");
        s.advance(1);

        // A different sigma must produce a different step result even
        // though the edit happened before the solver switch.
        assert!((s.last().x - with_default_sigma.x).abs() > 1e-6);
    }
}
