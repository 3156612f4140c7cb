use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lorenz::{LorenzParameters, Point3, SharedField};
use crate::traits::{Scalar, Stepper};

/// Parameters of the Taylor-series stepper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaylorParameters<T: Scalar> {
    /// Truncation order of the expansion. Must be at least 2; order 2
    /// degenerates to an Euler-like step, which is allowed.
    pub order: usize,
    /// Fixed step size. Must be positive and finite.
    pub time_step: T,
}

impl<T: Scalar> Default for TaylorParameters<T> {
    fn default() -> Self {
        Self {
            order: 4,
            time_step: T::from_f64(0.01).unwrap(),
        }
    }
}

impl<T: Scalar> TaylorParameters<T> {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.order < 2 {
            return Err(CoreError::InvalidParameter(format!(
                "Taylor order must be at least 2, got {}",
                self.order
            )));
        }
        validate_time_step(self.time_step)
    }
}

/// Parameters of the Runge-Kutta stepper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rk4Parameters<T: Scalar> {
    /// Fixed step size. Must be positive and finite.
    pub time_step: T,
}

impl<T: Scalar> Default for Rk4Parameters<T> {
    fn default() -> Self {
        Self {
            time_step: T::from_f64(0.01).unwrap(),
        }
    }
}

impl<T: Scalar> Rk4Parameters<T> {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_time_step(self.time_step)
    }
}

fn validate_time_step<T: Scalar>(time_step: T) -> Result<(), CoreError> {
    if !time_step.is_finite() || time_step <= T::zero() {
        return Err(CoreError::InvalidParameter(format!(
            "time_step must be positive and finite, got {time_step:?}"
        )));
    }
    Ok(())
}

/// Taylor-series stepper for the Lorenz flow.
///
/// Advances a point by one fixed step using an order-N truncated Taylor
/// expansion of the solution. The higher derivatives are never formed
/// symbolically: the linear terms of the equation act directly on each
/// Taylor coefficient, and the quadratic terms (x*z and x*y) are obtained
/// as Cauchy products of the coefficient sequences computed so far. One
/// step costs O(order^2) multiplications.
///
/// Larger orders need proportionally smaller time steps: the intermediate
/// derivative coefficients of the quadratic terms grow combinatorially
/// before the factorial division brings them back down, so order >> 10
/// with an unreduced step risks overflow or severe cancellation even at
/// f64 width.
pub struct TaylorStepper<T: Scalar> {
    field: SharedField<T>,
    params: TaylorParameters<T>,
}

impl<T: Scalar> TaylorStepper<T> {
    /// Builds a stepper with default parameters (order 4, step 0.01)
    /// against the given shared equation.
    pub fn new(field: SharedField<T>) -> Self {
        Self {
            field,
            params: TaylorParameters::default(),
        }
    }

    pub fn with_params(
        field: SharedField<T>,
        params: TaylorParameters<T>,
    ) -> Result<Self, CoreError> {
        params.validate()?;
        Ok(Self { field, params })
    }

    pub fn solver_params(&self) -> TaylorParameters<T> {
        self.params
    }

    /// Replaces both solver parameters atomically; invalid input leaves
    /// the previous parameters in place.
    pub fn set_solver_params(&mut self, params: TaylorParameters<T>) -> Result<(), CoreError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

impl<T: Scalar> Stepper<T> for TaylorStepper<T> {
    fn step(&self, point: Point3<T>) -> Point3<T> {
        let order = self.params.order;
        let h = self.params.time_step;
        let field = self.field.borrow();
        let p = field.params();

        // Transient coefficient table, rebuilt on every call. ax[i] is the
        // coefficient of t^i in the series for x(t), likewise ay and az.
        let mut ax = vec![T::zero(); order];
        let mut ay = vec![T::zero(); order];
        let mut az = vec![T::zero(); order];

        ax[0] = point.x;
        ay[0] = point.y;
        az[0] = point.z;

        let d0 = field.evaluate(point);
        ax[1] = d0.x;
        ay[1] = d0.y;
        az[1] = d0.z;

        for i in 1..order - 1 {
            // Linear terms of the equation applied to the i-th coefficient.
            let dx = p.sigma * (ay[i] - ax[i]);
            let mut dy = p.rho * ax[i] - ay[i];
            let mut dz = -(p.beta * az[i]);

            // Coefficient of t^i in the products x*z and x*y, as the
            // Cauchy product of the series computed so far.
            for j in 0..=i {
                dy = dy - ax[i - j] * az[j];
                dz = dz + ax[i - j] * ay[j];
            }

            // Incremental factorial division turns the (i+1)-th derivative
            // into the (i+1)-th Taylor coefficient.
            let scale = T::from_usize(i + 1).unwrap();
            ax[i + 1] = dx / scale;
            ay[i + 1] = dy / scale;
            az[i + 1] = dz / scale;
        }

        // Horner evaluation of the truncated series at t = h.
        let mut result = Point3::new(ax[order - 1], ay[order - 1], az[order - 1]);
        for i in (0..order - 1).rev() {
            result = result * h + Point3::new(ax[i], ay[i], az[i]);
        }
        result
    }

    fn lorenz_params(&self) -> LorenzParameters<T> {
        self.field.borrow().params()
    }

    fn set_lorenz_params(&self, params: LorenzParameters<T>) -> Result<(), CoreError> {
        self.field.borrow_mut().set_params(params)
    }
}

/// Classic Runge-Kutta 4th order stepper for the Lorenz flow.
pub struct Rk4Stepper<T: Scalar> {
    field: SharedField<T>,
    params: Rk4Parameters<T>,
}

impl<T: Scalar> Rk4Stepper<T> {
    /// Builds a stepper with the default step 0.01 against the given
    /// shared equation.
    pub fn new(field: SharedField<T>) -> Self {
        Self {
            field,
            params: Rk4Parameters::default(),
        }
    }

    pub fn with_params(field: SharedField<T>, params: Rk4Parameters<T>) -> Result<Self, CoreError> {
        params.validate()?;
        Ok(Self { field, params })
    }

    pub fn solver_params(&self) -> Rk4Parameters<T> {
        self.params
    }

    pub fn set_solver_params(&mut self, params: Rk4Parameters<T>) -> Result<(), CoreError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

impl<T: Scalar> Stepper<T> for Rk4Stepper<T> {
    fn step(&self, point: Point3<T>) -> Point3<T> {
        let h = self.params.time_step;
        let field = self.field.borrow();

        let half = T::from_f64(0.5).unwrap();
        let sixth = T::from_f64(1.0 / 6.0).unwrap();
        let two = T::from_f64(2.0).unwrap();

        // k1 = f(y)
        let k1 = field.evaluate(point);
        // k2 = f(y + h*k1/2)
        let k2 = field.evaluate(point + k1 * (h * half));
        // k3 = f(y + h*k2/2)
        let k3 = field.evaluate(point + k2 * (h * half));
        // k4 = f(y + h*k3)
        let k4 = field.evaluate(point + k3 * h);

        // y_next = y + h/6 * (k1 + 2k2 + 2k3 + k4)
        point + (k1 + k2 * two + k3 * two + k4) * (h * sixth)
    }

    fn lorenz_params(&self) -> LorenzParameters<T> {
        self.field.borrow().params()
    }

    fn set_lorenz_params(&self, params: LorenzParameters<T>) -> Result<(), CoreError> {
        self.field.borrow_mut().set_params(params)
    }
}
