use std::cell::RefCell;
use std::ops::{Add, Mul};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::traits::Scalar;

/// A point in the three-dimensional phase space of the Lorenz system.
///
/// Immutable value type: steppers consume one and produce a new one, so a
/// caller's trajectory history is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3<T: Scalar> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Scalar> Point3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// True when all three components are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl<T: Scalar> From<[T; 3]> for Point3<T> {
    fn from(c: [T; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl<T: Scalar> From<Point3<T>> for [T; 3] {
    fn from(p: Point3<T>) -> Self {
        [p.x, p.y, p.z]
    }
}

impl<T: Scalar> Add for Point3<T> {
    type Output = Point3<T>;

    fn add(self, rhs: Point3<T>) -> Point3<T> {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Scalar> Mul<T> for Point3<T> {
    type Output = Point3<T>;

    fn mul(self, rhs: T) -> Point3<T> {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// The three scalars of the Lorenz equation. All must be finite; there is
/// no other range restriction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LorenzParameters<T: Scalar> {
    pub sigma: T,
    pub rho: T,
    pub beta: T,
}

impl<T: Scalar> LorenzParameters<T> {
    pub fn new(sigma: T, rho: T, beta: T) -> Self {
        Self { sigma, rho, beta }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.sigma.is_finite() && self.rho.is_finite() && self.beta.is_finite()) {
            return Err(CoreError::InvalidParameter(format!(
                "Lorenz parameters must be finite, got sigma = {:?}, rho = {:?}, beta = {:?}",
                self.sigma, self.rho, self.beta
            )));
        }
        Ok(())
    }
}

/// Classical chaotic regime: sigma = 10, rho = 28, beta = 8/3.
impl<T: Scalar> Default for LorenzParameters<T> {
    fn default() -> Self {
        Self {
            sigma: T::from_f64(10.0).unwrap(),
            rho: T::from_f64(28.0).unwrap(),
            beta: T::from_f64(8.0 / 3.0).unwrap(),
        }
    }
}

/// The right-hand side of the Lorenz system:
///
/// dx/dt = sigma * (y - x)
/// dy/dt = x * (rho - z) - y
/// dz/dt = x * y - beta * z
#[derive(Debug, Clone)]
pub struct LorenzField<T: Scalar> {
    params: LorenzParameters<T>,
}

impl<T: Scalar> Default for LorenzField<T> {
    fn default() -> Self {
        Self {
            params: LorenzParameters::default(),
        }
    }
}

impl<T: Scalar> LorenzField<T> {
    pub fn new(params: LorenzParameters<T>) -> Result<Self, CoreError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Evaluates the vector field at `point`. Pure; no failure modes for
    /// finite inputs, and NaN/infinity inputs propagate per IEEE 754.
    pub fn evaluate(&self, point: Point3<T>) -> Point3<T> {
        let p = &self.params;
        Point3::new(
            p.sigma * (point.y - point.x),
            point.x * (p.rho - point.z) - point.y,
            point.x * point.y - p.beta * point.z,
        )
    }

    pub fn params(&self) -> LorenzParameters<T> {
        self.params
    }

    /// Replaces all three scalars atomically. Rejects non-finite values
    /// and leaves the previous parameters in place when it does.
    pub fn set_params(&mut self, params: LorenzParameters<T>) -> Result<(), CoreError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Wraps the field for sharing between steppers.
    pub fn into_shared(self) -> SharedField<T> {
        Rc::new(RefCell::new(self))
    }
}

/// One equation, many steppers: every stepper in a session holds a handle
/// to the same field, so a parameter change through any of them is visible
/// to all. Single-threaded by design; `RefCell` serializes the writes.
pub type SharedField<T> = Rc<RefCell<LorenzField<T>>>;
