// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gradient estimation over an energy function.
//!
//! Two schemes are supported:
//!
//! - **Parameter shift**: `(E(θ + s·eᵢ) − E(θ − s·eᵢ)) / (2 sin s)`, exact for
//!   rotation gates generated by Pauli operators when `s = π/2`
//! - **Finite difference**: central difference with step `ε`
//!
//! Both cost `2·n` energy evaluations for `n` parameters and evaluate on
//! copies, so the caller's parameter vector is never modified.

mod plateau;

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use plateau::{PlateauCheck, PlateauDetector, DEFAULT_PLATEAU_THRESHOLD};

/// Default parameter-shift amount.
pub const DEFAULT_SHIFT: f64 = FRAC_PI_2;

/// Default central-difference step.
pub const DEFAULT_FINITE_DIFF_EPSILON: f64 = 1e-5;

/// Which gradient scheme to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMethod {
    /// Parameter-shift rule
    #[default]
    ParameterShift,
    /// Central finite differences
    FiniteDifference,
    /// No gradients; only derivative-free minimizers make progress
    None,
}

impl GradientMethod {
    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GradientMethod::ParameterShift => "parameter_shift",
            GradientMethod::FiniteDifference => "finite_diff",
            GradientMethod::None => "none",
        }
    }
}

impl fmt::Display for GradientMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradientMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "parameter_shift" => Ok(GradientMethod::ParameterShift),
            "finite_diff" | "finite_difference" => Ok(GradientMethod::FiniteDifference),
            "none" => Ok(GradientMethod::None),
            other => Err(Error::Config(format!("Unknown gradient method: {other}"))),
        }
    }
}

/// Estimates ∇E with a fixed scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientEstimator {
    method: GradientMethod,
    shift: f64,
    epsilon: f64,
}

impl GradientEstimator {
    /// Estimator with the default shift and step.
    pub fn new(method: GradientMethod) -> Self {
        Self {
            method,
            shift: DEFAULT_SHIFT,
            epsilon: DEFAULT_FINITE_DIFF_EPSILON,
        }
    }

    /// Override the parameter-shift amount.
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Override the finite-difference step.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn method(&self) -> GradientMethod {
        self.method
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Estimate the gradient of `energy` at `params`.
    ///
    /// `energy` is called `2·params.len()` times; its first error aborts the
    /// estimate and is returned unchanged.
    pub fn estimate<F>(&self, params: &[f64], mut energy: F) -> Result<Vec<f64>>
    where
        F: FnMut(&[f64]) -> Result<f64>,
    {
        let (step, denominator) = match self.method {
            GradientMethod::ParameterShift => {
                let denominator = 2.0 * self.shift.sin();
                if denominator == 0.0 || !denominator.is_finite() {
                    return Err(Error::Config(format!(
                        "parameter shift {} has sin(s) == 0",
                        self.shift
                    )));
                }
                (self.shift, denominator)
            }
            GradientMethod::FiniteDifference => {
                if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
                    return Err(Error::Config(format!(
                        "finite difference step must be positive, got {}",
                        self.epsilon
                    )));
                }
                (self.epsilon, 2.0 * self.epsilon)
            }
            GradientMethod::None => {
                return Err(Error::Config(
                    "gradient method 'none' cannot estimate gradients".to_string(),
                ));
            }
        };

        let mut gradient = Vec::with_capacity(params.len());
        let mut shifted = params.to_vec();
        for i in 0..params.len() {
            shifted[i] = params[i] + step;
            let plus = energy(&shifted)?;
            shifted[i] = params[i] - step;
            let minus = energy(&shifted)?;
            shifted[i] = params[i];
            gradient.push((plus - minus) / denominator);
        }
        Ok(gradient)
    }
}

impl Default for GradientEstimator {
    fn default() -> Self {
        Self::new(GradientMethod::default())
    }
}
