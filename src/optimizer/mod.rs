// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pluggable minimizers.
//!
//! The engine does not search parameter space itself. It exposes its
//! energy (and optionally its gradient) as a [`Problem`] and hands that to
//! a [`Minimizer`], which decides where to evaluate and when to stop.
//!
//! The shipped minimizers wrap solvers from the `argmin` framework:
//!
//! | Name               | Solver                      | Uses gradient |
//! |--------------------|-----------------------------|---------------|
//! | `nelder-mead`      | Nelder-Mead simplex         | no            |
//! | `l-bfgs`           | L-BFGS, Moré-Thuente search | yes           |
//! | `steepest-descent` | Steepest descent            | yes           |

mod solvers;

use std::fmt;
use std::str::FromStr;

use crate::config::OptimizerConfig;
use crate::error::{Error, Result};

pub use solvers::{
    LbfgsMinimizer, NelderMeadMinimizer, SteepestDescentMinimizer, DEFAULT_LBFGS_MEMORY,
    DEFAULT_SIMPLEX_STEP,
};

/// An objective as seen by a minimizer.
pub trait Problem {
    /// Objective value at `x`.
    fn cost(&mut self, x: &[f64]) -> Result<f64>;

    /// Gradient at `x`. Only called when [`provides_gradient`] is true.
    ///
    /// [`provides_gradient`]: Problem::provides_gradient
    fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>>;

    /// Whether [`gradient`](Problem::gradient) is available.
    fn provides_gradient(&self) -> bool;
}

/// Outcome of a minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerReport {
    /// Best objective value found
    pub value: f64,
    /// Point where `value` was found
    pub params: Vec<f64>,
    /// Whether the solver met its convergence criterion
    pub success: bool,
    /// Human-readable termination reason
    pub message: String,
    /// Solver iterations performed
    pub iterations: u64,
}

/// A numerical search strategy.
///
/// Errors returned by the problem abort the search and are returned
/// unchanged. Failures of the solver itself become [`Error::Minimizer`].
pub trait Minimizer {
    /// Display name.
    fn name(&self) -> &str;

    /// Whether this minimizer calls [`Problem::gradient`].
    fn uses_gradient(&self) -> bool;

    /// Minimize `problem` starting from `x0`.
    fn minimize(
        &self,
        problem: &mut dyn Problem,
        x0: &[f64],
        tol: f64,
        max_iter: u64,
    ) -> Result<MinimizerReport>;
}

/// Built-in minimizers, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizerKind {
    /// Derivative-free simplex search
    #[default]
    NelderMead,
    /// Limited-memory BFGS
    Lbfgs,
    /// Gradient descent with line search
    SteepestDescent,
}

impl OptimizerKind {
    /// Canonical configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerKind::NelderMead => "nelder-mead",
            OptimizerKind::Lbfgs => "l-bfgs",
            OptimizerKind::SteepestDescent => "steepest-descent",
        }
    }

    /// Whether the minimizer consumes gradients.
    pub fn is_gradient_aware(&self) -> bool {
        !matches!(self, OptimizerKind::NelderMead)
    }

    /// Instance with default solver settings.
    pub fn minimizer(&self) -> Box<dyn Minimizer> {
        self.build(&OptimizerConfig::default())
    }

    /// Instance using the solver settings in `config`.
    pub fn build(&self, config: &OptimizerConfig) -> Box<dyn Minimizer> {
        match self {
            OptimizerKind::NelderMead => Box::new(NelderMeadMinimizer::new(config.simplex_step)),
            OptimizerKind::Lbfgs => Box::new(LbfgsMinimizer::new(config.lbfgs_memory)),
            OptimizerKind::SteepestDescent => Box::new(SteepestDescentMinimizer::new()),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nelder-mead" | "nelder_mead" | "neldermead" => Ok(OptimizerKind::NelderMead),
            "l-bfgs" | "lbfgs" | "l-bfgs-b" | "bfgs" => Ok(OptimizerKind::Lbfgs),
            "steepest-descent" | "steepest_descent" | "gradient-descent" => {
                Ok(OptimizerKind::SteepestDescent)
            }
            _ => Err(Error::Config(format!("Unknown optimizer: {s}"))),
        }
    }
}
