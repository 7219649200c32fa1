// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! VQE settings and result types.

use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gradient::{
    GradientEstimator, GradientMethod, PlateauDetector, DEFAULT_FINITE_DIFF_EPSILON,
    DEFAULT_SHIFT,
};
use crate::hamiltonian::{DEFAULT_HERMITIAN_ATOL, DEFAULT_HERMITIAN_RTOL};

/// Engine settings that stay fixed across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct VqeSettings {
    /// Gradient scheme handed to gradient-aware minimizers.
    pub gradient_method: GradientMethod,
    /// Parameter-shift amount.
    pub shift: f64,
    /// Central finite-difference step.
    pub finite_diff_epsilon: f64,
    /// Plateau thresholds.
    pub plateau: PlateauDetector,
    /// Relative tolerance of the Hermiticity check.
    pub hermitian_rtol: f64,
    /// Absolute tolerance of the Hermiticity check.
    pub hermitian_atol: f64,
    /// Log progress every N iterations.
    pub progress_interval: usize,
}

impl Default for VqeSettings {
    fn default() -> Self {
        Self {
            gradient_method: GradientMethod::ParameterShift,
            shift: DEFAULT_SHIFT,
            finite_diff_epsilon: DEFAULT_FINITE_DIFF_EPSILON,
            plateau: PlateauDetector::default(),
            hermitian_rtol: DEFAULT_HERMITIAN_RTOL,
            hermitian_atol: DEFAULT_HERMITIAN_ATOL,
            progress_interval: 10,
        }
    }
}

impl VqeSettings {
    /// Default settings with a different gradient scheme.
    pub fn with_gradient_method(method: GradientMethod) -> Self {
        Self {
            gradient_method: method,
            ..Self::default()
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(Error::Config("progress_interval cannot be 0".into()));
        }
        if !(self.hermitian_rtol >= 0.0 && self.hermitian_atol >= 0.0) {
            return Err(Error::Config(
                "Hermiticity tolerances must be non-negative".into(),
            ));
        }
        match self.gradient_method {
            GradientMethod::ParameterShift if self.shift.sin() == 0.0 || !self.shift.is_finite() => {
                Err(Error::Config(format!(
                    "parameter shift {} has sin(s) == 0",
                    self.shift
                )))
            }
            GradientMethod::FiniteDifference
                if !self.finite_diff_epsilon.is_finite() || self.finite_diff_epsilon <= 0.0 =>
            {
                Err(Error::Config(format!(
                    "finite_diff_epsilon must be positive, got {}",
                    self.finite_diff_epsilon
                )))
            }
            _ => Ok(()),
        }
    }

    /// Gradient estimator for these settings.
    pub fn estimator(&self) -> GradientEstimator {
        GradientEstimator::new(self.gradient_method)
            .with_shift(self.shift)
            .with_epsilon(self.finite_diff_epsilon)
    }
}

impl TryFrom<&Config> for VqeSettings {
    type Error = Error;

    fn try_from(config: &Config) -> Result<Self> {
        config.validate()?;
        let engine = &config.engine;
        let plateau = PlateauDetector::with_thresholds(
            engine.variance_threshold.unwrap_or(engine.plateau_threshold),
            engine.norm_threshold.unwrap_or(engine.plateau_threshold),
        );
        Ok(Self {
            gradient_method: engine.gradient_method.parse()?,
            shift: engine.shift,
            finite_diff_epsilon: engine.finite_diff_epsilon,
            plateau,
            hermitian_rtol: engine.hermitian_rtol,
            hermitian_atol: engine.hermitian_atol,
            progress_interval: engine.progress_interval,
        })
    }
}

/// What a progress callback sees after each objective evaluation.
#[derive(Debug, Clone, Copy)]
pub struct IterationEvent<'a> {
    /// 1-based objective call count.
    pub iteration: usize,
    /// Energy at `params`.
    pub energy: f64,
    /// Parameters just evaluated.
    pub params: &'a [f64],
    /// Most recent gradient, if one has been computed in this run.
    pub gradient: Option<&'a [f64]>,
}

/// Progress observer. Returning an error cancels the run.
pub type IterationCallback<'a> = &'a mut dyn FnMut(&IterationEvent<'_>) -> Result<()>;

/// Result of a VQE run.
#[derive(Debug, Clone)]
pub struct VqeResult {
    /// Best energy reported by the minimizer.
    pub optimal_energy: f64,
    /// Parameters achieving `optimal_energy`.
    pub optimal_params: Vec<f64>,
    /// Energy per objective call.
    pub energy_history: Vec<f64>,
    /// Parameters per objective call.
    pub param_history: Vec<Vec<f64>>,
    /// Gradient per gradient call.
    pub gradient_history: Vec<Vec<f64>>,
    /// Number of objective calls.
    pub iterations: usize,
    /// Whether the minimizer reported convergence.
    pub success: bool,
    /// Minimizer termination message.
    pub message: String,
    /// Wall-clock duration of the run.
    pub execution_time: Duration,
    /// Energy evaluations, including those made for gradients.
    pub energy_evaluations: usize,
    /// Gradient evaluations.
    pub gradient_evaluations: usize,
    /// Whether any plateau iteration was recorded.
    pub plateau_detected: bool,
    /// Iterations at which a plateau was flagged, ascending.
    pub plateau_iterations: Vec<usize>,
    /// Gradient variance per gradient call.
    pub gradient_variance: Vec<f64>,
    /// Backend the run executed on.
    pub backend_name: String,
    /// Minimizer used.
    pub optimizer: String,
}

impl VqeResult {
    /// Compact serializable view.
    pub fn summary(&self) -> VqeSummary {
        VqeSummary {
            optimal_energy: self.optimal_energy,
            optimal_params: self.optimal_params.clone(),
            energy_history: self.energy_history.clone(),
            iterations: self.iterations,
            success: self.success,
            message: self.message.clone(),
            execution_time_secs: self.execution_time.as_secs_f64(),
            energy_evaluations: self.energy_evaluations,
            gradient_evaluations: self.gradient_evaluations,
            plateau_detected: self.plateau_detected,
            plateau_iterations: self.plateau_iterations.clone(),
            backend: self.backend_name.clone(),
            optimizer: self.optimizer.clone(),
        }
    }

    /// Summary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }
}

/// Serializable summary of a [`VqeResult`].
#[derive(Debug, Clone, Serialize)]
pub struct VqeSummary {
    pub optimal_energy: f64,
    pub optimal_params: Vec<f64>,
    pub energy_history: Vec<f64>,
    pub iterations: usize,
    pub success: bool,
    pub message: String,
    pub execution_time_secs: f64,
    pub energy_evaluations: usize,
    pub gradient_evaluations: usize,
    pub plateau_detected: bool,
    pub plateau_iterations: Vec<usize>,
    pub backend: String,
    pub optimizer: String,
}

/// Comparison of a VQE energy against exact diagonalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidationReport {
    pub exact_energy: f64,
    pub vqe_energy: f64,
    /// |vqe − exact|
    pub error: f64,
    /// `error / |exact|`, or `error` when the exact energy is 0
    pub relative_error: f64,
    /// `error < tolerance`
    pub converged: bool,
    pub tolerance: f64,
}

impl ValidationReport {
    /// Compare `vqe_energy` with `exact_energy`.
    pub fn new(exact_energy: f64, vqe_energy: f64, tolerance: f64) -> Self {
        let error = (vqe_energy - exact_energy).abs();
        let relative_error = if exact_energy != 0.0 {
            error / exact_energy.abs()
        } else {
            error
        };
        Self {
            exact_energy,
            vqe_energy,
            error,
            relative_error,
            converged: error < tolerance,
            tolerance,
        }
    }
}
