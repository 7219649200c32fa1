// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. plateau.yaml file (or the path given with `--config`)
//! 3. Environment variables (PLATEAU_*)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::gradient::{
    GradientMethod, DEFAULT_FINITE_DIFF_EPSILON, DEFAULT_PLATEAU_THRESHOLD, DEFAULT_SHIFT,
};
use crate::hamiltonian::{DEFAULT_HERMITIAN_ATOL, DEFAULT_HERMITIAN_RTOL};
use crate::optimizer::{OptimizerKind, DEFAULT_LBFGS_MEMORY, DEFAULT_SIMPLEX_STEP};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// VQE engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Minimizer settings
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["plateau.yaml", "plateau.yml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("PLATEAU_GRADIENT_METHOD") {
            self.engine.gradient_method = val;
        }
        if let Ok(val) = env::var("PLATEAU_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.engine.plateau_threshold = threshold;
            }
        }
        if let Ok(val) = env::var("PLATEAU_OPTIMIZER") {
            self.optimizer.method = val;
        }
        if let Ok(val) = env::var("PLATEAU_MAX_ITER") {
            if let Ok(max_iter) = val.parse() {
                self.optimizer.max_iter = max_iter;
            }
        }
        if let Ok(val) = env::var("PLATEAU_TOL") {
            if let Ok(tol) = val.parse() {
                self.optimizer.tol = tol;
            }
        }
        if let Ok(val) = env::var("PLATEAU_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("PLATEAU_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let method: GradientMethod = self.engine.gradient_method.parse()?;
        let optimizer: OptimizerKind = self.optimizer.method.parse()?;

        let engine = &self.engine;
        if !engine.shift.is_finite() || engine.shift <= 0.0 {
            return Err(Error::Config(format!(
                "parameter shift must be positive, got {}",
                engine.shift
            )));
        }
        if engine.shift.sin() == 0.0 {
            return Err(Error::Config(format!(
                "parameter shift {} has sin(s) == 0",
                engine.shift
            )));
        }
        if !engine.finite_diff_epsilon.is_finite() || engine.finite_diff_epsilon <= 0.0 {
            return Err(Error::Config(format!(
                "finite_diff_epsilon must be positive, got {}",
                engine.finite_diff_epsilon
            )));
        }
        let thresholds = [
            Some(engine.plateau_threshold),
            engine.variance_threshold,
            engine.norm_threshold,
        ];
        if thresholds.iter().flatten().any(|t| !t.is_finite()) {
            return Err(Error::Config("plateau thresholds must be finite".into()));
        }
        if !(engine.hermitian_rtol >= 0.0 && engine.hermitian_atol >= 0.0) {
            return Err(Error::Config(
                "Hermiticity tolerances must be non-negative".into(),
            ));
        }
        if engine.progress_interval == 0 {
            return Err(Error::Config("progress_interval cannot be 0".into()));
        }

        let opt = &self.optimizer;
        if opt.max_iter == 0 {
            return Err(Error::Config("max_iter cannot be 0".into()));
        }
        if !opt.tol.is_finite() || opt.tol < 0.0 {
            return Err(Error::Config(format!(
                "tol must be a non-negative number, got {}",
                opt.tol
            )));
        }
        if !opt.simplex_step.is_finite() || opt.simplex_step <= 0.0 {
            return Err(Error::Config(format!(
                "simplex_step must be positive, got {}",
                opt.simplex_step
            )));
        }
        if opt.lbfgs_memory == 0 {
            return Err(Error::Config("lbfgs_memory cannot be 0".into()));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "Unknown log format: {} (expected json or pretty)",
                self.logging.format
            )));
        }

        if optimizer.is_gradient_aware() && method == GradientMethod::None {
            tracing::warn!(
                optimizer = %optimizer,
                "Gradient-based optimizer with gradient_method 'none'; \
                 gradients will be approximated from the objective"
            );
        }
        Ok(())
    }
}

/// VQE engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gradient scheme (parameter_shift, finite_diff, none)
    #[serde(default = "default_gradient_method")]
    pub gradient_method: String,

    /// Threshold shared by the plateau variance and norm tests
    #[serde(default = "default_plateau_threshold")]
    pub plateau_threshold: f64,

    /// Override for the variance test threshold
    #[serde(default)]
    pub variance_threshold: Option<f64>,

    /// Override for the norm test threshold
    #[serde(default)]
    pub norm_threshold: Option<f64>,

    /// Parameter-shift amount in radians
    #[serde(default = "default_shift")]
    pub shift: f64,

    /// Central finite-difference step
    #[serde(default = "default_finite_diff_epsilon")]
    pub finite_diff_epsilon: f64,

    /// Relative tolerance of the Hermiticity check
    #[serde(default = "default_hermitian_rtol")]
    pub hermitian_rtol: f64,

    /// Absolute tolerance of the Hermiticity check
    #[serde(default = "default_hermitian_atol")]
    pub hermitian_atol: f64,

    /// Log progress every N iterations
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gradient_method: default_gradient_method(),
            plateau_threshold: default_plateau_threshold(),
            variance_threshold: None,
            norm_threshold: None,
            shift: default_shift(),
            finite_diff_epsilon: default_finite_diff_epsilon(),
            hermitian_rtol: default_hermitian_rtol(),
            hermitian_atol: default_hermitian_atol(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_gradient_method() -> String {
    GradientMethod::ParameterShift.as_str().into()
}

fn default_plateau_threshold() -> f64 {
    DEFAULT_PLATEAU_THRESHOLD
}

fn default_shift() -> f64 {
    DEFAULT_SHIFT
}

fn default_finite_diff_epsilon() -> f64 {
    DEFAULT_FINITE_DIFF_EPSILON
}

fn default_hermitian_rtol() -> f64 {
    DEFAULT_HERMITIAN_RTOL
}

fn default_hermitian_atol() -> f64 {
    DEFAULT_HERMITIAN_ATOL
}

fn default_progress_interval() -> usize {
    10
}

/// Minimizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Minimizer name (nelder-mead, l-bfgs, steepest-descent)
    #[serde(default = "default_optimizer_method")]
    pub method: String,

    /// Maximum solver iterations
    #[serde(default = "default_max_iter")]
    pub max_iter: u64,

    /// Convergence tolerance
    #[serde(default = "default_tol")]
    pub tol: f64,

    /// Initial Nelder-Mead simplex edge length
    #[serde(default = "default_simplex_step")]
    pub simplex_step: f64,

    /// L-BFGS history size
    #[serde(default = "default_lbfgs_memory")]
    pub lbfgs_memory: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            method: default_optimizer_method(),
            max_iter: default_max_iter(),
            tol: default_tol(),
            simplex_step: default_simplex_step(),
            lbfgs_memory: default_lbfgs_memory(),
        }
    }
}

fn default_optimizer_method() -> String {
    OptimizerKind::NelderMead.as_str().into()
}

fn default_max_iter() -> u64 {
    1000
}

fn default_tol() -> f64 {
    1e-6
}

fn default_simplex_step() -> f64 {
    DEFAULT_SIMPLEX_STEP
}

fn default_lbfgs_memory() -> usize {
    DEFAULT_LBFGS_MEMORY
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
