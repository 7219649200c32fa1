// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Barren plateau detection from gradient statistics.

/// Default threshold shared by the variance and norm tests.
pub const DEFAULT_PLATEAU_THRESHOLD: f64 = 1e-6;

/// Statistics of one gradient vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateauCheck {
    /// Population variance of the components
    pub variance: f64,
    /// L2 norm
    pub norm: f64,
    /// Whether either statistic fell below its threshold
    pub is_plateau: bool,
}

/// Flags gradients whose variance or norm has vanished.
///
/// The result is advisory; nothing in the optimization loop reacts to it
/// other than bookkeeping and a warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateauDetector {
    variance_threshold: f64,
    norm_threshold: f64,
}

impl PlateauDetector {
    /// Use `threshold` for both tests.
    pub fn new(threshold: f64) -> Self {
        Self::with_thresholds(threshold, threshold)
    }

    /// Separate thresholds. A threshold `<= 0` disables that test.
    pub fn with_thresholds(variance_threshold: f64, norm_threshold: f64) -> Self {
        Self {
            variance_threshold,
            norm_threshold,
        }
    }

    pub fn variance_threshold(&self) -> f64 {
        self.variance_threshold
    }

    pub fn norm_threshold(&self) -> f64 {
        self.norm_threshold
    }

    /// Whether at least one test is active.
    pub fn is_enabled(&self) -> bool {
        self.variance_threshold > 0.0 || self.norm_threshold > 0.0
    }

    /// Compute the statistics of `gradient` and apply the thresholds.
    ///
    /// The variance test needs at least two components; a single value
    /// always has zero variance.
    pub fn check(&self, gradient: &[f64]) -> PlateauCheck {
        let variance = population_variance(gradient);
        let norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();

        let flat_variance =
            self.variance_threshold > 0.0 && gradient.len() >= 2 && variance < self.variance_threshold;
        let small_norm = self.norm_threshold > 0.0 && !gradient.is_empty() && norm < self.norm_threshold;

        PlateauCheck {
            variance,
            norm,
            is_plateau: flat_variance || small_norm,
        }
    }
}

impl Default for PlateauDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PLATEAU_THRESHOLD)
    }
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
