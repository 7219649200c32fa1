// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-run bookkeeping.

use std::collections::BTreeSet;

/// Counters and histories of the current (or last) run.
///
/// Cleared at the start of every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationState {
    /// Objective calls so far
    pub iteration: usize,
    pub energy_history: Vec<f64>,
    pub param_history: Vec<Vec<f64>>,
    pub gradient_history: Vec<Vec<f64>>,
    /// Variance of every gradient computed
    pub gradient_variances: Vec<f64>,
    /// Iterations at which a plateau was flagged
    pub plateau_iterations: BTreeSet<usize>,
    /// Energy evaluations, including gradient evaluations
    pub energy_eval_count: usize,
    pub gradient_eval_count: usize,
    pub last_gradient: Option<Vec<f64>>,
}

impl OptimizationState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Lowest energy seen so far.
    pub fn best_energy(&self) -> Option<f64> {
        self.energy_history.iter().copied().reduce(f64::min)
    }
}
