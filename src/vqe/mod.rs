// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Variational Quantum Eigensolver.
//!
//! A [`VqeEngine`] owns a backend, a validated Hamiltonian and an ansatz.
//! Each objective call rebuilds the ansatz circuit on the backend for the
//! requested parameters, executes it and reads back ⟨H⟩. Gradient-aware
//! minimizers additionally receive gradients estimated by parameter shift
//! or finite differences, and every gradient is screened for a barren
//! plateau.
//!
//! # Example
//!
//! ```ignore
//! use plateau_navigator::vqe::{VqeEngine, VqeSettings};
//! use plateau_navigator::optimizer::OptimizerKind;
//!
//! let mut engine = VqeEngine::new(backend, hamiltonian, ansatz, VqeSettings::default())?;
//! let result = engine.run(&[0.0], OptimizerKind::NelderMead, 200, 1e-6, None)?;
//! println!("E = {}", result.optimal_energy);
//! ```

mod engine;
mod state;
mod types;

pub use engine::VqeEngine;
pub use state::OptimizationState;
pub use types::{
    IterationCallback, IterationEvent, ValidationReport, VqeResult, VqeSettings, VqeSummary,
};
