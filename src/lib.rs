// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plateau Navigator
//!
//! A Variational Quantum Eigensolver engine that runs against any backend
//! implementing a small capability contract, and watches its gradients for
//! barren plateaus.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               VqeEngine                  │
//! ├──────────────────┬──────────────────────┤
//! │ Gradient + Plateau│  Minimizer (argmin)  │
//! ├──────────────────┴──────────────────────┤
//! │        QuantumBackend contract           │
//! ├────────────────┬────────────────────────┤
//! │ Any simulator  │  RecordingBackend      │
//! │ or device      │  → CircuitBuilder/QASM │
//! └────────────────┴────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`vqe`]: The optimization engine and its result types
//! - [`backend`]: Backend contract, ansatz trait, registry and QASM recorder
//! - [`circuit`]: Gate table and OpenQASM 2.0 serialization
//! - [`gradient`]: Parameter-shift and finite-difference gradients, plateau detection
//! - [`optimizer`]: Pluggable minimizers
//! - [`hamiltonian`]: Validated Hermitian operators and exact diagonalization
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod backend;
pub mod circuit;
pub mod config;
pub mod error;
pub mod gradient;
pub mod hamiltonian;
pub mod optimizer;
pub mod vqe;

pub use config::Config;
pub use error::{Error, Result};
pub use hamiltonian::Hamiltonian;
pub use vqe::{VqeEngine, VqeResult, VqeSettings};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
