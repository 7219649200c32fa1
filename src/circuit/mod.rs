// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backend-agnostic circuit intermediate representation.
//!
//! An ansatz is written once against the [`QuantumBackend`](crate::backend::QuantumBackend)
//! contract. Replayed against a [`RecordingBackend`](crate::backend::RecordingBackend)
//! it lands in a [`CircuitBuilder`], which serializes to OpenQASM 2.0.

mod builder;
pub mod gates;

use std::collections::BTreeMap;

pub use builder::{ansatz_to_qasm, CircuitBuilder};
pub use gates::Gate;

/// Named real gate parameters (`theta`, `phi`, `lambda`).
pub type GateParams = BTreeMap<String, f64>;

/// One recorded gate application.
///
/// Names are stored as given; they are resolved against the gate table
/// only when the circuit is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    name: String,
    qubits: Vec<u32>,
    params: GateParams,
}

impl Operation {
    /// Create a new operation record.
    pub fn new(name: impl Into<String>, qubits: &[u32], params: GateParams) -> Self {
        Self {
            name: name.into(),
            qubits: qubits.to_vec(),
            params,
        }
    }

    /// Gate name as supplied by the ansatz.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target qubit indices.
    pub fn qubits(&self) -> &[u32] {
        &self.qubits
    }

    /// Named parameters.
    pub fn params(&self) -> &GateParams {
        &self.params
    }
}

/// Build a [`GateParams`] map from `(key, value)` pairs.
pub fn params<const N: usize>(pairs: [(&str, f64); N]) -> GateParams {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
