// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum backend trait definition.

use num_complex::Complex64;

use crate::circuit::GateParams;
use crate::error::BackendError;
use crate::hamiltonian::Hamiltonian;

/// Kind of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// Local or remote simulator
    Simulator,
    /// Real quantum hardware
    Hardware,
    /// Records gates without executing them
    Recorder,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendType::Simulator => write!(f, "simulator"),
            BackendType::Hardware => write!(f, "hardware"),
            BackendType::Recorder => write!(f, "recorder"),
        }
    }
}

/// Acknowledgement of `create_circuit`.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitInfo {
    /// Register size of the new circuit
    pub num_qubits: u32,
    /// Backend-specific status string (e.g. "created", "recorded")
    pub status: String,
}

/// Acknowledgement of `add_gate`.
#[derive(Debug, Clone, PartialEq)]
pub struct GateAck {
    /// Gate name as received
    pub gate: String,
    /// Backend-specific status string
    pub status: String,
}

/// Acknowledgement of `execute_circuit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionInfo {
    /// Backend-specific status string
    pub status: String,
    /// Number of gates executed
    pub num_gates: usize,
}

/// The contract every execution backend implements.
///
/// Calls are synchronous and may block. The engine drives one backend
/// through `clear_circuit → reset_state → (ansatz) → execute_circuit →
/// compute_expectation` per energy evaluation and never inspects the
/// concrete type.
pub trait QuantumBackend: Send {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Start a new circuit on `num_qubits` qubits.
    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError>;

    /// Append a gate to the current circuit.
    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError>;

    /// Run the current circuit.
    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError>;

    /// Amplitudes of the last executed state.
    ///
    /// Hardware backends fail with [`BackendError::NotSupported`].
    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError>;

    /// Computational-basis probabilities of the last executed state.
    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError>;

    /// ⟨H⟩ for the last executed state.
    fn compute_expectation(&mut self, hamiltonian: &Hamiltonian) -> Result<f64, BackendError>;

    /// Return to |0…0⟩ without dropping the circuit.
    fn reset_state(&mut self) -> Result<(), BackendError>;

    /// Drop all gates of the current circuit.
    fn clear_circuit(&mut self) -> Result<(), BackendError>;
}

impl<B: QuantumBackend + ?Sized> QuantumBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn backend_type(&self) -> BackendType {
        (**self).backend_type()
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        (**self).create_circuit(num_qubits)
    }

    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        (**self).add_gate(name, qubits, params)
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        (**self).execute_circuit()
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        (**self).get_state_vector()
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        (**self).get_probabilities()
    }

    fn compute_expectation(&mut self, hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        (**self).compute_expectation(hamiltonian)
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        (**self).reset_state()
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        (**self).clear_circuit()
    }
}

/// A parameterized circuit: appends gates to a backend for a parameter vector.
///
/// Implementations must be deterministic in `params`. Any
/// `Fn(&mut dyn QuantumBackend, &[f64]) -> Result<()>` is an ansatz.
pub trait Ansatz {
    /// Append the circuit for `params` to `backend`.
    fn apply(&self, backend: &mut dyn QuantumBackend, params: &[f64]) -> crate::Result<()>;
}

impl<F> Ansatz for F
where
    F: Fn(&mut dyn QuantumBackend, &[f64]) -> crate::Result<()>,
{
    fn apply(&self, backend: &mut dyn QuantumBackend, params: &[f64]) -> crate::Result<()> {
        self(backend, params)
    }
}
