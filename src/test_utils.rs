// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::Array2;
use num_complex::Complex64;

use crate::backend::{BackendType, CircuitInfo, ExecutionInfo, GateAck, QuantumBackend};
use crate::circuit::{params, Gate, GateParams, Operation};
use crate::error::BackendError;
use crate::hamiltonian::Hamiltonian;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Pauli Z as a raw matrix.
pub fn pauli_z() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 0]] = ONE;
    m[[1, 1]] = -ONE;
    m
}

/// `dim × dim` identity.
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::eye(dim)
}

/// `ry(params[i])` on qubit `i`.
pub fn ry_ansatz(backend: &mut dyn QuantumBackend, p: &[f64]) -> crate::Result<()> {
    for (qubit, &theta) in p.iter().enumerate() {
        backend.add_gate("ry", &[qubit as u32], &params([("theta", theta)]))?;
    }
    Ok(())
}

/// Dense state-vector simulator. Qubit `q` is bit `q` of the basis index.
pub struct StatevectorBackend {
    num_qubits: u32,
    operations: Vec<Operation>,
    state: Vec<Complex64>,
}

impl StatevectorBackend {
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            operations: Vec::new(),
            state: ground(num_qubits),
        }
    }

    fn apply(&mut self, op: &Operation) -> Result<(), BackendError> {
        let gate = Gate::from_name(op.name())
            .ok_or_else(|| BackendError::InvalidRequest(format!("unknown gate {}", op.name())))?;
        let q = op.qubits();
        let angle = |key: &str| op.params().get(key).copied().unwrap_or(0.0);
        let i = Complex64::i();
        match gate {
            Gate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                self.single(q[0], [[h, h], [h, -h]]);
            }
            Gate::X => self.single(q[0], [[ZERO, ONE], [ONE, ZERO]]),
            Gate::Y => self.single(q[0], [[ZERO, -i], [i, ZERO]]),
            Gate::Z => self.single(q[0], [[ONE, ZERO], [ZERO, -ONE]]),
            Gate::Rx => {
                let (c, s) = half_angle(angle("theta"));
                self.single(q[0], [[c.into(), -i * s], [-i * s, c.into()]]);
            }
            Gate::Ry => {
                let (c, s) = half_angle(angle("theta"));
                self.single(q[0], [[c.into(), (-s).into()], [s.into(), c.into()]]);
            }
            Gate::Rz => {
                let phi = angle("phi");
                self.single(
                    q[0],
                    [
                        [Complex64::from_polar(1.0, -phi / 2.0), ZERO],
                        [ZERO, Complex64::from_polar(1.0, phi / 2.0)],
                    ],
                );
            }
            Gate::Cx => {
                let (control, target) = (1usize << q[0], 1usize << q[1]);
                for index in 0..self.state.len() {
                    if index & control != 0 && index & target == 0 {
                        self.state.swap(index, index | target);
                    }
                }
            }
            other => {
                return Err(BackendError::NotSupported(format!(
                    "gate {other} is not simulated"
                )))
            }
        }
        Ok(())
    }

    fn single(&mut self, qubit: u32, m: [[Complex64; 2]; 2]) {
        let bit = 1usize << qubit;
        for index in 0..self.state.len() {
            if index & bit == 0 {
                let (a, b) = (self.state[index], self.state[index | bit]);
                self.state[index] = m[0][0] * a + m[0][1] * b;
                self.state[index | bit] = m[1][0] * a + m[1][1] * b;
            }
        }
    }
}

fn ground(num_qubits: u32) -> Vec<Complex64> {
    let mut state = vec![ZERO; 1 << num_qubits];
    state[0] = ONE;
    state
}

fn half_angle(theta: f64) -> (f64, f64) {
    ((theta / 2.0).cos(), (theta / 2.0).sin())
}

impl QuantumBackend for StatevectorBackend {
    fn name(&self) -> &str {
        "statevector"
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Simulator
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        *self = Self::new(num_qubits);
        Ok(CircuitInfo {
            num_qubits,
            status: "created".into(),
        })
    }

    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        if let Some(&q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(BackendError::InvalidRequest(format!(
                "qubit {q} out of range for {} qubits",
                self.num_qubits
            )));
        }
        self.operations
            .push(Operation::new(name, qubits, params.clone()));
        Ok(GateAck {
            gate: name.to_string(),
            status: "added".into(),
        })
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        self.state = ground(self.num_qubits);
        let operations = std::mem::take(&mut self.operations);
        let outcome = operations.iter().try_for_each(|op| self.apply(op));
        self.operations = operations;
        outcome?;
        Ok(ExecutionInfo {
            status: "completed".into(),
            num_gates: self.operations.len(),
        })
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        Ok(self.state.clone())
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        Ok(self.state.iter().map(|a| a.norm_sqr()).collect())
    }

    fn compute_expectation(&mut self, hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        hamiltonian.expectation(&self.state)
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        self.state = ground(self.num_qubits);
        Ok(())
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        self.operations.clear();
        Ok(())
    }
}

/// Accepts gates but fails every execution.
#[derive(Default)]
pub struct FailingBackend;

impl FailingBackend {
    pub fn new() -> Self {
        Self
    }
}

impl QuantumBackend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Hardware
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        Ok(CircuitInfo {
            num_qubits,
            status: "created".into(),
        })
    }

    fn add_gate(
        &mut self,
        name: &str,
        _qubits: &[u32],
        _params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        Ok(GateAck {
            gate: name.to_string(),
            status: "queued".into(),
        })
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        Err(BackendError::ExecutionFailed("device offline".into()))
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        Err(BackendError::NotSupported("state vector".into()))
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        Err(BackendError::NotSupported("probabilities".into()))
    }

    fn compute_expectation(&mut self, _hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        Err(BackendError::NotSupported("expectation".into()))
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Records the name of every backend call before forwarding it.
pub struct CountingBackend<B> {
    inner: B,
    calls: Vec<&'static str>,
}

impl<B: QuantumBackend> CountingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[&'static str] {
        &self.calls
    }
}

impl<B: QuantumBackend> QuantumBackend for CountingBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn backend_type(&self) -> BackendType {
        self.inner.backend_type()
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        self.calls.push("create_circuit");
        self.inner.create_circuit(num_qubits)
    }

    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        self.calls.push("add_gate");
        self.inner.add_gate(name, qubits, params)
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        self.calls.push("execute_circuit");
        self.inner.execute_circuit()
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        self.calls.push("get_state_vector");
        self.inner.get_state_vector()
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        self.calls.push("get_probabilities");
        self.inner.get_probabilities()
    }

    fn compute_expectation(&mut self, hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        self.calls.push("compute_expectation");
        self.inner.compute_expectation(hamiltonian)
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        self.calls.push("reset_state");
        self.inner.reset_state()
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        self.calls.push("clear_circuit");
        self.inner.clear_circuit()
    }
}

/// Forwards to `inner` but fails every execution after the first `ok_runs`.
pub struct FlakyBackend<B> {
    inner: B,
    ok_runs: usize,
    runs: usize,
}

impl<B: QuantumBackend> FlakyBackend<B> {
    pub fn new(inner: B, ok_runs: usize) -> Self {
        Self {
            inner,
            ok_runs,
            runs: 0,
        }
    }
}

impl<B: QuantumBackend> QuantumBackend for FlakyBackend<B> {
    fn name(&self) -> &str {
        "flaky"
    }

    fn backend_type(&self) -> BackendType {
        self.inner.backend_type()
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        self.inner.create_circuit(num_qubits)
    }

    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        self.inner.add_gate(name, qubits, params)
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        self.runs += 1;
        if self.runs > self.ok_runs {
            return Err(BackendError::ExecutionFailed(format!(
                "run {} rejected",
                self.runs
            )));
        }
        self.inner.execute_circuit()
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        self.inner.get_state_vector()
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        self.inner.get_probabilities()
    }

    fn compute_expectation(&mut self, hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        self.inner.compute_expectation(hamiltonian)
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        self.inner.reset_state()
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        self.inner.clear_circuit()
    }
}
