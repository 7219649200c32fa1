// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backend that records gates into a [`CircuitBuilder`] instead of running them.

use num_complex::Complex64;

use super::r#trait::{BackendType, CircuitInfo, ExecutionInfo, GateAck, QuantumBackend};
use crate::circuit::{CircuitBuilder, GateParams};
use crate::error::BackendError;
use crate::hamiltonian::Hamiltonian;

const STATUS: &str = "recorded";

/// Captures an ansatz as a circuit.
///
/// Read-outs (amplitudes, probabilities, expectation values) are not
/// available from a recording and fail with [`BackendError::NotSupported`].
#[derive(Debug)]
pub struct RecordingBackend<'a> {
    builder: &'a mut CircuitBuilder,
}

impl<'a> RecordingBackend<'a> {
    /// Record into `builder`.
    pub fn new(builder: &'a mut CircuitBuilder) -> Self {
        Self { builder }
    }

    /// The builder being recorded into.
    pub fn builder(&self) -> &CircuitBuilder {
        self.builder
    }
}

impl QuantumBackend for RecordingBackend<'_> {
    fn name(&self) -> &str {
        "QasmRecorder"
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Recorder
    }

    fn create_circuit(&mut self, num_qubits: u32) -> Result<CircuitInfo, BackendError> {
        self.builder.create(num_qubits, None);
        Ok(CircuitInfo {
            num_qubits,
            status: STATUS.to_string(),
        })
    }

    fn add_gate(
        &mut self,
        name: &str,
        qubits: &[u32],
        params: &GateParams,
    ) -> Result<GateAck, BackendError> {
        self.builder.add_operation(name, qubits, params.clone());
        Ok(GateAck {
            gate: name.to_string(),
            status: STATUS.to_string(),
        })
    }

    fn execute_circuit(&mut self) -> Result<ExecutionInfo, BackendError> {
        Ok(ExecutionInfo {
            status: STATUS.to_string(),
            num_gates: self.builder.operations().len(),
        })
    }

    fn get_state_vector(&mut self) -> Result<Vec<Complex64>, BackendError> {
        Err(BackendError::NotSupported(
            "state vector from a circuit recording".to_string(),
        ))
    }

    fn get_probabilities(&mut self) -> Result<Vec<f64>, BackendError> {
        Err(BackendError::NotSupported(
            "probabilities from a circuit recording".to_string(),
        ))
    }

    fn compute_expectation(&mut self, _hamiltonian: &Hamiltonian) -> Result<f64, BackendError> {
        Err(BackendError::NotSupported(
            "expectation values from a circuit recording".to_string(),
        ))
    }

    fn reset_state(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn clear_circuit(&mut self) -> Result<(), BackendError> {
        self.builder.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::params;
    use ndarray::Array2;

    #[test]
    fn test_records_gates_in_order() {
        let mut builder = CircuitBuilder::new(2);
        let mut recorder = RecordingBackend::new(&mut builder);
        assert_eq!(recorder.name(), "QasmRecorder");
        assert_eq!(recorder.backend_type(), BackendType::Recorder);

        let ack = recorder.add_gate("h", &[0], &GateParams::new()).unwrap();
        assert_eq!(ack.gate, "h");
        assert_eq!(ack.status, "recorded");
        recorder
            .add_gate("rz", &[1], &params([("phi", 0.5)]))
            .unwrap();
        let info = recorder.execute_circuit().unwrap();
        assert_eq!(info.num_gates, 2);

        let names: Vec<&str> = builder.operations().iter().map(|op| op.name()).collect();
        assert_eq!(names, vec!["h", "rz"]);
    }

    #[test]
    fn test_create_and_clear() {
        let mut builder = CircuitBuilder::new(1);
        let mut recorder = RecordingBackend::new(&mut builder);
        recorder.add_gate("x", &[0], &GateParams::new()).unwrap();
        recorder.create_circuit(3).unwrap();
        assert_eq!(recorder.builder().num_qubits(), 3);
        assert!(recorder.builder().operations().is_empty());

        recorder.add_gate("x", &[2], &GateParams::new()).unwrap();
        recorder.clear_circuit().unwrap();
        recorder.reset_state().unwrap();
        assert!(recorder.builder().operations().is_empty());
    }

    #[test]
    fn test_readouts_not_supported() {
        let mut builder = CircuitBuilder::new(1);
        let mut recorder = RecordingBackend::new(&mut builder);
        let h = Hamiltonian::from_real(Array2::eye(2)).unwrap();
        assert!(matches!(
            recorder.get_state_vector(),
            Err(BackendError::NotSupported(_))
        ));
        assert!(matches!(
            recorder.get_probabilities(),
            Err(BackendError::NotSupported(_))
        ));
        assert!(matches!(
            recorder.compute_expectation(&h),
            Err(BackendError::NotSupported(_))
        ));
    }
}
