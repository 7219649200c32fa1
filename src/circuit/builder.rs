// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ordered operation sequence and its OpenQASM 2.0 serialization.

use std::collections::BTreeSet;

use super::{Gate, GateParams, Operation};
use crate::backend::{Ansatz, RecordingBackend};
use crate::error::{CircuitError, Result};

/// Mutable, append-only gate sequence for a fixed register size.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBuilder {
    num_qubits: u32,
    num_bits: u32,
    operations: Vec<Operation>,
}

impl CircuitBuilder {
    /// Empty builder with one classical bit per qubit.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            num_bits: num_qubits,
            operations: Vec::new(),
        }
    }

    /// Set the classical register size.
    pub fn with_bits(mut self, num_bits: u32) -> Self {
        self.num_bits = num_bits;
        self
    }

    /// Discard everything and start over with the given sizes.
    ///
    /// `num_bits` defaults to `num_qubits`.
    pub fn create(&mut self, num_qubits: u32, num_bits: Option<u32>) {
        self.num_qubits = num_qubits;
        self.num_bits = num_bits.unwrap_or(num_qubits);
        self.reset();
    }

    /// Append an operation. No validation happens here.
    pub fn add_operation(&mut self, name: &str, qubits: &[u32], params: GateParams) {
        self.operations.push(Operation::new(name, qubits, params));
    }

    /// Clear all operations. Sizes are kept.
    pub fn reset(&mut self) {
        self.operations.clear();
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Serialize to OpenQASM 2.0.
    ///
    /// The output depends only on the recorded operations and sizes. The
    /// classical register and the measurement block appear only when
    /// `include_measurements` is set.
    pub fn to_qasm(&self, include_measurements: bool) -> std::result::Result<String, CircuitError> {
        if include_measurements && self.num_bits > self.num_qubits {
            return Err(CircuitError::TooManyBits {
                num_bits: self.num_bits,
                num_qubits: self.num_qubits,
            });
        }

        let mut lines = vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            String::new(),
            format!("qreg q[{}];", self.num_qubits),
        ];
        if include_measurements {
            lines.push(format!("creg c[{}];", self.num_bits));
        }
        lines.push(String::new());

        for op in &self.operations {
            lines.push(self.emit_operation(op)?);
        }

        if include_measurements {
            lines.push(String::new());
            lines.push("// Measurements:".to_string());
            for bit in 0..self.num_bits {
                lines.push(format!("measure q[{bit}] -> c[{bit}];"));
            }
        }

        Ok(lines.join("\n"))
    }

    fn emit_operation(&self, op: &Operation) -> std::result::Result<String, CircuitError> {
        let gate = Gate::from_name(op.name()).ok_or_else(|| CircuitError::UnsupportedGate {
            gate: op.name().to_string(),
        })?;

        let qubits = op.qubits();
        if qubits.len() != gate.arity() {
            return Err(CircuitError::ArityMismatch {
                gate: op.name().to_string(),
                expected: gate.arity(),
                qubits: qubits.to_vec(),
            });
        }

        if let Some(&qubit) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(CircuitError::QubitOutOfRange {
                gate: op.name().to_string(),
                qubit,
                num_qubits: self.num_qubits,
            });
        }

        let distinct: BTreeSet<u32> = qubits.iter().copied().collect();
        if distinct.len() != qubits.len() {
            return Err(CircuitError::DuplicateQubit {
                gate: op.name().to_string(),
                qubits: qubits.to_vec(),
            });
        }

        if let Some((name, &value)) = op.params().iter().find(|(_, v)| !v.is_finite()) {
            return Err(CircuitError::NonFiniteParameter {
                gate: op.name().to_string(),
                name: name.clone(),
                value,
            });
        }

        Ok(gate.emit(qubits, op.params()))
    }

    /// Play `ansatz` once into this builder and return QASM with measurements.
    pub fn from_ansatz<A: Ansatz + ?Sized>(&mut self, ansatz: &A, params: &[f64]) -> Result<String> {
        self.reset();
        {
            let mut recorder = RecordingBackend::new(self);
            ansatz.apply(&mut recorder, params)?;
        }
        Ok(self.to_qasm(true)?)
    }
}

/// Record `ansatz` on a fresh `num_qubits` register and return its QASM.
pub fn ansatz_to_qasm<A: Ansatz + ?Sized>(ansatz: &A, params: &[f64], num_qubits: u32) -> Result<String> {
    CircuitBuilder::new(num_qubits).from_ansatz(ansatz, params)
}
