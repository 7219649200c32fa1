// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the VQE engine.

use std::fmt;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error (unknown gradient scheme, unknown optimizer, bad settings)
    Config(String),
    /// Invalid Hamiltonian
    Hamiltonian(HamiltonianError),
    /// Circuit serialization error
    Circuit(CircuitError),
    /// Backend error
    Backend(BackendError),
    /// Run cancelled from a user callback
    Cancelled(String),
    /// External minimizer failure
    Minimizer(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Hamiltonian(e) => write!(f, "Invalid Hamiltonian: {}", e),
            Error::Circuit(e) => write!(f, "Circuit error: {}", e),
            Error::Backend(e) => write!(f, "Backend error: {}", e),
            Error::Cancelled(msg) => write!(f, "Run cancelled: {}", msg),
            Error::Minimizer(msg) => write!(f, "Minimizer error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Hamiltonian(e) => Some(e),
            Error::Circuit(e) => Some(e),
            Error::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<HamiltonianError> for Error {
    fn from(e: HamiltonianError) -> Self {
        Error::Hamiltonian(e)
    }
}

impl From<CircuitError> for Error {
    fn from(e: CircuitError) -> Self {
        Error::Circuit(e)
    }
}

impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self {
        Error::Backend(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Hamiltonian validation errors.
///
/// All of these are fatal at engine construction.
#[derive(Debug, Clone, PartialEq)]
pub enum HamiltonianError {
    /// Matrix has no entries
    Empty,
    /// Rows of differing length (not a 2-D matrix)
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Matrix is not square
    NotSquare { rows: usize, cols: usize },
    /// Entry is NaN or infinite
    NotFinite { row: usize, col: usize },
    /// H != H† within tolerance
    NotHermitian {
        row: usize,
        col: usize,
        deviation: f64,
    },
}

impl fmt::Display for HamiltonianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HamiltonianError::Empty => write!(f, "matrix is empty"),
            HamiltonianError::Ragged {
                row,
                expected,
                actual,
            } => write!(
                f,
                "must be a 2D matrix, row {} has {} entries (expected {})",
                row, actual, expected
            ),
            HamiltonianError::NotSquare { rows, cols } => {
                write!(f, "must be square, got shape ({}, {})", rows, cols)
            }
            HamiltonianError::NotFinite { row, col } => {
                write!(f, "entry ({}, {}) is not a finite number", row, col)
            }
            HamiltonianError::NotHermitian {
                row,
                col,
                deviation,
            } => write!(
                f,
                "must be Hermitian (H = H†), entry ({}, {}) deviates by {:.3e}",
                row, col, deviation
            ),
        }
    }
}

impl std::error::Error for HamiltonianError {}

/// Circuit serialization errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitError {
    /// Gate name has no known textual mapping
    UnsupportedGate { gate: String },
    /// Gate applied to the wrong number of qubits
    ArityMismatch {
        gate: String,
        expected: usize,
        qubits: Vec<u32>,
    },
    /// Qubit index outside the quantum register
    QubitOutOfRange {
        gate: String,
        qubit: u32,
        num_qubits: u32,
    },
    /// Same qubit used twice in one operation
    DuplicateQubit { gate: String, qubits: Vec<u32> },
    /// Parameter is NaN or infinite
    NonFiniteParameter {
        gate: String,
        name: String,
        value: f64,
    },
    /// More classical bits than qubits to measure
    TooManyBits { num_bits: u32, num_qubits: u32 },
}

impl CircuitError {
    /// Whether this is an unsupported-gate condition (unknown name or wrong arity).
    pub fn is_unsupported_gate(&self) -> bool {
        matches!(
            self,
            CircuitError::UnsupportedGate { .. } | CircuitError::ArityMismatch { .. }
        )
    }
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::UnsupportedGate { gate } => {
                write!(f, "Unsupported gate type for QASM conversion: {}", gate)
            }
            CircuitError::ArityMismatch {
                gate,
                expected,
                qubits,
            } => write!(
                f,
                "Invalid number of qubits for gate {}: {:?} (expected {})",
                gate, qubits, expected
            ),
            CircuitError::QubitOutOfRange {
                gate,
                qubit,
                num_qubits,
            } => write!(
                f,
                "Gate {} targets qubit {} outside register of {} qubits",
                gate, qubit, num_qubits
            ),
            CircuitError::DuplicateQubit { gate, qubits } => {
                write!(f, "Gate {} repeats a qubit: {:?}", gate, qubits)
            }
            CircuitError::NonFiniteParameter { gate, name, value } => {
                write!(f, "Gate {} parameter '{}' is not finite: {}", gate, name, value)
            }
            CircuitError::TooManyBits {
                num_bits,
                num_qubits,
            } => write!(
                f,
                "Cannot measure {} bits from {} qubits",
                num_bits, num_qubits
            ),
        }
    }
}

impl std::error::Error for CircuitError {}

/// Backend-specific errors.
///
/// Produced by execution collaborators and propagated unchanged by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Capability not offered by this backend
    NotSupported(String),
    /// Backend not found
    NotFound(String),
    /// Backend unavailable
    Unavailable(String),
    /// Execution failed
    ExecutionFailed(String),
    /// Invalid request
    InvalidRequest(String),
    /// Timeout
    Timeout(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            BackendError::NotFound(name) => write!(f, "Backend not found: {}", name),
            BackendError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            BackendError::ExecutionFailed(msg) => write!(f, "Execution failed: {}", msg),
            BackendError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            BackendError::Timeout(msg) => write!(f, "Timeout: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // =========================================================================
    // Error Display tests
    // =========================================================================

    #[test]
    fn test_error_display_config() {
        let e = Error::Config("Unknown gradient method: adjoint".into());
        assert_eq!(
            e.to_string(),
            "Configuration error: Unknown gradient method: adjoint"
        );
    }

    #[test]
    fn test_error_display_hamiltonian() {
        let e = Error::Hamiltonian(HamiltonianError::NotSquare { rows: 2, cols: 3 });
        assert_eq!(
            e.to_string(),
            "Invalid Hamiltonian: must be square, got shape (2, 3)"
        );
    }

    #[test]
    fn test_error_display_circuit() {
        let e = Error::Circuit(CircuitError::UnsupportedGate {
            gate: "iswap".into(),
        });
        assert_eq!(
            e.to_string(),
            "Circuit error: Unsupported gate type for QASM conversion: iswap"
        );
    }

    #[test]
    fn test_error_display_backend() {
        let e = Error::Backend(BackendError::NotSupported("state vector".into()));
        assert_eq!(e.to_string(), "Backend error: Not supported: state vector");
    }

    #[test]
    fn test_error_display_cancelled() {
        let e = Error::Cancelled("user stop".into());
        assert_eq!(e.to_string(), "Run cancelled: user stop");
    }

    #[test]
    fn test_error_display_io() {
        let e = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.to_string(), "IO error: gone");
    }

    // =========================================================================
    // Sub-error Display tests
    // =========================================================================

    #[test]
    fn test_hamiltonian_error_display_not_hermitian() {
        let e = HamiltonianError::NotHermitian {
            row: 0,
            col: 1,
            deviation: 0.5,
        };
        assert_eq!(
            e.to_string(),
            "must be Hermitian (H = H†), entry (0, 1) deviates by 5.000e-1"
        );
    }

    #[test]
    fn test_hamiltonian_error_display_ragged() {
        let e = HamiltonianError::Ragged {
            row: 1,
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            e.to_string(),
            "must be a 2D matrix, row 1 has 3 entries (expected 2)"
        );
    }

    #[test]
    fn test_circuit_error_display_arity() {
        let e = CircuitError::ArityMismatch {
            gate: "cnot".into(),
            expected: 2,
            qubits: vec![0],
        };
        assert_eq!(
            e.to_string(),
            "Invalid number of qubits for gate cnot: [0] (expected 2)"
        );
    }

    #[test]
    fn test_circuit_error_unsupported_classification() {
        assert!(CircuitError::UnsupportedGate { gate: "x".into() }.is_unsupported_gate());
        assert!(CircuitError::ArityMismatch {
            gate: "h".into(),
            expected: 1,
            qubits: vec![0, 1],
        }
        .is_unsupported_gate());
        assert!(!CircuitError::TooManyBits {
            num_bits: 3,
            num_qubits: 2
        }
        .is_unsupported_gate());
    }

    #[test]
    fn test_backend_error_display_execution_failed() {
        let e = BackendError::ExecutionFailed("job 42 failed".into());
        assert_eq!(e.to_string(), "Execution failed: job 42 failed");
    }

    #[test]
    fn test_backend_error_display_timeout() {
        let e = BackendError::Timeout("300s".into());
        assert_eq!(e.to_string(), "Timeout: 300s");
    }

    // =========================================================================
    // Error::source() tests
    // =========================================================================

    #[test]
    fn test_error_source_backend() {
        let e = Error::Backend(BackendError::Unavailable("offline".into()));
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_hamiltonian() {
        let e = Error::Hamiltonian(HamiltonianError::Empty);
        assert!(e.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_config() {
        let e = Error::Config("x".into());
        assert!(e.source().is_none());
    }

    // =========================================================================
    // From impls
    // =========================================================================

    #[test]
    fn test_from_backend_error() {
        let e: Error = BackendError::NotFound("x".into()).into();
        assert!(matches!(e, Error::Backend(BackendError::NotFound(_))));
    }

    #[test]
    fn test_from_circuit_error() {
        let e: Error = CircuitError::UnsupportedGate { gate: "q".into() }.into();
        assert!(matches!(e, Error::Circuit(_)));
    }

    #[test]
    fn test_from_serde_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("{{{{").unwrap_err();
        let e: Error = yaml_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Serialization(_)));
    }
}
