// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validated Hermitian observables.
//!
//! A [`Hamiltonian`] can only be obtained through validation, so every value
//! of this type is a finite, square, Hermitian matrix. Exact diagonalization
//! (used for offline validation of VQE results) goes through nalgebra's
//! Hermitian eigen-solver.

use std::path::Path;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, HamiltonianError, Result};

/// Default relative tolerance for the Hermiticity check.
pub const DEFAULT_HERMITIAN_RTOL: f64 = 1e-5;

/// Default absolute tolerance for the Hermiticity check.
pub const DEFAULT_HERMITIAN_ATOL: f64 = 1e-8;

/// A finite, square, Hermitian matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Hamiltonian {
    matrix: Array2<Complex64>,
}

/// Smallest eigenpair of a Hamiltonian.
#[derive(Debug, Clone)]
pub struct GroundState {
    /// Ground-state energy (smallest eigenvalue).
    pub energy: f64,
    /// Normalized eigenvector for `energy`.
    pub state: Array1<Complex64>,
}

impl Hamiltonian {
    /// Validate `matrix` with the default tolerances.
    pub fn new(matrix: Array2<Complex64>) -> std::result::Result<Self, HamiltonianError> {
        Self::with_tolerance(matrix, DEFAULT_HERMITIAN_RTOL, DEFAULT_HERMITIAN_ATOL)
    }

    /// Validate `matrix`, accepting `|H_ij - conj(H_ji)| <= atol + rtol * |H_ji|`.
    pub fn with_tolerance(
        matrix: Array2<Complex64>,
        rtol: f64,
        atol: f64,
    ) -> std::result::Result<Self, HamiltonianError> {
        let (rows, cols) = matrix.dim();
        if rows == 0 || cols == 0 {
            return Err(HamiltonianError::Empty);
        }
        if rows != cols {
            return Err(HamiltonianError::NotSquare { rows, cols });
        }

        for ((row, col), value) in matrix.indexed_iter() {
            if !value.re.is_finite() || !value.im.is_finite() {
                return Err(HamiltonianError::NotFinite { row, col });
            }
        }

        for row in 0..rows {
            for col in row..cols {
                let upper = matrix[[row, col]];
                let lower_conj = matrix[[col, row]].conj();
                let deviation = (upper - lower_conj).norm();
                if deviation > atol + rtol * lower_conj.norm() {
                    return Err(HamiltonianError::NotHermitian {
                        row,
                        col,
                        deviation,
                    });
                }
            }
        }

        Ok(Self { matrix })
    }

    /// Validate a real matrix.
    pub fn from_real(matrix: Array2<f64>) -> std::result::Result<Self, HamiltonianError> {
        Self::new(matrix.mapv(|x| Complex64::new(x, 0.0)))
    }

    /// Build from nested rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<Complex64>]) -> std::result::Result<Self, HamiltonianError> {
        let n_rows = rows.len();
        if n_rows == 0 {
            return Err(HamiltonianError::Empty);
        }
        let n_cols = rows[0].len();
        let mut flat = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != n_cols {
                return Err(HamiltonianError::Ragged {
                    row,
                    expected: n_cols,
                    actual: values.len(),
                });
            }
            flat.extend_from_slice(values);
        }
        let matrix = Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|_| {
            HamiltonianError::Ragged {
                row: 0,
                expected: n_cols,
                actual: n_cols,
            }
        })?;
        Self::new(matrix)
    }

    /// Build from nested real rows.
    pub fn from_real_rows(rows: &[Vec<f64>]) -> std::result::Result<Self, HamiltonianError> {
        let complex: Vec<Vec<Complex64>> = rows
            .iter()
            .map(|r| r.iter().map(|&x| Complex64::new(x, 0.0)).collect())
            .collect();
        Self::from_rows(&complex)
    }

    /// Load a [`HamiltonianSpec`] from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let spec: HamiltonianSpec = serde_yaml::from_str(&content)?;
        Ok(spec.into_hamiltonian()?)
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Hilbert space dimension.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of qubits, if the dimension is a power of two.
    pub fn num_qubits(&self) -> Option<u32> {
        let d = self.dim();
        d.is_power_of_two().then(|| d.trailing_zeros())
    }

    /// Real parts of the diagonal.
    pub fn diagonal(&self) -> Vec<f64> {
        self.matrix.diag().iter().map(|z| z.re).collect()
    }

    /// ⟨ψ|H|ψ⟩ for a state vector of matching dimension.
    pub fn expectation(&self, state: &[Complex64]) -> std::result::Result<f64, BackendError> {
        if state.len() != self.dim() {
            return Err(BackendError::InvalidRequest(format!(
                "state has {} amplitudes, Hamiltonian dimension is {}",
                state.len(),
                self.dim()
            )));
        }
        let psi = ArrayView1::from(state);
        let h_psi = self.matrix.dot(&psi);
        let value: Complex64 = psi
            .iter()
            .zip(h_psi.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(value.re)
    }

    /// Σ p_i H_ii from computational-basis probabilities.
    ///
    /// Exact only for observables diagonal in the computational basis;
    /// off-diagonal terms are not visible in sampled counts.
    pub fn expectation_from_probabilities(
        &self,
        probabilities: &[f64],
    ) -> std::result::Result<f64, BackendError> {
        if probabilities.len() != self.dim() {
            return Err(BackendError::InvalidRequest(format!(
                "got {} probabilities, Hamiltonian dimension is {}",
                probabilities.len(),
                self.dim()
            )));
        }
        Ok(probabilities
            .iter()
            .zip(self.diagonal())
            .map(|(p, h)| p * h)
            .sum())
    }

    /// All eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> Vec<f64> {
        let mut values: Vec<f64> = self.eigen().eigenvalues.iter().copied().collect();
        values.sort_by(f64::total_cmp);
        values
    }

    /// Smallest eigenvalue and its eigenvector.
    pub fn ground_state(&self) -> GroundState {
        let eigen = self.eigen();
        let mut index = 0;
        let mut energy = f64::INFINITY;
        for (i, &value) in eigen.eigenvalues.iter().enumerate() {
            if value < energy {
                energy = value;
                index = i;
            }
        }
        let state = eigen.eigenvectors.column(index).iter().copied().collect();
        GroundState { energy, state }
    }

    fn eigen(&self) -> SymmetricEigen<Complex64, nalgebra::Dyn> {
        let n = self.dim();
        let m = DMatrix::from_fn(n, n, |i, j| self.matrix[[i, j]]);
        SymmetricEigen::new(m)
    }
}

/// On-disk Hamiltonian description.
///
/// ```yaml
/// real: [[1.0, 0.0], [0.0, -1.0]]
/// imag: [[0.0, 0.0], [0.0, 0.0]]   # optional
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamiltonianSpec {
    /// Real parts, row-major.
    pub real: Vec<Vec<f64>>,
    /// Imaginary parts, same shape as `real`.
    #[serde(default)]
    pub imag: Option<Vec<Vec<f64>>>,
}

impl HamiltonianSpec {
    /// Validate into a [`Hamiltonian`].
    pub fn into_hamiltonian(self) -> std::result::Result<Hamiltonian, HamiltonianError> {
        let Some(imag) = self.imag else {
            return Hamiltonian::from_real_rows(&self.real);
        };
        if imag.len() != self.real.len() {
            return Err(HamiltonianError::Ragged {
                row: imag.len().min(self.real.len()),
                expected: self.real.len(),
                actual: imag.len(),
            });
        }
        let mut rows = Vec::with_capacity(self.real.len());
        for (row, (re_row, im_row)) in self.real.iter().zip(imag.iter()).enumerate() {
            if re_row.len() != im_row.len() {
                return Err(HamiltonianError::Ragged {
                    row,
                    expected: re_row.len(),
                    actual: im_row.len(),
                });
            }
            rows.push(
                re_row
                    .iter()
                    .zip(im_row.iter())
                    .map(|(&re, &im)| Complex64::new(re, im))
                    .collect(),
            );
        }
        Hamiltonian::from_rows(&rows)
    }
}
