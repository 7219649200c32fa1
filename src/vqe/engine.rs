// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! The VQE optimization loop.

use std::time::Instant;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, info, warn};

use super::state::OptimizationState;
use super::types::{IterationCallback, IterationEvent, ValidationReport, VqeResult, VqeSettings};
use crate::backend::{Ansatz, QuantumBackend};
use crate::config::OptimizerConfig;
use crate::error::Result;
use crate::gradient::{GradientEstimator, GradientMethod, PlateauDetector};
use crate::hamiltonian::{GroundState, Hamiltonian};
use crate::optimizer::{Minimizer, OptimizerKind, Problem};

/// Minimizes ⟨ψ(θ)|H|ψ(θ)⟩ over the parameters of an ansatz.
///
/// The engine owns its backend and is not reentrant: one run at a time,
/// and every run starts from cleared bookkeeping.
pub struct VqeEngine<B, A> {
    backend: B,
    hamiltonian: Hamiltonian,
    ansatz: A,
    settings: VqeSettings,
    state: OptimizationState,
}

impl<B: QuantumBackend, A: Ansatz> VqeEngine<B, A> {
    /// Validate `matrix` as a Hermitian operator and build an engine.
    pub fn new(
        backend: B,
        matrix: Array2<Complex64>,
        ansatz: A,
        settings: VqeSettings,
    ) -> Result<Self> {
        let hamiltonian =
            Hamiltonian::with_tolerance(matrix, settings.hermitian_rtol, settings.hermitian_atol)?;
        Self::with_hamiltonian(backend, hamiltonian, ansatz, settings)
    }

    /// Build an engine from an already validated Hamiltonian.
    pub fn with_hamiltonian(
        backend: B,
        hamiltonian: Hamiltonian,
        ansatz: A,
        settings: VqeSettings,
    ) -> Result<Self> {
        settings.validate()?;
        info!(
            backend = %backend.name(),
            backend_type = %backend.backend_type(),
            hamiltonian_dim = hamiltonian.dim(),
            gradient_method = %settings.gradient_method,
            "VQE engine initialized"
        );
        Ok(Self {
            backend,
            hamiltonian,
            ansatz,
            settings,
            state: OptimizationState::default(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn hamiltonian(&self) -> &Hamiltonian {
        &self.hamiltonian
    }

    pub fn settings(&self) -> &VqeSettings {
        &self.settings
    }

    /// Bookkeeping of the current or most recent run.
    pub fn state(&self) -> &OptimizationState {
        &self.state
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Energy at `params`. Counts as one energy evaluation.
    pub fn evaluate_energy(&mut self, params: &[f64]) -> Result<f64> {
        self.state.energy_eval_count += 1;
        evaluate(&mut self.backend, &self.ansatz, &self.hamiltonian, params)
    }

    /// Gradient at `params` with the configured scheme.
    ///
    /// Counts as one gradient evaluation and `2·n` energy evaluations.
    pub fn compute_gradients(&mut self, params: &[f64]) -> Result<Vec<f64>> {
        self.state.gradient_eval_count += 1;
        let estimator = self.settings.estimator();
        estimator.estimate(params, |p| self.evaluate_energy(p))
    }

    /// Exact ground state by diagonalization.
    pub fn compute_exact_ground_state(&self) -> GroundState {
        self.hamiltonian.ground_state()
    }

    /// Compare a run's energy with the exact ground-state energy.
    pub fn validate_result(&self, result: &VqeResult, tolerance: f64) -> ValidationReport {
        let exact = self.compute_exact_ground_state().energy;
        let report = ValidationReport::new(exact, result.optimal_energy, tolerance);
        info!(
            exact_energy = report.exact_energy,
            vqe_energy = report.vqe_energy,
            error = report.error,
            converged = report.converged,
            "VQE result validated"
        );
        report
    }

    /// Run with one of the built-in minimizers at default settings.
    pub fn run(
        &mut self,
        initial_params: &[f64],
        optimizer: OptimizerKind,
        max_iter: u64,
        tol: f64,
        callback: Option<IterationCallback<'_>>,
    ) -> Result<VqeResult> {
        let minimizer = optimizer.minimizer();
        self.run_with(minimizer.as_ref(), initial_params, max_iter, tol, callback)
    }

    /// Run with the minimizer, solver settings and stopping criteria of
    /// `config`.
    pub fn run_configured(
        &mut self,
        config: &OptimizerConfig,
        initial_params: &[f64],
        callback: Option<IterationCallback<'_>>,
    ) -> Result<VqeResult> {
        let kind: OptimizerKind = config.method.parse()?;
        let minimizer = kind.build(config);
        self.run_with(
            minimizer.as_ref(),
            initial_params,
            config.max_iter,
            config.tol,
            callback,
        )
    }

    /// Run with any minimizer.
    ///
    /// Errors from the backend, the ansatz or the callback abort the run
    /// and are returned unchanged.
    pub fn run_with(
        &mut self,
        minimizer: &dyn Minimizer,
        initial_params: &[f64],
        max_iter: u64,
        tol: f64,
        callback: Option<IterationCallback<'_>>,
    ) -> Result<VqeResult> {
        self.state.reset();
        let with_gradient =
            minimizer.uses_gradient() && self.settings.gradient_method != GradientMethod::None;

        info!(
            backend = %self.backend.name(),
            hamiltonian_dim = self.hamiltonian.dim(),
            num_params = initial_params.len(),
            optimizer = %minimizer.name(),
            gradient_method = %self.settings.gradient_method,
            plateau_check = self.settings.plateau.is_enabled(),
            "Starting VQE optimization"
        );

        let start = Instant::now();
        let outcome = {
            let mut problem = EngineProblem {
                backend: &mut self.backend,
                ansatz: &self.ansatz,
                hamiltonian: &self.hamiltonian,
                state: &mut self.state,
                estimator: self.settings.estimator(),
                detector: self.settings.plateau,
                progress_interval: self.settings.progress_interval,
                with_gradient,
                callback,
            };
            minimizer.minimize(&mut problem, initial_params, tol, max_iter)
        };
        let execution_time = start.elapsed();

        let report = match outcome {
            Ok(report) => report,
            Err(err) => {
                warn!(
                    error = %err,
                    iteration = self.state.iteration,
                    "VQE optimization aborted"
                );
                return Err(err);
            }
        };

        let state = &self.state;
        let result = VqeResult {
            optimal_energy: report.value,
            optimal_params: report.params,
            energy_history: state.energy_history.clone(),
            param_history: state.param_history.clone(),
            gradient_history: state.gradient_history.clone(),
            iterations: state.iteration,
            success: report.success,
            message: report.message,
            execution_time,
            energy_evaluations: state.energy_eval_count,
            gradient_evaluations: state.gradient_eval_count,
            plateau_detected: !state.plateau_iterations.is_empty(),
            plateau_iterations: state.plateau_iterations.iter().copied().collect(),
            gradient_variance: state.gradient_variances.clone(),
            backend_name: self.backend.name().to_string(),
            optimizer: minimizer.name().to_string(),
        };

        info!(
            optimal_energy = result.optimal_energy,
            success = result.success,
            message = %result.message,
            iterations = result.iterations,
            energy_evaluations = result.energy_evaluations,
            gradient_evaluations = result.gradient_evaluations,
            elapsed_ms = execution_time.as_millis() as u64,
            "VQE optimization complete"
        );
        if result.plateau_detected {
            warn!(
                plateau_iterations = ?result.plateau_iterations,
                "Barren plateau detected during optimization"
            );
        }

        Ok(result)
    }
}

/// One energy evaluation: clear, reset, build, execute, measure.
fn evaluate<B: QuantumBackend, A: Ansatz>(
    backend: &mut B,
    ansatz: &A,
    hamiltonian: &Hamiltonian,
    params: &[f64],
) -> Result<f64> {
    backend.clear_circuit()?;
    backend.reset_state()?;
    ansatz.apply(backend, params)?;
    backend.execute_circuit()?;
    let energy = backend.compute_expectation(hamiltonian)?;
    debug!(energy, ?params, "Energy evaluated");
    Ok(energy)
}

/// The engine's objective as handed to a minimizer.
struct EngineProblem<'e, 'c, B, A> {
    backend: &'e mut B,
    ansatz: &'e A,
    hamiltonian: &'e Hamiltonian,
    state: &'e mut OptimizationState,
    estimator: GradientEstimator,
    detector: PlateauDetector,
    progress_interval: usize,
    with_gradient: bool,
    callback: Option<IterationCallback<'c>>,
}

impl<B: QuantumBackend, A: Ansatz> EngineProblem<'_, '_, B, A> {
    fn energy(&mut self, params: &[f64]) -> Result<f64> {
        self.state.energy_eval_count += 1;
        evaluate(self.backend, self.ansatz, self.hamiltonian, params)
    }
}

impl<B: QuantumBackend, A: Ansatz> Problem for EngineProblem<'_, '_, B, A> {
    fn cost(&mut self, x: &[f64]) -> Result<f64> {
        let energy = self.energy(x)?;

        self.state.iteration += 1;
        self.state.energy_history.push(energy);
        self.state.param_history.push(x.to_vec());

        let iteration = self.state.iteration;
        if iteration % self.progress_interval == 0 {
            info!(iteration, energy, "VQE progress");
        }

        if let Some(callback) = self.callback.as_deref_mut() {
            callback(&IterationEvent {
                iteration,
                energy,
                params: x,
                gradient: self.state.last_gradient.as_deref(),
            })?;
        }

        Ok(energy)
    }

    fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        self.state.gradient_eval_count += 1;
        let estimator = self.estimator;
        let gradient = estimator.estimate(x, |p| self.energy(p))?;

        let check = self.detector.check(&gradient);
        self.state.gradient_variances.push(check.variance);
        if check.is_plateau {
            self.state.plateau_iterations.insert(self.state.iteration);
            warn!(
                iteration = self.state.iteration,
                variance = check.variance,
                norm = check.norm,
                "Possible barren plateau: gradient vanishing"
            );
        }

        self.state.gradient_history.push(gradient.clone());
        self.state.last_gradient = Some(gradient.clone());
        Ok(gradient)
    }

    fn provides_gradient(&self) -> bool {
        self.with_gradient
    }
}
