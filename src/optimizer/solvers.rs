// Copyright 2026 Plateau Navigator Contributors
// SPDX-License-Identifier: Apache-2.0

//! `argmin` solvers behind the [`Minimizer`] contract.

use std::cell::{Cell, RefCell};

use argmin::core::{
    CostFunction, Error as ArgminError, Executor, Gradient, State, TerminationReason,
    TerminationStatus,
};
use argmin::solver::gradientdescent::SteepestDescent;
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::quasinewton::LBFGS;
use tracing::debug;

use super::{Minimizer, MinimizerReport, Problem};
use crate::error::{Error, Result};
use crate::gradient::{GradientEstimator, GradientMethod};

/// Default edge length of the initial Nelder-Mead simplex.
pub const DEFAULT_SIMPLEX_STEP: f64 = 0.5;

/// Default number of correction pairs kept by L-BFGS.
pub const DEFAULT_LBFGS_MEMORY: usize = 7;

/// Presents a [`Problem`] to argmin.
///
/// argmin takes `&self` in its callbacks, so the problem sits in a
/// `RefCell`. The first error raised by the problem is parked in `failure`
/// and handed back to the caller once the executor returns. After that the
/// problem is never called again.
///
/// Some solvers unwrap their first few cost evaluations. Those calls are
/// counted in `unchecked` and answered with `+inf` instead of an error once
/// a failure is parked; the solver then aborts on its next checked call.
struct ArgminProblem<'a> {
    problem: RefCell<&'a mut dyn Problem>,
    failure: &'a RefCell<Option<Error>>,
    unchecked: Cell<usize>,
}

impl<'a> ArgminProblem<'a> {
    fn new(problem: &'a mut dyn Problem, failure: &'a RefCell<Option<Error>>) -> Self {
        Self {
            problem: RefCell::new(problem),
            failure,
            unchecked: Cell::new(0),
        }
    }

    /// The next `calls` cost evaluations must not return an error.
    fn with_unchecked_costs(self, calls: usize) -> Self {
        self.unchecked.set(calls);
        self
    }

    fn failed(&self) -> bool {
        self.failure.borrow().is_some()
    }

    fn aborted() -> ArgminError {
        ArgminError::msg("evaluation aborted after an earlier failure")
    }

    fn capture<T>(&self, outcome: Result<T>) -> std::result::Result<T, ArgminError> {
        outcome.map_err(|err| {
            let message = err.to_string();
            let mut slot = self.failure.borrow_mut();
            if slot.is_none() {
                *slot = Some(err);
            }
            ArgminError::msg(message)
        })
    }
}

impl CostFunction for ArgminProblem<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> std::result::Result<Self::Output, ArgminError> {
        let unchecked = self.unchecked.get();
        if unchecked > 0 {
            self.unchecked.set(unchecked - 1);
        }

        let outcome = if self.failed() {
            Err(Self::aborted())
        } else {
            let outcome = self.problem.borrow_mut().cost(param);
            self.capture(outcome)
        };

        match outcome {
            Err(_) if unchecked > 0 => Ok(f64::INFINITY),
            other => other,
        }
    }
}

impl Gradient for ArgminProblem<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, param: &Self::Param) -> std::result::Result<Self::Gradient, ArgminError> {
        if self.failed() {
            return Err(Self::aborted());
        }
        let outcome = {
            let mut problem = self.problem.borrow_mut();
            if problem.provides_gradient() {
                problem.gradient(param)
            } else {
                // No analytic gradient: central differences over the objective
                GradientEstimator::new(GradientMethod::FiniteDifference)
                    .estimate(param, |x| problem.cost(x))
            }
        };
        self.capture(outcome)
    }
}

/// Turn the executor outcome into a report, preferring the problem's own error.
fn finish(
    outcome: std::result::Result<MinimizerReport, ArgminError>,
    failure: RefCell<Option<Error>>,
) -> Result<MinimizerReport> {
    if let Some(err) = failure.into_inner() {
        return Err(err);
    }
    outcome.map_err(|err| Error::Minimizer(err.to_string()))
}

fn report<S>(state: &S, x0: &[f64]) -> MinimizerReport
where
    S: State<Param = Vec<f64>, Float = f64>,
{
    let (success, message) = match state.get_termination_status() {
        TerminationStatus::Terminated(reason) => describe(reason),
        TerminationStatus::NotTerminated => {
            (false, "Solver stopped without a termination reason".to_string())
        }
    };
    MinimizerReport {
        value: state.get_best_cost(),
        params: state
            .get_best_param()
            .cloned()
            .unwrap_or_else(|| x0.to_vec()),
        success,
        message,
        iterations: state.get_iter(),
    }
}

fn describe(reason: &TerminationReason) -> (bool, String) {
    match reason {
        TerminationReason::SolverConverged => {
            (true, "Optimization terminated successfully.".to_string())
        }
        TerminationReason::TargetCostReached => (true, "Target cost reached.".to_string()),
        TerminationReason::MaxItersReached => (
            false,
            "Maximum number of iterations has been exceeded.".to_string(),
        ),
        other => (false, format!("Solver terminated: {other:?}")),
    }
}

/// Nothing to search over; evaluate once and report.
fn evaluate_only(problem: &mut dyn Problem) -> Result<MinimizerReport> {
    let value = problem.cost(&[])?;
    Ok(MinimizerReport {
        value,
        params: Vec::new(),
        success: true,
        message: "No parameters to optimize.".to_string(),
        iterations: 0,
    })
}

fn invalid_setting(err: ArgminError) -> Error {
    Error::Config(format!("invalid solver setting: {err}"))
}

/// Derivative-free Nelder-Mead simplex search.
///
/// Terminates when the standard deviation of the simplex costs drops
/// below `tol`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadMinimizer {
    simplex_step: f64,
}

impl NelderMeadMinimizer {
    /// Initial simplex spans `x0` and `x0 + simplex_step·eᵢ`.
    pub fn new(simplex_step: f64) -> Self {
        Self { simplex_step }
    }

    fn simplex(&self, x0: &[f64]) -> Vec<Vec<f64>> {
        let mut vertices = Vec::with_capacity(x0.len() + 1);
        vertices.push(x0.to_vec());
        for i in 0..x0.len() {
            let mut vertex = x0.to_vec();
            vertex[i] += self.simplex_step;
            vertices.push(vertex);
        }
        vertices
    }
}

impl Default for NelderMeadMinimizer {
    fn default() -> Self {
        Self::new(DEFAULT_SIMPLEX_STEP)
    }
}

impl Minimizer for NelderMeadMinimizer {
    fn name(&self) -> &str {
        "nelder-mead"
    }

    fn uses_gradient(&self) -> bool {
        false
    }

    fn minimize(
        &self,
        problem: &mut dyn Problem,
        x0: &[f64],
        tol: f64,
        max_iter: u64,
    ) -> Result<MinimizerReport> {
        if x0.is_empty() {
            return evaluate_only(problem);
        }
        if !self.simplex_step.is_finite() || self.simplex_step <= 0.0 {
            return Err(Error::Config(format!(
                "simplex step must be positive, got {}",
                self.simplex_step
            )));
        }

        let solver = NelderMead::new(self.simplex(x0))
            .with_sd_tolerance(tol)
            .map_err(invalid_setting)?;
        debug!(dim = x0.len(), tol, max_iter, "Starting Nelder-Mead");

        // argmin unwraps the cost of every initial vertex
        let failure = RefCell::new(None);
        let adapter = ArgminProblem::new(problem, &failure).with_unchecked_costs(x0.len() + 1);
        let outcome = Executor::new(adapter, solver)
            .configure(|state| state.param(x0.to_vec()).max_iters(max_iter))
            .run()
            .map(|result| report(result.state(), x0));
        finish(outcome, failure)
    }
}

/// Limited-memory BFGS with a Moré-Thuente line search.
///
/// Terminates when the gradient norm drops below `tol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LbfgsMinimizer {
    memory: usize,
}

impl LbfgsMinimizer {
    /// Keep `memory` correction pairs.
    pub fn new(memory: usize) -> Self {
        Self { memory }
    }
}

impl Default for LbfgsMinimizer {
    fn default() -> Self {
        Self::new(DEFAULT_LBFGS_MEMORY)
    }
}

impl Minimizer for LbfgsMinimizer {
    fn name(&self) -> &str {
        "l-bfgs"
    }

    fn uses_gradient(&self) -> bool {
        true
    }

    fn minimize(
        &self,
        problem: &mut dyn Problem,
        x0: &[f64],
        tol: f64,
        max_iter: u64,
    ) -> Result<MinimizerReport> {
        if x0.is_empty() {
            return evaluate_only(problem);
        }
        if self.memory == 0 {
            return Err(Error::Config("L-BFGS memory must be at least 1".to_string()));
        }

        let solver = LBFGS::new(MoreThuenteLineSearch::new(), self.memory)
            .with_tolerance_grad(tol)
            .map_err(invalid_setting)?;
        debug!(dim = x0.len(), memory = self.memory, tol, max_iter, "Starting L-BFGS");

        let failure = RefCell::new(None);
        let outcome = Executor::new(ArgminProblem::new(problem, &failure), solver)
            .configure(|state| state.param(x0.to_vec()).max_iters(max_iter))
            .run()
            .map(|result| report(result.state(), x0));
        finish(outcome, failure)
    }
}

/// Steepest descent with a Moré-Thuente line search.
///
/// Has no convergence test of its own; it runs until `max_iter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteepestDescentMinimizer;

impl SteepestDescentMinimizer {
    pub fn new() -> Self {
        Self
    }
}

impl Minimizer for SteepestDescentMinimizer {
    fn name(&self) -> &str {
        "steepest-descent"
    }

    fn uses_gradient(&self) -> bool {
        true
    }

    fn minimize(
        &self,
        problem: &mut dyn Problem,
        x0: &[f64],
        _tol: f64,
        max_iter: u64,
    ) -> Result<MinimizerReport> {
        if x0.is_empty() {
            return evaluate_only(problem);
        }

        let solver = SteepestDescent::new(MoreThuenteLineSearch::new());
        debug!(dim = x0.len(), max_iter, "Starting steepest descent");

        let failure = RefCell::new(None);
        let outcome = Executor::new(ArgminProblem::new(problem, &failure), solver)
            .configure(|state| state.param(x0.to_vec()).max_iters(max_iter))
            .run()
            .map(|result| report(result.state(), x0));
        finish(outcome, failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// f(x) = Σ (xᵢ − cᵢ)², optionally with an analytic gradient.
    struct Quadratic {
        center: Vec<f64>,
        analytic: bool,
        cost_calls: usize,
        gradient_calls: usize,
    }

    impl Quadratic {
        fn new(center: Vec<f64>, analytic: bool) -> Self {
            Self {
                center,
                analytic,
                cost_calls: 0,
                gradient_calls: 0,
            }
        }
    }

    impl Problem for Quadratic {
        fn cost(&mut self, x: &[f64]) -> Result<f64> {
            self.cost_calls += 1;
            Ok(x.iter()
                .zip(&self.center)
                .map(|(xi, ci)| (xi - ci).powi(2))
                .sum())
        }

        fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>> {
            self.gradient_calls += 1;
            Ok(x.iter()
                .zip(&self.center)
                .map(|(xi, ci)| 2.0 * (xi - ci))
                .collect())
        }

        fn provides_gradient(&self) -> bool {
            self.analytic
        }
    }

    /// Fails on the n-th cost evaluation.
    struct FailsAfter {
        remaining: usize,
    }

    impl Problem for FailsAfter {
        fn cost(&mut self, x: &[f64]) -> Result<f64> {
            if self.remaining == 0 {
                return Err(Error::Cancelled("stop requested".to_string()));
            }
            self.remaining -= 1;
            Ok(x.iter().map(|v| v * v).sum())
        }

        fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>> {
            Ok(x.iter().map(|v| 2.0 * v).collect())
        }

        fn provides_gradient(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_nelder_mead_finds_minimum() {
        let mut problem = Quadratic::new(vec![1.0, -2.0], false);
        let report = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[0.0, 0.0], 1e-10, 500)
            .unwrap();
        assert!(report.success, "{}", report.message);
        assert_abs_diff_eq!(report.params[0], 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(report.params[1], -2.0, epsilon = 1e-3);
        assert!(report.value < 1e-6);
        assert_eq!(problem.gradient_calls, 0);
    }

    #[test]
    fn test_lbfgs_uses_analytic_gradient() {
        let mut problem = Quadratic::new(vec![0.5, 1.5, -1.0], true);
        let report = LbfgsMinimizer::default()
            .minimize(&mut problem, &[0.0, 0.0, 0.0], 1e-8, 100)
            .unwrap();
        assert!(report.success, "{}", report.message);
        assert!(report.value < 1e-10);
        assert!(problem.gradient_calls > 0);
    }

    #[test]
    fn test_lbfgs_falls_back_to_finite_differences() {
        let mut problem = Quadratic::new(vec![2.0], false);
        let report = LbfgsMinimizer::default()
            .minimize(&mut problem, &[0.0], 1e-6, 100)
            .unwrap();
        assert_abs_diff_eq!(report.params[0], 2.0, epsilon = 1e-4);
        assert_eq!(problem.gradient_calls, 0);
        assert!(problem.cost_calls > 2);
    }

    /// f(x, y) = x² + 10 y²; steepest descent zig-zags and never lands exactly.
    struct Elliptic;

    impl Problem for Elliptic {
        fn cost(&mut self, x: &[f64]) -> Result<f64> {
            Ok(x[0] * x[0] + 10.0 * x[1] * x[1])
        }

        fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![2.0 * x[0], 20.0 * x[1]])
        }

        fn provides_gradient(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_steepest_descent_makes_progress() {
        let mut problem = Elliptic;
        let start = problem.cost(&[3.0, 1.0]).unwrap();
        let report = SteepestDescentMinimizer::new()
            .minimize(&mut problem, &[3.0, 1.0], 1e-6, 5)
            .unwrap();
        assert!(report.value < start);
        assert!(report.iterations <= 5);
    }

    #[test]
    fn test_problem_error_returned_unchanged() {
        let mut problem = FailsAfter { remaining: 3 };
        let err = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[1.0, 1.0], 1e-8, 100)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(ref msg) if msg == "stop requested"));
    }

    #[test]
    fn test_problem_error_from_gradient_solver() {
        let mut problem = FailsAfter { remaining: 0 };
        let err = LbfgsMinimizer::default()
            .minimize(&mut problem, &[1.0], 1e-8, 100)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[test]
    fn test_nelder_mead_error_on_first_vertex() {
        let mut problem = FailsAfter { remaining: 0 };
        let err = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[1.0, 1.0], 1e-8, 100)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(ref msg) if msg == "stop requested"));
    }

    /// Counts calls made after the first failure.
    struct CountsAfterFailure {
        fail_at: usize,
        calls: usize,
    }

    impl Problem for CountsAfterFailure {
        fn cost(&mut self, x: &[f64]) -> Result<f64> {
            self.calls += 1;
            if self.calls == self.fail_at {
                return Err(Error::Cancelled("stop requested".to_string()));
            }
            Ok(x.iter().map(|v| v * v).sum())
        }

        fn gradient(&mut self, x: &[f64]) -> Result<Vec<f64>> {
            Ok(x.iter().map(|v| 2.0 * v).collect())
        }

        fn provides_gradient(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_nelder_mead_error_inside_initial_simplex() {
        // Three parameters: four vertices, failing on the second
        let mut problem = CountsAfterFailure {
            fail_at: 2,
            calls: 0,
        };
        let err = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[1.0, 1.0, 1.0], 1e-8, 100)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
        // The problem is not touched again once it has failed
        assert_eq!(problem.calls, 2);
    }

    #[test]
    fn test_nelder_mead_error_after_initial_simplex() {
        let mut problem = CountsAfterFailure {
            fail_at: 4,
            calls: 0,
        };
        let err = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[1.0, 1.0], 1e-8, 100)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
        assert_eq!(problem.calls, 4);
    }

    #[test]
    fn test_problem_error_from_steepest_descent() {
        let mut problem = FailsAfter { remaining: 0 };
        let err = SteepestDescentMinimizer::new()
            .minimize(&mut problem, &[1.0], 1e-8, 10)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[test]
    fn test_empty_parameters_evaluate_once() {
        let mut problem = Quadratic::new(vec![], false);
        let report = NelderMeadMinimizer::default()
            .minimize(&mut problem, &[], 1e-6, 10)
            .unwrap();
        assert!(report.success);
        assert_eq!(report.value, 0.0);
        assert_eq!(problem.cost_calls, 1);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut problem = Quadratic::new(vec![0.0], false);
        assert!(matches!(
            NelderMeadMinimizer::new(0.0).minimize(&mut problem, &[1.0], 1e-6, 10),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            NelderMeadMinimizer::default().minimize(&mut problem, &[1.0], -1.0, 10),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            LbfgsMinimizer::new(0).minimize(&mut problem, &[1.0], 1e-6, 10),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(NelderMeadMinimizer::default().name(), "nelder-mead");
        assert_eq!(LbfgsMinimizer::default().name(), "l-bfgs");
        assert_eq!(SteepestDescentMinimizer::new().name(), "steepest-descent");
    }
}
