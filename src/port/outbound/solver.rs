//! Solver port for linear programming.
//!
//! Defines the contract between the LP model builder and an external solver
//! engine. The engine is a black box satisfying the standard LP duality
//! contract: an optimal primal/dual pair, or a definitive infeasible/unbounded
//! verdict.
//!
//! # Overview
//!
//! - [`Solver`]: Core LP solver interface
//! - [`LpProblem`]: Problem definition
//! - [`LpSolution`]: Primal values, row duals and status

use crate::domain::{Constraint, VariableBounds};
use crate::error::SolveError;

/// Linear programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, GLPK, etc.) and
/// provide a unified interface for optimization problems.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) so that Monte Carlo
/// scenarios can be solved concurrently from several worker threads.
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve a linear programming problem.
    ///
    /// Infeasible and unbounded problems are reported through
    /// [`LpSolution::status`], not as errors.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Engine`] if the engine fails for any other reason.
    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolveError>;
}

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationSense {
    Minimize,
    Maximize,
}

/// Linear programming problem definition.
///
/// ```text
/// optimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone)]
pub struct LpProblem {
    pub sense: OptimizationSense,

    /// Objective function coefficients, one per column.
    pub objective: Vec<f64>,

    /// Linear constraints on the columns, in row order.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each column.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create a problem with `num_vars` non-negative columns and a zero objective.
    #[must_use]
    pub fn new(sense: OptimizationSense, num_vars: usize) -> Self {
        Self {
            sense,
            objective: vec![0.0; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Return the number of columns.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Append a row and return its index.
    pub fn push(&mut self, constraint: Constraint) -> usize {
        self.constraints.push(constraint);
        self.constraints.len() - 1
    }
}

/// Solution to a linear programming problem.
#[derive(Debug, Clone)]
pub struct LpSolution {
    /// Optimal value of each column.
    pub values: Vec<f64>,

    /// Optimal objective function value.
    pub objective: f64,

    /// Row duals exactly as reported by the engine, one per row.
    ///
    /// Sign conventions differ between engines; callers needing a signed
    /// shadow price derive the sign from the row sense.
    pub duals: Vec<f64>,

    /// Termination status of the solver.
    pub status: SolutionStatus,
}

impl LpSolution {
    /// A solution carrying only a non-optimal status.
    #[must_use]
    pub fn without_values(status: SolutionStatus) -> Self {
        Self {
            values: Vec::new(),
            objective: 0.0,
            duals: Vec::new(),
            status,
        }
    }

    /// Return `true` if the solver found an optimal solution.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solver found a globally optimal solution.
    Optimal,

    /// No feasible solution exists.
    Infeasible,

    /// Objective function is unbounded.
    Unbounded,
}
