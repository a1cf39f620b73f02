//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear programming solver reached
//! through its C API. This implementation wraps it using the good_lp crate and
//! additionally reads row duals for shadow-price reporting.

use good_lp::solvers::highs::highs;
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use tracing::trace;

use crate::domain::{Constraint, ConstraintSense};
use crate::error::SolveError;
use crate::port::{LpProblem, LpSolution, OptimizationSense, SolutionStatus, Solver};

/// HiGHS-based LP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver;

impl HiGHSSolver {
    /// Create a new HiGHS solver instance.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolveError> {
        solve_with_good_lp(problem)
    }
}

fn row_expression(columns: &[Variable], constr: &Constraint) -> Expression {
    columns
        .iter()
        .zip(constr.coefficients.iter())
        .map(|(v, c)| *c * *v)
        .sum()
}

/// Internal solver implementation using good_lp.
fn solve_with_good_lp(problem: &LpProblem) -> Result<LpSolution, SolveError> {
    let n = problem.num_vars();

    // No columns: every row reduces to 0 {<=,>=,=} rhs.
    if n == 0 {
        let feasible = problem.constraints.iter().all(|c| match c.sense {
            ConstraintSense::LessEqual => c.rhs >= 0.0,
            ConstraintSense::GreaterEqual => c.rhs <= 0.0,
            ConstraintSense::Equal => c.rhs == 0.0,
        });
        if !feasible {
            return Ok(LpSolution::without_values(SolutionStatus::Infeasible));
        }
        return Ok(LpSolution {
            values: vec![],
            objective: 0.0,
            duals: vec![0.0; problem.constraints.len()],
            status: SolutionStatus::Optimal,
        });
    }

    let mut vars = variables!();
    let mut columns = Vec::with_capacity(n);

    for bounds in &problem.bounds {
        let mut v = variable();
        if let Some(lb) = bounds.lower {
            v = v.min(lb);
        }
        if let Some(ub) = bounds.upper {
            v = v.max(ub);
        }
        columns.push(vars.add(v));
    }

    let objective: Expression = columns
        .iter()
        .zip(problem.objective.iter())
        .map(|(v, c)| *c * *v)
        .sum();

    let unsolved = match problem.sense {
        OptimizationSense::Minimize => vars.minimise(&objective),
        OptimizationSense::Maximize => vars.maximise(&objective),
    };
    let mut model = unsolved.using(highs);

    let mut rows = Vec::with_capacity(problem.constraints.len());
    for constr in &problem.constraints {
        let lhs = row_expression(&columns, constr);
        let rhs = constr.rhs;
        let reference = match constr.sense {
            ConstraintSense::GreaterEqual => model.add_constraint(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.add_constraint(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.add_constraint(constraint!(lhs == rhs)),
        };
        rows.push(reference);
    }

    match model.solve() {
        Ok(mut solution) => {
            let values: Vec<f64> = columns.iter().map(|v| solution.value(*v)).collect();

            // Re-evaluate objective with the solved values
            let obj_value: f64 = values
                .iter()
                .zip(problem.objective.iter())
                .map(|(v, c)| v * c)
                .sum();

            let dual = solution.compute_dual();
            let duals: Vec<f64> = rows.into_iter().map(|row| dual.dual(row)).collect();

            Ok(LpSolution {
                values,
                objective: obj_value,
                duals,
                status: SolutionStatus::Optimal,
            })
        }
        Err(ResolutionError::Infeasible) => {
            trace!("highs reported infeasible");
            Ok(LpSolution::without_values(SolutionStatus::Infeasible))
        }
        Err(ResolutionError::Unbounded) => {
            trace!("highs reported unbounded");
            Ok(LpSolution::without_values(SolutionStatus::Unbounded))
        }
        Err(other) => Err(SolveError::Engine(other.to_string())),
    }
}
