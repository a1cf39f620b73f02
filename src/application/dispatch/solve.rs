//! Solve service: builds the LP, calls the solver port, and translates the
//! engine's answer back into a [`SolveResult`].
//!
//! Translation contract:
//! - engine status maps to Optimal / Infeasible; unbounded or engine failure
//!   is a [`SolveError`] and yields no partial result
//! - route tons are recovered from the Charnes–Cooper substitution when the
//!   formulation carries a scale column
//! - shadow prices are reported per descriptor constraint, in descriptor order

use std::sync::Arc;

use tracing::{debug, warn};

use super::builder::{build, LpFormulation};
use crate::domain::{
    ModelDescriptor, ObjectiveMode, RouteAllocation, SolveResult, SolveStatus,
};
use crate::error::SolveError;
use crate::port::{LpSolution, SolutionStatus, Solver};

/// Scale values at or below this are treated as `t = 0`.
const MIN_SCALE: f64 = 1e-12;

/// Costs at or below this make ROI undefined; it is reported as zero.
const MIN_COST: f64 = 1e-9;

/// Dispatch solve service over a pluggable [`Solver`] backend.
#[derive(Clone)]
pub struct DispatchSolver {
    solver: Arc<dyn Solver>,
}

impl DispatchSolver {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self { solver }
    }

    /// Name of the underlying engine.
    #[must_use]
    pub fn engine_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Build and solve `model` at `vars`.
    ///
    /// `vars` must hold exactly `model.n_vars` values.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] when the engine reports an unbounded problem or
    /// a numerical failure. Infeasibility is an `Ok` result.
    pub fn try_solve(
        &self,
        model: &ModelDescriptor,
        vars: &[f64],
    ) -> Result<SolveResult, SolveError> {
        let formulation = build(model, vars);
        let solution = self.solver.solve_lp(&formulation.problem)?;
        match solution.status {
            SolutionStatus::Optimal => translate(model.objective, &formulation, &solution),
            SolutionStatus::Infeasible => Ok(SolveResult::infeasible()),
            SolutionStatus::Unbounded => Err(SolveError::Unbounded),
        }
    }

    /// Like [`try_solve`](Self::try_solve), folding errors into
    /// [`SolveStatus::Error`].
    pub fn solve(&self, model: &ModelDescriptor, vars: &[f64]) -> SolveResult {
        match self.try_solve(model, vars) {
            Ok(result) => {
                debug!(status = ?result.status, profit = result.profit, "solve finished");
                result
            }
            Err(e) => {
                warn!(error = %e, engine = self.engine_name(), "solve failed");
                SolveResult::error()
            }
        }
    }
}

fn translate(
    mode: ObjectiveMode,
    formulation: &LpFormulation,
    solution: &LpSolution,
) -> Result<SolveResult, SolveError> {
    let columns = formulation.problem.num_vars();
    if solution.values.len() != columns {
        return Err(SolveError::DimensionMismatch {
            expected: columns,
            got: solution.values.len(),
        });
    }
    let n_rows = formulation.problem.constraints.len();
    if solution.duals.len() != n_rows {
        return Err(SolveError::DimensionMismatch {
            expected: n_rows,
            got: solution.duals.len(),
        });
    }

    let n = formulation.n_routes();
    let scale = match formulation.scale_column {
        Some(t_col) => {
            let t = solution.values[t_col];
            if t <= MIN_SCALE {
                return Err(SolveError::DegenerateScaling { t });
            }
            t
        }
        None => 1.0,
    };

    // Clip solver noise below zero; columns are non-negative.
    let tons: Vec<f64> = solution.values[..n]
        .iter()
        .map(|v| (v / scale).max(0.0))
        .collect();

    let profit: f64 = tons.iter().zip(&formulation.margins).map(|(x, m)| x * m).sum();
    let cost: f64 = tons
        .iter()
        .zip(&formulation.unit_costs)
        .map(|(x, c)| x * c)
        .sum();
    let roi = if cost.abs() > MIN_COST { profit / cost } else { 0.0 };

    let objective = match mode {
        ObjectiveMode::MaxProfit | ObjectiveMode::CvarAdjusted => profit,
        ObjectiveMode::MinCost => cost,
        ObjectiveMode::MaxRoi => roi,
        // CVaR of a single point estimate is zero by convention.
        ObjectiveMode::MinRisk => 0.0,
    };

    // Relaxing a binding cap can only help and tightening a minimum can only
    // hurt, so the sign follows the row sense whatever convention the engine
    // uses. Homogenized ROI rows measure a bound change in units of t.
    let shadow_prices = formulation
        .rows
        .iter()
        .map(|rows| {
            let cap = solution.duals[rows.cap].abs();
            let min = rows.min.map_or(0.0, |row| solution.duals[row].abs());
            (cap - min) * scale
        })
        .collect();

    let routes = tons
        .into_iter()
        .zip(&formulation.margins)
        .map(|(tons, &margin)| RouteAllocation { tons, margin })
        .collect();

    Ok(SolveResult {
        status: SolveStatus::Optimal,
        routes,
        profit,
        cost,
        roi,
        objective,
        shadow_prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConstraintKind, ConstraintSpec, Perturbation, Route};
    use crate::port::LpProblem;

    /// Returns a canned solution regardless of the problem.
    struct CannedSolver(LpSolution);

    impl Solver for CannedSolver {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn solve_lp(&self, _problem: &LpProblem) -> Result<LpSolution, SolveError> {
            Ok(self.0.clone())
        }
    }

    fn model(objective: ObjectiveMode) -> ModelDescriptor {
        ModelDescriptor {
            n_vars: 4,
            objective,
            risk_lambda: 0.0,
            profit_floor: 0.0,
            routes: vec![Route {
                sell_var: 0,
                buy_var: 1,
                freight_var: 2,
                transit_cost_per_day: 0.0,
                base_transit_days: 0.0,
                unit_capacity: 1.0,
            }],
            constraints: vec![ConstraintSpec {
                kind: ConstraintKind::Demand,
                bound_var: 3,
                min_var: Some(3),
                outage: None,
                routes: vec![0],
            }],
            perturbations: vec![Perturbation::fixed(); 4],
        }
    }

    const VARS: [f64; 4] = [50.0, 30.0, 10.0, 100.0];

    fn service(solution: LpSolution) -> DispatchSolver {
        DispatchSolver::new(Arc::new(CannedSolver(solution)))
    }

    #[test]
    fn translates_primal_and_signs_duals_by_row_sense() {
        // rows: [min, cap]
        let solver = service(LpSolution {
            values: vec![100.0],
            objective: 1000.0,
            duals: vec![4.0, -6.0],
            status: SolutionStatus::Optimal,
        });
        let result = solver.try_solve(&model(ObjectiveMode::MaxProfit), &VARS).unwrap();
        assert!(result.is_optimal());
        assert_eq!(result.routes[0].tons, 100.0);
        assert_eq!(result.routes[0].margin, 10.0);
        assert_eq!(result.profit, 1000.0);
        assert_eq!(result.cost, 4000.0);
        assert!((result.roi - 0.25).abs() < 1e-12);
        assert_eq!(result.shadow_prices, vec![2.0]);
    }

    #[test]
    fn infeasible_engine_status_is_a_result() {
        let solver = service(LpSolution::without_values(SolutionStatus::Infeasible));
        let result = solver.try_solve(&model(ObjectiveMode::MaxProfit), &VARS).unwrap();
        assert_eq!(result, SolveResult::infeasible());
    }

    #[test]
    fn unbounded_is_an_error_without_partial_result() {
        let solver = service(LpSolution::without_values(SolutionStatus::Unbounded));
        let m = model(ObjectiveMode::MaxProfit);
        assert_eq!(solver.try_solve(&m, &VARS), Err(SolveError::Unbounded));
        assert_eq!(solver.solve(&m, &VARS), SolveResult::error());
    }

    #[test]
    fn wrong_column_count_is_rejected() {
        let solver = service(LpSolution {
            values: vec![1.0, 2.0],
            objective: 0.0,
            duals: vec![0.0, 0.0],
            status: SolutionStatus::Optimal,
        });
        assert!(matches!(
            solver.try_solve(&model(ObjectiveMode::MaxProfit), &VARS),
            Err(SolveError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn roi_recovers_tons_by_dividing_by_scale() {
        // columns: [y, t]; rows: [min, cap, normalization]
        let solver = service(LpSolution {
            values: vec![0.025, 0.00025],
            objective: 0.25,
            duals: vec![0.0, 0.0, 0.25],
            status: SolutionStatus::Optimal,
        });
        let result = solver.try_solve(&model(ObjectiveMode::MaxRoi), &VARS).unwrap();
        assert!((result.routes[0].tons - 100.0).abs() < 1e-9);
        assert!((result.objective - 0.25).abs() < 1e-12);
    }

    #[test]
    fn roi_with_zero_scale_is_degenerate() {
        let solver = service(LpSolution {
            values: vec![0.025, 0.0],
            objective: 0.25,
            duals: vec![0.0, 0.0, 0.0],
            status: SolutionStatus::Optimal,
        });
        assert!(matches!(
            solver.try_solve(&model(ObjectiveMode::MaxRoi), &VARS),
            Err(SolveError::DegenerateScaling { .. })
        ));
    }

    #[test]
    fn min_risk_objective_is_zero() {
        let solver = service(LpSolution {
            values: vec![10.0],
            objective: 0.0,
            duals: vec![0.0, 0.0, 0.0],
            status: SolutionStatus::Optimal,
        });
        let result = solver.try_solve(&model(ObjectiveMode::MinRisk), &VARS).unwrap();
        assert_eq!(result.objective, 0.0);
        assert_eq!(result.profit, 100.0);
    }
}
