//! LP model builder.
//!
//! Turns a [`ModelDescriptor`] and the current variable values into an
//! [`LpFormulation`]: one non-negative column per route ("tons allocated"),
//! an objective chosen by [`ObjectiveMode`], and one or two rows per
//! descriptor constraint.
//!
//! Building is pure arithmetic over already-validated indices and never fails;
//! degenerate models surface as infeasibility once the solver runs.
//!
//! # Max ROI
//!
//! `max profit(x) / cost(x)` is linear-fractional. It is solved with the
//! Charnes–Cooper substitution `t = 1 / cost(x)`, `y = t * x`:
//!
//! ```text
//! maximize    margin . y
//! subject to  unit_cost . y = 1
//!             a . y - b * t <= 0     for every cap row  a . x <= b
//!             a . y - m * t >= 0     for every minimum  a . x >= m
//!             y, t >= 0
//! ```
//!
//! The scale column `t` is appended after the route columns; the solve
//! service recovers `x = y / t`.

use crate::domain::{
    Constraint, ConstraintKind, ConstraintSpec, ModelDescriptor, ObjectiveMode, VariableBounds,
};
use crate::port::{LpProblem, OptimizationSense};

/// Row indices produced for one descriptor constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintRows {
    /// The `<= bound` row.
    pub cap: usize,
    /// The `>= minimum` row, for demand constraints with a minimum.
    pub min: Option<usize>,
}

/// An LP ready for the solver, plus what is needed to map its solution back.
#[derive(Debug, Clone)]
pub struct LpFormulation {
    pub problem: LpProblem,
    /// One entry per descriptor constraint, in descriptor order.
    pub rows: Vec<ConstraintRows>,
    /// Charnes–Cooper scale column, present for [`ObjectiveMode::MaxRoi`].
    pub scale_column: Option<usize>,
    /// Per-ton margin of each route at the current variable values.
    pub margins: Vec<f64>,
    /// Per-ton capital outlay (buy + freight) of each route.
    pub unit_costs: Vec<f64>,
}

impl LpFormulation {
    #[must_use]
    pub fn n_routes(&self) -> usize {
        self.margins.len()
    }
}

/// Build the LP for `model` at `vars`.
///
/// `vars` must hold `model.n_vars` values and `model` must have passed
/// validation.
#[must_use]
pub fn build(model: &ModelDescriptor, vars: &[f64]) -> LpFormulation {
    let margins: Vec<f64> = model.routes.iter().map(|r| r.margin(vars)).collect();
    let unit_costs: Vec<f64> = model.routes.iter().map(|r| r.unit_cost(vars)).collect();

    let n = model.n_routes();
    let (sense, objective) = match model.objective {
        ObjectiveMode::MaxRoi => return build_fractional(model, vars, margins, unit_costs),
        // A single deterministic solve has no distribution: the CVaR term is zero.
        ObjectiveMode::MaxProfit | ObjectiveMode::CvarAdjusted => {
            (OptimizationSense::Maximize, margins.clone())
        }
        ObjectiveMode::MinCost => (OptimizationSense::Minimize, unit_costs.clone()),
        ObjectiveMode::MinRisk => (OptimizationSense::Minimize, vec![0.0; n]),
    };

    let mut problem = LpProblem::new(sense, n);
    problem.objective = objective;
    problem.bounds = column_bounds(model);

    let mut rows = Vec::with_capacity(model.n_constraints());
    for spec in &model.constraints {
        let coefficients = row_coefficients(spec, model, &unit_costs);
        let bound = spec.effective_bound(vars);
        let min = spec
            .minimum(vars)
            .map(|minimum| problem.push(Constraint::geq(coefficients.clone(), minimum)));
        let cap = problem.push(Constraint::leq(coefficients, bound));
        rows.push(ConstraintRows { cap, min });
    }

    if model.objective == ObjectiveMode::MinRisk {
        problem.push(Constraint::geq(margins.clone(), model.profit_floor));
    }

    LpFormulation {
        problem,
        rows,
        scale_column: None,
        margins,
        unit_costs,
    }
}

fn build_fractional(
    model: &ModelDescriptor,
    vars: &[f64],
    margins: Vec<f64>,
    unit_costs: Vec<f64>,
) -> LpFormulation {
    let n = model.n_routes();
    let t = n;

    let mut problem = LpProblem::new(OptimizationSense::Maximize, n + 1);
    problem.objective[..n].copy_from_slice(&margins);
    let mut bounds = column_bounds(model);
    bounds.push(VariableBounds::non_negative());
    problem.bounds = bounds;

    let mut rows = Vec::with_capacity(model.n_constraints());
    for spec in &model.constraints {
        let mut coefficients = row_coefficients(spec, model, &unit_costs);
        coefficients.push(0.0);

        let min = spec.minimum(vars).map(|minimum| {
            let mut homogeneous = coefficients.clone();
            homogeneous[t] = -minimum;
            problem.push(Constraint::geq(homogeneous, 0.0))
        });
        coefficients[t] = -spec.effective_bound(vars);
        let cap = problem.push(Constraint::leq(coefficients, 0.0));
        rows.push(ConstraintRows { cap, min });
    }

    let mut normalization = unit_costs.clone();
    normalization.push(0.0);
    problem.push(Constraint::eq(normalization, 1.0));

    LpFormulation {
        problem,
        rows,
        scale_column: Some(t),
        margins,
        unit_costs,
    }
}

/// Non-negative route columns; a route without positive finite capacity
/// cannot carry anything.
fn column_bounds(model: &ModelDescriptor) -> Vec<VariableBounds> {
    model
        .routes
        .iter()
        .map(|route| {
            if has_capacity(route.unit_capacity) {
                VariableBounds::non_negative()
            } else {
                VariableBounds {
                    lower: Some(0.0),
                    upper: Some(0.0),
                }
            }
        })
        .collect()
}

fn has_capacity(unit_capacity: f64) -> bool {
    unit_capacity.is_finite() && unit_capacity > 0.0
}

/// Dense row over the route columns. Repeated route references accumulate.
fn row_coefficients(spec: &ConstraintSpec, model: &ModelDescriptor, unit_costs: &[f64]) -> Vec<f64> {
    let mut row = vec![0.0; model.n_routes()];
    for (k, &route_idx) in spec.routes.iter().enumerate() {
        let r = route_idx as usize;
        let coefficient = match &spec.kind {
            ConstraintKind::Supply | ConstraintKind::Demand => 1.0,
            ConstraintKind::Fleet => {
                let capacity = model.routes[r].unit_capacity;
                if has_capacity(capacity) {
                    1.0 / capacity
                } else {
                    0.0
                }
            }
            ConstraintKind::Capital => unit_costs[r],
            ConstraintKind::Custom { coefficients } => coefficients[k],
        };
        row[r] += coefficient;
    }
    row
}
