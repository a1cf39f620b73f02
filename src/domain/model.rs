//! Dispatch model descriptor: routes, constraints, and perturbation specs.
//!
//! A [`ModelDescriptor`] is decoded once per request and shared read-only by
//! every solve made against it, including all Monte Carlo scenarios. Variable
//! values are never stored here; they arrive as a separate dense vector.

use serde::{Deserialize, Serialize};

use super::limits::{
    check_count, check_index, MAX_CONSTRAINTS, MAX_CORRELATIONS, MAX_ROUTES, MAX_VARS,
};
use crate::error::DecodeError;

/// Objective formulation selected for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    /// Maximize total route margin.
    MaxProfit,
    /// Minimize total purchase and freight outlay.
    MinCost,
    /// Maximize profit / cost (linear-fractional, Charnes–Cooper).
    MaxRoi,
    /// Maximize profit minus `risk_lambda` times the CVaR₅ tail loss.
    CvarAdjusted,
    /// Minimize CVaR₅ subject to `profit >= profit_floor`.
    MinRisk,
}

impl ObjectiveMode {
    /// Wire tag for this mode.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::MaxProfit => 0,
            Self::MinCost => 1,
            Self::MaxRoi => 2,
            Self::CvarAdjusted => 3,
            Self::MinRisk => 4,
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Result<Self, DecodeError> {
        match tag {
            0 => Ok(Self::MaxProfit),
            1 => Ok(Self::MinCost),
            2 => Ok(Self::MaxRoi),
            3 => Ok(Self::CvarAdjusted),
            4 => Ok(Self::MinRisk),
            other => Err(DecodeError::UnknownObjectiveMode(other)),
        }
    }

    /// Metric recorded per scenario when simulating under this mode.
    #[must_use]
    pub const fn metric(self) -> MetricKind {
        match self {
            Self::MaxProfit | Self::CvarAdjusted | Self::MinRisk => MetricKind::Profit,
            Self::MinCost => MetricKind::Cost,
            Self::MaxRoi => MetricKind::Roi,
        }
    }
}

/// Outcome metric summarized by a Monte Carlo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Profit,
    Cost,
    Roi,
}

impl MetricKind {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Profit => 0,
            Self::Cost => 1,
            Self::Roi => 2,
        }
    }
}

/// A shipping route: one LP decision variable ("tons allocated").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Variable index of the sell price.
    pub sell_var: u8,
    /// Variable index of the buy price.
    pub buy_var: u8,
    /// Variable index of the freight cost per ton.
    pub freight_var: u8,
    pub transit_cost_per_day: f64,
    pub base_transit_days: f64,
    /// Tons carried per vehicle, used by fleet constraints.
    pub unit_capacity: f64,
}

impl Route {
    /// Per-ton margin: `sell - buy - freight - transit_days * transit_cost_per_day`.
    #[must_use]
    pub fn margin(&self, vars: &[f64]) -> f64 {
        vars[self.sell_var as usize]
            - vars[self.buy_var as usize]
            - vars[self.freight_var as usize]
            - self.base_transit_days * self.transit_cost_per_day
    }

    /// Per-ton capital outlay: `buy + freight`.
    #[must_use]
    pub fn unit_cost(&self, vars: &[f64]) -> f64 {
        vars[self.buy_var as usize] + vars[self.freight_var as usize]
    }
}

/// Constraint archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `sum(x) <= bound`.
    Supply,
    /// `sum(x) <= bound`, plus `sum(x) >= minimum` when a minimum is configured.
    Demand,
    /// `sum(x / unit_capacity) <= bound`.
    Fleet,
    /// `sum((buy + freight) * x) <= bound`.
    Capital,
    /// Explicit coefficients, parallel to the constraint's route list.
    Custom { coefficients: Vec<f64> },
}

impl ConstraintKind {
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Supply => 0,
            Self::Demand => 1,
            Self::Fleet => 2,
            Self::Capital => 3,
            Self::Custom { .. } => 4,
        }
    }
}

/// Conditional bound scaling triggered by a boolean operational flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outage {
    /// Variable index of the outage flag.
    pub var: u8,
    /// Multiplier applied to the upper bound while the flag is set.
    pub factor: f64,
}

/// One constraint over a subset of routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub kind: ConstraintKind,
    /// Variable index holding the upper bound.
    pub bound_var: u8,
    /// Variable index holding the lower bound, if any.
    #[serde(default)]
    pub min_var: Option<u8>,
    #[serde(default)]
    pub outage: Option<Outage>,
    /// Route indices this constraint applies to.
    pub routes: Vec<u8>,
}

impl ConstraintSpec {
    /// Upper bound after the outage modifier, if any, has been applied.
    #[must_use]
    pub fn effective_bound(&self, vars: &[f64]) -> f64 {
        let base = vars[self.bound_var as usize];
        match self.outage {
            Some(outage) if vars[outage.var as usize] > 0.5 => base * outage.factor,
            _ => base,
        }
    }

    /// Lower bound, when a minimum variable is configured.
    ///
    /// Only [`ConstraintKind::Demand`] rows carry a minimum.
    #[must_use]
    pub fn minimum(&self, vars: &[f64]) -> Option<f64> {
        match (&self.kind, self.min_var) {
            (ConstraintKind::Demand, Some(idx)) => Some(vars[idx as usize]),
            _ => None,
        }
    }
}

/// A correlation pair: this variable shifts by `coefficient` times the shock
/// applied to `var`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub var: u8,
    pub coefficient: f64,
}

/// How a variable is randomized between scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerturbationKind {
    /// Gaussian draw scaled by `stddev`, clamped to `[lo, hi]`.
    Continuous,
    /// Boolean flag flipped with probability `stddev`.
    Flip,
}

/// Perturbation spec for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perturbation {
    #[serde(default)]
    pub stddev: f64,
    // JSON has no infinities: open ends are omitted and restored on load.
    #[serde(default = "unbounded_below", skip_serializing_if = "is_unbounded_below")]
    pub lo: f64,
    #[serde(default = "unbounded_above", skip_serializing_if = "is_unbounded_above")]
    pub hi: f64,
    #[serde(default)]
    pub correlations: Vec<Correlation>,
}

const fn unbounded_below() -> f64 {
    f64::NEG_INFINITY
}

const fn unbounded_above() -> f64 {
    f64::INFINITY
}

fn is_unbounded_below(value: &f64) -> bool {
    *value == f64::NEG_INFINITY
}

fn is_unbounded_above(value: &f64) -> bool {
    *value == f64::INFINITY
}

impl Perturbation {
    /// A variable that never moves.
    #[must_use]
    pub fn fixed() -> Self {
        Self {
            stddev: 0.0,
            lo: f64::NEG_INFINITY,
            hi: f64::INFINITY,
            correlations: Vec::new(),
        }
    }

    /// A clamp of exactly `[0, 1]` around a base of 0 or 1 marks a boolean
    /// flag. Fractions inside `[0, 1]` stay continuous.
    #[must_use]
    pub fn kind(&self, base: f64) -> PerturbationKind {
        if self.lo == 0.0 && self.hi == 1.0 && (base == 0.0 || base == 1.0) {
            PerturbationKind::Flip
        } else {
            PerturbationKind::Continuous
        }
    }

    /// Clamp `value` into `[lo, hi]` without panicking on inverted ranges.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.lo).min(self.hi)
    }
}

/// Immutable LP model description shared by every solve of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub n_vars: usize,
    pub objective: ObjectiveMode,
    pub risk_lambda: f64,
    pub profit_floor: f64,
    pub routes: Vec<Route>,
    pub constraints: Vec<ConstraintSpec>,
    /// One entry per variable.
    pub perturbations: Vec<Perturbation>,
}

impl ModelDescriptor {
    #[must_use]
    pub fn n_routes(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Check every limit and cross reference.
    ///
    /// The binary decoder performs the same checks inline while reading; this
    /// is the entry point for descriptors built in memory or loaded from JSON.
    pub fn validate(&self) -> Result<(), DecodeError> {
        check_count("n_vars", self.n_vars, MAX_VARS)?;
        check_count("n_routes", self.routes.len(), MAX_ROUTES)?;
        check_count("n_constraints", self.constraints.len(), MAX_CONSTRAINTS)?;
        check_count("n_perturbations", self.perturbations.len(), MAX_VARS)?;
        if self.perturbations.len() != self.n_vars {
            return Err(DecodeError::VariableCountMismatch {
                expected: self.n_vars,
                got: self.perturbations.len(),
            });
        }

        let n_vars = self.n_vars;
        let n_routes = self.routes.len();
        for route in &self.routes {
            check_index("route.sell_var", route.sell_var as usize, n_vars)?;
            check_index("route.buy_var", route.buy_var as usize, n_vars)?;
            check_index("route.freight_var", route.freight_var as usize, n_vars)?;
        }
        for constraint in &self.constraints {
            check_index("constraint.bound_var", constraint.bound_var as usize, n_vars)?;
            if let Some(idx) = constraint.min_var {
                check_index("constraint.min_var", idx as usize, n_vars)?;
            }
            if let Some(outage) = constraint.outage {
                check_index("constraint.outage_var", outage.var as usize, n_vars)?;
            }
            check_count("constraint.routes", constraint.routes.len(), MAX_ROUTES)?;
            for &route in &constraint.routes {
                check_index("constraint.route", route as usize, n_routes)?;
            }
            if let ConstraintKind::Custom { coefficients } = &constraint.kind {
                if coefficients.len() != constraint.routes.len() {
                    return Err(DecodeError::CoefficientMismatch {
                        routes: constraint.routes.len(),
                        coefficients: coefficients.len(),
                    });
                }
            }
        }
        for perturbation in &self.perturbations {
            check_count(
                "n_correlations",
                perturbation.correlations.len(),
                MAX_CORRELATIONS,
            )?;
            for corr in &perturbation.correlations {
                check_index("correlation.var", corr.var as usize, n_vars)?;
            }
        }
        Ok(())
    }

    /// Reject a variable vector whose length does not match `n_vars`.
    pub fn check_variables(&self, vars: &[f64]) -> Result<(), DecodeError> {
        if vars.len() != self.n_vars {
            return Err(DecodeError::VariableCountMismatch {
                expected: self.n_vars,
                got: vars.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route {
            sell_var: 0,
            buy_var: 1,
            freight_var: 2,
            transit_cost_per_day: 2.5,
            base_transit_days: 4.0,
            unit_capacity: 1500.0,
        }
    }

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor {
            n_vars: 4,
            objective: ObjectiveMode::MaxProfit,
            risk_lambda: 0.0,
            profit_floor: 0.0,
            routes: vec![route()],
            constraints: vec![ConstraintSpec {
                kind: ConstraintKind::Supply,
                bound_var: 3,
                min_var: None,
                outage: None,
                routes: vec![0],
            }],
            perturbations: vec![Perturbation::fixed(); 4],
        }
    }

    #[test]
    fn margin_subtracts_costs_and_transit() {
        let vars = [410.0, 350.0, 22.5, 0.0];
        let margin = route().margin(&vars);
        assert!((margin - (410.0 - 350.0 - 22.5 - 4.0 * 2.5)).abs() < 1e-9);
    }

    #[test]
    fn unit_cost_is_buy_plus_freight() {
        let vars = [410.0, 350.0, 22.5, 0.0];
        assert!((route().unit_cost(&vars) - 372.5).abs() < 1e-9);
    }

    #[test]
    fn outage_scales_bound_only_when_flag_set() {
        let spec = ConstraintSpec {
            kind: ConstraintKind::Demand,
            bound_var: 0,
            min_var: None,
            outage: Some(Outage {
                var: 1,
                factor: 0.5,
            }),
            routes: vec![],
        };
        assert_eq!(spec.effective_bound(&[1000.0, 0.0]), 1000.0);
        assert_eq!(spec.effective_bound(&[1000.0, 1.0]), 500.0);
        assert_eq!(spec.effective_bound(&[1000.0, 0.5]), 1000.0);
    }

    #[test]
    fn minimum_only_applies_to_demand() {
        let mut spec = ConstraintSpec {
            kind: ConstraintKind::Supply,
            bound_var: 0,
            min_var: Some(1),
            outage: None,
            routes: vec![],
        };
        assert_eq!(spec.minimum(&[10.0, 4.0]), None);
        spec.kind = ConstraintKind::Demand;
        assert_eq!(spec.minimum(&[10.0, 4.0]), Some(4.0));
    }

    #[test]
    fn unit_interval_marks_flag_only_at_zero_or_one() {
        let flag = Perturbation {
            stddev: 0.1,
            lo: 0.0,
            hi: 1.0,
            correlations: vec![],
        };
        assert_eq!(flag.kind(0.0), PerturbationKind::Flip);
        assert_eq!(flag.kind(1.0), PerturbationKind::Flip);
        assert_eq!(flag.kind(0.7), PerturbationKind::Continuous);
        assert_eq!(Perturbation::fixed().kind(1.0), PerturbationKind::Continuous);
    }

    #[test]
    fn valid_descriptor_passes() {
        assert!(descriptor().validate().is_ok());
    }

    #[test]
    fn dangling_route_reference_is_rejected() {
        let mut model = descriptor();
        model.constraints[0].routes = vec![1];
        assert!(matches!(
            model.validate(),
            Err(DecodeError::IndexOutOfRange {
                field: "constraint.route",
                index: 1,
                bound: 1
            })
        ));
    }

    #[test]
    fn custom_coefficients_must_match_routes() {
        let mut model = descriptor();
        model.constraints[0].kind = ConstraintKind::Custom {
            coefficients: vec![1.0, 2.0],
        };
        assert!(matches!(
            model.validate(),
            Err(DecodeError::CoefficientMismatch { .. })
        ));
    }

    #[test]
    fn objective_tags_round_trip() {
        for tag in 0..5 {
            assert_eq!(ObjectiveMode::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(
            ObjectiveMode::from_tag(9),
            Err(DecodeError::UnknownObjectiveMode(9))
        );
    }

    #[test]
    fn json_omits_open_clamp_ends() {
        let json = serde_json::to_string(&Perturbation::fixed()).unwrap();
        assert_eq!(json, r#"{"stddev":0.0,"correlations":[]}"#);
        let parsed: Perturbation = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, Perturbation::fixed());
    }
}
