//! Solve and simulation results handed back to the orchestration layer.

use serde::Serialize;

use super::model::MetricKind;

/// Outcome of a single LP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    /// No allocation satisfies every constraint. A business outcome, not an error.
    Infeasible,
    /// The engine reported a numerical failure; no partial result is returned.
    Error,
}

impl SolveStatus {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Optimal => 0,
            Self::Infeasible => 1,
            Self::Error => 2,
        }
    }
}

/// Allocation on one route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteAllocation {
    pub tons: f64,
    /// Per-ton margin used in the objective.
    pub margin: f64,
}

/// Result of one solve, in domain terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// One entry per route, in descriptor order. Empty unless optimal.
    pub routes: Vec<RouteAllocation>,
    pub profit: f64,
    pub cost: f64,
    pub roi: f64,
    /// Value of the selected objective at the optimum.
    pub objective: f64,
    /// Objective improvement per unit increase of each constraint's bound, in
    /// descriptor order. Empty unless optimal.
    pub shadow_prices: Vec<f64>,
}

impl SolveResult {
    #[must_use]
    pub fn infeasible() -> Self {
        Self::empty(SolveStatus::Infeasible)
    }

    #[must_use]
    pub fn error() -> Self {
        Self::empty(SolveStatus::Error)
    }

    fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            routes: Vec::new(),
            profit: 0.0,
            cost: 0.0,
            roi: 0.0,
            objective: 0.0,
            shadow_prices: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Metric value recorded by Monte Carlo for this result.
    #[must_use]
    pub fn metric(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Profit => self.profit,
            MetricKind::Cost => self.cost,
            MetricKind::Roi => self.roi,
        }
    }

    #[must_use]
    pub fn total_tons(&self) -> f64 {
        self.routes.iter().map(|r| r.tons).sum()
    }
}

/// Summary statistics over feasible-scenario metric values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
}

/// Pearson correlation between one input variable and the outcome metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sensitivity {
    pub var: u8,
    pub correlation: f64,
}

/// Desk decision signal derived from the profit distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// 5th percentile profit is positive.
    StrongGo,
    /// 25th percentile profit is positive.
    Go,
    /// Median positive, downside scenarios negative.
    Cautious,
    /// Median positive but thin relative to the spread.
    Weak,
    /// Median non-positive or mostly infeasible.
    NoGo,
}

impl Signal {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::StrongGo => 0,
            Self::Go => 1,
            Self::Cautious => 2,
            Self::Weak => 3,
            Self::NoGo => 4,
        }
    }
}

/// Aggregated result of a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloResult {
    pub n_scenarios: u32,
    pub n_feasible: u32,
    pub n_infeasible: u32,
    pub metric: MetricKind,
    pub distribution: Distribution,
    /// Strongest input drivers of the metric, by descending |correlation|.
    pub sensitivities: Vec<Sensitivity>,
    /// Mean of the worst 5% of feasible-scenario profits.
    pub profit_cvar5: f64,
    /// Mean profit less `risk_lambda` times the CVaR₅ tail loss.
    pub risk_adjusted_profit: f64,
    /// Share of feasible scenarios with positive profit.
    pub probability_positive: f64,
    pub signal: Signal,
}
