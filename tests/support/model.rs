//! Model builders shared by integration tests.

use std::sync::Arc;

use dispatch_optimizer::adapter::outbound::solver::HiGHSSolver;
use dispatch_optimizer::application::dispatch::DispatchSolver;
use dispatch_optimizer::application::montecarlo::{MonteCarloEngine, MonteCarloSettings};
use dispatch_optimizer::application::DispatchService;
use dispatch_optimizer::domain::{
    ConstraintKind, ConstraintSpec, ModelDescriptor, ObjectiveMode, Outage, Perturbation, Route,
};

pub fn highs() -> DispatchSolver {
    DispatchSolver::new(Arc::new(HiGHSSolver::new()))
}

pub fn service_with(settings: MonteCarloSettings, seed: u64) -> Arc<DispatchService> {
    let solver = highs();
    let engine = MonteCarloEngine::with_seed(solver.clone(), settings, seed);
    Arc::new(DispatchService::new(solver, engine, 10_000))
}

pub fn service() -> Arc<DispatchService> {
    service_with(
        MonteCarloSettings {
            threads: 2,
            min_scenarios_per_thread: 50,
        },
        7,
    )
}

pub fn route(sell_var: u8, buy_var: u8, freight_var: u8) -> Route {
    Route {
        sell_var,
        buy_var,
        freight_var,
        transit_cost_per_day: 0.0,
        base_transit_days: 0.0,
        unit_capacity: 1.0,
    }
}

pub fn cap(kind: ConstraintKind, bound_var: u8, routes: &[u8]) -> ConstraintSpec {
    ConstraintSpec {
        kind,
        bound_var,
        min_var: None,
        outage: None,
        routes: routes.to_vec(),
    }
}

// Two-route desk model.
//
// vars: 0 sell A, 1 sell B, 2 buy (0), 3 freight (0), 4 supply A,
//       5 supply B, 6 fleet, 7 fleet outage flag, 8 demand minimum
pub const TWO_ROUTE_VARS: [f64; 9] = [50.0, 30.0, 0.0, 0.0, 1000.0, 2000.0, 1200.0, 0.0, 0.0];

/// Route A earns 50/t (supply 1,000), route B 30/t (supply 2,000), both share
/// a 1,200 ton-equivalent fleet.
pub fn two_route_model() -> ModelDescriptor {
    let mut fleet = cap(ConstraintKind::Fleet, 6, &[0, 1]);
    fleet.outage = Some(Outage {
        var: 7,
        factor: 0.5,
    });
    ModelDescriptor {
        n_vars: TWO_ROUTE_VARS.len(),
        objective: ObjectiveMode::MaxProfit,
        risk_lambda: 0.5,
        profit_floor: 0.0,
        routes: vec![route(0, 2, 3), route(1, 2, 3)],
        constraints: vec![
            cap(ConstraintKind::Supply, 4, &[0]),
            cap(ConstraintKind::Supply, 5, &[1]),
            fleet,
        ],
        perturbations: vec![Perturbation::fixed(); TWO_ROUTE_VARS.len()],
    }
}

/// [`two_route_model`] plus a demand floor over both routes.
pub fn two_route_with_demand_floor() -> ModelDescriptor {
    let mut model = two_route_model();
    let mut demand = cap(ConstraintKind::Demand, 5, &[0, 1]);
    demand.min_var = Some(8);
    model.constraints.push(demand);
    model
}

pub fn continuous(stddev: f64, lo: f64, hi: f64) -> Perturbation {
    Perturbation {
        stddev,
        lo,
        hi,
        correlations: Vec::new(),
    }
}

// ROI model.
//
// vars: 0 sell A, 1 buy A, 2 freight A, 3 sell B, 4 buy B, 5 freight B,
//       6 supply A, 7 demand cap, 8 demand minimum
pub const ROI_VARS: [f64; 9] = [115.0, 80.0, 10.0, 200.0, 150.0, 20.0, 5.0, 1000.0, 10.0];

/// Route A: margin 25, unit cost 90, at most 5 t. Route B: margin 30, unit
/// cost 170. At least 10 t must ship in total.
pub fn roi_model() -> ModelDescriptor {
    let mut demand = cap(ConstraintKind::Demand, 7, &[0, 1]);
    demand.min_var = Some(8);
    ModelDescriptor {
        n_vars: ROI_VARS.len(),
        objective: ObjectiveMode::MaxRoi,
        risk_lambda: 0.0,
        profit_floor: 0.0,
        routes: vec![route(0, 1, 2), route(3, 4, 5)],
        constraints: vec![cap(ConstraintKind::Supply, 6, &[0]), demand],
        perturbations: vec![Perturbation::fixed(); ROI_VARS.len()],
    }
}
