//! Composition root: wires the solver backend into the application services.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::solver::HiGHSSolver;
use crate::application::dispatch::DispatchSolver;
use crate::application::montecarlo::{MonteCarloEngine, MonteCarloSettings};
use crate::application::DispatchService;
use crate::infrastructure::config::settings::Config;
use crate::port::Solver;

/// Build the dispatch service from configuration.
#[must_use]
pub fn build_service(config: &Config) -> Arc<DispatchService> {
    let backend: Arc<dyn Solver> = Arc::new(HiGHSSolver::new());
    let solver = DispatchSolver::new(backend);
    let settings = MonteCarloSettings::from(&config.monte_carlo);
    info!(
        engine = solver.engine_name(),
        threads = settings.threads,
        min_scenarios_per_thread = settings.min_scenarios_per_thread,
        max_scenarios = config.monte_carlo.max_scenarios,
        "dispatch service ready"
    );
    let engine = MonteCarloEngine::new(solver.clone(), settings);
    Arc::new(DispatchService::new(
        solver,
        engine,
        config.monte_carlo.max_scenarios,
    ))
}
