//! Request-level use cases: validate, then solve or simulate.

use tracing::debug;

use super::dispatch::DispatchSolver;
use super::montecarlo::MonteCarloEngine;
use crate::domain::limits::{check_count, MAX_SCENARIOS};
use crate::domain::{ModelDescriptor, MonteCarloResult, SolveResult};
use crate::error::DecodeError;

/// Entry point shared by every transport (binary worker, CLI, tests).
///
/// Cross-reference validation runs again here so in-memory and JSON models
/// get the same guarantees as decoded ones.
pub struct DispatchService {
    solver: DispatchSolver,
    engine: MonteCarloEngine,
    max_scenarios: u32,
}

impl DispatchService {
    /// `max_scenarios` is capped at the protocol limit.
    #[must_use]
    pub fn new(solver: DispatchSolver, engine: MonteCarloEngine, max_scenarios: u32) -> Self {
        Self {
            solver,
            engine,
            max_scenarios: max_scenarios.min(MAX_SCENARIOS as u32),
        }
    }

    #[must_use]
    pub fn max_scenarios(&self) -> u32 {
        self.max_scenarios
    }

    /// Single deterministic solve.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the model or variable vector is invalid.
    /// Solver failures are reported through [`SolveResult::status`].
    pub fn solve(
        &self,
        model: &ModelDescriptor,
        vars: &[f64],
    ) -> Result<SolveResult, DecodeError> {
        model.validate()?;
        model.check_variables(vars)?;
        debug!(
            routes = model.n_routes(),
            constraints = model.n_constraints(),
            objective = ?model.objective,
            "single solve"
        );
        Ok(self.solver.solve(model, vars))
    }

    /// Monte Carlo simulation of `scenarios` perturbed solves.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the model or variable vector is invalid or
    /// `scenarios` exceeds the configured maximum.
    pub fn simulate(
        &self,
        model: &ModelDescriptor,
        vars: &[f64],
        scenarios: u32,
    ) -> Result<MonteCarloResult, DecodeError> {
        check_count(
            "scenario_count",
            scenarios as usize,
            self.max_scenarios as usize,
        )?;
        model.validate()?;
        model.check_variables(vars)?;
        Ok(self.engine.run(model, vars, scenarios))
    }
}
