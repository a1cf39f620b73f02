//! Monte Carlo engine.
//!
//! Runs repeated perturb → build → solve cycles over one shared, read-only
//! model and aggregates the feasible scenarios into a [`MonteCarloResult`].
//!
//! # Concurrency
//!
//! The scenario loop is split into chunks run on scoped threads. Each chunk
//! owns a [`SmallRng`] seeded from the engine's master stream, its own
//! perturbed vectors and its own outcome buffers. Aggregation starts only after
//! every chunk has joined.

pub mod perturb;
pub mod stats;

use std::time::Instant;

use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use self::perturb::Perturber;
use self::stats::TAIL_FRACTION;
use crate::application::dispatch::DispatchSolver;
use crate::domain::{ModelDescriptor, MonteCarloResult};

/// Threading knobs for the scenario loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloSettings {
    /// Upper bound on worker threads per run.
    pub threads: usize,
    /// Runs are not split into chunks smaller than this.
    pub min_scenarios_per_thread: usize,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
            min_scenarios_per_thread: 250,
        }
    }
}

impl MonteCarloSettings {
    /// Number of chunks to split `scenarios` into.
    #[must_use]
    pub fn chunks_for(&self, scenarios: usize) -> usize {
        let by_size = scenarios / self.min_scenarios_per_thread.max(1);
        by_size.clamp(1, self.threads.max(1))
    }
}

/// Monte Carlo engine owning the process-lifetime PRNG stream.
pub struct MonteCarloEngine {
    solver: DispatchSolver,
    settings: MonteCarloSettings,
    master: Mutex<SmallRng>,
}

/// Outcomes of one chunk of scenarios.
#[derive(Default)]
struct ChunkOutcome {
    metrics: Vec<f64>,
    profits: Vec<f64>,
    samples: Vec<Vec<f64>>,
    infeasible: u32,
}

impl MonteCarloEngine {
    /// Engine with a master stream seeded from OS entropy.
    #[must_use]
    pub fn new(solver: DispatchSolver, settings: MonteCarloSettings) -> Self {
        Self::with_rng(solver, settings, SmallRng::from_entropy())
    }

    /// Engine with a fixed master seed.
    #[must_use]
    pub fn with_seed(solver: DispatchSolver, settings: MonteCarloSettings, seed: u64) -> Self {
        Self::with_rng(solver, settings, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(solver: DispatchSolver, settings: MonteCarloSettings, rng: SmallRng) -> Self {
        Self {
            solver,
            settings,
            master: Mutex::new(rng),
        }
    }

    #[must_use]
    pub fn settings(&self) -> MonteCarloSettings {
        self.settings
    }

    /// Run `scenarios` perturbed solves of `model` around `base`.
    ///
    /// `model` must be validated and `base` must hold `model.n_vars` values.
    /// Solver failures are counted as infeasible scenarios.
    pub fn run(
        &self,
        model: &ModelDescriptor,
        base: &[f64],
        scenarios: u32,
    ) -> MonteCarloResult {
        let started = Instant::now();
        let total = scenarios as usize;
        let chunks = self.settings.chunks_for(total);
        let seeds: Vec<u64> = {
            let mut master = self.master.lock();
            (0..chunks).map(|_| master.gen()).collect()
        };

        let outcomes: Vec<ChunkOutcome> = if chunks == 1 {
            vec![self.run_chunk(model, base, total, seeds[0])]
        } else {
            std::thread::scope(|scope| {
                let handles: Vec<_> = seeds
                    .iter()
                    .enumerate()
                    .map(|(i, &seed)| {
                        let count = chunk_len(total, chunks, i);
                        scope.spawn(move || self.run_chunk(model, base, count, seed))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect()
            })
        };

        let result = aggregate(model, scenarios, outcomes);
        info!(
            scenarios,
            feasible = result.n_feasible,
            infeasible = result.n_infeasible,
            threads = chunks,
            signal = ?result.signal,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "monte carlo run finished"
        );
        result
    }

    fn run_chunk(
        &self,
        model: &ModelDescriptor,
        base: &[f64],
        count: usize,
        seed: u64,
    ) -> ChunkOutcome {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut perturber = Perturber::new(model, base);
        let metric = model.objective.metric();
        let mut outcome = ChunkOutcome {
            metrics: Vec::with_capacity(count),
            profits: Vec::with_capacity(count),
            samples: Vec::with_capacity(count),
            infeasible: 0,
        };
        let mut vars = Vec::with_capacity(base.len());

        for _ in 0..count {
            perturber.perturb(&mut rng, &mut vars);
            match self.solver.try_solve(model, &vars) {
                Ok(result) if result.is_optimal() => {
                    outcome.metrics.push(result.metric(metric));
                    outcome.profits.push(result.profit);
                    outcome.samples.push(vars.clone());
                }
                Ok(_) => outcome.infeasible += 1,
                Err(e) => {
                    debug!(error = %e, "scenario solve failed, counted as infeasible");
                    outcome.infeasible += 1;
                }
            }
        }
        outcome
    }
}

/// Size of chunk `i` when `total` is split into `chunks` near-equal parts.
fn chunk_len(total: usize, chunks: usize, i: usize) -> usize {
    total / chunks + usize::from(i < total % chunks)
}

fn aggregate(
    model: &ModelDescriptor,
    scenarios: u32,
    outcomes: Vec<ChunkOutcome>,
) -> MonteCarloResult {
    let mut all = ChunkOutcome::default();
    for chunk in outcomes {
        all.metrics.extend(chunk.metrics);
        all.profits.extend(chunk.profits);
        all.samples.extend(chunk.samples);
        all.infeasible += chunk.infeasible;
    }
    let n_feasible = all.metrics.len() as u32;

    let distribution = stats::summarize(&all.metrics);
    let sensitivities = stats::rank_sensitivities(&all.samples, &all.metrics, model.n_vars);

    let profit = stats::summarize(&all.profits);
    let profit_cvar5 = stats::tail_mean(&stats::sorted(&all.profits), TAIL_FRACTION);
    let tail_loss = (-profit_cvar5).max(0.0);
    let risk_adjusted_profit = profit.mean - model.risk_lambda * tail_loss;
    let probability_positive = if all.profits.is_empty() {
        0.0
    } else {
        all.profits.iter().filter(|&&p| p > 0.0).count() as f64 / all.profits.len() as f64
    };

    MonteCarloResult {
        n_scenarios: scenarios,
        n_feasible,
        n_infeasible: all.infeasible,
        metric: model.objective.metric(),
        distribution,
        sensitivities,
        profit_cvar5,
        risk_adjusted_profit,
        probability_positive,
        signal: stats::classify(&profit, n_feasible, all.infeasible),
    }
}
