//! Monte Carlo engine configuration.

use serde::{Deserialize, Serialize};

use crate::application::montecarlo::MonteCarloSettings;
use crate::domain::limits::MAX_SCENARIOS;

/// Scenario loop settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Worker threads per run. 0 uses one per CPU.
    pub threads: usize,
    /// Runs are not split into chunks smaller than this.
    pub min_scenarios_per_thread: usize,
    /// Largest scenario count accepted per request (at most 10,000).
    pub max_scenarios: u32,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            min_scenarios_per_thread: 250,
            max_scenarios: MAX_SCENARIOS as u32,
        }
    }
}

impl From<&MonteCarloConfig> for MonteCarloSettings {
    fn from(config: &MonteCarloConfig) -> Self {
        let threads = if config.threads == 0 {
            num_cpus::get()
        } else {
            config.threads
        };
        Self {
            threads,
            min_scenarios_per_thread: config.min_scenarios_per_thread,
        }
    }
}
