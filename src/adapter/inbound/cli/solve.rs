//! Handler for the `solve` command: run a JSON model file through the same
//! pipeline as the binary worker.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::application::DispatchService;
use crate::domain::ModelDescriptor;
use crate::error::Result;

/// JSON input accepted by `solve`.
#[derive(Debug, Deserialize)]
pub struct ModelFile {
    pub model: ModelDescriptor,
    pub variables: Vec<f64>,
    /// Scenario count; a single solve when absent.
    #[serde(default)]
    pub scenarios: Option<u32>,
}

impl ModelFile {
    /// Read and parse a model file.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Execute `solve`. A `scenarios` argument overrides the file's value.
pub fn execute(service: &DispatchService, path: &Path, scenarios: Option<u32>) -> Result<()> {
    let file = ModelFile::read(path)?;
    let output = match scenarios.or(file.scenarios) {
        Some(n) => {
            info!(path = %path.display(), scenarios = n, "simulating model file");
            let result = service.simulate(&file.model, &file.variables, n)?;
            serde_json::to_string_pretty(&result)?
        }
        None => {
            info!(path = %path.display(), "solving model file");
            let result = service.solve(&file.model, &file.variables)?;
            serde_json::to_string_pretty(&result)?
        }
    };
    println!("{output}");
    Ok(())
}
