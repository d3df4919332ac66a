//! YAML inputs for the CLI: solver settings and direction lists.

use roche_core::ConvergenceConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Core error: {0}")]
    Core(#[from] roche_core::CoreError),

    #[error("Solver error: {0}")]
    Solver(#[from] roche_solver::SolverError),
}

pub type CliResult<T> = Result<T, CliError>;

/// Contents of the `--config` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub convergence: ConvergenceConfig,
    /// Worker threads for batch solves; the global pool when absent
    pub threads: Option<usize>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config: CliConfig = read_yaml(path)?;
        config.convergence.validate()?;
        Ok(config)
    }
}

/// Directions file: a YAML sequence of `[cosx, cosy, cosz]` triples.
pub fn load_directions(path: &Path) -> CliResult<Vec<[f64; 3]>> {
    read_yaml(path)
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| CliError::Yaml {
        path: path.display().to_string(),
        source,
    })
}
