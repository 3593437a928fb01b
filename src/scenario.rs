// src/scenario.rs
//
// Experiment specification parsing and validation for the replication
// harness. A spec fully defines a reproducible experiment:
// - scenario_id + scenario_version for tracking
// - game shape (doors, host_opens) and contestant strategy
// - trials per run, number of runs, base seed (run i uses base_seed + i)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{SimConfig, Strategy, DEFAULT_TRIALS};

/// Current experiment schema version.
pub const EXPERIMENT_SCHEMA_VERSION: u32 = 1;

/// A versioned, YAML-parsed experiment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSpec {
    /// Stable identifier for this experiment.
    pub scenario_id: String,
    /// Author-incremented version of this experiment definition.
    pub scenario_version: u32,
    /// Total number of doors.
    pub doors: usize,
    /// Doors the host reveals per trial.
    pub host_opens: usize,
    /// Contestant strategy name; resolution precedence still applies
    /// (CLI and env override this value).
    #[serde(default)]
    pub strategy: Option<String>,
    /// Trials per run.
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Number of independent runs.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Base RNG seed; run i uses `base_seed + i`.
    #[serde(default = "default_base_seed")]
    pub base_seed: u64,
}

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

fn default_runs() -> usize {
    50
}

fn default_base_seed() -> u64 {
    1
}

impl ExperimentSpec {
    /// Parse an experiment from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| ScenarioError::IoError {
            path: path.as_ref().display().to_string(),
            source: e.to_string(),
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse an experiment from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScenarioError> {
        let spec: ExperimentSpec =
            serde_yaml::from_str(yaml).map_err(|e| ScenarioError::ParseError {
                source: e.to_string(),
            })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate the experiment specification.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.scenario_id.is_empty() {
            return Err(ScenarioError::ValidationError {
                field: "scenario_id".to_string(),
                message: "scenario_id cannot be empty".to_string(),
            });
        }

        if self.scenario_version == 0 {
            return Err(ScenarioError::ValidationError {
                field: "scenario_version".to_string(),
                message: "scenario_version must be >= 1".to_string(),
            });
        }

        if self.doors < 3 {
            return Err(ScenarioError::ValidationError {
                field: "doors".to_string(),
                message: "doors must be >= 3".to_string(),
            });
        }

        if self.host_opens >= self.doors - 1 {
            return Err(ScenarioError::ValidationError {
                field: "host_opens".to_string(),
                message: "host must leave at least two doors closed".to_string(),
            });
        }

        if self.trials == 0 {
            return Err(ScenarioError::ValidationError {
                field: "trials".to_string(),
                message: "trials must be >= 1".to_string(),
            });
        }

        if self.runs == 0 {
            return Err(ScenarioError::ValidationError {
                field: "runs".to_string(),
                message: "runs must be >= 1".to_string(),
            });
        }

        if let Some(raw) = &self.strategy {
            if Strategy::parse(raw).is_none() {
                return Err(ScenarioError::ValidationError {
                    field: "strategy".to_string(),
                    message: format!("unknown strategy '{}' (expected switch | stay)", raw),
                });
            }
        }

        Ok(())
    }

    /// Strategy carried by the spec, if any. `validate` guarantees the
    /// stored name parses, so None here means the field was absent.
    pub fn parsed_strategy(&self) -> Option<Strategy> {
        self.strategy.as_deref().and_then(Strategy::parse)
    }

    /// Build the per-run simulation config with the resolved strategy.
    pub fn to_sim_config(&self, strategy: Strategy) -> SimConfig {
        SimConfig {
            num_doors: self.doors,
            num_host_opens: self.host_opens,
            strategy,
            trials: self.trials,
        }
    }
}

/// Errors that can occur when working with experiment specs.
#[derive(Debug, Clone)]
pub enum ScenarioError {
    IoError { path: String, source: String },
    ParseError { source: String },
    ValidationError { field: String, message: String },
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::IoError { path, source } => {
                write!(f, "Failed to read experiment file '{}': {}", path, source)
            }
            ScenarioError::ParseError { source } => {
                write!(f, "Failed to parse experiment YAML: {}", source)
            }
            ScenarioError::ValidationError { field, message } => {
                write!(f, "Experiment validation error in '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
