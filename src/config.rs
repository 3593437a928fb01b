// src/config.rs
//
// Central configuration for the Monty Hall simulator.
// This is the single source of truth for the simulation parameters
// (door count, host behavior, contestant strategy, trial count) and
// for the strategy-resolution precedence used by the CLI / harness.

use std::env;
use std::fmt;

/// Trial count used when the caller does not specify one.
/// Matches the constant the interactive binary has always used.
pub const DEFAULT_TRIALS: usize = 10_000;

/// Environment variable consulted when no strategy is given on the CLI.
pub const ENV_STRATEGY: &str = "MONTYHALL_STRATEGY";

/// Full parameter set for one simulation.
///
/// Invariants enforced by [`SimConfig::validate`]:
/// - `num_doors >= 3`
/// - `num_host_opens <= num_doors - 2` (at least two doors stay closed:
///   the contestant's pick plus one alternative)
/// - `trials >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Total number of doors; exactly one hides the prize.
    pub num_doors: usize,
    /// Number of non-prize, non-chosen doors the host reveals.
    pub num_host_opens: usize,
    /// What the contestant does after the host's reveal.
    pub strategy: Strategy,
    /// Number of independent trials to run.
    pub trials: usize,
}

impl SimConfig {
    /// Config with the given door parameters and the interactive-binary
    /// defaults for everything else (switching, 10 000 trials).
    pub fn new(num_doors: usize, num_host_opens: usize) -> Self {
        Self {
            num_doors,
            num_host_opens,
            strategy: Strategy::Switch,
            trials: DEFAULT_TRIALS,
        }
    }

    /// Check the preconditions. Called by the simulator before any
    /// trial runs; callers that build configs from user input should
    /// call it themselves to fail early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_doors < 3 {
            return Err(ConfigError::InvalidConfiguration {
                field: "num_doors".to_string(),
                message: format!("door count too small ({}, need at least 3)", self.num_doors),
            });
        }
        if self.num_host_opens >= self.num_doors - 1 {
            return Err(ConfigError::InvalidConfiguration {
                field: "num_host_opens".to_string(),
                message: format!(
                    "host would leave fewer than two doors closed ({} opened of {})",
                    self.num_host_opens, self.num_doors
                ),
            });
        }
        if self.trials == 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "trials".to_string(),
                message: "trials must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    /// Theoretical win probability when the contestant never switches:
    /// the initial uniform pick must already be the prize door.
    pub fn theoretical_stay_probability(&self) -> f64 {
        1.0 / self.num_doors as f64
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidConfiguration { field: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidConfiguration { field, message } => {
                write!(f, "Invalid configuration for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Contestant strategy after the host's reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Move to a uniformly random door among those still closed and
    /// not originally chosen.
    Switch,
    /// Keep the initial pick.
    Stay,
}

impl Strategy {
    /// Stable lowercase name for the strategy (used in logs/output).
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Switch => "switch",
            Strategy::Stay => "stay",
        }
    }

    /// Parse a strategy name (case-insensitive). Returns None if unrecognized.
    pub fn parse(s: &str) -> Option<Strategy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "switch" | "sw" | "s" => Some(Strategy::Switch),
            "stay" | "keep" | "k" => Some(Strategy::Stay),
            _ => None,
        }
    }

    /// Whether this strategy changes doors after the reveal.
    pub fn switches(&self) -> bool {
        matches!(self, Strategy::Switch)
    }
}

/// Source of the effective strategy (for logging precedence decisions).
///
/// Precedence order (highest to lowest):
/// 1. CLI argument (--strategy)
/// 2. Environment variable (MONTYHALL_STRATEGY)
/// 3. Scenario file (replication harness only)
/// 4. Default (Switch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategySource {
    Cli,
    Env,
    Scenario,
    Default,
}

impl StrategySource {
    /// Stable lowercase name for the source (used in logs).
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategySource::Cli => "cli",
            StrategySource::Env => "env",
            StrategySource::Scenario => "scenario",
            StrategySource::Default => "default",
        }
    }
}

/// Resolved strategy with its source for logging.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveStrategy {
    pub strategy: Strategy,
    pub source: StrategySource,
}

impl EffectiveStrategy {
    /// Log the effective strategy at startup (one line to stderr).
    ///
    /// Format: `effective_strategy=<strategy> source=<source>`
    pub fn log_startup(&self) {
        eprintln!(
            "effective_strategy={} source={}",
            self.strategy.as_str(),
            self.source.as_str()
        );
    }
}

/// Resolve the contestant strategy with the documented precedence.
///
/// `cli` is an explicit CLI argument; `scenario` is the strategy a
/// scenario file carries, if any. An unparseable environment value is
/// ignored rather than fatal (the env var is a convenience override).
pub fn resolve_effective_strategy(
    cli: Option<Strategy>,
    scenario: Option<Strategy>,
) -> EffectiveStrategy {
    if let Some(strategy) = cli {
        return EffectiveStrategy {
            strategy,
            source: StrategySource::Cli,
        };
    }

    if let Ok(raw) = env::var(ENV_STRATEGY) {
        if let Some(strategy) = Strategy::parse(&raw) {
            return EffectiveStrategy {
                strategy,
                source: StrategySource::Env,
            };
        }
    }

    if let Some(strategy) = scenario {
        return EffectiveStrategy {
            strategy,
            source: StrategySource::Scenario,
        };
    }

    EffectiveStrategy {
        strategy: Strategy::Switch,
        source: StrategySource::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_valid_config_passes() {
        let cfg = SimConfig::new(3, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn host_opens_zero_is_valid() {
        let cfg = SimConfig::new(3, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn max_host_opens_is_valid() {
        // num_doors - 2 opened leaves exactly one alternative door.
        let cfg = SimConfig::new(10, 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn too_few_doors_rejected() {
        let cfg = SimConfig::new(2, 0);
        match cfg.validate() {
            Err(ConfigError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "num_doors");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn too_many_host_opens_rejected() {
        let cfg = SimConfig::new(3, 2);
        match cfg.validate() {
            Err(ConfigError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "num_host_opens");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn zero_trials_rejected() {
        let mut cfg = SimConfig::new(3, 1);
        cfg.trials = 0;
        match cfg.validate() {
            Err(ConfigError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "trials");
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn strategy_parse_accepts_aliases() {
        assert_eq!(Strategy::parse("Switch"), Some(Strategy::Switch));
        assert_eq!(Strategy::parse("  stay "), Some(Strategy::Stay));
        assert_eq!(Strategy::parse("keep"), Some(Strategy::Stay));
        assert_eq!(Strategy::parse("sw"), Some(Strategy::Switch));
        assert_eq!(Strategy::parse("nonsense"), None);
    }

    #[test]
    fn cli_strategy_wins_over_scenario() {
        // CLI beats scenario regardless of what the environment holds.
        let eff = resolve_effective_strategy(Some(Strategy::Stay), Some(Strategy::Switch));
        assert_eq!(eff.strategy, Strategy::Stay);
        assert_eq!(eff.source, StrategySource::Cli);
    }

    #[test]
    fn theoretical_stay_probability_is_one_over_doors() {
        let cfg = SimConfig::new(4, 2);
        assert!((cfg.theoretical_stay_probability() - 0.25).abs() < 1e-12);
    }
}
