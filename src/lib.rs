//! Monty Hall Monte Carlo core library.
//!
//! This crate exposes the trial simulator for the generalized Monty
//! Hall game (`num_doors` doors, host opens `num_host_opens` of them,
//! contestant optionally switches). The binaries are thin harnesses
//! around these components:
//!
//! - `montyhall` (`src/main.rs`): interactive single-simulation run
//!   with the colored outcome grid.
//! - `replicate` (`src/bin/replicate.rs`): multi-run replication
//!   harness with seed offsets and aggregate statistics.
//!
//! # Architecture
//!
//! - **Simulation core** (`simulate`): pure, RNG-injected trial loop.
//!   No I/O; deterministic given a seeded RNG.
//! - **Configuration** (`config`): parameter validation and strategy
//!   resolution (CLI > env > scenario > default).
//! - **Presentation** (`report`): grid rendering and comparison text,
//!   decoupled from the core.
//! - **Telemetry** (`logging`): per-trial sinks (noop / JSONL file).
//! - **Harness support** (`scenario`, `stats`, `output`): experiment
//!   specs, aggregate statistics, versioned JSON summaries.

pub mod config;
pub mod logging;
pub mod output;
pub mod report;
pub mod scenario;
pub mod simulate;
pub mod stats;

// --- Re-exports for ergonomic external use ---------------------------------

pub use config::{
    resolve_effective_strategy, ConfigError, EffectiveStrategy, SimConfig, Strategy,
    StrategySource, DEFAULT_TRIALS, ENV_STRATEGY,
};

pub use simulate::{simulate, simulate_with_sink, SimulationResult};

pub use logging::{FileSink, NoopSink, TrialRecord, TrialSink};

pub use report::{grid_side, render_comparison, render_grid, GridStyle};

pub use scenario::{ExperimentSpec, ScenarioError, EXPERIMENT_SCHEMA_VERSION};

pub use stats::{p05_p50_p95, quantile_sorted, wilson_ci, OnlineStats};

pub use output::{
    atomic_write, write_summary, AggregateStats, ConfigEcho, PooledStats, ReplicationSummary,
    RunRecord, SUMMARY_SCHEMA_VERSION,
};

// --- Core invariant tests ---------------------------------------------------
