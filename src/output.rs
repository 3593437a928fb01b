// src/output.rs
//
// Versioned JSON output schema for the replication harness, plus the
// atomic file writer both binaries share. The summary is deliberately
// small and stable so archived runs stay comparable.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::stats::OnlineStats;

/// Schema version for summary.json. Increment on breaking changes.
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Echo of the parameters that produced a summary.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEcho {
    pub doors: usize,
    pub host_opens: usize,
    pub strategy: String,
    pub trials: usize,
    pub runs: usize,
    pub base_seed: u64,
}

/// Single run record for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run: usize,
    pub seed: u64,
    pub trials: usize,
    pub wins: u64,
    pub win_rate: f64,
}

/// Aggregate statistics over the per-run win rates.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateStats {
    pub mean: f64,
    pub std_pop: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub p50: f64,
    pub p95: f64,
}

impl AggregateStats {
    pub fn from_parts(stats: &OnlineStats, percentiles: (f64, f64, f64)) -> Self {
        Self {
            mean: stats.mean(),
            std_pop: stats.stddev_population(),
            min: stats.min(),
            max: stats.max(),
            p05: percentiles.0,
            p50: percentiles.1,
            p95: percentiles.2,
        }
    }
}

/// Pooled win count across all runs with its Wilson interval.
#[derive(Debug, Clone, Serialize)]
pub struct PooledStats {
    pub wins: u64,
    pub trials: u64,
    pub win_rate: f64,
    pub ci_level: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Replication summary output (versioned schema).
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationSummary {
    pub schema_version: u32,
    pub crate_version: String,
    pub config: ConfigEcho,
    /// Theoretical no-switch win probability, for comparison.
    pub theoretical_stay_probability: f64,
    pub runs: Vec<RunRecord>,
    pub aggregate: AggregateStats,
    pub pooled: PooledStats,
}

/// Write a file atomically (temp file + rename).
pub fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let temp_name = format!(
        ".tmp_{}_{}",
        std::process::id(),
        path.file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default()
    );
    let temp_path = parent.join(&temp_name);

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Serialize `summary` and write it to `<dir>/summary.json`.
/// Creates `dir` if needed. Returns the written path.
pub fn write_summary(dir: &Path, summary: &ReplicationSummary) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let path = dir.join("summary.json");
    atomic_write(&path, json.as_bytes())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_summary() -> ReplicationSummary {
        let mut stats = OnlineStats::default();
        stats.add(0.66);
        stats.add(0.68);

        ReplicationSummary {
            schema_version: SUMMARY_SCHEMA_VERSION,
            crate_version: "test".to_string(),
            config: ConfigEcho {
                doors: 3,
                host_opens: 1,
                strategy: "switch".to_string(),
                trials: 100,
                runs: 2,
                base_seed: 1,
            },
            theoretical_stay_probability: 1.0 / 3.0,
            runs: vec![
                RunRecord {
                    run: 1,
                    seed: 1,
                    trials: 100,
                    wins: 66,
                    win_rate: 0.66,
                },
                RunRecord {
                    run: 2,
                    seed: 2,
                    trials: 100,
                    wins: 68,
                    win_rate: 0.68,
                },
            ],
            aggregate: AggregateStats::from_parts(&stats, (0.66, 0.67, 0.68)),
            pooled: PooledStats {
                wins: 134,
                trials: 200,
                win_rate: 0.67,
                ci_level: 0.95,
                ci_lower: 0.60,
                ci_upper: 0.73,
            },
        }
    }

    #[test]
    fn write_summary_round_trips_as_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_summary(dir.path(), &sample_summary()).expect("write should succeed");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("summary.json"));

        let raw = std::fs::read_to_string(&path).expect("read back");
        let value: Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["schema_version"], SUMMARY_SCHEMA_VERSION);
        assert_eq!(value["config"]["doors"], 3);
        assert_eq!(value["runs"].as_array().map(|r| r.len()), Some(2));
        assert_eq!(value["pooled"]["wins"], 134);
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        atomic_write(&path, b"first").expect("first write");
        atomic_write(&path, b"second").expect("second write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "second");
    }
}
