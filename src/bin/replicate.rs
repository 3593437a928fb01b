// src/bin/replicate.rs
//
// Replication harness: many independent simulations with seed offsets.
//
// Goals:
// - Deterministic multi-run evaluation: run i uses seed + i.
// - Aggregate the per-run win rates (mean/std/min/max/percentiles) and
//   pool the win counts for a Wilson confidence interval.
// - Versioned summary.json for archiving, optional per-run CSV.
//
// Run examples:
//   cargo run --bin replicate -- --doors 3 --host-opens 1 --runs 100 --seed 7
//   MONTYHALL_STRATEGY=stay cargo run --bin replicate -- --runs 200 --quiet
//   cargo run --bin replicate -- --scenario experiments/classic.yaml --csv runs.csv

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use montyhall::config::{
    resolve_effective_strategy, SimConfig, Strategy, DEFAULT_TRIALS,
};
use montyhall::output::{
    write_summary, AggregateStats, ConfigEcho, PooledStats, ReplicationSummary, RunRecord,
    SUMMARY_SCHEMA_VERSION,
};
use montyhall::scenario::ExperimentSpec;
use montyhall::simulate::{simulate, SimulationResult};
use montyhall::stats::{p05_p50_p95, wilson_ci, OnlineStats};

const DEFAULT_DOORS: usize = 3;
const DEFAULT_HOST_OPENS: usize = 1;
const DEFAULT_RUNS: usize = 50;
const DEFAULT_SEED: u64 = 1;
const DEFAULT_PRINT_EVERY: usize = 1;
const DEFAULT_OUTPUT_DIR: &str = "runs/replication";
const CI_LEVEL: f64 = 0.95;

#[derive(Debug, Clone)]
struct Args {
    scenario: Option<PathBuf>,
    doors: Option<usize>,
    host_opens: Option<usize>,
    strategy: Option<Strategy>,
    trials: Option<usize>,
    runs: Option<usize>,
    seed: Option<u64>,
    quiet: bool,
    print_every: usize,
    csv_out: Option<PathBuf>,
    output_dir: PathBuf,
}

impl Args {
    fn usage() -> &'static str {
        "\
montyhall replication harness

USAGE:
  cargo run --bin replicate -- [FLAGS]

STRATEGY PRECEDENCE:
  1) --strategy overrides environment
  2) else MONTYHALL_STRATEGY
  3) else the scenario file's strategy
  4) else switch

FLAGS:
  --scenario PATH      Experiment YAML; CLI flags override its values
  --doors N            Total doors (default: 3)
  --host-opens N       Doors the host opens (default: 1)
  --strategy NAME      switch | stay
  --trials N           Trials per run (default: 10000)
  --runs N             Number of runs (default: 50). Run i uses seed + i.
  --seed U64           Base seed (default: 1)
  --print-every N      Print every N runs (default: 1). Ignored with --quiet.
  --csv PATH           Write per-run CSV rows to PATH (relative to output-dir)
  --output-dir DIR     Output directory (default: runs/replication)
  --quiet              Suppress per-run lines; only print final summary
  --help               Show this help

OUTPUT:
  The harness writes <output-dir>/summary.json (versioned schema) and,
  with --csv, a per-run CSV.

EXAMPLES:
  cargo run --bin replicate -- --doors 10 --host-opens 8 --runs 100 --seed 42
  cargo run --bin replicate -- --scenario experiments/classic.yaml --quiet
"
    }

    fn parse_or_exit() -> Self {
        match Self::parse() {
            Ok(a) => a,
            Err(e) => {
                eprintln!("{e}\n\n{}", Self::usage());
                std::process::exit(2);
            }
        }
    }

    fn parse() -> Result<Self, String> {
        let mut out = Args {
            scenario: None,
            doors: None,
            host_opens: None,
            strategy: None,
            trials: None,
            runs: None,
            seed: None,
            quiet: false,
            print_every: DEFAULT_PRINT_EVERY,
            csv_out: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        };

        let mut it = env::args().skip(1);

        while let Some(arg) = it.next() {
            // Accept both "--flag value" and "--flag=value".
            let (flag, mut inline) = match arg.split_once('=') {
                Some((f, v)) => (f.to_string(), Some(v.to_string())),
                None => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                inline
                    .take()
                    .or_else(|| it.next())
                    .ok_or_else(|| format!("Missing value for {name}"))
            };

            match flag.as_str() {
                "--help" | "-h" => {
                    println!("{}", Self::usage());
                    std::process::exit(0);
                }
                "--quiet" => out.quiet = true,

                "--scenario" => {
                    out.scenario = Some(PathBuf::from(value("--scenario")?));
                }
                "--doors" => {
                    let v = value("--doors")?;
                    out.doors = Some(
                        v.parse::<usize>()
                            .map_err(|_| "Invalid --doors (expected integer)".to_string())?,
                    );
                }
                "--host-opens" => {
                    let v = value("--host-opens")?;
                    out.host_opens = Some(
                        v.parse::<usize>()
                            .map_err(|_| "Invalid --host-opens (expected integer)".to_string())?,
                    );
                }
                "--strategy" => {
                    let v = value("--strategy")?;
                    out.strategy = Some(Strategy::parse(&v).ok_or_else(|| {
                        "Invalid --strategy. Expected: switch | stay".to_string()
                    })?);
                }
                "--trials" => {
                    let v = value("--trials")?;
                    let trials = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --trials (expected integer)".to_string())?;
                    if trials == 0 {
                        return Err("--trials must be >= 1".to_string());
                    }
                    out.trials = Some(trials);
                }
                "--runs" => {
                    let v = value("--runs")?;
                    let runs = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --runs (expected integer)".to_string())?;
                    if runs == 0 {
                        return Err("--runs must be >= 1".to_string());
                    }
                    out.runs = Some(runs);
                }
                "--seed" => {
                    let v = value("--seed")?;
                    out.seed = Some(
                        v.parse::<u64>()
                            .map_err(|_| "Invalid --seed (expected u64)".to_string())?,
                    );
                }
                "--print-every" => {
                    let v = value("--print-every")?;
                    out.print_every = v
                        .parse::<usize>()
                        .map_err(|_| "Invalid --print-every (expected integer)".to_string())?;
                    if out.print_every == 0 {
                        return Err("--print-every must be >= 1".to_string());
                    }
                }
                "--csv" => {
                    out.csv_out = Some(PathBuf::from(value("--csv")?));
                }
                "--output-dir" => {
                    out.output_dir = PathBuf::from(value("--output-dir")?);
                }

                other => return Err(format!("Unknown argument: {other}")),
            }
        }

        Ok(out)
    }
}

fn run_once(cfg: &SimConfig, seed: u64) -> SimulationResult {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match simulate(cfg, &mut rng) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}

fn main() {
    let args = Args::parse_or_exit();

    let spec = match args.scenario.as_ref() {
        Some(path) => match ExperimentSpec::from_yaml_file(path) {
            Ok(spec) => Some(spec),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => None,
    };

    // CLI overrides scenario overrides defaults.
    let doors = args
        .doors
        .or(spec.as_ref().map(|s| s.doors))
        .unwrap_or(DEFAULT_DOORS);
    let host_opens = args
        .host_opens
        .or(spec.as_ref().map(|s| s.host_opens))
        .unwrap_or(DEFAULT_HOST_OPENS);
    let trials = args
        .trials
        .or(spec.as_ref().map(|s| s.trials))
        .unwrap_or(DEFAULT_TRIALS);
    let runs = args
        .runs
        .or(spec.as_ref().map(|s| s.runs))
        .unwrap_or(DEFAULT_RUNS);
    let base_seed = args
        .seed
        .or(spec.as_ref().map(|s| s.base_seed))
        .unwrap_or(DEFAULT_SEED);

    let effective = resolve_effective_strategy(
        args.strategy,
        spec.as_ref().and_then(|s| s.parsed_strategy()),
    );
    effective.log_startup();

    let cfg = SimConfig {
        num_doors: doors,
        num_host_opens: host_opens,
        strategy: effective.strategy,
        trials,
    };
    if let Err(e) = cfg.validate() {
        eprintln!("{e}");
        std::process::exit(2);
    }

    if let Err(e) = fs::create_dir_all(&args.output_dir) {
        eprintln!(
            "Failed to create output directory {:?}: {e}",
            args.output_dir
        );
        std::process::exit(2);
    }

    let csv_path = args.csv_out.as_ref().map(|p| {
        if p.is_absolute() {
            p.clone()
        } else {
            args.output_dir.join(p)
        }
    });

    let mut csv: Option<File> = match csv_path.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let mut f = File::create(path).unwrap_or_else(|e| {
                eprintln!("Failed to create CSV file {:?}: {e}", path);
                std::process::exit(2);
            });
            writeln!(f, "run,seed,trials,wins,win_rate").unwrap();
            Some(f)
        }
        None => None,
    };

    println!(
        "montyhall-replicate v{} | scenario={} doors={} host_opens={} strategy={} ({}) trials={} runs={} seed={} output_dir={} csv={}",
        env!("CARGO_PKG_VERSION"),
        spec.as_ref()
            .map(|s| s.scenario_id.clone())
            .unwrap_or_else(|| "-".to_string()),
        cfg.num_doors,
        cfg.num_host_opens,
        cfg.strategy.as_str(),
        effective.source.as_str(),
        cfg.trials,
        runs,
        base_seed,
        args.output_dir.display(),
        csv_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    let mut rate_stats = OnlineStats::default();
    let mut rate_samples: Vec<f64> = Vec::with_capacity(runs);
    let mut pooled_wins: u64 = 0;
    let mut run_records: Vec<RunRecord> = Vec::with_capacity(runs);

    for i in 0..runs {
        let run_seed = base_seed.wrapping_add(i as u64);
        let r = run_once(&cfg, run_seed);

        rate_stats.add(r.win_probability);
        rate_samples.push(r.win_probability);
        pooled_wins += r.wins;

        run_records.push(RunRecord {
            run: i + 1,
            seed: run_seed,
            trials: cfg.trials,
            wins: r.wins,
            win_rate: r.win_probability,
        });

        if let Some(f) = csv.as_mut() {
            writeln!(
                f,
                "{},{},{},{},{:.6}",
                i + 1,
                run_seed,
                cfg.trials,
                r.wins,
                r.win_probability
            )
            .unwrap();
        }

        let should_print = !args.quiet
            && (args.print_every == 1 || ((i + 1) % args.print_every == 0) || (i + 1 == runs));

        if should_print {
            println!(
                "run {:>4}/{:<4} seed={:<10} wins={:>8} rate={:.5}",
                i + 1,
                runs,
                run_seed,
                r.wins,
                r.win_probability
            );
        }
    }

    let pooled_trials = (cfg.trials as u64) * (runs as u64);
    let pooled_rate = pooled_wins as f64 / pooled_trials as f64;
    let (ci_lower, ci_upper) = wilson_ci(pooled_wins, pooled_trials, 1.0 - CI_LEVEL);
    let (p05, p50, p95) = p05_p50_p95(rate_samples);

    println!();
    println!("SUMMARY");
    println!("  runs:              {}", runs);
    println!("  trials_per_run:    {}", cfg.trials);
    println!(
        "  pooled:            wins={} / {}  rate={:.5}  wilson{:.0}=[{:.5}, {:.5}]",
        pooled_wins,
        pooled_trials,
        pooled_rate,
        CI_LEVEL * 100.0,
        ci_lower,
        ci_upper
    );
    println!(
        "  win_rate:          mean={:.5}  std(pop)={:.5}  min={:.5}  max={:.5}  p05={:.5}  p50={:.5}  p95={:.5}",
        rate_stats.mean(),
        rate_stats.stddev_population(),
        rate_stats.min(),
        rate_stats.max(),
        p05,
        p50,
        p95
    );
    println!(
        "  theoretical_stay:  {:.5}",
        cfg.theoretical_stay_probability()
    );

    let summary = ReplicationSummary {
        schema_version: SUMMARY_SCHEMA_VERSION,
        crate_version: env!("CARGO_PKG_VERSION").to_string(),
        config: ConfigEcho {
            doors: cfg.num_doors,
            host_opens: cfg.num_host_opens,
            strategy: cfg.strategy.as_str().to_string(),
            trials: cfg.trials,
            runs,
            base_seed,
        },
        theoretical_stay_probability: cfg.theoretical_stay_probability(),
        runs: run_records,
        aggregate: AggregateStats::from_parts(&rate_stats, (p05, p50, p95)),
        pooled: PooledStats {
            wins: pooled_wins,
            trials: pooled_trials,
            win_rate: pooled_rate,
            ci_level: CI_LEVEL,
            ci_lower,
            ci_upper,
        },
    };

    match write_summary(&args.output_dir, &summary) {
        Ok(path) => {
            println!();
            println!("Wrote: {}", path.display());
        }
        Err(e) => {
            eprintln!("Failed to write summary.json: {e}");
            std::process::exit(1);
        }
    }
}
