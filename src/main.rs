// src/main.rs
//
// Interactive CLI entrypoint for the Monty Hall simulator.
//
// Behavior contract:
// - --doors / --host-opens may be given as flags; whichever is missing
//   is prompted for on stdin. Malformed numeric input is fatal (exit 2).
// - Strategy precedence: --strategy overrides MONTYHALL_STRATEGY,
//   default Switch (the classic puzzle's interesting case).
// - Deterministic runs via --seed; unseeded runs draw from OS entropy.
// - Output: the win/lose grid (unless --quiet), then the theoretical
//   no-switch probability next to the simulated one, 5 decimals each.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use montyhall::config::{resolve_effective_strategy, SimConfig, Strategy, DEFAULT_TRIALS};
use montyhall::logging::FileSink;
use montyhall::report::{render_comparison, render_grid, GridStyle};
use montyhall::simulate::{simulate, simulate_with_sink};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyArg {
    Switch,
    Stay,
}

#[derive(Debug, Parser)]
#[command(
    name = "montyhall",
    about = "Generalized Monty Hall Monte Carlo simulator",
    version
)]
struct Args {
    /// Total number of doors (at least 3). Prompted for when omitted.
    #[arg(long)]
    doors: Option<usize>,

    /// Doors the host opens (at most doors - 2). Prompted for when omitted.
    #[arg(long = "host-opens")]
    host_opens: Option<usize>,

    /// Number of independent trials.
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Contestant strategy (optional).
    /// If omitted, uses MONTYHALL_STRATEGY (default switch).
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Deterministic seed. Unseeded runs use OS entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable ANSI colors in the outcome grid.
    #[arg(long)]
    no_color: bool,

    /// Suppress the outcome grid; print only the probabilities.
    #[arg(long)]
    quiet: bool,

    /// Write one JSON line per trial to this path.
    #[arg(long)]
    trial_log: Option<PathBuf>,
}

/// Prompt on stdout and read one value from stdin.
/// Parse failures are fatal: this mirrors the original program, where
/// malformed console input aborts the run.
fn prompt_value<T: FromStr>(prompt: &str) -> T {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        eprintln!("Failed to read input: {e}");
        std::process::exit(2);
    }

    match line.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid input: expected an integer, got '{}'", line.trim());
            std::process::exit(2);
        }
    }
}

fn main() {
    let args = Args::parse();

    let cli_strategy = args.strategy.map(|s| match s {
        StrategyArg::Switch => Strategy::Switch,
        StrategyArg::Stay => Strategy::Stay,
    });

    // Resolve strategy with proper precedence: CLI > env > default.
    // (No scenario file for the interactive binary, so pass None.)
    let effective = resolve_effective_strategy(cli_strategy, None);
    effective.log_startup();

    let num_doors = args
        .doors
        .unwrap_or_else(|| prompt_value("Total number of doors (at least 3): "));
    let num_host_opens = args.host_opens.unwrap_or_else(|| {
        prompt_value(&format!(
            "Doors for the host to open (must be less than {}): ",
            num_doors.saturating_sub(1)
        ))
    });

    let cfg = SimConfig {
        num_doors,
        num_host_opens,
        strategy: effective.strategy,
        trials: args.trials,
    };
    if let Err(e) = cfg.validate() {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    println!(
        "montyhall v{} | doors={} host_opens={} strategy={} trials={} seed={}",
        env!("CARGO_PKG_VERSION"),
        cfg.num_doors,
        cfg.num_host_opens,
        cfg.strategy.as_str(),
        cfg.trials,
        args.seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "entropy".to_string())
    );

    let result = match &args.trial_log {
        Some(path) => {
            let mut sink = match FileSink::create(path) {
                Ok(sink) => sink,
                Err(e) => {
                    eprintln!("Failed to create trial log {}: {e}", path.display());
                    std::process::exit(2);
                }
            };
            simulate_with_sink(&cfg, &mut rng, &mut sink)
        }
        None => simulate(&cfg, &mut rng),
    };

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    if !args.quiet {
        let style = if args.no_color {
            GridStyle::plain()
        } else {
            GridStyle::default()
        };
        println!();
        println!("Outcome grid ({} trials):", result.outcomes.len());
        print!("{}", render_grid(&result.outcomes, &style));
    }

    println!();
    print!("{}", render_comparison(&result));
}
