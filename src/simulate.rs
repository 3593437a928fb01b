// src/simulate.rs
//
// The Monte Carlo core: independent trials of the generalized Monty
// Hall game, aggregated into a win rate.
//
// The RNG is injected by the caller so runs can be made reproducible
// with a seeded stream (the binaries use ChaCha8 seeded from --seed).
// Nothing here performs I/O beyond the optional trial sink.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ConfigError, SimConfig};
use crate::logging::{NoopSink, TrialRecord, TrialSink};

/// Outcome of a full simulation run.
///
/// Read-only after construction: `outcomes` holds one boolean per trial
/// in execution order, and `win_probability` is exactly
/// `wins as f64 / trials as f64`.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The configuration that produced this result.
    pub config: SimConfig,
    /// Per-trial outcomes, `true` = prize behind the final door.
    pub outcomes: Vec<bool>,
    /// Count of winning trials.
    pub wins: u64,
    /// `wins / trials`, in [0, 1].
    pub win_probability: f64,
}

impl SimulationResult {
    /// Count of losing trials.
    pub fn losses(&self) -> u64 {
        self.outcomes.len() as u64 - self.wins
    }
}

/// What happened in one trial, before it is folded into the aggregate.
#[derive(Debug, Clone)]
struct TrialDetail {
    prize_door: usize,
    initial_choice: usize,
    opened: Vec<usize>,
    final_choice: usize,
    win: bool,
}

/// Draw `k` distinct items uniformly from `pool`, without replacement.
///
/// Partial Fisher–Yates: after `k` swap steps the prefix `pool[..k]` is
/// a uniform k-subset in uniform order. Panics if `k > pool.len()`;
/// callers guarantee this via the config preconditions.
fn sample_distinct<R: Rng>(rng: &mut R, mut pool: Vec<usize>, k: usize) -> Vec<usize> {
    debug_assert!(k <= pool.len());
    for i in 0..k {
        let j = rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}

/// Run one trial of the game.
///
/// Precondition (checked by `SimConfig::validate` before the loop):
/// the eligible set in step 3 always has at least `num_host_opens`
/// members, and at least one closed non-chosen door remains for the
/// switch, so none of the draws below can fail.
fn run_trial<R: Rng>(cfg: &SimConfig, rng: &mut R) -> TrialDetail {
    // One prize, the rest empty, uniformly permuted.
    let mut doors = vec![false; cfg.num_doors];
    doors[cfg.num_doors - 1] = true;
    doors.shuffle(rng);

    let prize_door = doors
        .iter()
        .position(|&d| d)
        .unwrap_or(cfg.num_doors - 1);

    // Contestant's initial pick, uniform over all doors.
    let initial_choice = rng.gen_range(0..cfg.num_doors);

    // Host reveals empty doors the contestant did not pick.
    let eligible: Vec<usize> = (0..cfg.num_doors)
        .filter(|&i| i != initial_choice && !doors[i])
        .collect();
    let opened = sample_distinct(rng, eligible, cfg.num_host_opens);

    let final_choice = if cfg.strategy.switches() {
        // Uniform over doors that are still closed and not the pick.
        let remaining: Vec<usize> = (0..cfg.num_doors)
            .filter(|&i| i != initial_choice && !opened.contains(&i))
            .collect();
        remaining[rng.gen_range(0..remaining.len())]
    } else {
        initial_choice
    };

    TrialDetail {
        prize_door,
        initial_choice,
        opened,
        final_choice,
        win: doors[final_choice],
    }
}

/// Run `cfg.trials` independent trials and aggregate the outcomes.
///
/// Validation failures are returned before any trial runs; there are no
/// partial results. The only side effect is consuming draws from `rng`.
pub fn simulate<R: Rng>(cfg: &SimConfig, rng: &mut R) -> Result<SimulationResult, ConfigError> {
    simulate_with_sink(cfg, rng, &mut NoopSink)
}

/// Like [`simulate`], but emits one [`TrialRecord`] per trial to `sink`.
pub fn simulate_with_sink<R: Rng, S: TrialSink>(
    cfg: &SimConfig,
    rng: &mut R,
    sink: &mut S,
) -> Result<SimulationResult, ConfigError> {
    cfg.validate()?;

    let mut outcomes = Vec::with_capacity(cfg.trials);
    let mut wins: u64 = 0;

    for trial in 0..cfg.trials {
        let detail = run_trial(cfg, rng);
        if detail.win {
            wins += 1;
        }
        outcomes.push(detail.win);

        sink.log_trial(&TrialRecord {
            trial: trial as u64,
            prize_door: detail.prize_door,
            initial_choice: detail.initial_choice,
            opened: detail.opened,
            final_choice: detail.final_choice,
            win: detail.win,
        });
    }

    let win_probability = wins as f64 / cfg.trials as f64;

    Ok(SimulationResult {
        config: *cfg,
        outcomes,
        wins,
        win_probability,
    })
}
