// src/report.rs
//
// Console presentation for simulation results: the outcome grid and the
// theoretical-vs-simulated comparison block. Pure string building so
// the binaries stay thin and the formatting is testable.

use crate::simulate::SimulationResult;

const ANSI_GREEN: &str = "\x1b[92m";
const ANSI_RED: &str = "\x1b[91m";
const ANSI_RESET: &str = "\x1b[0m";

/// How to label and color the outcome grid.
#[derive(Debug, Clone, Copy)]
pub struct GridStyle {
    /// Label for a winning trial.
    pub win_label: &'static str,
    /// Label for a losing trial.
    pub lose_label: &'static str,
    /// Wrap labels in ANSI green/red escape codes.
    pub color: bool,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            win_label: "win",
            lose_label: "lose",
            color: true,
        }
    }
}

impl GridStyle {
    /// Plain labels, no escape codes. Used for tests and non-TTY output.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }
}

/// Side length of the square-ish grid: ceil(sqrt(n)).
pub fn grid_side(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let mut side = (n as f64).sqrt().floor() as usize;
    // Guard against float truncation on either side of the root.
    while side * side < n {
        side += 1;
    }
    while side > 1 && (side - 1) * (side - 1) >= n {
        side -= 1;
    }
    side
}

/// Render outcomes as rows of `grid_side(n)` labels, two spaces apart.
///
/// The last row may be short when `n` is not a perfect square. Returns
/// an empty string for an empty slice.
pub fn render_grid(outcomes: &[bool], style: &GridStyle) -> String {
    let side = grid_side(outcomes.len());
    if side == 0 {
        return String::new();
    }

    let mut out = String::new();
    for row in outcomes.chunks(side) {
        let cells: Vec<String> = row.iter().map(|&win| label(win, style)).collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}

fn label(win: bool, style: &GridStyle) -> String {
    let text = if win { style.win_label } else { style.lose_label };
    if style.color {
        let color = if win { ANSI_GREEN } else { ANSI_RED };
        format!("{}{}{}", color, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// The two-line comparison the original program prints: theoretical
/// win probability *without* switching next to the *simulated* win
/// probability under the configured strategy, both to 5 decimals.
///
/// The asymmetry (theoretical vs simulated) is deliberate and kept.
pub fn render_comparison(result: &SimulationResult) -> String {
    let cfg = &result.config;
    format!(
        "Theoretical win probability without switching: {:.5}\n\
         Simulated win probability ({} doors, host opens {}, strategy={}): {:.5}\n",
        cfg.theoretical_stay_probability(),
        cfg.num_doors,
        cfg.num_host_opens,
        cfg.strategy.as_str(),
        result.win_probability,
    )
}
