#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pursuit system that proposes opponent chase steps.
//!
//! The heuristic is greedy and single-step: each opponent closes the larger
//! of its axis gaps toward the player, with a fair coin flip breaking ties on
//! diagonals so approach paths stay unbiased. The system never retries the
//! other axis within a tick; the world simply rejects an invalid step and the
//! opponent stays put.

use gridstalk_core::{Command, GridVec};
use gridstalk_world::query::{OpponentView, PlayerSnapshot};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Pure system that emits one chase step command per opponent.
#[derive(Debug)]
pub struct Pursuit {
    rng: SmallRng,
}

impl Pursuit {
    /// Creates a pursuit system seeded for reproducible tie-breaks.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Consumes immutable views to emit chase step commands in opponent
    /// order. Zero steps (already coincident) are suppressed.
    pub fn handle(
        &mut self,
        player: &PlayerSnapshot,
        opponents: &OpponentView,
        out: &mut Vec<Command>,
    ) {
        for opponent in opponents.iter() {
            let step = chase_step(player.cell, opponent.cell, &mut self.rng);
            if step.is_zero() {
                continue;
            }
            out.push(Command::StepOpponent {
                opponent: opponent.id,
                step,
            });
        }
    }
}

/// Computes one unit chase step toward the player.
///
/// When both axis deltas are nonzero, a fair coin flip picks the axis for
/// this tick (heads prefers vertical). A zero delta on the chosen axis
/// collapses to the zero vector rather than dividing by it.
#[must_use]
pub fn chase_step(player: GridVec, opponent: GridVec, rng: &mut impl Rng) -> GridVec {
    let dx = player.x - opponent.x;
    let dy = player.y - opponent.y;

    let mut prefer_vertical = false;
    if dx != 0 && dy != 0 && rng.gen_bool(0.5) {
        prefer_vertical = true;
    }

    if (dx == 0 && dy != 0) || prefer_vertical {
        GridVec::new(0, dy.signum())
    } else {
        GridVec::new(dx.signum(), 0)
    }
}
