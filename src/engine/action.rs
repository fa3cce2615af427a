//! Action handlers: the two temporal shapes an instruction can take.
//!
//! An *amortized* handler spreads a total quantity over the instruction
//! window, applying a slice proportional to each frame's elapsed time. The
//! final slice is the exact unapplied remainder, so the cumulative effect
//! equals the quantity regardless of how the window is partitioned into
//! frames, with zero overshoot. Completion commits the logical effect
//! (cell advance or quarter-turn).
//!
//! An *instantaneous* handler fires exactly once, on its first tick, and
//! ignores all further time. Repeating a discrete effect per frame would
//! corrupt state (a turn executed sixty times is not a turn).

use crate::types::Turn;
use crate::world::World;

/// Logical duration of one instruction, in milliseconds.
pub const WINDOW_MS: f64 = 1000.0;

/// Degrees in a quarter turn.
pub const TURN_DEGREES: f64 = 90.0;

/// The continuous motions the world knows how to apply fractionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Move one cell in the facing direction. Quantity is in cells.
    Advance,
    /// Rotate a quarter turn. Quantity is in degrees.
    Turn(Turn),
}

impl Motion {
    fn apply<W: World + ?Sized>(self, world: &mut W, slice: f64) {
        match self {
            Motion::Advance => {
                world.try_step(slice);
            }
            Motion::Turn(Turn::Left) => world.rotate(slice),
            Motion::Turn(Turn::Right) => world.rotate(-slice),
        }
    }

    fn commit<W: World + ?Sized>(self, world: &mut W) {
        match self {
            Motion::Advance => world.commit_step(),
            Motion::Turn(turn) => world.commit_turn(turn),
        }
    }
}

/// The live handler for the currently executing instruction. Replaced, never
/// reset, when the program counter advances.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Amortized {
        motion: Motion,
        quantity: f64,
        elapsed_ms: f64,
        applied: f64,
    },
    Instant {
        fired: bool,
    },
    /// Terminal handler installed after the last instruction completes.
    Noop,
}

impl Action {
    pub fn amortized(motion: Motion, quantity: f64) -> Self {
        Action::Amortized {
            motion,
            quantity,
            elapsed_ms: 0.0,
            applied: 0.0,
        }
    }

    pub fn instant() -> Self {
        Action::Instant { fired: false }
    }

    /// For instantaneous handlers: consume the one-shot fire. Returns true
    /// exactly once per activation; amortized and no-op handlers never fire.
    pub fn take_fire(&mut self) -> bool {
        match self {
            Action::Instant { fired } if !*fired => {
                *fired = true;
                true
            }
            _ => false,
        }
    }

    /// Consume one frame's elapsed time.
    pub fn tick<W: World + ?Sized>(&mut self, delta_ms: f64, world: &mut W) {
        let Action::Amortized {
            motion,
            quantity,
            elapsed_ms,
            applied,
        } = self
        else {
            return;
        };

        if *elapsed_ms >= WINDOW_MS {
            return;
        }

        if *elapsed_ms + delta_ms < WINDOW_MS {
            let slice = *quantity * (delta_ms / WINDOW_MS);
            motion.apply(world, slice);
            *applied += slice;
            *elapsed_ms += delta_ms;
        } else {
            // Window boundary: apply the exact remainder, then commit the
            // logical effect.
            let remainder = *quantity - *applied;
            motion.apply(world, remainder);
            motion.commit(world);
            *applied = *quantity;
            *elapsed_ms = WINDOW_MS;
        }
    }
}
