//! Ray walking for sliding patterns.
//!
//! `ride` returns every square along one ray up to a step limit, including
//! the first occupied square; callers mask out their own pieces.

use crate::game_state::chess_types::{Color, Coordinate};
use crate::moves::movement_notation::Direction;

pub type Step = (i8, i8);

const N: Step = (0, 1);
const S: Step = (0, -1);
const E: Step = (1, 0);
const W: Step = (-1, 0);
const NE: Step = (1, 1);
const NW: Step = (-1, 1);
const SE: Step = (1, -1);
const SW: Step = (-1, -1);

pub const ORTHOGONAL_STEPS: [Step; 4] = [N, S, E, W];
pub const DIAGONAL_STEPS: [Step; 4] = [NE, NW, SE, SW];
pub const ALL_STEPS: [Step; 8] = [N, S, E, W, NE, NW, SE, SW];

/// Resolve a direction into board steps for `color`.
///
/// Forward is toward the opponent's home side for both colors, so Dark's
/// forward steps point down the board.
pub fn ray_steps(direction: Direction, color: Color) -> &'static [Step] {
    let light = color == Color::Light;
    match direction {
        Direction::None => &[],
        Direction::Forward => {
            if light {
                &[N]
            } else {
                &[S]
            }
        }
        Direction::Backward => {
            if light {
                &[S]
            } else {
                &[N]
            }
        }
        Direction::ForwardBackward => &[N, S],
        Direction::Sideways => &[E, W],
        Direction::ForwardSideways => {
            if light {
                &[N, E, W]
            } else {
                &[S, E, W]
            }
        }
        Direction::BackwardSideways => {
            if light {
                &[S, E, W]
            } else {
                &[N, E, W]
            }
        }
        Direction::Orthogonal => &ORTHOGONAL_STEPS,
        Direction::DiagonalForward => {
            if light {
                &[NE, NW]
            } else {
                &[SE, SW]
            }
        }
        Direction::DiagonalBackward => {
            if light {
                &[SE, SW]
            } else {
                &[NE, NW]
            }
        }
        Direction::Diagonal => &DIAGONAL_STEPS,
        Direction::All => &ALL_STEPS,
    }
}

/// Walk from `from` by `step` at most `limit` times, stopping on the first
/// occupied square (which is included).
pub fn ride(from: Coordinate, step: Step, limit: u8, occupancy: u64) -> u64 {
    let mut targets = 0u64;
    let mut current = from;

    for _ in 0..limit {
        let Some(next) = current.offset(step.0, step.1) else {
            break;
        };
        let bit = next.bit();
        targets |= bit;

        if occupancy & bit != 0 {
            break;
        }
        current = next;
    }

    targets
}

/// Union of `ride` over every ray of `direction`.
pub fn rider_targets(
    from: Coordinate,
    direction: Direction,
    color: Color,
    limit: u8,
    occupancy: u64,
) -> u64 {
    ray_steps(direction, color)
        .iter()
        .fold(0, |targets, step| targets | ride(from, *step, limit, occupancy))
}
