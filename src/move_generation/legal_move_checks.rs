//! Attack queries and king safety.
//!
//! Attacks are read off the same compiled patterns used for generation, so
//! fairy pieces attack exactly where they could capture.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::pattern_targets;

/// Whether any `attacker_color` piece could capture on `square`.
///
/// Capture-only patterns attack; non-capture-only patterns never do. Special
/// moves are not considered.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    attackers_to_square(game_state, square, attacker_color)
        .next()
        .is_some()
}

#[inline]
pub fn is_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Squares and kinds of the `attacker_color` pieces that attack `square`.
pub fn attackers_to_square(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
) -> impl Iterator<Item = (Square, KindId)> + '_ {
    let target_mask = square_bit(square);
    let dictionary = game_state.dictionary();

    squares_of(game_state.occupancy(attacker_color)).filter_map(move |from_sq| {
        let (kind, _) = game_state.piece_at(from_sq)?;
        let from = Coordinate::from_square(from_sq);
        let unmoved = game_state.unmoved_mask() & from.bit() != 0;

        dictionary
            .kind(kind)
            .movements
            .iter()
            .filter(|notation| !notation.conditions.non_capture_only)
            .filter(|notation| unmoved || !notation.conditions.initial_only)
            .any(|notation| {
                pattern_targets(game_state, attacker_color, from, notation) & target_mask != 0
            })
            .then_some((from_sq, kind))
    })
}
