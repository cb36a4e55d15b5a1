//! Pluggable board evaluation.
//!
//! Search delegates static scoring to [`BoardScorer`], so a heuristic can be
//! swapped without altering the tree walk.

use crate::game_state::chess_types::*;

pub trait BoardScorer {
    /// Score from the perspective of `maximizing`.
    fn score(&self, game_state: &GameState, maximizing: Color) -> i32;
}

/// Declared piece values times population, own side minus the other side.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    pub fn material(game_state: &GameState, color: Color) -> i32 {
        game_state
            .dictionary()
            .kinds()
            .iter()
            .enumerate()
            .map(|(kind, piece)| {
                piece.value * game_state.pieces(kind, color).count_ones() as i32
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState, maximizing: Color) -> i32 {
        Self::material(game_state, maximizing) - Self::material(game_state, maximizing.opposite())
    }
}
