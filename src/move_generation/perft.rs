//! Node counting over apply/undo, used to validate the generator.

use crate::errors::MoveError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{apply_move, undo_move};
use crate::move_generation::move_generator::{LegalMoveGenerator, MoveGenerator};
use crate::moves::move_descriptions::Movement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

/// Leaf counts at `depth` plies, walking one position with apply/undo.
///
/// A position whose game is already decided is a leaf.
pub fn perft<G: MoveGenerator + ?Sized>(
    generator: &mut G,
    game_state: &mut GameState,
    depth: u8,
) -> Result<PerftCounts, MoveError> {
    let mut counts = PerftCounts::default();
    if depth == 0 || game_state.winner().is_some() {
        counts.nodes = 1;
        return Ok(counts);
    }

    for movement in generator.generate_legal_moves(game_state) {
        let record = apply_move(game_state, movement)?;

        if depth == 1 {
            counts.nodes += 1;
            if record.captured.is_some() {
                counts.captures += 1;
            }
            if movement.is_en_passant() {
                counts.en_passant += 1;
            }
            if movement.castling_side().is_some() {
                counts.castles += 1;
            }
            if record.promotion.is_some() {
                counts.promotions += 1;
            }
        } else {
            counts.merge(perft(generator, game_state, depth - 1)?);
        }

        undo_move(game_state, &record)?;
    }

    Ok(counts)
}

/// [`perft`] on a copy of `game_state` with the uncached generator.
pub fn perft_legal(game_state: &GameState, depth: u8) -> Result<PerftCounts, MoveError> {
    let mut scratch = game_state.clone();
    perft(&mut LegalMoveGenerator, &mut scratch, depth)
}

/// Per-root-move node counts, in generation order.
pub fn perft_divide<G: MoveGenerator + ?Sized>(
    generator: &mut G,
    game_state: &mut GameState,
    depth: u8,
) -> Result<Vec<(Movement, usize)>, MoveError> {
    if depth == 0 {
        return Ok(Vec::new());
    }

    let mut divided = Vec::new();
    for movement in generator.generate_legal_moves(game_state) {
        let record = apply_move(game_state, movement)?;
        let nodes = perft(generator, game_state, depth - 1)?.nodes;
        undo_move(game_state, &record)?;
        divided.push((movement, nodes));
    }
    Ok(divided)
}
