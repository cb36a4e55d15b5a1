//! Castling and en passant generation.
//!
//! Both produce movements with sentinel licenses; the executor relocates the
//! rook or removes the passed pawn accordingly.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::move_descriptions::{MoveLicense, Movement};

/// Castling and en passant movements available to the piece on `from`.
pub fn special_movements(
    game_state: &GameState,
    kind: KindId,
    color: Color,
    from: Coordinate,
) -> Vec<Movement> {
    let mut out = Vec::new();
    castling_movements(game_state, kind, color, from, &mut out);
    en_passant_movements(game_state, kind, color, from, &mut out);
    out
}

fn castling_movements(
    game_state: &GameState,
    kind: KindId,
    color: Color,
    from: Coordinate,
    out: &mut Vec<Movement>,
) {
    let dictionary = game_state.dictionary();
    let (Some(king), Some(rook)) = (dictionary.king(), dictionary.rook()) else {
        return;
    };

    let home = color.home_rank();
    if kind != king
        || from.rank != home
        || from.file != KING_START_FILE
        || game_state.unmoved_mask() & from.bit() == 0
    {
        return;
    }

    for side in CastlingSide::BOTH {
        if game_state.castling_rights() & side.right(color) == 0 {
            continue;
        }

        let rook_bit = square_bit(home * 8 + side.rook_file());
        if game_state.pieces(rook, color) & rook_bit == 0 || game_state.unmoved_mask() & rook_bit == 0
        {
            continue;
        }

        if rank_span(home, KING_START_FILE, side.rook_file(), false) & game_state.occupancy_all() != 0 {
            continue;
        }

        let path = rank_span(home, KING_START_FILE, side.king_target_file(), true);
        if squares_of(path).any(|square| is_square_attacked(game_state, square, color.opposite())) {
            continue;
        }

        let to = Coordinate {
            file: side.king_target_file(),
            rank: home,
        };
        out.push(Movement::new(from, to, MoveLicense::Castling(side)));
    }
}

fn en_passant_movements(
    game_state: &GameState,
    kind: KindId,
    color: Color,
    from: Coordinate,
    out: &mut Vec<Movement>,
) {
    let Some(pawn) = game_state.dictionary().pawn() else {
        return;
    };
    let Some(ep_square) = game_state.en_passant_square() else {
        return;
    };
    if kind != pawn {
        return;
    }

    let target = Coordinate::from_square(ep_square);
    if target.rank as i8 != from.rank as i8 + color.forward() || target.file.abs_diff(from.file) != 1 {
        return;
    }

    // The pawn that just advanced two squares stands beside the capturer.
    let passed = Coordinate {
        file: target.file,
        rank: from.rank,
    };
    if game_state.pieces(pawn, color.opposite()) & passed.bit() == 0 {
        return;
    }

    out.push(Movement::new(from, target, MoveLicense::EnPassant));
}

/// Squares on `rank` between files `a` and `b`, endpoints optional.
fn rank_span(rank: u8, a: u8, b: u8, inclusive: bool) -> u64 {
    let (low, high) = (a.min(b), a.max(b));
    let mut mask = 0u64;
    for file in low..=high {
        if !inclusive && (file == low || file == high) {
            continue;
        }
        mask |= square_bit(rank * 8 + file);
    }
    mask
}
