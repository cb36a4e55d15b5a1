//! Canonical rule constants and stock variant setups.
//!
//! Holds the standard chess piece dictionary, the standard home row and a
//! Chess960 home-row generator.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game_state::formation::Formation;
use crate::game_state::piece_dictionary::{PieceDefinition, PieceDictionary};

pub const KING: &str = "king";
pub const QUEEN: &str = "queen";
pub const ROOK: &str = "rook";
pub const BISHOP: &str = "bishop";
pub const KNIGHT: &str = "knight";
pub const PAWN: &str = "pawn";

/// `(name, value, movement notation)` for orthodox chess.
pub const STANDARD_PIECES: [(&str, i32, &str); 6] = [
    (KING, 1000, "1*"),
    (QUEEN, 9, "n*"),
    (ROOK, 5, "n+"),
    (BISHOP, 3, "nX"),
    (KNIGHT, 3, "~1/2"),
    (PAWN, 1, "o1>,c1X>,oi2>"),
];

/// Light's home row from file a to file h; Dark mirrors it.
pub const STANDARD_HOME_ROW: [&str; 8] = [ROOK, KNIGHT, BISHOP, QUEEN, KING, BISHOP, KNIGHT, ROOK];

pub fn standard_definitions() -> Vec<PieceDefinition> {
    STANDARD_PIECES
        .iter()
        .map(|(name, value, notation)| PieceDefinition::new(*name, *value, *notation))
        .collect()
}

pub fn standard_dictionary() -> PieceDictionary {
    PieceDictionary::new(standard_definitions())
}

pub fn standard_formation() -> Formation {
    Formation::from_home_row(STANDARD_HOME_ROW)
}

/// Random Chess960 home row: bishops on opposite colors, king between rooks.
pub fn chess960_home_row<R: Rng + ?Sized>(rng: &mut R) -> [&'static str; 8] {
    let mut row: [Option<&'static str>; 8] = [None; 8];

    let light_bishop = 2 * rng.random_range(0..4) + 1;
    let dark_bishop = 2 * rng.random_range(0..4);
    row[light_bishop] = Some(BISHOP);
    row[dark_bishop] = Some(BISHOP);

    let mut free: Vec<usize> = (0..8).filter(|file| row[*file].is_none()).collect();
    free.shuffle(rng);

    // Queen and knights take three random files; the remaining three, left
    // to right, become rook, king, rook.
    let (placed, remaining) = free.split_at_mut(3);
    row[placed[0]] = Some(QUEEN);
    row[placed[1]] = Some(KNIGHT);
    row[placed[2]] = Some(KNIGHT);

    remaining.sort_unstable();
    row[remaining[0]] = Some(ROOK);
    row[remaining[1]] = Some(KING);
    row[remaining[2]] = Some(ROOK);

    row.map(|piece| piece.unwrap_or(PAWN))
}

pub fn chess960_formation<R: Rng + ?Sized>(rng: &mut R) -> Formation {
    Formation::from_home_row(chess960_home_row(rng))
}
