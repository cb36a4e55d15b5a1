//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! Tables are sized per variant and generated from a seed derived from the
//! variant's piece names, so hashes are deterministic across runs and two
//! dictionaries with the same kinds hash identically.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    // [kind][color][square]
    piece_square: Vec<[[u64; 64]; 2]>,
    side_to_move: u64,
    // One key per castling-right flag.
    castling: [u64; 4],
    en_passant_file: [u64; 8],
}

impl ZobristKeys {
    pub fn new(kind_count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let piece_square = (0..kind_count)
            .map(|_| {
                let mut colors = [[0u64; 64]; 2];
                for color in &mut colors {
                    for key in color.iter_mut() {
                        *key = rng.random();
                    }
                }
                colors
            })
            .collect();

        let side_to_move = rng.random();
        let castling = std::array::from_fn(|_| rng.random());
        let en_passant_file = std::array::from_fn(|_| rng.random());

        Self {
            piece_square,
            side_to_move,
            castling,
            en_passant_file,
        }
    }

    /// Return the key for a `(kind, color, square)` occupancy term.
    #[inline]
    pub fn piece_square(&self, kind: KindId, color: Color, square: Square) -> u64 {
        self.piece_square[kind][color.index()][square as usize]
    }

    /// XOR of the keys of every castling flag held.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        squares_of(u64::from(rights & 0x0F))
            .fold(0, |key, flag| key ^ self.castling[flag as usize])
    }

    #[inline]
    pub fn en_passant_file(&self, file: u8) -> u64 {
        self.en_passant_file[file as usize]
    }

    /// Toggle key, XORed in when Dark is to move.
    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }
}

/// Fold piece names into a table seed.
pub fn variant_seed<'a>(names: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    for name in names {
        for byte in name.bytes() {
            seed = splitmix64(seed ^ u64::from(byte));
        }
        seed = splitmix64(seed);
    }
    seed
}

#[inline]
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Compute the full position key from the complete game state.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let keys = game_state.dictionary().zobrist();
    let mut key = 0u64;

    for kind in 0..game_state.dictionary().len() {
        for color in Color::BOTH {
            for square in squares_of(game_state.pieces(kind, color)) {
                key ^= keys.piece_square(kind, color, square);
            }
        }
    }

    if game_state.side_to_move() == Color::Dark {
        key ^= keys.side_to_move();
    }

    key ^= keys.castling(game_state.castling_rights());

    if let Some(ep_square) = game_state.en_passant_square() {
        key ^= keys.en_passant_file(ep_square % 8);
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::standard_dictionary;

    #[test]
    fn starting_position_hash_is_deterministic() {
        let a = GameState::new_game();
        let b = GameState::new_game();
        assert_eq!(a.zobrist_key(), b.zobrist_key());
        assert_eq!(a.zobrist_key(), compute_zobrist_key(&a));
    }

    #[test]
    fn same_names_produce_same_tables() {
        assert_eq!(standard_dictionary().zobrist(), standard_dictionary().zobrist());
        assert_ne!(variant_seed(["king", "queen"]), variant_seed(["queen", "king"]));
    }

    #[test]
    fn each_castling_flag_contributes_independently() {
        let keys = ZobristKeys::new(1, 7);
        let all = keys.castling(0b1111);
        let split = keys.castling(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE)
            ^ keys.castling(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);

        assert_eq!(all, split);
        assert_eq!(keys.castling(0), 0);
        assert_ne!(keys.castling(CASTLE_LIGHT_KINGSIDE), keys.castling(CASTLE_DARK_KINGSIDE));
    }

    #[test]
    fn side_to_move_changes_hash() {
        let mut game = GameState::new_game();
        let light_key = game.zobrist_key();
        game.side_to_move = Color::Dark;
        assert_ne!(light_key, compute_zobrist_key(&game));
    }

    #[test]
    fn castling_rights_change_hash() {
        let mut game = GameState::new_game();
        let with_rights = compute_zobrist_key(&game);
        game.castling_rights = 0;
        assert_ne!(with_rights, compute_zobrist_key(&game));
    }

    #[test]
    fn en_passant_file_changes_hash() {
        let mut game = GameState::new_game();
        let no_ep = compute_zobrist_key(&game);
        game.en_passant_square = Some(20);
        assert_ne!(no_ep, compute_zobrist_key(&game));
    }
}
