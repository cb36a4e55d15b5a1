//! Core incremental board state representation.
//!
//! `GameState` stores one `[Light, Dark]` bitboard pair per piece kind of the
//! variant, the derived occupancy composites, turn and rule flags, clocks and
//! the history stacks used by apply/undo. Piece masks are private: every
//! mutation goes through a method that keeps the composites consistent.

use std::sync::Arc;

use crate::errors::FormationError;
use crate::game_state::chess_rules::{standard_dictionary, standard_formation};
use crate::game_state::chess_types::*;
use crate::game_state::formation::Formation;
use crate::game_state::piece_dictionary::PieceDictionary;
use crate::search::zobrist::compute_zobrist_key;

/// Half-moves without a capture or pawn move after which a draw may be claimed.
pub const NO_PROGRESS_LIMIT: u16 = 100;

/// Occurrences of the same position that allow a draw claim.
pub const REPETITION_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    dictionary: Arc<PieceDictionary>,

    // --- Bitboard representation ---
    // [kind][color]
    pieces: Vec<[u64; 2]>,

    // Occupancy caches.
    occupancy_by_color: [u64; 2],
    occupancy_all: u64,

    // --- Side and state flags ---
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,
    pub(crate) pending_promotion: Option<Square>,
    // Squares whose occupant has not moved since the game started.
    pub(crate) unmoved: u64,

    // --- Clocks / move counters ---
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,

    // --- Hashing / repetition support ---
    pub(crate) zobrist_key: u64,
    pub(crate) repetition_history: Vec<u64>,

    // --- Apply/undo stack ---
    pub(crate) undo_stack: Vec<MoveRecord>,
}

impl GameState {
    /// Position with no pieces for the given variant.
    pub fn empty(dictionary: Arc<PieceDictionary>) -> Self {
        let kind_count = dictionary.len();
        let mut state = Self {
            dictionary,
            pieces: vec![[0; 2]; kind_count],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            pending_promotion: None,
            unmoved: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
            repetition_history: Vec::new(),
            undo_stack: Vec::new(),
        };
        state.zobrist_key = compute_zobrist_key(&state);
        state.repetition_history.push(state.zobrist_key);
        state
    }

    /// Standard chess starting position.
    pub fn new_game() -> Self {
        let dictionary = Arc::new(standard_dictionary());
        Self::from_formation(&standard_formation(), Arc::clone(&dictionary))
            .unwrap_or_else(|_| Self::empty(dictionary))
    }

    /// Build a position from a formation grid.
    ///
    /// Fails without producing a partial position when the dictionary lacks
    /// a required kind, a cell names an unknown piece, or a color has more
    /// than one king.
    pub fn from_formation(
        formation: &Formation,
        dictionary: Arc<PieceDictionary>,
    ) -> Result<Self, FormationError> {
        dictionary.validate_roles()?;

        let mut state = Self::empty(dictionary);

        for square in 0..64u8 {
            let coordinate = Coordinate::from_square(square);
            let name = formation.name_at(coordinate);
            if name.is_empty() {
                continue;
            }

            let kind = state
                .dictionary
                .id_of(name)
                .ok_or_else(|| FormationError::UnknownPiece {
                    name: name.to_owned(),
                    file: coordinate.file,
                    rank: coordinate.rank,
                })?;
            state.put(kind, formation.color_at(coordinate), square);
        }

        for color in Color::BOTH {
            if state.king_mask(color).count_ones() > 1 {
                return Err(FormationError::TooManyKings {
                    color: color.name(),
                });
            }
        }

        state.unmoved = state.occupancy_all;
        state.castling_rights = state.initial_castling_rights();
        state.zobrist_key = compute_zobrist_key(&state);
        state.repetition_history = vec![state.zobrist_key];

        Ok(state)
    }

    fn initial_castling_rights(&self) -> CastlingRights {
        let (Some(king), Some(rook)) = (self.dictionary.king(), self.dictionary.rook()) else {
            return 0;
        };

        let mut rights = 0;
        for color in Color::BOTH {
            let home = color.home_rank();
            let king_square = home * 8 + KING_START_FILE;
            if self.pieces[king][color.index()] & square_bit(king_square) == 0 {
                continue;
            }
            for side in CastlingSide::BOTH {
                let rook_square = home * 8 + side.rook_file();
                if self.pieces[rook][color.index()] & square_bit(rook_square) != 0 {
                    rights |= side.right(color);
                }
            }
        }
        rights
    }

    // --- Read access ---

    #[inline]
    pub fn dictionary(&self) -> &Arc<PieceDictionary> {
        &self.dictionary
    }

    #[inline]
    pub fn pieces(&self, kind: KindId, color: Color) -> u64 {
        self.pieces[kind][color.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy_all
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    #[inline]
    pub fn unmoved_mask(&self) -> u64 {
        self.unmoved
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn history(&self) -> &[MoveRecord] {
        &self.undo_stack
    }

    #[inline]
    pub fn is_occupied(&self, coordinate: Coordinate) -> bool {
        self.occupancy_all & coordinate.bit() != 0
    }

    /// Kind and color of the piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<(KindId, Color)> {
        let bit = square_bit(square);
        if self.occupancy_all & bit == 0 {
            return None;
        }
        let color = if self.occupancy_by_color[Color::Light.index()] & bit != 0 {
            Color::Light
        } else {
            Color::Dark
        };
        self.pieces
            .iter()
            .position(|masks| masks[color.index()] & bit != 0)
            .map(|kind| (kind, color))
    }

    pub fn king_mask(&self, color: Color) -> u64 {
        self.dictionary
            .king()
            .map_or(0, |king| self.pieces[king][color.index()])
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let mask = self.king_mask(color);
        (mask != 0).then(|| mask.trailing_zeros() as Square)
    }

    // --- Outcome ---

    /// Color that captured the opposing king, if the game is decided.
    pub fn winner(&self) -> Option<Color> {
        let light_king = self.king_mask(Color::Light) != 0;
        let dark_king = self.king_mask(Color::Dark) != 0;
        match (light_king, dark_king) {
            (true, false) => Some(Color::Light),
            (false, true) => Some(Color::Dark),
            _ => None,
        }
    }

    /// Whether the side to move may claim a draw by the no-progress clock or
    /// by threefold repetition.
    pub fn draw_opportunity(&self) -> bool {
        if self.halfmove_clock >= NO_PROGRESS_LIMIT {
            return true;
        }
        let seen = self
            .repetition_history
            .iter()
            .filter(|key| **key == self.zobrist_key)
            .count();
        seen >= REPETITION_LIMIT
    }

    // --- Mutation ---

    /// Place a piece, replacing whatever stood on the square.
    pub fn set_piece(&mut self, kind: KindId, color: Color, coordinate: Coordinate) {
        let square = coordinate.square();
        self.take(square);
        self.put(kind, color, square);
        self.zobrist_key = compute_zobrist_key(self);
    }

    /// Remove a specific piece; a no-op when that piece is not on the square.
    pub fn clear_piece(&mut self, kind: KindId, color: Color, coordinate: Coordinate) {
        let bit = coordinate.bit();
        if self.pieces[kind][color.index()] & bit == 0 {
            return;
        }
        self.pieces[kind][color.index()] &= !bit;
        self.occupancy_by_color[color.index()] &= !bit;
        self.occupancy_all &= !bit;
        self.zobrist_key = compute_zobrist_key(self);
    }

    /// Recompute every composite from the per-kind masks.
    pub fn recalc_occupancy(&mut self) {
        let mut by_color = [0u64; 2];
        for masks in &self.pieces {
            by_color[0] |= masks[0];
            by_color[1] |= masks[1];
        }
        self.occupancy_by_color = by_color;
        self.occupancy_all = by_color[0] | by_color[1];
    }

    /// Add a piece to an empty square, keeping composites in step.
    #[inline]
    pub(crate) fn put(&mut self, kind: KindId, color: Color, square: Square) {
        let bit = square_bit(square);
        debug_assert!(self.occupancy_all & bit == 0, "square {square} already occupied");
        self.pieces[kind][color.index()] |= bit;
        self.occupancy_by_color[color.index()] |= bit;
        self.occupancy_all |= bit;
    }

    /// Remove and return whatever stands on `square`.
    #[inline]
    pub(crate) fn take(&mut self, square: Square) -> Option<(KindId, Color)> {
        let (kind, color) = self.piece_at(square)?;
        let bit = square_bit(square);
        self.pieces[kind][color.index()] &= !bit;
        self.occupancy_by_color[color.index()] &= !bit;
        self.occupancy_all &= !bit;
        Some((kind, color))
    }
}

/// Panics unless the per-kind masks are disjoint and the composites are
/// exactly their unions.
#[cfg(test)]
pub(crate) fn assert_composites_consistent(state: &GameState) {
    let mut union = [0u64; 2];
    for kind in 0..state.dictionary().len() {
        for color in Color::BOTH {
            let mask = state.pieces(kind, color);
            assert_eq!((union[0] | union[1]) & mask, 0, "kinds overlap");
            union[color.index()] |= mask;
        }
    }
    assert_eq!(union[0], state.occupancy(Color::Light));
    assert_eq!(union[1], state.occupancy(Color::Dark));
    assert_eq!(union[0] | union[1], state.occupancy_all());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::{KING, PAWN, QUEEN};

    fn coord(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test coordinate is on the board")
    }

    #[test]
    fn new_game_matches_standard_layout() {
        let game = GameState::new_game();

        assert_eq!(game.occupancy(Color::Light), 0x0000_0000_0000_FFFF);
        assert_eq!(game.occupancy(Color::Dark), 0xFFFF_0000_0000_0000);
        assert_eq!(game.side_to_move(), Color::Light);
        assert_eq!(game.castling_rights(), 0b1111);
        assert_eq!(game.unmoved_mask(), game.occupancy_all());
        assert_eq!(game.king_square(Color::Light), Some(4));
        assert_eq!(game.king_square(Color::Dark), Some(60));
        assert_eq!(game.winner(), None);
        assert!(!game.draw_opportunity());
        assert_composites_consistent(&game);
    }

    #[test]
    fn piece_at_reports_kind_and_color() {
        let game = GameState::new_game();
        let pawn = game.dictionary().pawn().expect("pawn should exist");
        let queen = game.dictionary().queen().expect("queen should exist");

        assert_eq!(game.piece_at(12), Some((pawn, Color::Light)));
        assert_eq!(game.piece_at(59), Some((queen, Color::Dark)));
        assert_eq!(game.piece_at(28), None);
    }

    #[test]
    fn unknown_piece_fails_construction() {
        let formation = Formation::empty().with_piece(coord(2, 2), "archbishop");
        let err = GameState::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect_err("unknown piece should be rejected");

        assert_eq!(
            err,
            FormationError::UnknownPiece {
                name: "archbishop".to_owned(),
                file: 2,
                rank: 2
            }
        );
    }

    #[test]
    fn two_kings_of_one_color_fail_construction() {
        let formation = Formation::empty()
            .with_piece(coord(4, 0), KING)
            .with_piece(coord(3, 0), KING);
        let err = GameState::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect_err("second king should be rejected");
        assert_eq!(err, FormationError::TooManyKings { color: "light" });
    }

    #[test]
    fn set_and_clear_keep_composites_consistent() {
        let mut game = GameState::new_game();
        let queen = game.dictionary().queen().expect("queen should exist");
        let pawn = game.dictionary().pawn().expect("pawn should exist");

        game.set_piece(queen, Color::Dark, coord(4, 1));
        assert_eq!(game.piece_at(12), Some((queen, Color::Dark)));
        assert_eq!(game.pieces(pawn, Color::Light) & square_bit(12), 0);
        assert_composites_consistent(&game);

        game.clear_piece(queen, Color::Dark, coord(4, 1));
        assert!(!game.is_occupied(coord(4, 1)));
        assert_composites_consistent(&game);

        let before = game.clone();
        game.recalc_occupancy();
        assert_eq!(game, before, "recomputing composites is idempotent");
    }

    #[test]
    fn winner_is_symmetric() {
        let dictionary = Arc::new(standard_dictionary());
        let light_only = Formation::empty()
            .with_piece(coord(4, 0), KING)
            .with_piece(coord(0, 1), PAWN);
        let state = GameState::from_formation(&light_only, Arc::clone(&dictionary))
            .expect("formation should build");
        assert_eq!(state.winner(), Some(Color::Light));

        let dark_only = Formation::empty().with_piece(coord(4, 7), KING);
        let state =
            GameState::from_formation(&dark_only, dictionary).expect("formation should build");
        assert_eq!(state.winner(), Some(Color::Dark));
    }

    #[test]
    fn missing_queen_in_dictionary_fails_construction() {
        let dictionary = PieceDictionary::new(
            crate::game_state::chess_rules::standard_definitions()
                .into_iter()
                .filter(|definition| definition.name != QUEEN),
        );
        let err = GameState::from_formation(&Formation::empty(), Arc::new(dictionary))
            .expect_err("queen is required");
        assert_eq!(err, FormationError::MissingRequiredKind(QUEEN.to_owned()));
    }
}
