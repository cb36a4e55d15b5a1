//! Game session facade.
//!
//! `ChessGame` owns one position and accepts moves as text from a named
//! player, refusing anything the generator would not produce. Refusals leave
//! the position untouched and come back as short reason strings.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use crate::errors::{FormationError, IllegalMove, MoveError};
use crate::game_state::chess_rules::{chess960_formation, standard_dictionary};
use crate::game_state::chess_types::*;
use crate::game_state::formation::Formation;
use crate::game_state::piece_dictionary::PieceDictionary;
use crate::move_generation::legal_move_apply::{apply_move, promote, undo_last_move};
use crate::move_generation::legal_move_generator::{legal_movements, legal_targets};
use crate::moves::move_descriptions::Movement;
use crate::utils::coordinate_notation::{movement_to_string, parse_movement};
use crate::utils::render_game_state::{render_game_state, state_string};

#[derive(Debug, Clone)]
pub struct ChessGame {
    state: GameState,
}

impl Default for ChessGame {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessGame {
    /// Standard chess from the initial position.
    pub fn new() -> Self {
        Self {
            state: GameState::new_game(),
        }
    }

    pub fn from_formation(
        formation: &Formation,
        dictionary: Arc<PieceDictionary>,
    ) -> Result<Self, FormationError> {
        Ok(Self {
            state: GameState::from_formation(formation, dictionary)?,
        })
    }

    /// Standard pieces on a shuffled Chess960 home row.
    pub fn chess960<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, FormationError> {
        Self::from_formation(&chess960_formation(rng), Arc::new(standard_dictionary()))
    }

    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.state.winner()
    }

    #[inline]
    pub fn draw_opportunity(&self) -> bool {
        self.state.draw_opportunity()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.winner().is_some()
    }

    /// Movements of the piece on `coordinate` for its owner, specials included.
    pub fn movements_from(&self, coordinate: Coordinate) -> Vec<Movement> {
        match self.state.piece_at(coordinate.square()) {
            Some((_, color)) => legal_movements(&self.state, color, coordinate, true),
            None => Vec::new(),
        }
    }

    /// Target mask for highlighting the piece on `coordinate`.
    pub fn targets_from(&self, coordinate: Coordinate) -> u64 {
        match self.state.piece_at(coordinate.square()) {
            Some((_, color)) => legal_targets(&self.state, color, coordinate, true),
            None => 0,
        }
    }

    /// Apply `text` for `color`; "" on success, otherwise the refusal reason.
    pub fn check_move_and_move(&mut self, color: Color, text: &str) -> String {
        match self.try_move(color, text) {
            Ok(_) => String::new(),
            Err(reason) => reason.to_string(),
        }
    }

    /// Parse `text` and play it for `color`.
    pub fn try_move(&mut self, color: Color, text: &str) -> Result<MoveRecord, IllegalMove> {
        self.ensure_open()?;
        let movement = parse_movement(text, self.state.dictionary())?;
        self.play(color, movement)
    }

    /// Play a movement for `color` after checking it against generation.
    ///
    /// The generated movement with the same path is applied, carrying the
    /// promotion requested in `movement` if there is one.
    pub fn play(&mut self, color: Color, movement: Movement) -> Result<MoveRecord, IllegalMove> {
        self.ensure_open()?;

        if color != self.state.side_to_move() {
            return Err(IllegalMove::WrongPlayer);
        }
        if movement.from == movement.to {
            return Err(IllegalMove::SameSquare);
        }
        let moved_kind = match self.state.piece_at(movement.from.square()) {
            Some((kind, owner)) if owner == color => kind,
            _ => return Err(IllegalMove::WrongFigure),
        };
        if movement.promotion.is_some()
            && (Some(moved_kind) != self.state.dictionary().pawn()
                || movement.to.rank != color.promotion_rank())
        {
            return Err(IllegalMove::NotLegal);
        }

        let mut generated = legal_movements(&self.state, color, movement.from, true)
            .into_iter()
            .find(|candidate| candidate.same_path(&movement))
            .ok_or(IllegalMove::NotLegal)?;
        generated.promotion = movement.promotion;

        let record = apply_move(&mut self.state, generated)?;
        debug!(
            movement = %movement_to_string(&generated, self.state.dictionary()),
            color = color.name(),
            "move played"
        );
        Ok(record)
    }

    /// Resolve the pending promotion on `coordinate`.
    pub fn promote(&mut self, coordinate: Coordinate, kind_name: &str) -> Result<(), MoveError> {
        promote(&mut self.state, coordinate, kind_name)
    }

    /// Take back the most recent move, including any promotion it made.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        undo_last_move(&mut self.state)
    }

    pub fn board_string(&self) -> String {
        render_game_state(&self.state)
    }

    pub fn state_string(&self) -> String {
        state_string(&self.state)
    }

    fn ensure_open(&self) -> Result<(), IllegalMove> {
        if self.is_finished() {
            return Err(IllegalMove::GameFinished);
        }
        if self.state.pending_promotion().is_some() {
            return Err(IllegalMove::PromotionPending);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::chess_rules::{KING, PAWN};

    fn coord(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test coordinate is on the board")
    }

    fn play_script(game: &mut ChessGame, moves: &[&str]) {
        let mut color = Color::Light;
        for text in moves {
            assert_eq!(game.check_move_and_move(color, text), "", "{text}");
            color = color.opposite();
        }
    }

    #[test]
    fn scripted_king_capture_ends_game() {
        let mut game = ChessGame::new();
        play_script(
            &mut game,
            &["5_1_5_2", "4_6_4_5", "6_1_6_3", "3_7_7_3", "6_0_7_2", "7_3_4_0"],
        );

        assert_eq!(game.winner(), Some(Color::Dark));
        assert!(game.is_finished());
        assert_eq!(game.check_move_and_move(Color::Light, "0_1_0_2"), "game is finished");
    }

    #[test]
    fn king_pawn_opening_falls_to_queen_raid() {
        let mut game = ChessGame::new();
        play_script(
            &mut game,
            &["4_1_4_3", "4_6_4_4", "5_1_5_2", "3_7_7_3", "0_1_0_2", "7_3_4_0"],
        );
        assert_eq!(game.winner(), Some(Color::Dark));
    }

    #[test]
    fn refusal_reasons() {
        let mut game = ChessGame::new();
        let before = game.state().clone();

        assert_eq!(game.check_move_and_move(Color::Dark, "4_6_4_4"), "wrong player!");
        assert_eq!(game.check_move_and_move(Color::Light, "4_1_4_1"), "same square");
        assert_eq!(game.check_move_and_move(Color::Light, "4_3_4_4"), "wrong figure");
        assert_eq!(game.check_move_and_move(Color::Light, "4_6_4_5"), "wrong figure");
        assert_eq!(game.check_move_and_move(Color::Light, "4_1_4_4"), "not a legal move");
        assert_eq!(game.check_move_and_move(Color::Light, "3_0_3_3"), "not a legal move");
        assert!(!game.check_move_and_move(Color::Light, "4_1_4").is_empty());

        assert_eq!(*game.state(), before, "refused moves leave the position alone");
    }

    #[test]
    fn pending_promotion_blocks_play_until_resolved() {
        let formation = Formation::empty()
            .with_piece(coord(7, 0), KING)
            .with_piece(coord(7, 7), KING)
            .with_colored_piece(coord(0, 6), PAWN, Color::Light);
        let mut game = ChessGame::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect("formation should build");

        assert_eq!(game.check_move_and_move(Color::Light, "0_6_0_7"), "");
        assert_eq!(game.check_move_and_move(Color::Dark, "7_7_6_7"), "promotion pending");

        game.promote(coord(0, 7), "rook").expect("rook is a valid promotion");
        let rook = game.state().dictionary().rook();
        assert_eq!(
            game.state().piece_at(coord(0, 7).square()).map(|(kind, _)| kind),
            rook
        );
        assert_eq!(game.check_move_and_move(Color::Dark, "7_7_6_7"), "");

        assert!(game.undo().is_some());
        let undone = game.undo().expect("promotion move should undo");
        assert!(undone.promotion.is_some());
        assert_eq!(
            game.state().piece_at(coord(0, 6).square()).map(|(kind, _)| kind),
            game.state().dictionary().pawn()
        );
    }

    #[test]
    fn promotion_suffix_promotes_immediately() {
        let formation = Formation::empty()
            .with_piece(coord(7, 0), KING)
            .with_piece(coord(7, 7), KING)
            .with_colored_piece(coord(0, 6), PAWN, Color::Light);
        let mut game = ChessGame::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect("formation should build");

        assert_eq!(game.check_move_and_move(Color::Light, "0_6_0_7_knight"), "");
        assert_eq!(game.state().pending_promotion(), None);
        assert_eq!(
            game.state().piece_at(coord(0, 7).square()).map(|(kind, _)| kind),
            game.state().dictionary().id_of("knight")
        );
    }

    #[test]
    fn promotion_suffix_is_refused_off_the_last_rank() {
        let mut game = ChessGame::new();
        let before = game.state().clone();

        assert_eq!(game.check_move_and_move(Color::Light, "4_1_4_3_queen"), "not a legal move");
        assert_eq!(game.check_move_and_move(Color::Light, "6_0_5_2_rook"), "not a legal move");
        assert_eq!(*game.state(), before);

        assert_eq!(game.check_move_and_move(Color::Light, "4_1_4_3"), "");
        assert_eq!(game.check_move_and_move(Color::Dark, "6_7_5_5_rook"), "not a legal move");
        assert_eq!(
            game.state().piece_at(coord(6, 7).square()).map(|(kind, _)| kind),
            game.state().dictionary().id_of("knight")
        );
    }

    #[test]
    fn knight_shuffle_offers_draw_on_third_repetition() {
        let mut game = ChessGame::new();
        let shuffle = ["6_0_5_2", "6_7_5_5", "5_2_6_0", "5_5_6_7"];

        play_script(&mut game, &shuffle);
        assert!(!game.draw_opportunity());

        play_script(&mut game, &shuffle);
        assert!(game.draw_opportunity());
    }

    #[test]
    fn targets_for_highlighting() {
        let game = ChessGame::new();
        assert_eq!(game.targets_from(coord(6, 0)), coord(5, 2).bit() | coord(7, 2).bit());
        assert_eq!(game.movements_from(coord(4, 6)).len(), 2);
        assert!(game.movements_from(coord(4, 4)).is_empty());
    }

    #[test]
    fn chess960_game_is_playable() {
        let mut rng = StdRng::seed_from_u64(960);
        let game = ChessGame::chess960(&mut rng).expect("chess960 formation should build");
        assert_eq!(game.state().occupancy_all().count_ones(), 32);
        assert!(game.board_string().lines().nth(6).is_some_and(|row| row == "PPPPPPPP"));
    }
}
