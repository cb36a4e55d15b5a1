//! Pattern-driven move generation.
//!
//! Each compiled movement pattern of a piece yields a target mask: leaps and
//! rides first, own squares removed, then the pattern's conditions. The
//! per-piece targets are turned into one `Movement` per distinct square,
//! licensed by the first pattern that reached it. Castling and en passant are
//! appended on request.
//!
//! Moves are pseudo-legal. The game is decided by capturing the king, so a
//! move that leaves one's own king attacked is still generated.

use tracing::warn;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_special::special_movements;
use crate::move_generation::move_generator::{LegalMoveGenerator, MoveGenerator};
use crate::moves::leaper_moves::{leaper_targets, repeating_leaper_targets};
use crate::moves::move_descriptions::{MoveLicense, Movement};
use crate::moves::movement_notation::{MoveKind, MovementNotation};
use crate::moves::rider_moves::rider_targets;

/// Squares a single pattern reaches from `from`, before its conditions.
///
/// Squares held by `color` are never included.
pub fn pattern_targets(
    game_state: &GameState,
    color: Color,
    from: Coordinate,
    notation: &MovementNotation,
) -> u64 {
    let occupancy = game_state.occupancy_all();

    let targets = match notation.kind {
        MoveKind::Leaper | MoveKind::Hopper => notation
            .leap_pair()
            .map_or(0, |(first, second)| leaper_targets(from, first, second)),
        MoveKind::RepeatingLeaper => notation.leap_pair().map_or(0, |(first, second)| {
            repeating_leaper_targets(from, first, second, occupancy)
        }),
        MoveKind::Rider => notation.ride_limit().map_or(0, |limit| {
            rider_targets(from, notation.direction, color, limit, occupancy)
        }),
    };

    targets & !game_state.occupancy(color)
}

/// Apply initial-only, capture-only and non-capture-only restrictions.
pub fn apply_conditions(
    game_state: &GameState,
    color: Color,
    from: Coordinate,
    notation: &MovementNotation,
    targets: u64,
) -> u64 {
    let conditions = notation.conditions;

    if conditions.initial_only && game_state.unmoved_mask() & from.bit() == 0 {
        return 0;
    }

    let mut targets = targets;
    if conditions.non_capture_only {
        targets &= !game_state.occupancy_all();
    }
    if conditions.capture_only {
        targets &= game_state.occupancy(color.opposite());
    }
    targets
}

/// Pattern-licensed movements of a `kind` piece of `color` on `from`.
pub fn pattern_movements(
    game_state: &GameState,
    kind: KindId,
    color: Color,
    from: Coordinate,
) -> Vec<Movement> {
    let mut reached = 0u64;
    let mut out = Vec::new();

    let piece = game_state.dictionary().kind(kind);
    for (index, notation) in piece.movements.iter().enumerate() {
        let Ok(index) = u16::try_from(index) else {
            warn!(piece = %piece.name, "movement patterns beyond the license range ignored");
            break;
        };
        let raw = pattern_targets(game_state, color, from, notation);
        let fresh = apply_conditions(game_state, color, from, notation, raw) & !reached;
        reached |= fresh;

        for square in squares_of(fresh) {
            out.push(Movement::new(
                from,
                Coordinate::from_square(square),
                MoveLicense::Pattern(index),
            ));
        }
    }

    out
}

/// Every movement of the piece on `coordinate`, if it belongs to `color`.
///
/// An empty square or an opposing piece yields an empty list.
pub fn legal_movements(
    game_state: &GameState,
    color: Color,
    coordinate: Coordinate,
    include_special_moves: bool,
) -> Vec<Movement> {
    let Some((kind, owner)) = game_state.piece_at(coordinate.square()) else {
        return Vec::new();
    };
    if owner != color {
        return Vec::new();
    }

    let mut movements = pattern_movements(game_state, kind, color, coordinate);
    if include_special_moves {
        append_special_movements(game_state, kind, color, coordinate, &mut movements);
    }
    movements
}

/// Target mask of [`legal_movements`], for highlighting.
pub fn legal_targets(
    game_state: &GameState,
    color: Color,
    coordinate: Coordinate,
    include_special_moves: bool,
) -> u64 {
    legal_movements(game_state, color, coordinate, include_special_moves)
        .iter()
        .fold(0, |targets, movement| targets | movement.to.bit())
}

/// All movements for `color`, including special moves.
///
/// Pawn moves onto the last rank carry the queen as their promotion so the
/// result can be applied without a separate promotion step.
pub fn generate_all_movements<G: MoveGenerator + ?Sized>(
    generator: &mut G,
    game_state: &GameState,
    color: Color,
) -> Vec<Movement> {
    let dictionary = game_state.dictionary();
    let pawn = dictionary.pawn();
    let queen = dictionary.queen();

    let mut out = Vec::new();
    for square in squares_of(game_state.occupancy(color)) {
        let Some((kind, _)) = game_state.piece_at(square) else {
            continue;
        };
        let from = Coordinate::from_square(square);

        let start = out.len();
        out.extend(generator.pattern_movements(game_state, kind, color, from));
        append_special_movements(game_state, kind, color, from, &mut out);

        if Some(kind) == pawn {
            if let Some(queen) = queen {
                for movement in &mut out[start..] {
                    if movement.to.rank == color.promotion_rank() {
                        movement.promotion = Some(queen);
                    }
                }
            }
        }
    }
    out
}

/// Legal movements for the side to move, using the uncached generator.
pub fn generate_legal_movements(game_state: &GameState) -> Vec<Movement> {
    generate_all_movements(&mut LegalMoveGenerator, game_state, game_state.side_to_move())
}

fn append_special_movements(
    game_state: &GameState,
    kind: KindId,
    color: Color,
    from: Coordinate,
    out: &mut Vec<Movement>,
) {
    let reached = out
        .iter()
        .filter(|movement| movement.from == from)
        .fold(0u64, |mask, movement| mask | movement.to.bit());

    out.extend(
        special_movements(game_state, kind, color, from)
            .into_iter()
            .filter(|movement| reached & movement.to.bit() == 0),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::game_state::chess_rules::{standard_dictionary, BISHOP, KING, KNIGHT, PAWN, ROOK};
    use crate::game_state::formation::Formation;
    use crate::game_state::piece_dictionary::{PieceDefinition, PieceDictionary};

    fn coord(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test coordinate is on the board")
    }

    fn build(formation: Formation) -> GameState {
        GameState::from_formation(&formation, Arc::new(standard_dictionary()))
            .expect("test formation should build")
    }

    fn with_kings(formation: Formation) -> Formation {
        formation
            .with_piece(coord(7, 0), KING)
            .with_piece(coord(7, 7), KING)
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let game = GameState::new_game();
        assert_eq!(generate_legal_movements(&game).len(), 20);
    }

    #[test]
    fn knight_targets_center_corner_and_edge() {
        let game = build(with_kings(
            Formation::empty()
                .with_piece(coord(3, 3), KNIGHT)
                .with_piece(coord(0, 0), KNIGHT)
                .with_piece(coord(0, 2), KNIGHT),
        ));

        assert_eq!(legal_targets(&game, Color::Light, coord(3, 3), true).count_ones(), 8);
        // a1 would reach b3 and c2.
        assert_eq!(legal_targets(&game, Color::Light, coord(0, 0), true).count_ones(), 2);
        // a3 reaches b1, b5, c2, c4.
        assert_eq!(legal_targets(&game, Color::Light, coord(0, 2), true).count_ones(), 4);
    }

    #[test]
    fn rook_rays_respect_friendly_and_enemy_blockers() {
        let open = build(with_kings(Formation::empty().with_piece(coord(3, 3), ROOK)));
        assert_eq!(legal_targets(&open, Color::Light, coord(3, 3), true).count_ones(), 14);

        let friendly = build(with_kings(
            Formation::empty()
                .with_piece(coord(3, 3), ROOK)
                .with_colored_piece(coord(3, 5), PAWN, Color::Light),
        ));
        let targets = legal_targets(&friendly, Color::Light, coord(3, 3), true);
        assert_eq!(targets.count_ones(), 11);
        assert_ne!(targets & coord(3, 4).bit(), 0);
        assert_eq!(targets & coord(3, 5).bit(), 0);

        let enemy = build(with_kings(
            Formation::empty()
                .with_piece(coord(3, 3), ROOK)
                .with_colored_piece(coord(3, 5), PAWN, Color::Dark),
        ));
        let targets = legal_targets(&enemy, Color::Light, coord(3, 3), true);
        assert_eq!(targets.count_ones(), 12);
        assert_ne!(targets & coord(3, 5).bit(), 0);
        assert_eq!(targets & coord(3, 6).bit(), 0);
    }

    #[test]
    fn pawn_conditions_shape_targets() {
        let game = build(with_kings(
            Formation::empty()
                .with_piece(coord(4, 1), PAWN)
                .with_colored_piece(coord(3, 2), PAWN, Color::Dark)
                .with_colored_piece(coord(5, 2), BISHOP, Color::Light),
        ));

        let targets = legal_targets(&game, Color::Light, coord(4, 1), true);
        // e3, e4 forward; d3 capture; f3 is friendly.
        assert_eq!(targets, coord(4, 2).bit() | coord(4, 3).bit() | coord(3, 2).bit());

        let blocked = build(with_kings(
            Formation::empty()
                .with_piece(coord(4, 1), PAWN)
                .with_colored_piece(coord(4, 2), KNIGHT, Color::Dark),
        ));
        assert_eq!(legal_targets(&blocked, Color::Light, coord(4, 1), true), 0);
    }

    #[test]
    fn dark_pawn_moves_down_the_board() {
        let game = GameState::new_game();
        let targets = legal_targets(&game, Color::Dark, coord(4, 6), true);
        assert_eq!(targets, coord(4, 5).bit() | coord(4, 4).bit());
    }

    #[test]
    fn empty_square_and_wrong_color_yield_nothing() {
        let game = GameState::new_game();
        assert!(legal_movements(&game, Color::Light, coord(4, 4), true).is_empty());
        assert!(legal_movements(&game, Color::Dark, coord(4, 1), true).is_empty());
    }

    #[test]
    fn fairy_equal_pair_leaper_ignores_blockers() {
        let mut definitions = crate::game_state::chess_rules::standard_definitions();
        definitions.push(PieceDefinition::new("skipper", 6, "~x/x"));
        let dictionary = Arc::new(PieceDictionary::new(definitions));

        let formation = with_kings(
            Formation::empty()
                .with_piece(coord(3, 3), "skipper")
                .with_colored_piece(coord(3, 4), PAWN, Color::Light),
        );
        let game = GameState::from_formation(&formation, dictionary).expect("formation builds");

        let targets = legal_targets(&game, Color::Light, coord(3, 3), true);
        assert_eq!(targets & coord(3, 4).bit(), 0, "own piece is never a target");
        assert_ne!(targets & coord(3, 5).bit(), 0, "leaps over the blocker");
        assert_eq!(targets.count_ones(), 26);
    }

    #[test]
    fn license_index_survives_long_pattern_lists() {
        let notation = format!("{}1+", "1X,".repeat(300));
        let mut definitions = crate::game_state::chess_rules::standard_definitions();
        definitions.push(PieceDefinition::new("wazir_ferz", 4, notation));
        let dictionary = Arc::new(PieceDictionary::new(definitions));

        let formation = with_kings(Formation::empty().with_piece(coord(3, 3), "wazir_ferz"));
        let game = GameState::from_formation(&formation, dictionary).expect("formation builds");

        let movements = legal_movements(&game, Color::Light, coord(3, 3), true);
        assert_eq!(movements.len(), 8);
        let up = movements
            .iter()
            .find(|movement| movement.to == coord(3, 4))
            .expect("orthogonal step should be generated");
        assert_eq!(up.license, MoveLicense::Pattern(300));
    }

    #[test]
    fn promotion_defaults_to_queen_in_bulk_generation() {
        let game = build(with_kings(Formation::empty().with_colored_piece(
            coord(0, 6),
            PAWN,
            Color::Light,
        )));
        let queen = game.dictionary().queen();

        let moves = generate_legal_movements(&game);
        let push = moves
            .iter()
            .find(|movement| movement.from == coord(0, 6))
            .expect("pawn push should be generated");
        assert_eq!(push.promotion, queen);
    }
}
