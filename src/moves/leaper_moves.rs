//! Leap offsets for jumping patterns.

use crate::game_state::chess_types::Coordinate;
use crate::moves::movement_notation::Distance;
use crate::moves::rider_moves::{ride, Step, ALL_STEPS};

/// Distinct offsets `±(a, b)` and `±(b, a)` for an exact leap pair.
pub fn leap_offsets(first: u8, second: u8) -> Vec<Step> {
    let (a, b) = (first as i8, second as i8);
    let mut offsets: Vec<Step> = Vec::with_capacity(8);

    for (df, dr) in [(a, b), (b, a)] {
        for file_sign in [1, -1] {
            for rank_sign in [1, -1] {
                let offset = (df * file_sign, dr * rank_sign);
                if offset != (0, 0) && !offsets.contains(&offset) {
                    offsets.push(offset);
                }
            }
        }
    }

    offsets
}

/// Landing squares of a single leap, ignoring occupancy.
pub fn leaper_targets(from: Coordinate, first: Distance, second: Distance) -> u64 {
    match (first, second) {
        (Distance::Exact(a), Distance::Exact(b)) => leap_offsets(a, b)
            .into_iter()
            .filter_map(|(df, dr)| from.offset(df, dr))
            .fold(0, |targets, to| targets | to.bit()),
        (Distance::EqualPair, Distance::EqualPair) => ALL_STEPS
            .iter()
            .fold(0, |targets, step| targets | ride(from, *step, 7, 0)),
        _ => 0,
    }
}

/// Leaps repeated along their line until the board edge or the first
/// occupied square (which is included).
pub fn repeating_leaper_targets(
    from: Coordinate,
    first: Distance,
    second: Distance,
    occupancy: u64,
) -> u64 {
    match (first, second) {
        (Distance::Exact(a), Distance::Exact(b)) => leap_offsets(a, b)
            .into_iter()
            .fold(0, |targets, step| targets | ride(from, step, 7, occupancy)),
        _ => leaper_targets(from, first, second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(file: u8, rank: u8) -> Coordinate {
        Coordinate::new(file, rank).expect("test coordinate is on the board")
    }

    const ONE: Distance = Distance::Exact(1);
    const TWO: Distance = Distance::Exact(2);

    #[test]
    fn knight_leaps_from_center_corner_and_edge() {
        assert_eq!(leaper_targets(coord(3, 3), ONE, TWO).count_ones(), 8);
        assert_eq!(leaper_targets(coord(0, 0), ONE, TWO).count_ones(), 2);
        assert_eq!(leaper_targets(coord(0, 3), ONE, TWO).count_ones(), 4);
    }

    #[test]
    fn symmetric_pairs_are_deduplicated() {
        assert_eq!(leap_offsets(1, 1).len(), 4);
        assert_eq!(leap_offsets(0, 2).len(), 4);
        assert_eq!(leap_offsets(1, 2).len(), 8);
        assert!(leap_offsets(0, 0).is_empty());
    }

    #[test]
    fn equal_pair_reaches_every_queen_line_square() {
        let targets = leaper_targets(coord(3, 3), Distance::EqualPair, Distance::EqualPair);
        assert_eq!(targets.count_ones(), 27);
    }

    #[test]
    fn mixed_magnitudes_produce_nothing() {
        assert_eq!(leaper_targets(coord(3, 3), ONE, Distance::Any), 0);
    }

    #[test]
    fn repeating_leaper_stops_on_blocker() {
        let from = coord(0, 0);
        let open = repeating_leaper_targets(from, ONE, TWO, 0);
        // b3, c5, d7 on one line and c2, e3, g4 on the other.
        assert_eq!(open.count_ones(), 6);

        let blocked = repeating_leaper_targets(from, ONE, TWO, coord(2, 4).bit());
        assert_eq!(blocked & coord(3, 6).bit(), 0);
        assert_ne!(blocked & coord(2, 4).bit(), 0);
    }
}
