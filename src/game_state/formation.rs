//! Starting formation grid.
//!
//! The grid is indexed `[file][rank]`. An empty name means no piece. Pieces
//! on ranks 0..=3 belong to Light and ranks 4..=7 to Dark unless a cell
//! carries an explicit color.

use crate::errors::FormationError;
use crate::game_state::chess_rules::PAWN;
use crate::game_state::chess_types::{Color, Coordinate};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Cell {
    name: String,
    color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formation {
    cells: [[Cell; 8]; 8],
}

impl Default for Formation {
    fn default() -> Self {
        Self::empty()
    }
}

impl Formation {
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| Cell::default())),
        }
    }

    /// Validate and adopt an externally supplied `[file][rank]` grid.
    pub fn from_grid<S: AsRef<str>>(grid: &[Vec<S>]) -> Result<Self, FormationError> {
        if grid.len() != 8 {
            return Err(FormationError::WrongFileCount { found: grid.len() });
        }

        let mut formation = Self::empty();
        for (file, ranks) in grid.iter().enumerate() {
            if ranks.len() != 8 {
                return Err(FormationError::WrongRankCount {
                    file,
                    found: ranks.len(),
                });
            }
            for (rank, name) in ranks.iter().enumerate() {
                formation.cells[file][rank].name = name.as_ref().trim().to_owned();
            }
        }

        Ok(formation)
    }

    /// Symmetric setup: `home_row` on ranks 0 and 7, pawns on ranks 1 and 6.
    pub fn from_home_row(home_row: [&str; 8]) -> Self {
        let mut formation = Self::empty();
        for (file, name) in home_row.iter().enumerate() {
            let column = &mut formation.cells[file];
            column[0].name = (*name).to_owned();
            column[1].name = PAWN.to_owned();
            column[6].name = PAWN.to_owned();
            column[7].name = (*name).to_owned();
        }
        formation
    }

    /// Place a piece whose color follows the rank halves.
    pub fn with_piece(mut self, coordinate: Coordinate, name: &str) -> Self {
        let cell = &mut self.cells[coordinate.file as usize][coordinate.rank as usize];
        cell.name = name.to_owned();
        cell.color = None;
        self
    }

    /// Place a piece with an explicit color.
    pub fn with_colored_piece(mut self, coordinate: Coordinate, name: &str, color: Color) -> Self {
        let cell = &mut self.cells[coordinate.file as usize][coordinate.rank as usize];
        cell.name = name.to_owned();
        cell.color = Some(color);
        self
    }

    #[inline]
    pub fn name_at(&self, coordinate: Coordinate) -> &str {
        &self.cells[coordinate.file as usize][coordinate.rank as usize].name
    }

    pub fn color_at(&self, coordinate: Coordinate) -> Color {
        let cell = &self.cells[coordinate.file as usize][coordinate.rank as usize];
        cell.color.unwrap_or(if coordinate.rank < 4 {
            Color::Light
        } else {
            Color::Dark
        })
    }
}
