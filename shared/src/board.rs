//! Text rendering of the path and who stands where.
//!
//! ```text
//! :: Mo V1 Do ::
//! 1  0        3
//!    2
//! ```
//!
//! Each site occupies [`SITE_WIDTH`] columns. Players at a site are listed
//! downward in arrival order under the first column of that site.

use crate::game::Game;
use crate::{PlayerId, SITE_WIDTH};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Occupied(PlayerId),
}

/// Owned `rows x cols` matrix of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|index| self.cells[index])
    }

    /// Returns false when `(row, col)` lies outside the grid.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> bool {
        match self.index(row, col) {
            Some(index) => {
                self.cells[index] = cell;
                true
            }
            None => false,
        }
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Floats the occupied cells of `col` to the top, keeping their order.
    fn compact_column(&mut self, col: usize) {
        let occupied: Vec<Cell> = (0..self.rows)
            .filter_map(|row| self.get(row, col))
            .filter(|cell| *cell != Cell::Empty)
            .collect();
        for row in 0..self.rows {
            let cell = occupied.get(row).copied().unwrap_or(Cell::Empty);
            self.set(row, col, cell);
        }
    }

    fn row_is_empty(&self, row: usize) -> bool {
        (0..self.cols).all(|col| self.get(row, col) == Some(Cell::Empty))
    }
}

/// The path header plus the occupancy grid, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    header: String,
    grid: Grid,
}

impl Board {
    pub fn build(game: &Game) -> Self {
        let sites = game.path().sites();
        let header = sites.iter().map(|site| format!("{} ", site.kind())).collect();

        let mut grid = Grid::new(game.player_count(), sites.len() * SITE_WIDTH);
        for (index, site) in sites.iter().enumerate() {
            for (row, slot) in site.slots().iter().enumerate() {
                if let Some(player) = slot {
                    grid.set(row, index * SITE_WIDTH, Cell::Occupied(*player));
                }
            }
        }
        for col in 0..grid.cols() {
            grid.compact_column(col);
        }

        Self { header, grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for row in (0..self.grid.rows()).filter(|&row| !self.grid.row_is_empty(row)) {
            for col in 0..self.grid.cols() {
                match self.grid.get(row, col) {
                    Some(Cell::Occupied(player)) => write!(f, "{player}")?,
                    _ => f.write_str(" ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `Scores: s0,s1,...`
pub fn scores_line(scores: &[i64]) -> String {
    let joined = scores
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("Scores: {joined}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::StateUpdate;

    fn step(game: &mut Game, player: usize, site: usize) {
        let update = StateUpdate {
            player: player as i64,
            site: site as i64,
            points: 0,
            money: 0,
            card: 0,
        };
        let transition = game.validate_update(&update).unwrap();
        game.apply(&transition);
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = Grid::new(2, 3);
        assert!(grid.set(1, 2, Cell::Occupied(4)));
        assert!(!grid.set(2, 0, Cell::Occupied(4)));
        assert_eq!(grid.get(1, 2), Some(Cell::Occupied(4)));
        assert_eq!(grid.get(0, 0), Some(Cell::Empty));
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_initial_board() {
        let game = Game::new("4;::-Mo1V22::-", 2).unwrap();
        let board = Board::build(&game);
        assert_eq!(board.to_string(), ":: Mo V2 :: \n1           \n0           \n");
    }

    #[test]
    fn test_empty_rows_are_suppressed() {
        let mut game = Game::new("4;::-Mo1V22::-", 3).unwrap();
        step(&mut game, 0, 1);
        step(&mut game, 1, 2);
        step(&mut game, 2, 3);
        let board = Board::build(&game);
        assert_eq!(board.to_string(), ":: Mo V2 :: \n   0  1  2  \n");
    }

    #[test]
    fn test_columns_compact_upward() {
        // Player 1 leaves slot 1 of the start barrier, leaving a gap
        let mut game = Game::new("3;::-Mo1::-", 3).unwrap();
        step(&mut game, 1, 1);
        assert_eq!(game.path().sites()[0].slots(), &[Some(2), None, Some(0)]);

        let board = Board::build(&game);
        assert_eq!(board.grid().get(0, 0), Some(Cell::Occupied(2)));
        assert_eq!(board.grid().get(1, 0), Some(Cell::Occupied(0)));
        assert_eq!(board.grid().get(2, 0), Some(Cell::Empty));
        assert_eq!(board.to_string(), ":: Mo :: \n2  1     \n0        \n");
    }

    #[test]
    fn test_scores_line() {
        assert_eq!(scores_line(&[12, 0, 7]), "Scores: 12,0,7");
        assert_eq!(scores_line(&[3]), "Scores: 3");
    }
}
