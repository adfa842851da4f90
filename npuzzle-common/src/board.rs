use smallvec::SmallVec;
use thiserror::Error;

use std::fmt;

/// Smallest supported board dimension.
pub const MIN_DIM: usize = 2;

/// Label of the blank cell.
pub const BLANK: u32 = 0;

/// Reasons a tile grid cannot be turned into a [`Board`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimension must be at least {MIN_DIM}, got {0}")]
    DimensionTooSmall(usize),
    #[error("expected {expected} tiles for a {dim}x{dim} board, got {actual}")]
    WrongTileCount {
        dim: usize,
        expected: usize,
        actual: usize,
    },
    #[error("tile label {label} is outside 0..={max}")]
    LabelOutOfRange { label: u32, max: u32 },
    #[error("tile label {0} appears more than once")]
    DuplicateLabel(u32),
}

/// Reasons a puzzle text cannot be parsed into a [`Board`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("puzzle text is empty")]
    Empty,
    #[error("invalid dimension token {0:?}")]
    InvalidDimension(String),
    #[error("invalid tile token {0:?}")]
    InvalidTile(String),
    #[error("expected {expected} tiles after the dimension, found {actual}")]
    WrongTileCount { expected: usize, actual: usize },
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// An N x N sliding-tile position.
///
/// The tiles are the labels `0..N^2`, each present exactly once, stored in
/// row-major order with `0` marking the blank cell. Boards are values:
/// [`Board::twin`] and [`Board::neighbors`] build new boards and never touch
/// the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dim: usize,
    tiles: Vec<u32>,
    blank: usize,
}

impl Board {
    /// Builds a board from row-major tiles, validating the grid shape and
    /// that the labels form a permutation of `0..dim^2`.
    pub fn from_tiles(dim: usize, tiles: Vec<u32>) -> Result<Self, BoardError> {
        if dim < MIN_DIM {
            return Err(BoardError::DimensionTooSmall(dim));
        }
        let expected = dim * dim;
        if tiles.len() != expected {
            return Err(BoardError::WrongTileCount {
                dim,
                expected,
                actual: tiles.len(),
            });
        }

        let mut seen = vec![false; expected];
        let mut blank = None;
        for (idx, &label) in tiles.iter().enumerate() {
            if label as usize >= expected {
                return Err(BoardError::LabelOutOfRange {
                    label,
                    max: expected as u32 - 1,
                });
            }
            if seen[label as usize] {
                return Err(BoardError::DuplicateLabel(label));
            }
            seen[label as usize] = true;
            if label == BLANK {
                blank = Some(idx);
            }
        }
        // a complete permutation of 0..dim^2 always contains the blank
        let blank = blank.expect("validated permutation contains the blank");

        Ok(Board { dim, tiles, blank })
    }

    /// Builds a board from a grid of rows.
    pub fn from_rows(rows: &[Vec<u32>]) -> Result<Self, BoardError> {
        let dim = rows.len();
        let mut tiles = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(BoardError::WrongTileCount {
                    dim,
                    expected: dim * dim,
                    actual: rows.iter().map(Vec::len).sum(),
                });
            }
            tiles.extend_from_slice(row);
        }
        Self::from_tiles(dim, tiles)
    }

    /// The solved configuration: tiles in ascending row-major order with the
    /// blank in the last cell.
    pub fn goal(dim: usize) -> Result<Self, BoardError> {
        if dim < MIN_DIM {
            return Err(BoardError::DimensionTooSmall(dim));
        }
        let cells = dim * dim;
        let mut tiles: Vec<u32> = (1..cells as u32).collect();
        tiles.push(BLANK);
        Ok(Board {
            dim,
            tiles,
            blank: cells - 1,
        })
    }

    /// Parses the puzzle text format: the dimension N first, then N^2
    /// whitespace-separated tile labels in row-major order.
    pub fn parse(input: &str) -> Result<Self, ParseBoardError> {
        let mut tokens = input.split_whitespace();
        let dim_token = tokens.next().ok_or(ParseBoardError::Empty)?;
        let dim: usize = dim_token
            .parse()
            .map_err(|_| ParseBoardError::InvalidDimension(dim_token.to_string()))?;
        let expected = dim
            .checked_mul(dim)
            .ok_or_else(|| ParseBoardError::InvalidDimension(dim_token.to_string()))?;

        let mut tiles = Vec::with_capacity(expected);
        for token in tokens {
            let label: u32 = token
                .parse()
                .map_err(|_| ParseBoardError::InvalidTile(token.to_string()))?;
            tiles.push(label);
        }
        if tiles.len() != expected {
            return Err(ParseBoardError::WrongTileCount {
                expected,
                actual: tiles.len(),
            });
        }

        Ok(Self::from_tiles(dim, tiles)?)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Label at the given cell.
    pub fn tile(&self, row: usize, col: usize) -> u32 {
        self.tiles[row * self.dim + col]
    }

    /// Number of non-blank tiles that are not in their goal cell.
    pub fn hamming(&self) -> u32 {
        let mut misplaced = 0;
        for (idx, &label) in self.tiles.iter().enumerate() {
            if label != BLANK && label != self.goal_label(idx) {
                misplaced += 1;
            }
        }
        misplaced
    }

    /// Sum over non-blank tiles of the row plus column distance between the
    /// tile's cell and its goal cell. Never overestimates the moves left.
    pub fn manhattan(&self) -> u32 {
        let mut distance = 0;
        for (idx, &label) in self.tiles.iter().enumerate() {
            if label == BLANK {
                continue;
            }
            let goal = label as usize - 1;
            distance += (idx / self.dim).abs_diff(goal / self.dim)
                + (idx % self.dim).abs_diff(goal % self.dim);
        }
        distance as u32
    }

    pub fn is_goal(&self) -> bool {
        self.hamming() == 0
    }

    /// A board with the first two non-blank cells (in row-major order)
    /// swapped. Exactly one of a board and its twin can reach the goal, so
    /// the twin serves as a solvability oracle.
    pub fn twin(&self) -> Self {
        let (first, second) = match self.blank {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let mut tiles = self.tiles.clone();
        tiles.swap(first, second);
        Board {
            dim: self.dim,
            tiles,
            blank: self.blank,
        }
    }

    /// Every board reachable by sliding one adjacent tile into the blank:
    /// 2 from a corner, 3 from a non-corner edge, 4 from the interior.
    pub fn neighbors(&self) -> SmallVec<[Board; 4]> {
        let mut neighbors = SmallVec::new();
        let row = self.blank / self.dim;
        let col = self.blank % self.dim;

        if row > 0 {
            neighbors.push(self.slide_from(self.blank - self.dim));
        }
        if row + 1 < self.dim {
            neighbors.push(self.slide_from(self.blank + self.dim));
        }
        if col > 0 {
            neighbors.push(self.slide_from(self.blank - 1));
        }
        if col + 1 < self.dim {
            neighbors.push(self.slide_from(self.blank + 1));
        }

        neighbors
    }

    // label the goal configuration holds at a flat cell index
    fn goal_label(&self, idx: usize) -> u32 {
        if idx + 1 == self.tiles.len() {
            BLANK
        } else {
            idx as u32 + 1
        }
    }

    // board produced by sliding the tile at `from` into the blank cell
    fn slide_from(&self, from: usize) -> Board {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, from);
        Board {
            dim: self.dim,
            tiles,
            blank: from,
        }
    }
}

impl fmt::Display for Board {
    /// The dimension on its own line, then the rows, each tile
    /// right-justified in a 2-character field followed by a space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dim)?;
        for row in 0..self.dim {
            for col in 0..self.dim {
                write!(f, "{:2} ", self.tiles[row * self.dim + col])?;
            }
            if row + 1 < self.dim {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[Vec<u32>]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_construction_caches_dimension_and_tiles() {
        let board = board(&[vec![8, 1, 3], vec![4, 0, 2], vec![7, 6, 5]]);
        assert_eq!(board.dimension(), 3);
        assert_eq!(board.tile(0, 0), 8);
        assert_eq!(board.tile(1, 1), 0);
        assert_eq!(board.tile(2, 2), 5);
    }

    #[test]
    fn test_construction_rejects_small_dimension() {
        assert_eq!(
            Board::from_tiles(1, vec![0]),
            Err(BoardError::DimensionTooSmall(1))
        );
        assert_eq!(Board::goal(0), Err(BoardError::DimensionTooSmall(0)));
    }

    #[test]
    fn test_construction_rejects_wrong_tile_count() {
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 2]),
            Err(BoardError::WrongTileCount {
                dim: 2,
                expected: 4,
                actual: 3
            })
        );
        assert!(matches!(
            Board::from_rows(&[vec![0, 1], vec![2]]),
            Err(BoardError::WrongTileCount { .. })
        ));
    }

    #[test]
    fn test_construction_rejects_bad_labels() {
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 2, 4]),
            Err(BoardError::LabelOutOfRange { label: 4, max: 3 })
        );
        assert_eq!(
            Board::from_tiles(2, vec![0, 1, 1, 2]),
            Err(BoardError::DuplicateLabel(1))
        );
    }

    #[test]
    fn test_goal_board_has_zero_distances() {
        let goal = Board::goal(3).unwrap();
        assert!(goal.is_goal());
        assert_eq!(goal.hamming(), 0);
        assert_eq!(goal.manhattan(), 0);
    }

    #[test]
    fn test_non_goal_board_has_positive_distances() {
        let board = board(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]);
        assert!(!board.is_goal());
        assert_eq!(board.hamming(), 1);
        assert_eq!(board.manhattan(), 1);
    }

    #[test]
    fn test_distances_on_a_scrambled_board() {
        let board = board(&[vec![8, 1, 3], vec![4, 0, 2], vec![7, 6, 5]]);
        assert_eq!(board.hamming(), 5);
        assert_eq!(board.manhattan(), 10);
    }

    #[test]
    fn test_neighbor_count_by_blank_position() {
        let corner = Board::goal(3).unwrap();
        assert_eq!(corner.neighbors().len(), 2);

        let edge = board(&[vec![1, 0, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        assert_eq!(edge.neighbors().len(), 3);

        let center = board(&[vec![1, 2, 3], vec![4, 0, 5], vec![6, 7, 8]]);
        assert_eq!(center.neighbors().len(), 4);
    }

    #[test]
    fn test_neighbors_move_the_blank_one_cell() {
        let board = board(&[vec![1, 2, 3], vec![4, 0, 5], vec![6, 7, 8]]);
        for neighbor in board.neighbors() {
            let changed: Vec<usize> = (0..9)
                .filter(|&idx| board.tile(idx / 3, idx % 3) != neighbor.tile(idx / 3, idx % 3))
                .collect();
            assert_eq!(changed.len(), 2, "a slide swaps exactly two cells");

            let (a, b) = (changed[0], changed[1]);
            let row_dist = (a / 3).abs_diff(b / 3);
            let col_dist = (a % 3).abs_diff(b % 3);
            assert_eq!(row_dist + col_dist, 1, "swapped cells are 4-adjacent");
            assert!(
                neighbor.tile(a / 3, a % 3) == BLANK || neighbor.tile(b / 3, b % 3) == BLANK,
                "one of the swapped cells holds the blank"
            );
        }
    }

    #[test]
    fn test_twin_swaps_two_non_blank_tiles() {
        let original = board(&[vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        let twin = original.twin();

        assert_eq!(twin.dimension(), original.dimension());
        assert_eq!(twin.tile(0, 0), 0, "the blank stays in place");
        assert_eq!(twin.tile(0, 1), 2);
        assert_eq!(twin.tile(0, 2), 1);
        // pure: the receiver is untouched
        assert_eq!(original.tile(0, 1), 1);
    }

    #[test]
    fn test_twin_is_deterministic_and_self_inverse() {
        let board = board(&[vec![8, 1, 3], vec![4, 0, 2], vec![7, 6, 5]]);
        assert_eq!(board.twin(), board.twin());
        assert_eq!(board.twin().twin(), board);
        assert_ne!(board.twin(), board);
    }

    #[test]
    fn test_equality_compares_the_whole_grid() {
        let a = board(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]);
        let b = board(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 8]]);
        let c = board(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Board::goal(2).unwrap(), Board::goal(3).unwrap());
    }

    #[test]
    fn test_parse_reads_dimension_then_tiles() {
        let board = Board::parse("3\n 1  2  3\n 4  5  6\n 7  8  0\n").unwrap();
        assert_eq!(board, Board::goal(3).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(Board::parse("  \n"), Err(ParseBoardError::Empty));
        assert_eq!(
            Board::parse("x 1 2 3 0"),
            Err(ParseBoardError::InvalidDimension("x".to_string()))
        );
        assert_eq!(
            Board::parse("2 1 2 -3 0"),
            Err(ParseBoardError::InvalidTile("-3".to_string()))
        );
        assert_eq!(
            Board::parse("2 1 2 3"),
            Err(ParseBoardError::WrongTileCount {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            Board::parse("2 1 2 3 3"),
            Err(ParseBoardError::Board(BoardError::DuplicateLabel(3)))
        );
    }

    #[test]
    fn test_display_matches_rendering_contract() {
        let goal = Board::goal(3).unwrap();
        assert_eq!(goal.to_string(), "3\n 1  2  3 \n 4  5  6 \n 7  8  0 ");
    }

    #[test]
    fn test_display_parse_round_trip() {
        let original = board(&[vec![8, 1, 3], vec![4, 0, 2], vec![7, 6, 5]]);
        let reparsed = Board::parse(&original.to_string()).unwrap();
        assert_eq!(reparsed, original);
    }
}
