//! The N Queens puzzle as an exact cover problem.
//!
//! Every square of an n×n board is a choice.  Each rank and each file must
//! hold exactly one queen, so those are primary columns; a diagonal may
//! hold at most one queen but can just as well be empty, so the diagonals
//! are secondary columns.

use std::collections::BTreeSet;
use std::fmt;

use crate::Matrix;
use crate::error::Result;

/// A square of the board, numbered from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

/// Builds the constraint matrix for an `n`×`n` board.
///
/// Columns, in order: `n` ranks (`r_i`), `n` files (`c_i`), then the
/// `2n - 1` diagonals (`d_k`, k = row + col) and `2n - 1` anti-diagonals
/// (`rd_k`, k = n - 1 - row + col) as secondary columns.  One row per
/// square, labelled with that square.
pub fn matrix(n: usize) -> Result<Matrix<Square>> {
    let diagonals = (2 * n).saturating_sub(1);
    let mut matrix = Matrix::with_capacity(2 * n + 2 * diagonals, 4 * n * n);

    for i in 0..n {
        matrix.append_column(format!("r_{i}"));
    }
    for i in 0..n {
        matrix.append_column(format!("c_{i}"));
    }
    for k in 0..diagonals {
        matrix.append_secondary_column(format!("d_{k}"));
    }
    for k in 0..diagonals {
        matrix.append_secondary_column(format!("rd_{k}"));
    }

    for row in 0..n {
        for col in 0..n {
            matrix.append_row_sparse(
                Square { row, col },
                [
                    row,
                    n + col,
                    2 * n + row + col,
                    2 * n + diagonals + (n - 1 - row + col),
                ],
            )?;
        }
    }

    Ok(matrix)
}

/// Every placement of `n` non-attacking queens on an `n`×`n` board.
pub fn solutions(n: usize) -> Result<Vec<Board>> {
    let mut matrix = matrix(n)?;
    Ok(matrix
        .solve()
        .into_iter()
        .map(|squares| Board::new(n, squares))
        .collect())
}

/// The number of placements of `n` non-attacking queens, without building
/// the boards.
pub fn count_solutions(n: usize) -> Result<usize> {
    Ok(matrix(n)?.count_solutions())
}

/// Why a [`Board`] is not a solved N Queens board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueensError {
    OffBoard { square: Square, n: usize },
    WrongQueenCount { found: usize, n: usize },
    RowConflict { first: Square, second: Square },
    ColumnConflict { first: Square, second: Square },
    DiagonalConflict { first: Square, second: Square },
}

impl fmt::Display for QueensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueensError::OffBoard { square, n } => {
                write!(
                    f,
                    "queen at {}/{} is off the {n}x{n} board",
                    square.row, square.col
                )
            }
            QueensError::WrongQueenCount { found, n } => {
                write!(
                    f,
                    "unexpected number of queens: found {found}, but defined length is {n}"
                )
            }
            QueensError::RowConflict { first, second } => {
                write!(
                    f,
                    "found row conflict at {} with {}",
                    coord(first),
                    coord(second)
                )
            }
            QueensError::ColumnConflict { first, second } => {
                write!(
                    f,
                    "found col conflict at {} with {}",
                    coord(first),
                    coord(second)
                )
            }
            QueensError::DiagonalConflict { first, second } => {
                write!(
                    f,
                    "found diagonal conflict at {} with {}",
                    coord(first),
                    coord(second)
                )
            }
        }
    }
}

impl std::error::Error for QueensError {}

fn coord(square: &Square) -> String {
    format!("{}/{}", square.row, square.col)
}

/// An `n`×`n` board with some queens on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    n: usize,
    queens: BTreeSet<Square>,
}

impl Board {
    pub fn new<I>(n: usize, queens: I) -> Board
    where
        I: IntoIterator<Item = Square>,
    {
        Board {
            n,
            queens: queens.into_iter().collect(),
        }
    }

    /// Reads a board from rows of flags, `true` marking a queen.  The board
    /// size is the number of rows.
    pub fn from_grid(grid: &[Vec<bool>]) -> Board {
        let queens = grid.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &queen)| queen)
                .map(move |(col, _)| Square { row, col })
        });
        Board::new(grid.len(), queens)
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// The queens, in row-major order.
    pub fn queens(&self) -> impl Iterator<Item = Square> + '_ {
        self.queens.iter().copied()
    }

    pub fn as_grid(&self) -> Vec<Vec<bool>> {
        let mut grid = vec![vec![false; self.n]; self.n];
        for square in &self.queens {
            if square.row < self.n && square.col < self.n {
                grid[square.row][square.col] = true;
            }
        }
        grid
    }

    /// Checks that the board holds exactly `n` queens, none attacking
    /// another.  Conflicts are reported for the first offending pair in
    /// row-major order.
    pub fn verify(&self) -> Result<(), QueensError> {
        if let Some(&square) = self
            .queens
            .iter()
            .find(|square| square.row >= self.n || square.col >= self.n)
        {
            return Err(QueensError::OffBoard { square, n: self.n });
        }

        let queens: Vec<Square> = self.queens().collect();
        for (i, &first) in queens.iter().enumerate() {
            for &second in &queens[i + 1..] {
                if first.row == second.row {
                    return Err(QueensError::RowConflict { first, second });
                }
                if first.col == second.col {
                    return Err(QueensError::ColumnConflict { first, second });
                }
                if first.row + second.col == second.row + first.col
                    || first.row + first.col == second.row + second.col
                {
                    return Err(QueensError::DiagonalConflict { first, second });
                }
            }
        }

        if queens.len() != self.n {
            return Err(QueensError::WrongQueenCount {
                found: queens.len(),
                n: self.n,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Board {
    /// One rank per line: `x` for a queen, `o` for an empty square.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.as_grid() {
            for queen in row {
                f.write_str(if queen { "x " } else { "o " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
