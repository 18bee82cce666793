//! Sudoku as an exact cover problem.
//!
//! A grid of side `n` has `4n²` primary columns: every cell holds exactly
//! one value, and every row, column and box holds every value exactly
//! once.  Each candidate placement (cell plus value) is one matrix row
//! touching exactly one column of each kind.

use std::fmt;
use std::str::FromStr;

use crate::Matrix;
use crate::error::Error;

/// A candidate placement: `value` written into the cell at `row`/`col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub value: usize,
}

/// The kind of region a duplicate value was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Row,
    Column,
    Box,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unit::Row => "row",
            Unit::Column => "col",
            Unit::Box => "box",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SudokuError {
    /// The side length cannot be split into boxes.
    InvalidSize { size: usize },

    /// A grid row has the wrong number of cells.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character in the text format that is not a decimal digit.
    InvalidDigit { row: usize, col: usize, found: char },

    /// A cell coordinate outside the grid.
    CellOutOfRange { row: usize, col: usize, size: usize },

    /// A clue larger than the side length.
    ValueOutOfRange {
        row: usize,
        col: usize,
        value: usize,
        size: usize,
    },

    /// The clues admit no completed grid.
    NoSolution,

    /// A blank cell found while verifying.
    Incomplete { row: usize, col: usize },

    /// A value repeated within one row, column or box.
    Duplicate {
        unit: Unit,
        index: usize,
        values: Vec<usize>,
    },

    /// The constraint matrix rejected a row; indicates an encoding bug.
    Matrix(Error),
}

impl fmt::Display for SudokuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SudokuError::InvalidSize { size } => {
                write!(f, "a {size}x{size} grid cannot be divided into boxes")
            }
            SudokuError::RaggedRow {
                row,
                expected,
                found,
            } => {
                write!(f, "row {row} has {found} cells, expected {expected}")
            }
            SudokuError::InvalidDigit { row, col, found } => {
                write!(f, "invalid digit {found:?} at {row}/{col}")
            }
            SudokuError::CellOutOfRange { row, col, size } => {
                write!(f, "cell {row}/{col} is outside the {size}x{size} grid")
            }
            SudokuError::ValueOutOfRange {
                row,
                col,
                value,
                size,
            } => {
                write!(f, "value {value} at {row}/{col} exceeds grid size {size}")
            }
            SudokuError::NoSolution => f.write_str("board has no solution"),
            SudokuError::Incomplete { row, col } => {
                write!(f, "cell {row}/{col} is empty")
            }
            SudokuError::Duplicate {
                unit,
                index,
                values,
            } => {
                let values: Vec<String> = values.iter().map(usize::to_string).collect();
                write!(
                    f,
                    "error in {unit} {index}: unique constraint violated: [{}]",
                    values.join(" ")
                )
            }
            SudokuError::Matrix(err) => write!(f, "constraint matrix: {err}"),
        }
    }
}

impl std::error::Error for SudokuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SudokuError::Matrix(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for SudokuError {
    fn from(err: Error) -> Self {
        SudokuError::Matrix(err)
    }
}

/// A square Sudoku grid; `0` marks a blank cell.
///
/// A grid of side `n` is split into boxes `floor(sqrt(n))` cells tall and
/// `n / floor(sqrt(n))` cells wide, so 4, 6, 9 and 16 are all valid sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    size: usize,
    box_rows: usize,
    box_cols: usize,
    cells: Vec<usize>,
}

impl Sudoku {
    /// An empty grid of side `size`.
    pub fn new(size: usize) -> Result<Sudoku, SudokuError> {
        let box_rows = size.isqrt();
        if box_rows == 0 || size % box_rows != 0 {
            return Err(SudokuError::InvalidSize { size });
        }
        Ok(Sudoku {
            size,
            box_rows,
            box_cols: size / box_rows,
            cells: vec![0; size * size],
        })
    }

    /// Builds a grid from its rows; the side length is the number of rows.
    pub fn from_rows(rows: &[Vec<usize>]) -> Result<Sudoku, SudokuError> {
        let mut sudoku = Sudoku::new(rows.len())?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != sudoku.size {
                return Err(SudokuError::RaggedRow {
                    row,
                    expected: sudoku.size,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                sudoku.set(row, col, value)?;
            }
        }
        Ok(sudoku)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The value in a cell, `0` if it is blank.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is not less than [`size()`](Self::size).
    pub fn get(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell {row}/{col} is outside the {0}x{0} grid",
            self.size
        );
        self.cells[row * self.size + col]
    }

    /// Writes `value` (or `0` to clear) into a cell.
    ///
    /// Fails with [`SudokuError::CellOutOfRange`] or
    /// [`SudokuError::ValueOutOfRange`] without touching the grid.
    pub fn set(&mut self, row: usize, col: usize, value: usize) -> Result<(), SudokuError> {
        if row >= self.size || col >= self.size {
            return Err(SudokuError::CellOutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        if value > self.size {
            return Err(SudokuError::ValueOutOfRange {
                row,
                col,
                value,
                size: self.size,
            });
        }
        self.cells[row * self.size + col] = value;
        Ok(())
    }

    fn row(&self, row: usize) -> &[usize] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    fn box_index(&self, row: usize, col: usize) -> usize {
        (row / self.box_rows) * self.box_rows + col / self.box_cols
    }

    /// Builds the constraint matrix for this grid: every value for a blank
    /// cell, only the given value for a clue.
    pub fn matrix(&self) -> Result<Matrix<Placement>, SudokuError> {
        let n = self.size;
        let area = n * n;
        let mut matrix = Matrix::with_capacity(4 * area, 4 * area * n);

        for row in 0..n {
            for col in 0..n {
                matrix.append_column(format!("cell_{row}_{col}"));
            }
        }
        for row in 0..n {
            for value in 1..=n {
                matrix.append_column(format!("row_{row}_{value}"));
            }
        }
        for col in 0..n {
            for value in 1..=n {
                matrix.append_column(format!("col_{col}_{value}"));
            }
        }
        for b in 0..n {
            for value in 1..=n {
                matrix.append_column(format!("box_{b}_{value}"));
            }
        }

        for row in 0..n {
            for col in 0..n {
                let values = match self.get(row, col) {
                    0 => 1..=n,
                    clue => clue..=clue,
                };
                for value in values {
                    let b = self.box_index(row, col);
                    matrix.append_row_sparse(
                        Placement { row, col, value },
                        [
                            row * n + col,
                            area + row * n + value - 1,
                            2 * area + col * n + value - 1,
                            3 * area + b * n + value - 1,
                        ],
                    )?;
                }
            }
        }

        Ok(matrix)
    }

    fn filled(&self, placements: Vec<Placement>) -> Sudoku {
        let mut solved = self.clone();
        for Placement { row, col, value } in placements {
            solved.cells[row * self.size + col] = value;
        }
        solved
    }

    /// Every completion of this grid.
    pub fn solutions(&self) -> Result<Vec<Sudoku>, SudokuError> {
        let mut matrix = self.matrix()?;
        Ok(matrix
            .solve()
            .into_iter()
            .map(|placements| self.filled(placements))
            .collect())
    }

    /// The first completion found, or [`SudokuError::NoSolution`].
    pub fn solve_one(&self) -> Result<Sudoku, SudokuError> {
        let mut matrix = self.matrix()?;
        matrix
            .first_solution()
            .map(|placements| self.filled(placements))
            .ok_or(SudokuError::NoSolution)
    }

    /// Checks that every cell is filled and no row, column or box repeats
    /// a value.
    pub fn verify(&self) -> Result<(), SudokuError> {
        if let Some(cell) = self.cells.iter().position(|&value| value == 0) {
            return Err(SudokuError::Incomplete {
                row: cell / self.size,
                col: cell % self.size,
            });
        }

        for row in 0..self.size {
            check_unique(Unit::Row, row, self.row(row).to_vec(), self.size)?;
        }
        for col in 0..self.size {
            let values = (0..self.size).map(|row| self.get(row, col)).collect();
            check_unique(Unit::Column, col, values, self.size)?;
        }
        for b in 0..self.size {
            let top = (b / self.box_rows) * self.box_rows;
            let left = (b % self.box_rows) * self.box_cols;
            let values = (0..self.size)
                .map(|i| self.get(top + i / self.box_cols, left + i % self.box_cols))
                .collect();
            check_unique(Unit::Box, b, values, self.size)?;
        }
        Ok(())
    }
}

fn check_unique(
    unit: Unit,
    index: usize,
    values: Vec<usize>,
    size: usize,
) -> Result<(), SudokuError> {
    let mut seen = vec![false; size + 1];
    for &value in &values {
        if seen[value] {
            return Err(SudokuError::Duplicate {
                unit,
                index,
                values,
            });
        }
        seen[value] = true;
    }
    Ok(())
}

impl FromStr for Sudoku {
    type Err = SudokuError;

    /// Parses the Project Euler #96 format: a header line, then one line of
    /// digits per row.
    fn from_str(text: &str) -> Result<Sudoku, SudokuError> {
        let lines: Vec<&str> = text
            .trim_matches('\n')
            .lines()
            .skip(1)
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let mut sudoku = Sudoku::new(lines.len())?;
        for (row, line) in lines.iter().enumerate() {
            let count = line.chars().count();
            if count != sudoku.size {
                return Err(SudokuError::RaggedRow {
                    row,
                    expected: sudoku.size,
                    found: count,
                });
            }
            for (col, found) in line.chars().enumerate() {
                let value = found
                    .to_digit(10)
                    .ok_or(SudokuError::InvalidDigit { row, col, found })?;
                sudoku.set(row, col, value as usize)?;
            }
        }
        Ok(sudoku)
    }
}

/// Parses a corpus of grids in the Project Euler #96 format, each starting
/// with a `Grid NN` header line.
pub fn parse_euler_grids(text: &str) -> Result<Vec<Sudoku>, SudokuError> {
    text.split("Grid")
        .filter(|grid| !grid.trim().is_empty())
        .map(str::parse)
        .collect()
}

impl fmt::Display for Sudoku {
    /// One bracketed, space-separated row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let values: Vec<String> = self.row(row).iter().map(usize::to_string).collect();
            writeln!(f, "[{}]", values.join(" "))?;
        }
        Ok(())
    }
}
