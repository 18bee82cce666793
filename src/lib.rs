#![doc = include_str!("../README.md")]
//!
//!
//! To solve an exact cover problem with this implementation, create a
//! [`Matrix`], append its constraint columns with
//! [`Matrix::append_column()`] (or [`Matrix::append_secondary_column()`]
//! for constraints that may stay uncovered), append one row per choice,
//! and call [`Matrix::solve()`].
//!
//! An example, based on Wikipedia's [Algorithm
//! X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X) article:
//!
//! ```
//! let mut matrix = dlx_matrix::Matrix::new();
//! for column in 1..=7 {
//!     matrix.append_column(column.to_string());
//! }
//!
//! matrix.append_row("A", &[true, false, false, true, false, false, true])?;
//! matrix.append_row("B", &[true, false, false, true, false, false, false])?;
//! matrix.append_row("C", &[false, false, false, true, true, false, true])?;
//! matrix.append_row("D", &[false, false, true, false, true, true, false])?;
//! matrix.append_row("E", &[false, true, true, false, false, true, true])?;
//! matrix.append_row("F", &[false, true, false, false, false, false, true])?;
//!
//! let mut solutions = matrix.solve();
//! assert_eq!(1, solutions.len());
//!
//! // The rows of a solution come back in search order.
//! solutions[0].sort();
//! assert_eq!(vec!["B", "D", "F"], solutions[0]);
//! # Ok::<(), dlx_matrix::Error>(())
//! ```
//!
//! A matrix only changes shape while it is being built, and every search
//! leaves it exactly as it found it.  Searching needs `&mut self`, so one
//! matrix is searched by one thread at a time; independent problems are
//! solved in parallel by giving each thread its own matrix.
//!
//! The [`queens`] and [`sudoku`] modules show complete encodings of two
//! classic puzzles on top of the matrix.

mod cover;
mod error;
mod matrix;
mod search;

pub mod queens;
pub mod sudoku;

pub use error::{Error, Result};
pub use matrix::Matrix;
