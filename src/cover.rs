//! Covering and uncovering columns.
//!
//! Covering a column takes its header out of the root list and unlinks
//! every row that intersects it from all the *other* columns that row
//! touches.  The unlinked nodes keep their own links, which is exactly the
//! information uncover needs to put them back, provided it visits them in
//! the reverse order.

use crate::error::{Error, Result};
use crate::matrix::Matrix;

impl<R> Matrix<R> {
    /// Covers the column at `index`.
    ///
    /// Fails with [`Error::ColumnIndexOutOfRange`] or
    /// [`Error::ColumnAlreadyCovered`] without touching the matrix.
    pub fn cover_column(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        if self.covered[index] {
            return Err(Error::ColumnAlreadyCovered { index });
        }
        self.cover(index);
        Ok(())
    }

    /// Uncovers the column at `index`, undoing [`cover_column()`].
    ///
    /// Covers must be undone in the reverse order they were made; fails
    /// with [`Error::ColumnIndexOutOfRange`] or [`Error::ColumnNotCovered`]
    /// without touching the matrix.
    ///
    /// [`cover_column()`]: Self::cover_column
    pub fn uncover_column(&mut self, index: usize) -> Result<()> {
        self.check_column(index)?;
        if !self.covered[index] {
            return Err(Error::ColumnNotCovered { index });
        }
        self.uncover(index);
        Ok(())
    }

    /// Covers `column`, which must exist and be uncovered.
    pub(crate) fn cover(&mut self, column: usize) {
        let header = self.headers[column];
        self.unlink_horizontal(header);

        let mut row_node = header;
        loop {
            row_node = self.down(row_node);
            if row_node == header {
                break;
            }
            let mut node = row_node;
            loop {
                node = self.right(node);
                if node == row_node {
                    break;
                }
                self.unlink_vertical(node);
                self.sizes[self.nodes[node].column] -= 1;
            }
        }

        self.covered[column] = true;
    }

    /// Uncovers `column`, which must be the most recently covered column
    /// that is still covered.
    pub(crate) fn uncover(&mut self, column: usize) {
        let header = self.headers[column];

        // Bottom to top, right to left: the exact mirror of `cover`.
        let mut row_node = header;
        loop {
            row_node = self.up(row_node);
            if row_node == header {
                break;
            }
            let mut node = row_node;
            loop {
                node = self.left(node);
                if node == row_node {
                    break;
                }
                self.sizes[self.nodes[node].column] += 1;
                self.relink_vertical(node);
            }
        }

        self.relink_horizontal(header);
        self.covered[column] = false;
    }
}
