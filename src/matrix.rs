//! The toroidal node store: columns, rows, and the four-way circular links
//! that tie them together.

use crate::error::{Error, Result};

/// The arena index of the root header.  The root's horizontal list holds
/// every uncovered primary column header.
pub(crate) const ROOT: usize = 0;

/// Row index stored in header nodes, which belong to no row.
const NO_ROW: usize = usize::MAX;

/// Node is a cell of the sparse matrix (or a header), linked to its four
/// neighbours by arena index.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) row: usize,
    pub(crate) column: usize,
    up: usize,
    down: usize,
    left: usize,
    right: usize,
}

/// A sparse boolean matrix of choices (rows) against constraints
/// (columns), stored as a Dancing Links torus.
///
/// Build it by appending every column first and then the rows; afterwards
/// the shape never changes.  Searching only splices links in and out of the
/// structure and always restores them before returning, so a matrix can be
/// solved repeatedly and inspected in between.
///
/// Row labels are opaque to the matrix: anything can be used as `R`, and
/// the solving methods hand the labels of the selected rows back.
///
/// ```
/// let mut matrix = dlx_matrix::Matrix::new();
/// matrix.append_column("beer");
/// matrix.append_column("nachos");
/// matrix.append_column("sour cream");
///
/// matrix.append_row("Jack", &[true, false, false]).unwrap();
/// matrix.append_row("Amanda", &[true, true, false]).unwrap();
/// matrix.append_row("Chris", &[false, false, true]).unwrap();
/// matrix.append_row("Jen", &[true, true, true]).unwrap();
///
/// let mut parties = matrix.solve();
/// parties.iter_mut().for_each(|party| party.sort());
/// parties.sort();
/// assert_eq!(vec![vec!["Amanda", "Chris"], vec!["Jen"]], parties);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<R = String> {
    // Links are indices into `nodes` rather than references; the arena
    // owns every node for the lifetime of the matrix, so an unlinked node
    // still remembers where it has to be put back.
    pub(crate) nodes: Vec<Node>,

    /// Column index -> arena index of that column's header.
    pub(crate) headers: Vec<usize>,

    /// Live node count per column, consulted by the column heuristic.
    pub(crate) sizes: Vec<usize>,

    pub(crate) covered: Vec<bool>,
    primary: Vec<bool>,
    names: Vec<String>,
    pub(crate) rows: Vec<R>,
}

impl<R> Default for Matrix<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Matrix<R> {
    /// Creates an empty matrix holding only the root header.
    pub fn new() -> Matrix<R> {
        Self::with_capacity(0, 0)
    }

    /// Creates an empty matrix with room for `columns` column headers and
    /// `nodes` set cells before reallocating.
    pub fn with_capacity(columns: usize, nodes: usize) -> Matrix<R> {
        let mut matrix = Matrix {
            nodes: Vec::with_capacity(1 + columns + nodes),
            headers: Vec::with_capacity(columns),
            sizes: Vec::with_capacity(columns),
            covered: Vec::with_capacity(columns),
            primary: Vec::with_capacity(columns),
            names: Vec::with_capacity(columns),
            rows: Vec::new(),
        };
        matrix.nodes.push(Node {
            row: NO_ROW,
            column: usize::MAX,
            up: ROOT,
            down: ROOT,
            left: ROOT,
            right: ROOT,
        });
        matrix
    }

    // Link accessors.  Keeping the raw `nodes[...]` indexing in one place
    // makes the splicing code below read like the textbook version.

    pub(crate) fn up(&self, node: usize) -> usize {
        self.nodes[node].up
    }

    pub(crate) fn down(&self, node: usize) -> usize {
        self.nodes[node].down
    }

    pub(crate) fn left(&self, node: usize) -> usize {
        self.nodes[node].left
    }

    pub(crate) fn right(&self, node: usize) -> usize {
        self.nodes[node].right
    }

    pub(crate) fn unlink_horizontal(&mut self, node: usize) {
        let left = self.left(node);
        let right = self.right(node);
        self.nodes[left].right = right;
        self.nodes[right].left = left;
    }

    pub(crate) fn relink_horizontal(&mut self, node: usize) {
        let left = self.left(node);
        let right = self.right(node);
        self.nodes[right].left = node;
        self.nodes[left].right = node;
    }

    pub(crate) fn unlink_vertical(&mut self, node: usize) {
        let up = self.up(node);
        let down = self.down(node);
        self.nodes[up].down = down;
        self.nodes[down].up = up;
    }

    pub(crate) fn relink_vertical(&mut self, node: usize) {
        let up = self.up(node);
        let down = self.down(node);
        self.nodes[down].up = node;
        self.nodes[up].down = node;
    }

    /// Appends a primary column: one that every solution must cover
    /// exactly once.  Returns the new column's index.
    pub fn append_column(&mut self, name: impl Into<String>) -> usize {
        self.push_column(name.into(), true)
    }

    /// Appends a secondary column: one that a solution may cover at most
    /// once, but need not cover at all.  Returns the new column's index.
    pub fn append_secondary_column(&mut self, name: impl Into<String>) -> usize {
        self.push_column(name.into(), false)
    }

    fn push_column(&mut self, name: String, primary: bool) -> usize {
        let column = self.names.len();
        let header = self.nodes.len();
        self.nodes.push(Node {
            row: NO_ROW,
            column,
            up: header,
            down: header,
            left: header,
            right: header,
        });

        if primary {
            // Splice in between the current tail and the root, so the root
            // list keeps the columns in append order.
            let tail = self.left(ROOT);
            self.nodes[header].left = tail;
            self.nodes[header].right = ROOT;
            self.relink_horizontal(header);
        }

        self.headers.push(header);
        self.sizes.push(0);
        self.covered.push(false);
        self.primary.push(primary);
        self.names.push(name);
        column
    }

    /// Appends a row given as a dense membership vector, one entry per
    /// registered column.
    ///
    /// Fails with [`Error::ColumnCountMismatch`] if the vector's length
    /// differs from [`column_count()`](Self::column_count); the matrix is
    /// untouched in that case.  Empty and duplicate rows are accepted.
    pub fn append_row(&mut self, label: R, membership: &[bool]) -> Result<()> {
        if membership.len() != self.column_count() {
            return Err(Error::ColumnCountMismatch {
                expected: self.column_count(),
                actual: membership.len(),
            });
        }
        let columns = membership
            .iter()
            .enumerate()
            .filter_map(|(column, &set)| set.then_some(column));
        self.link_row(label, columns);
        Ok(())
    }

    /// Appends a row given as the indices of the columns it covers.
    ///
    /// Indices may arrive in any order and repeat; the row is linked in
    /// ascending column order.  Fails with [`Error::ColumnIndexOutOfRange`]
    /// for an index that names no column, leaving the matrix untouched.
    pub fn append_row_sparse<I>(&mut self, label: R, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut columns: Vec<usize> = columns.into_iter().collect();
        columns.sort_unstable();
        columns.dedup();
        if let Some(&index) = columns.last() {
            if index >= self.column_count() {
                return Err(Error::ColumnIndexOutOfRange { index });
            }
        }
        self.link_row(label, columns);
        Ok(())
    }

    /// Allocates one node per column, appends each to the bottom of its
    /// column, and closes the nodes into a horizontal cycle of their own.
    fn link_row<I>(&mut self, label: R, columns: I)
    where
        I: IntoIterator<Item = usize>,
    {
        let row = self.rows.len();
        let mut first: Option<usize> = None;

        for column in columns {
            let header = self.headers[column];
            let node = self.nodes.len();
            let up = self.up(header);
            self.nodes.push(Node {
                row,
                column,
                up,
                down: header,
                left: node,
                right: node,
            });
            self.relink_vertical(node);
            self.sizes[column] += 1;

            match first {
                None => first = Some(node),
                Some(first) => {
                    // Link in to the left of the first node, i.e. at the
                    // end of the row.
                    let last = self.left(first);
                    self.nodes[node].left = last;
                    self.nodes[node].right = first;
                    self.relink_horizontal(node);
                }
            }
        }

        self.rows.push(label);
    }

    /// Column names, in append order.
    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Row labels, in append order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// The label of the row at `index`, if there is one.
    pub fn row(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn check_column(&self, index: usize) -> Result<()> {
        if index < self.column_count() {
            Ok(())
        } else {
            Err(Error::ColumnIndexOutOfRange { index })
        }
    }

    /// Whether the column at `index` must be covered by every solution.
    pub fn is_primary(&self, index: usize) -> Result<bool> {
        self.check_column(index)?;
        Ok(self.primary[index])
    }

    pub fn is_covered(&self, index: usize) -> Result<bool> {
        self.check_column(index)?;
        Ok(self.covered[index])
    }

    /// The number of rows still linked into the column at `index`.
    pub fn column_size(&self, index: usize) -> Result<usize> {
        self.check_column(index)?;
        Ok(self.sizes[index])
    }

    /// The number of columns, primary or secondary, that are not covered.
    pub fn num_uncovered_columns(&self) -> usize {
        self.covered.iter().filter(|&&covered| !covered).count()
    }

    /// Materialises the current link structure as a row-major grid.
    ///
    /// The grid is rebuilt by walking each column's vertical list, so cells
    /// of rows that a cover has unlinked from a column read as `false`.
    pub fn as_dense_matrix(&self) -> Vec<Vec<bool>> {
        let mut dense = vec![vec![false; self.column_count()]; self.row_count()];
        for &header in &self.headers {
            let mut node = header;
            loop {
                node = self.down(node);
                if node == header {
                    break;
                }
                dense[self.nodes[node].row][self.nodes[node].column] = true;
            }
        }
        dense
    }

    /// Panics unless the links reachable from the headers are consistent.
    ///
    /// Nodes unlinked by a cover keep stale vertical links until they are
    /// relinked, so only what must hold mid-search is checked: row cycles
    /// are intact, every column's vertical list is mirrored and matches its
    /// live count, and the root list holds exactly the uncovered primary
    /// columns in append order.
    #[cfg(test)]
    pub(crate) fn check_links(&self) {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.row == NO_ROW {
                continue;
            }
            assert_eq!(index, self.nodes[node.right].left, "right.left of {index}");
            assert_eq!(index, self.nodes[node.left].right, "left.right of {index}");
        }

        for (column, &header) in self.headers.iter().enumerate() {
            let mut count = 0;
            let mut node = header;
            loop {
                let down = self.down(node);
                assert_eq!(node, self.up(down), "down.up of {down} in column {column}");
                if down == header {
                    break;
                }
                assert_eq!(column, self.nodes[down].column, "stray node {down}");
                count += 1;
                assert!(count < self.nodes.len(), "column {column} does not close");
                node = down;
            }
            assert_eq!(self.sizes[column], count, "live count of column {column}");

            if !self.primary[column] {
                assert_eq!(header, self.left(header), "secondary column {column}");
                assert_eq!(header, self.right(header), "secondary column {column}");
            }
        }

        let expected: Vec<usize> = (0..self.column_count())
            .filter(|&column| self.primary[column] && !self.covered[column])
            .map(|column| self.headers[column])
            .collect();
        let mut forward = Vec::new();
        let mut node = ROOT;
        loop {
            let right = self.right(node);
            assert_eq!(node, self.left(right), "right.left of {right} in root list");
            if right == ROOT {
                break;
            }
            forward.push(right);
            assert!(forward.len() < self.nodes.len(), "root list does not close");
            node = right;
        }
        assert_eq!(expected, forward, "root list");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// The example from <https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X>.
    pub(crate) fn wikipedia_example() -> Matrix<&'static str> {
        let mut matrix = Matrix::new();
        for column in 1..=7 {
            matrix.append_column(column.to_string());
        }
        let rows: [(&str, [u8; 7]); 6] = [
            ("A", [1, 0, 0, 1, 0, 0, 1]),
            ("B", [1, 0, 0, 1, 0, 0, 0]),
            ("C", [0, 0, 0, 1, 1, 0, 1]),
            ("D", [0, 0, 1, 0, 1, 1, 0]),
            ("E", [0, 1, 1, 0, 0, 1, 1]),
            ("F", [0, 1, 0, 0, 0, 0, 1]),
        ];
        for (label, bits) in rows {
            matrix.append_row(label, &bits.map(|bit| bit == 1)).unwrap();
        }
        matrix
    }

    /// The example from Knuth's "Dancing Links" paper.
    pub(crate) fn knuth_paper_example() -> Matrix<&'static str> {
        let mut matrix = Matrix::new();
        for column in 1..=7 {
            matrix.append_column(column.to_string());
        }
        let rows: [(&str, [u8; 7]); 6] = [
            ("1", [0, 0, 1, 0, 1, 1, 0]),
            ("2", [1, 0, 0, 1, 0, 0, 1]),
            ("3", [0, 1, 1, 0, 0, 1, 0]),
            ("4", [1, 0, 0, 1, 0, 0, 0]),
            ("5", [0, 1, 0, 0, 0, 0, 1]),
            ("6", [0, 0, 0, 1, 1, 0, 1]),
        ];
        for (label, bits) in rows {
            matrix.append_row(label, &bits.map(|bit| bit == 1)).unwrap();
        }
        matrix
    }

    #[test]
    fn one_by_one() {
        let mut matrix = Matrix::new();
        matrix.append_column("1");
        matrix.append_row("A", &[true]).unwrap();

        assert_eq!(&["1".to_string()], matrix.columns());
        assert_eq!(vec![vec![true]], matrix.as_dense_matrix());
        matrix.check_links();
    }

    #[test]
    fn sparse_multi_column() {
        let mut matrix = Matrix::new();
        matrix.append_column("1");
        matrix.append_column("2");
        matrix.append_row("A", &[true, false]).unwrap();
        matrix.append_row("A", &[false, true]).unwrap();

        assert_eq!(&["A", "A"], matrix.rows());
        assert_eq!(
            vec![vec![true, false], vec![false, true]],
            matrix.as_dense_matrix()
        );
        matrix.check_links();
    }

    #[test]
    fn wikipedia_example_as_dense_matrix() {
        let matrix = wikipedia_example();
        let names: Vec<&str> = matrix.columns().iter().map(String::as_str).collect();
        assert_eq!(vec!["1", "2", "3", "4", "5", "6", "7"], names);
        assert_eq!(&["A", "B", "C", "D", "E", "F"], matrix.rows());
        assert_eq!(
            vec![
                vec![true, false, false, true, false, false, true],
                vec![true, false, false, true, false, false, false],
                vec![false, false, false, true, true, false, true],
                vec![false, false, true, false, true, true, false],
                vec![false, true, true, false, false, true, true],
                vec![false, true, false, false, false, false, true],
            ],
            matrix.as_dense_matrix()
        );
        matrix.check_links();
    }

    #[test]
    fn live_counts_match_dense_column_sums() {
        let matrix = knuth_paper_example();
        let dense = matrix.as_dense_matrix();
        for column in 0..matrix.column_count() {
            let sum = dense.iter().filter(|row| row[column]).count();
            assert_eq!(sum, matrix.column_size(column).unwrap(), "column {column}");
        }
    }

    #[test]
    fn row_length_mismatch_is_rejected() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        let err = matrix.append_row("A", &[true, true, true]).unwrap_err();

        assert_eq!(
            Error::ColumnCountMismatch {
                expected: 1,
                actual: 3
            },
            err
        );
        assert_eq!(
            "column mismatch: have only 1 columns registered, but got 3",
            err.to_string()
        );
        assert_eq!(0, matrix.row_count());
        assert_eq!(0, matrix.column_size(0).unwrap());
        matrix.check_links();
    }

    #[test]
    fn empty_rows_are_accepted() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_row("empty", &[false]).unwrap();
        assert_eq!(vec![vec![false]], matrix.as_dense_matrix());
        matrix.check_links();
    }

    #[test]
    fn sparse_rows_match_dense_rows() {
        let mut dense = Matrix::new();
        let mut sparse = Matrix::new();
        for column in 0..4 {
            dense.append_column(column.to_string());
            sparse.append_column(column.to_string());
        }
        dense.append_row("x", &[true, false, true, true]).unwrap();
        sparse.append_row_sparse("x", [3, 0, 2, 0]).unwrap();

        assert_eq!(dense.as_dense_matrix(), sparse.as_dense_matrix());
        sparse.check_links();
    }

    #[test]
    fn sparse_row_out_of_range_is_rejected() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_column("b");

        assert_eq!(
            Err(Error::ColumnIndexOutOfRange { index: 2 }),
            matrix.append_row_sparse("bad", [0, 2])
        );
        assert_eq!(0, matrix.row_count());
        assert_eq!(0, matrix.column_size(0).unwrap());
        matrix.check_links();
    }

    #[test]
    fn secondary_columns_stay_out_of_the_root_list() {
        let mut matrix: Matrix = Matrix::new();
        let primary = matrix.append_column("p");
        let secondary = matrix.append_secondary_column("s");
        matrix
            .append_row("both".to_string(), &[true, true])
            .unwrap();

        assert!(matrix.is_primary(primary).unwrap());
        assert!(!matrix.is_primary(secondary).unwrap());
        assert_eq!(1, matrix.column_size(secondary).unwrap());
        assert_eq!(2, matrix.num_uncovered_columns());
        matrix.check_links();
    }

    #[test]
    fn introspection_rejects_bad_indices() {
        let matrix = wikipedia_example();
        assert_eq!(
            Err(Error::ColumnIndexOutOfRange { index: 7 }),
            matrix.column_size(7)
        );
        assert_eq!(
            Err(Error::ColumnIndexOutOfRange { index: usize::MAX }),
            matrix.is_covered(usize::MAX)
        );
        assert_eq!(None, matrix.row(6));
        assert_eq!(Some(&"F"), matrix.row(5));
    }
}
