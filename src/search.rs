//! Algorithm X over the dancing links: depth-first search for every exact
//! cover of a [`Matrix`].

use std::ops::{ControlFlow, Deref, DerefMut};

use crate::matrix::{Matrix, ROOT};

/// Keeps a column covered for as long as it is alive.
///
/// Dropping the guard uncovers the column, so a branch that returns early
/// still hands its parent a matrix in the state it was given.
struct CoveredColumn<'a, R> {
    matrix: &'a mut Matrix<R>,
    column: usize,
}

impl<'a, R> CoveredColumn<'a, R> {
    fn new(matrix: &'a mut Matrix<R>, column: usize) -> Self {
        matrix.cover(column);
        CoveredColumn { matrix, column }
    }
}

impl<R> Drop for CoveredColumn<'_, R> {
    fn drop(&mut self) {
        self.matrix.uncover(self.column);
    }
}

impl<R> Deref for CoveredColumn<'_, R> {
    type Target = Matrix<R>;

    fn deref(&self) -> &Matrix<R> {
        self.matrix
    }
}

impl<R> DerefMut for CoveredColumn<'_, R> {
    fn deref_mut(&mut self) -> &mut Matrix<R> {
        self.matrix
    }
}

/// Keeps a row selected: every column the row touches, other than the one
/// it was reached through, stays covered until the guard drops.
struct SelectedRow<'a, R> {
    matrix: &'a mut Matrix<R>,
    node: usize,
}

impl<'a, R> SelectedRow<'a, R> {
    fn new(matrix: &'a mut Matrix<R>, node: usize) -> Self {
        let mut other = node;
        loop {
            other = matrix.right(other);
            if other == node {
                break;
            }
            let column = matrix.nodes[other].column;
            matrix.cover(column);
        }
        SelectedRow { matrix, node }
    }
}

impl<R> Drop for SelectedRow<'_, R> {
    fn drop(&mut self) {
        // Right to left, undoing the covers in reverse.
        let mut other = self.node;
        loop {
            other = self.matrix.left(other);
            if other == self.node {
                break;
            }
            let column = self.matrix.nodes[other].column;
            self.matrix.uncover(column);
        }
    }
}

impl<R> Deref for SelectedRow<'_, R> {
    type Target = Matrix<R>;

    fn deref(&self) -> &Matrix<R> {
        self.matrix
    }
}

impl<R> DerefMut for SelectedRow<'_, R> {
    fn deref_mut(&mut self) -> &mut Matrix<R> {
        self.matrix
    }
}

impl<R> Matrix<R> {
    /// Finds the uncovered primary column with the fewest live rows, if any
    /// primary column is still uncovered.  Ties go to the column met first
    /// walking right from the root.
    fn choose_column(&self) -> Option<usize> {
        let mut header = self.right(ROOT);
        if header == ROOT {
            return None;
        }

        let mut best = header;
        let mut best_size = self.sizes[self.nodes[header].column];
        loop {
            header = self.right(header);
            if header == ROOT || best_size == 0 {
                break;
            }
            let size = self.sizes[self.nodes[header].column];
            if size < best_size {
                best = header;
                best_size = size;
            }
        }

        Some(self.nodes[best].column)
    }

    fn search<F>(&mut self, partial: &mut Vec<usize>, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&[usize]) -> ControlFlow<()>,
    {
        let Some(column) = self.choose_column() else {
            // Every primary column is covered by exactly one row of the
            // partial solution.
            return visit(partial);
        };

        // A column without live rows is a dead end: the loop below runs
        // zero times and the guard puts the column straight back.
        let mut chosen = CoveredColumn::new(self, column);
        let header = chosen.headers[column];
        let mut row_node = header;
        loop {
            row_node = chosen.down(row_node);
            if row_node == header {
                break;
            }

            partial.push(chosen.nodes[row_node].row);
            let flow = SelectedRow::new(&mut *chosen, row_node).search(partial, visit);
            partial.pop();

            if flow.is_break() {
                return flow;
            }
        }

        ControlFlow::Continue(())
    }

    /// Calls `visit` with the row indices of every exact cover, in the
    /// order the search selected them, until it returns
    /// [`ControlFlow::Break`].
    ///
    /// The slice is only valid for the duration of the call; it is reused
    /// by the rest of the search.  The matrix is fully restored when this
    /// returns, whether or not the search was cut short.
    pub fn visit_solutions<F>(&mut self, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&[usize]) -> ControlFlow<()>,
    {
        log::debug!(
            "searching {} columns ({} uncovered) x {} rows",
            self.column_count(),
            self.num_uncovered_columns(),
            self.row_count()
        );
        let mut partial = Vec::with_capacity(self.column_count());
        self.search(&mut partial, &mut visit)
    }

    /// Counts the exact covers without collecting them.
    pub fn count_solutions(&mut self) -> usize {
        let mut count = 0;
        let _ = self.visit_solutions(|_| {
            count += 1;
            ControlFlow::Continue(())
        });
        log::debug!("counted {count} solutions");
        count
    }
}

impl<R: Clone> Matrix<R> {
    /// Returns every exact cover, each as the labels of its selected rows.
    ///
    /// The order of labels within a solution carries no meaning; treat each
    /// one as a set.  An empty result means the matrix has no exact cover.
    /// A matrix with no primary columns has exactly one: the empty
    /// selection.
    ///
    /// Rows are only reached through the primary columns they touch, so a
    /// row with no primary column is never part of a solution, even where
    /// adding it would leave every secondary column covered at most once.
    pub fn solve(&mut self) -> Vec<Vec<R>> {
        let mut found: Vec<Vec<usize>> = Vec::new();
        let _ = self.visit_solutions(|rows| {
            // The search keeps mutating its buffer after this returns.
            found.push(rows.to_vec());
            log::trace!("solution {}: rows {:?}", found.len(), rows);
            ControlFlow::Continue(())
        });
        log::debug!("found {} solutions", found.len());

        found
            .into_iter()
            .map(|rows| rows.into_iter().map(|row| self.rows[row].clone()).collect())
            .collect()
    }

    /// Returns the first exact cover found, stopping the search there.
    pub fn first_solution(&mut self) -> Option<Vec<R>> {
        let mut found: Option<Vec<usize>> = None;
        let _ = self.visit_solutions(|rows| {
            found = Some(rows.to_vec());
            ControlFlow::Break(())
        });
        log::debug!("first solution found: {}", found.is_some());

        found.map(|rows| rows.into_iter().map(|row| self.rows[row].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::ops::ControlFlow;

    use crate::Matrix;
    use crate::matrix::tests::{knuth_paper_example, wikipedia_example};

    fn as_sets<R: Ord>(solutions: Vec<Vec<R>>) -> Vec<BTreeSet<R>> {
        let mut sets: Vec<BTreeSet<R>> = solutions
            .into_iter()
            .map(|solution| solution.into_iter().collect())
            .collect();
        sets.sort();
        sets
    }

    fn set<const N: usize>(labels: [&'static str; N]) -> BTreeSet<&'static str> {
        labels.into_iter().collect()
    }

    #[test]
    fn wikipedia_example_has_one_cover() {
        let mut matrix = wikipedia_example();
        let before = matrix.as_dense_matrix();

        let solutions = matrix.solve();
        assert_eq!(1, solutions.len(), "solutions: {solutions:?}");
        assert_eq!(3, solutions[0].len());
        assert_eq!(vec![set(["B", "D", "F"])], as_sets(solutions));

        assert_eq!(before, matrix.as_dense_matrix());
        assert_eq!(7, matrix.num_uncovered_columns());
        matrix.check_links();
    }

    #[test]
    fn knuth_paper_example_has_one_cover() {
        let mut matrix = knuth_paper_example();
        let solutions = matrix.solve();
        assert_eq!(vec![set(["1", "4", "5"])], as_sets(solutions));
        matrix.check_links();
    }

    #[test]
    fn covers_use_every_column_exactly_once() {
        let mut matrix = wikipedia_example();
        let dense = matrix.as_dense_matrix();
        let mut covers = Vec::new();
        let _ = matrix.visit_solutions(|rows| {
            covers.push(rows.to_vec());
            ControlFlow::Continue(())
        });

        for rows in covers {
            for column in 0..7 {
                let hits = rows.iter().filter(|&&row| dense[row][column]).count();
                assert_eq!(1, hits, "column {column} in {rows:?}");
            }
        }
    }

    #[test]
    fn multiple_covers() {
        let mut matrix = Matrix::new();
        for column in 0..3 {
            matrix.append_column(column.to_string());
        }
        matrix.append_row("A", &[true, true, true]).unwrap();
        matrix.append_row("B", &[true, false, true]).unwrap();
        matrix.append_row("C", &[false, true, false]).unwrap();
        matrix.append_row("D", &[true, true, false]).unwrap();
        matrix.append_row("E", &[false, false, true]).unwrap();

        let solutions = matrix.solve();
        assert_eq!(3, solutions.len());
        assert_eq!(
            vec![set(["A"]), set(["B", "C"]), set(["D", "E"])],
            as_sets(solutions)
        );
        assert_eq!(3, matrix.count_solutions());
        matrix.check_links();
    }

    #[test]
    fn party_example() {
        let mut matrix = Matrix::new();
        matrix.append_column("beer");
        matrix.append_column("nachos");
        matrix.append_column("sour cream");
        matrix.append_row("Jack", &[true, false, false]).unwrap();
        matrix.append_row("Amanda", &[true, true, false]).unwrap();
        matrix.append_row("Chris", &[false, false, true]).unwrap();
        matrix.append_row("Jen", &[true, true, true]).unwrap();

        assert_eq!(
            vec![set(["Amanda", "Chris"]), set(["Jen"])],
            as_sets(matrix.solve())
        );
    }

    #[test]
    fn duplicate_rows_under_different_names() {
        // The paper example with row "4" repeated as "4b": both copies can
        // complete the same cover.
        let mut matrix = knuth_paper_example();
        matrix
            .append_row("4b", &[true, false, false, true, false, false, false])
            .unwrap();

        assert_eq!(
            vec![set(["1", "4", "5"]), set(["1", "4b", "5"])],
            as_sets(matrix.solve())
        );
    }

    #[test]
    fn no_rows_means_no_covers() {
        let mut matrix: Matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_column("b");

        assert!(matrix.solve().is_empty());
        assert_eq!(0, matrix.count_solutions());
        assert_eq!(None, matrix.first_solution());
        matrix.check_links();
    }

    #[test]
    fn no_primary_columns_means_one_empty_cover() {
        let mut empty: Matrix = Matrix::new();
        assert_eq!(vec![Vec::<String>::new()], empty.solve());

        let mut secondary_only = Matrix::new();
        secondary_only.append_secondary_column("s");
        secondary_only.append_row("x", &[true]).unwrap();
        assert_eq!(vec![Vec::<&str>::new()], secondary_only.solve());
        assert_eq!(1, secondary_only.count_solutions());
    }

    #[test]
    fn secondary_columns_are_at_most_once() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_column("b");
        matrix.append_secondary_column("shared");
        matrix.append_row("a+shared", &[true, false, true]).unwrap();
        matrix.append_row("b+shared", &[false, true, true]).unwrap();
        matrix.append_row("a", &[true, false, false]).unwrap();
        matrix.append_row("b", &[false, true, false]).unwrap();

        assert_eq!(
            vec![
                set(["a", "b"]),
                set(["a", "b+shared"]),
                set(["a+shared", "b"]),
            ],
            as_sets(matrix.solve())
        );
    }

    #[test]
    fn secondary_only_rows_never_join_a_cover() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_secondary_column("s");
        matrix.append_row("a", &[true, false]).unwrap();
        matrix.append_row("s", &[false, true]).unwrap();

        assert_eq!(vec![set(["a"])], as_sets(matrix.solve()));
        assert_eq!(1, matrix.count_solutions());
    }

    #[test]
    fn empty_rows_never_join_a_cover() {
        let mut matrix = Matrix::new();
        matrix.append_column("a");
        matrix.append_row("nothing", &[false]).unwrap();
        matrix.append_row("a", &[true]).unwrap();

        assert_eq!(vec![vec!["a"]], matrix.solve());
    }

    #[test]
    fn first_solution_stops_early_and_restores() {
        let mut matrix = Matrix::new();
        for column in 0..3 {
            matrix.append_column(column.to_string());
        }
        matrix.append_row("A", &[true, true, true]).unwrap();
        matrix.append_row("B", &[true, false, true]).unwrap();
        matrix.append_row("C", &[false, true, false]).unwrap();
        let before = matrix.as_dense_matrix();

        let first = matrix.first_solution().expect("a cover exists");
        assert!(first == vec!["A"] || first.len() == 2, "first: {first:?}");

        let mut visited = 0;
        let flow = matrix.visit_solutions(|_| {
            visited += 1;
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(1, visited);

        assert_eq!(before, matrix.as_dense_matrix());
        assert_eq!(3, matrix.num_uncovered_columns());
        matrix.check_links();
    }

    #[test]
    fn solving_twice_gives_the_same_covers() {
        let mut matrix = wikipedia_example();
        let first = as_sets(matrix.solve());
        let second = as_sets(matrix.solve());
        assert_eq!(first, second);
    }

    #[test]
    fn solving_with_a_covered_column_skips_it() {
        // Covering "4" by hand removes rows A, B and C from the rest of the
        // matrix; what is left can no longer cover column "1".
        let mut matrix = wikipedia_example();
        matrix.cover_column(3).unwrap();
        assert!(matrix.solve().is_empty());
        matrix.uncover_column(3).unwrap();
        assert_eq!(1, matrix.solve().len());
        matrix.check_links();
    }

    #[test]
    fn choose_column_prefers_fewest_rows() {
        let matrix = wikipedia_example();
        // Column sizes are 2, 2, 2, 3, 2, 2, 4: the first of the twos wins.
        assert_eq!(Some(0), matrix.choose_column());

        let mut matrix = knuth_paper_example();
        matrix.cover_column(0).unwrap();
        // Column "4" loses rows "2" and "4", leaving only "6".
        assert_eq!(Some(3), matrix.choose_column());
    }
}
