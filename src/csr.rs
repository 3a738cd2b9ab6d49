use crate::solution::{Label, UnsignedInt, Weight};
use anyhow::{anyhow as anyhow_error, ensure, Result};
use tracing::trace;

/// Compressed sparse row storage of X -> Y arcs.
///
/// Rows are X positions, columns are Y positions. Rows are appended in order, a row may be empty.
#[derive(Debug, Clone)]
pub struct CsrStorage<I: UnsignedInt> {
    num_rows: I,
    num_cols: I,
    // i_starts_stops[i]..i_starts_stops[i + 1] spans the arcs of row i
    i_starts_stops: Vec<I>,
    j_counts: Vec<I>,
    column_indices: Vec<I>,
    values: Vec<Label>,
}

impl<I: UnsignedInt> CsrStorage<I> {
    pub fn with_capacity(row_capacity: usize, arcs_capacity: usize) -> Self {
        Self {
            num_rows: I::zero(),
            num_cols: I::zero(),
            i_starts_stops: Vec::with_capacity(row_capacity + 1),
            j_counts: Vec::with_capacity(row_capacity),
            column_indices: Vec::with_capacity(arcs_capacity),
            values: Vec::with_capacity(arcs_capacity),
        }
    }

    pub fn init(&mut self, num_rows: I, num_cols: I) -> Result<(), anyhow::Error> {
        ensure!(num_rows < I::max_value() && num_cols < I::max_value());
        self.num_rows = num_rows;
        self.num_cols = num_cols;

        self.i_starts_stops.clear();
        self.i_starts_stops.push(I::zero());
        self.j_counts.clear();

        self.column_indices.clear();
        self.values.clear();
        Ok(())
    }

    #[inline]
    pub fn num_rows(&self) -> I {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> I {
        self.num_cols
    }

    #[inline]
    pub fn num_of_arcs(&self) -> usize {
        self.column_indices.len()
    }

    /// Opens empty rows up to and including `row`.
    fn advance_to(&mut self, row: I) -> Result<(), anyhow::Error> {
        let row_usize: usize = row.as_();
        ensure!(row < self.num_rows, "row {} is out of range", row);
        ensure!(
            row_usize + 1 >= self.j_counts.len(),
            "row {} was already closed",
            row
        );
        while self.j_counts.len() <= row_usize {
            let offset = *self.i_starts_stops.last().unwrap_or(&I::zero());
            self.i_starts_stops.push(offset);
            self.j_counts.push(I::zero());
        }
        Ok(())
    }

    #[inline]
    pub fn add_value(&mut self, row: I, column: I, value: Weight) -> Result<(), anyhow::Error> {
        ensure!(column < self.num_cols, "column {} is out of range", column);
        self.advance_to(row)?;
        let row_usize: usize = row.as_();

        let cumulative_offset = self.i_starts_stops[row_usize + 1]
            .checked_add(&I::one())
            .filter(|offset| *offset < I::max_value())
            .ok_or_else(|| {
                anyhow_error!("i_starts_stops vector is longer then max value of type")
            })?;
        self.i_starts_stops[row_usize + 1] = cumulative_offset;
        self.j_counts[row_usize] += I::one();

        self.column_indices.push(column);
        self.values.push(Label::from(value));
        Ok(())
    }

    #[inline]
    pub fn extend_from_values(
        &mut self,
        row: I,
        columns: &[I],
        values: &[Weight],
    ) -> Result<(), anyhow::Error> {
        ensure!(columns.len() == values.len());
        ensure!(
            columns.iter().all(|j_ref| *j_ref < self.num_cols),
            "column is out of range"
        );
        self.advance_to(row)?;
        let row_usize: usize = row.as_();

        let length_increment = I::from_usize(columns.len())
            .ok_or_else(|| anyhow_error!(" columns slice is longer then max value of type"))?;
        let cumulative_offset = self.i_starts_stops[row_usize + 1]
            .checked_add(&length_increment)
            .filter(|offset| *offset < I::max_value())
            .ok_or_else(|| {
                anyhow_error!("i_starts_stops vector is longer then max value of type")
            })?;
        self.i_starts_stops[row_usize + 1] = cumulative_offset;
        self.j_counts[row_usize] += length_increment;

        self.column_indices.extend_from_slice(columns);
        self.values
            .extend(values.iter().map(|v_ref| Label::from(*v_ref)));
        Ok(())
    }

    /// Closes the trailing empty rows.
    pub fn finish(&mut self) -> Result<(), anyhow::Error> {
        if self.num_rows > I::zero() {
            self.advance_to(self.num_rows - I::one())?;
        }
        Ok(())
    }

    /// Arcs of row `i` as `(column, value)` pairs
    #[inline]
    pub fn row(&self, i: I) -> impl Iterator<Item = (I, Label)> + '_ {
        let i_usize: usize = i.as_();
        let start: usize = self.i_starts_stops[i_usize].as_();
        let stop: usize = self.i_starts_stops[i_usize + 1].as_();
        self.column_indices[start..stop]
            .iter()
            .copied()
            .zip(self.values[start..stop].iter().copied())
    }

    /// Weight of arc `(i, j)`, the largest one if the arc is repeated.
    pub fn weight(&self, i: I, j: I) -> Option<Label> {
        self.row(i)
            .filter(|(l, _)| *l == j)
            .map(|(_, value)| value)
            .max()
    }

    pub fn negate_values(&mut self) {
        self.values.iter_mut().for_each(|v_ref| *v_ref = -*v_ref);
    }

    pub fn validate_input(&self) -> Result<(), anyhow::Error> {
        let num_rows: usize = self.num_rows.as_();
        ensure!(self.j_counts.len() == num_rows, "rows are not finished");
        ensure!(self.i_starts_stops.len() == num_rows + 1);
        let arcs_count = self.num_of_arcs();
        ensure!(arcs_count < I::max_value().as_());
        ensure!(
            arcs_count == self.column_indices.len()
                && self.column_indices.len() == self.values.len()
        );
        debug_assert!(self
            .column_indices
            .iter()
            .all(|j_ref| *j_ref < self.num_cols));
        Ok(())
    }

    /// Returns objective value of the assignment, unmatched rows are skipped.
    pub fn get_objective(&self, row_to_column: &[I]) -> Label {
        let mut obj = 0;
        for i in num_iter::range(I::zero(), self.num_rows) {
            let j = row_to_column[i.as_()];
            if j == I::max_value() {
                continue;
            }
            obj += self.weight(i, j).unwrap_or(0);
        }
        obj
    }

    /// Returns True if every arc satisfies l(x) + l(y) >= w(x, y)
    pub fn is_feasible(&self, row_labels: &[Label], col_labels: &[Label]) -> bool {
        for i in num_iter::range(I::zero(), self.num_rows) {
            let i_usize: usize = i.as_();
            for (j, value) in self.row(i) {
                if row_labels[i_usize] + col_labels[j.as_()] < value {
                    trace!("arc ({}, {}) violates feasibility", i, j);
                    return false;
                }
            }
        }
        true
    }

    /// Returns True if every matched arc is tight: l(x) + l(y) = w(x, y)
    pub fn cs_satisfied(
        &self,
        row_to_column: &[I],
        row_labels: &[Label],
        col_labels: &[Label],
    ) -> bool {
        for i in num_iter::range(I::zero(), self.num_rows) {
            let i_usize: usize = i.as_();
            let j = row_to_column[i_usize];
            if j == I::max_value() {
                continue;
            }
            match self.weight(i, j) {
                Some(value) if row_labels[i_usize] + col_labels[j.as_()] == value => {}
                _ => {
                    trace!("CS CONDITION is not met for ({}, {})", i, j);
                    return false;
                }
            }
        }
        trace!("CS CONDITION met");
        true
    }
}
