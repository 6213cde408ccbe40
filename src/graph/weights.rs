use ndarray::{Array2, Axis};

/// Name of the population series (always column 0).
pub(crate) const POPULATION: &str = "population";

/// Integer node weights stored as a dense (rows, series) matrix.
/// Column 0 holds population; the remaining columns hold one vote count per party.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WeightMatrix {
    series: Vec<String>,
    values: Array2<i64>,
}

impl WeightMatrix {
    /// Construct a matrix from row-major values. Every row must have one entry per series.
    pub(crate) fn new(series: Vec<String>, rows: &[Vec<i64>]) -> Self {
        let mut values = Array2::<i64>::zeros((rows.len(), series.len()));
        for (i, row) in rows.iter().enumerate() {
            assert!(row.len() == series.len(), "rows[{i}].len() must equal series.len()");
            values.row_mut(i).iter_mut().zip(row).for_each(|(dst, &src)| *dst = src);
        }
        Self { series, values }
    }

    /// Zero matrix with the same series and `num_rows` rows.
    pub(crate) fn copy_of_size(&self, num_rows: usize) -> Self {
        Self {
            series: self.series.clone(),
            values: Array2::<i64>::zeros((num_rows, self.series.len())),
        }
    }

    #[inline] pub(crate) fn num_rows(&self) -> usize { self.values.nrows() }

    #[inline] pub(crate) fn series(&self) -> &[String] { &self.series }

    /// Column index of a named series.
    pub(crate) fn index_of(&self, series: &str) -> Option<usize> {
        self.series.iter().position(|s| s == series)
    }

    #[inline] pub(crate) fn get(&self, row: usize, col: usize) -> i64 { self.values[[row, col]] }

    /// Column sums over all rows.
    pub(crate) fn totals(&self) -> Vec<i64> {
        self.values.sum_axis(Axis(0)).to_vec()
    }

    /// Keep only the given rows, in the given order.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        Self { series: self.series.clone(), values: self.values.select(Axis(0), rows) }
    }

    /// Add `other[other_row]` into `self[row]`.
    #[inline]
    pub(crate) fn add_row_from(&mut self, row: usize, other: &WeightMatrix, other_row: usize) {
        self.values.row_mut(row).scaled_add(1, &other.values.row(other_row));
    }

    /// Subtract `other[other_row]` from `self[row]`.
    #[inline]
    pub(crate) fn subtract_row_from(&mut self, row: usize, other: &WeightMatrix, other_row: usize) {
        self.values.row_mut(row).scaled_add(-1, &other.values.row(other_row));
    }

    /// Overwrite `self[row]` with the column sums of `other`.
    pub(crate) fn set_row_to_sum_of(&mut self, row: usize, other: &WeightMatrix) {
        self.values.row_mut(row).assign(&other.values.sum_axis(Axis(0)));
    }
}
