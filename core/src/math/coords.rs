use ndarray::{Array2, ArrayView2, Axis};

pub struct CoordsHelper;

impl CoordsHelper {
    /// Builds an N×3 coordinate table from `[x, y, z]` rows.
    pub fn from_rows(rows: &[[f64; 3]]) -> Array2<f64> {
        let mut table = Array2::zeros((rows.len(), 3));
        for (mut dst, src) in table.rows_mut().into_iter().zip(rows) {
            dst[0] = src[0];
            dst[1] = src[1];
            dst[2] = src[2];
        }
        table
    }

    pub fn to_rows(table: ArrayView2<f64>) -> Vec<[f64; 3]> {
        table
            .rows()
            .into_iter()
            .map(|row| [row[0], row[1], row[2]])
            .collect()
    }

    /// Copies the given particle rows, in the given order.
    pub fn gather(table: ArrayView2<f64>, indices: &[usize]) -> Array2<f64> {
        table.select(Axis(0), indices)
    }
}
