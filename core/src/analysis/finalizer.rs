use crate::prelude::{RmsfError, RmsfResult};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Per-particle RMSF values and the number of frames behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct RmsfProfile {
    rmsf: Array1<f64>,
    n_frames: usize,
}

impl RmsfProfile {
    pub fn rmsf(&self) -> ArrayView1<'_, f64> {
        self.rmsf.view()
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn len(&self) -> usize {
        self.rmsf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rmsf.is_empty()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.rmsf.to_vec()
    }
}

pub struct RmsfFinalizer;

impl RmsfFinalizer {
    /// Sums each particle's per-axis squares, divides by the frame count and
    /// takes the root.
    ///
    /// A zero frame count yields zeros. A negative or NaN mean square can
    /// only come from overflow or underflow during accumulation and aborts
    /// with [`RmsfError::NumericalFault`].
    pub fn finalize(
        sum_squares: ArrayView2<f64>,
        total_frame_count: usize,
    ) -> RmsfResult<RmsfProfile> {
        if sum_squares.ncols() != 3 {
            return Err(RmsfError::ShapeMismatch {
                expected: (sum_squares.nrows(), 3),
                found: sum_squares.dim(),
            });
        }

        if total_frame_count == 0 {
            return Ok(RmsfProfile {
                rmsf: Array1::zeros(sum_squares.nrows()),
                n_frames: 0,
            });
        }

        let frames = total_frame_count as f64;
        let mut rmsf = Array1::<f64>::zeros(sum_squares.nrows());
        for (particle, (row, out)) in sum_squares
            .axis_iter(Axis(0))
            .zip(rmsf.iter_mut())
            .enumerate()
        {
            let mean_square = (row[0] + row[1] + row[2]) / frames;
            // Written so that NaN fails too.
            if !(mean_square >= 0.0) {
                return Err(RmsfError::NumericalFault {
                    particle,
                    value: mean_square,
                });
            }
            *out = mean_square.sqrt();
        }

        Ok(RmsfProfile {
            rmsf,
            n_frames: total_frame_count,
        })
    }
}
