use crate::analysis::finalizer::{RmsfFinalizer, RmsfProfile};
use crate::math::precision::check_float_environment;
use crate::prelude::{RmsfError, RmsfResult};
use ndarray::{Array2, ArrayView2, Zip};

/// Running per-particle, per-axis mean and weighted sum of squared deviations.
///
/// For the frame with zero-based index `k`:
///
/// ```text
/// delta        = x - mean
/// sum_squares += k / (k + 1) * delta^2
/// mean         = (k * mean + x) / (k + 1)
/// ```
///
/// The square update must see the mean of the previous `k` frames, so it
/// runs before the mean is advanced. Axes are summed only at finalization.
#[derive(Debug, Clone)]
pub struct FrameAccumulator {
    mean: Array2<f64>,
    sum_squares: Array2<f64>,
    frame_index: Option<usize>,
}

impl FrameAccumulator {
    pub fn new(particle_count: usize) -> RmsfResult<Self> {
        if particle_count == 0 {
            return Err(RmsfError::InvalidParticleCount(particle_count));
        }
        check_float_environment()?;

        Ok(Self {
            mean: Array2::zeros((particle_count, 3)),
            sum_squares: Array2::zeros((particle_count, 3)),
            frame_index: None,
        })
    }

    /// Folds the snapshot of frame `k` into the running statistics.
    ///
    /// `k` must be 0 on the first call and grow by one on every call after
    /// that. The state is left untouched when validation fails.
    pub fn update(&mut self, positions: ArrayView2<f64>, k: usize) -> RmsfResult<()> {
        let expected_shape = self.mean.dim();
        if positions.dim() != expected_shape {
            return Err(RmsfError::ShapeMismatch {
                expected: expected_shape,
                found: positions.dim(),
            });
        }

        let expected_index = self.next_index();
        if k != expected_index {
            return Err(RmsfError::FrameIndexOrderViolation {
                expected: expected_index,
                found: k,
            });
        }

        let kf = k as f64;
        let weight = kf / (kf + 1.0);
        Zip::from(&mut self.sum_squares)
            .and(&mut self.mean)
            .and(&positions)
            .for_each(|sum_squares, mean, &x| {
                let delta = x - *mean;
                *sum_squares += weight * delta * delta;
                *mean = (kf * *mean + x) / (kf + 1.0);
            });

        self.frame_index = Some(k);
        Ok(())
    }

    pub fn particle_count(&self) -> usize {
        self.mean.nrows()
    }

    /// Index of the last processed frame, `None` before the first update.
    pub fn frame_index(&self) -> Option<usize> {
        self.frame_index
    }

    pub fn frames_seen(&self) -> usize {
        self.frame_index.map_or(0, |k| k + 1)
    }

    pub fn next_index(&self) -> usize {
        self.frames_seen()
    }

    pub fn mean(&self) -> ArrayView2<'_, f64> {
        self.mean.view()
    }

    pub fn sum_squares(&self) -> ArrayView2<'_, f64> {
        self.sum_squares.view()
    }

    /// Consumes the accumulator and derives the per-particle RMSF.
    pub fn finalize(self) -> RmsfResult<RmsfProfile> {
        RmsfFinalizer::finalize(self.sum_squares.view(), self.frames_seen())
    }
}
