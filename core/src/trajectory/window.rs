use crate::prelude::{RmsfError, RmsfResult};
use crate::trajectory::frame::{Frame, Topology};
use crate::trajectory::source::FrameSource;
use serde::{Deserialize, Serialize};

/// Start/stop/step restriction over frame indices.
///
/// A frame is analysed when `start <= index < stop` and
/// `(index - start) % step == 0`. Without `stop` the window runs to the end
/// of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameWindow {
    pub start: usize,
    pub stop: Option<usize>,
    pub step: usize,
}

impl Default for FrameWindow {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
        }
    }
}

impl FrameWindow {
    pub fn new(start: usize, stop: Option<usize>, step: usize) -> RmsfResult<Self> {
        let window = Self { start, stop, step };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> RmsfResult<()> {
        if self.step == 0 {
            return Err(RmsfError::InvalidWindow("step must be positive".into()));
        }
        if let Some(stop) = self.stop {
            if stop < self.start {
                return Err(RmsfError::InvalidWindow(format!(
                    "stop {} precedes start {}",
                    stop, self.start
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start
            && !self.is_past(index)
            && (index - self.start) % self.step == 0
    }

    /// True once `index` and every later frame fall outside the window.
    pub fn is_past(&self, index: usize) -> bool {
        self.stop.map_or(false, |stop| index >= stop)
    }

    /// Number of frames the window keeps out of a trajectory of `total`.
    pub fn count_within(&self, total: usize) -> usize {
        let end = self.stop.map_or(total, |stop| stop.min(total));
        if end <= self.start || self.step == 0 {
            return 0;
        }
        (end - self.start - 1) / self.step + 1
    }
}

/// Passes through only the frames of `inner` that fall inside a window.
pub struct WindowedSource<S> {
    inner: S,
    window: FrameWindow,
    consumed: usize,
    skipped: usize,
    exhausted: bool,
}

impl<S: FrameSource> WindowedSource<S> {
    pub fn new(inner: S, window: FrameWindow) -> RmsfResult<Self> {
        window.validate()?;
        Ok(Self {
            inner,
            window,
            consumed: 0,
            skipped: 0,
            exhausted: false,
        })
    }

    /// Frames read from `inner` but left out of the window.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn window(&self) -> FrameWindow {
        self.window
    }
}

impl<S: FrameSource> FrameSource for WindowedSource<S> {
    fn topology(&self) -> &Topology {
        self.inner.topology()
    }

    fn n_frames(&self) -> Option<usize> {
        if self.exhausted {
            return Some(0);
        }
        // Frames still in `inner` carry indices consumed..consumed + remaining.
        let remaining = self.inner.n_frames()?;
        Some(
            self.window.count_within(self.consumed + remaining)
                - self.window.count_within(self.consumed),
        )
    }

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>> {
        while !self.exhausted {
            let Some(frame) = self.inner.next_frame()? else {
                self.exhausted = true;
                break;
            };
            self.consumed += 1;

            if self.window.is_past(frame.index) {
                // Stop reading; the source may be unbounded.
                self.exhausted = true;
                self.skipped += 1;
                break;
            }
            if self.window.contains(frame.index) {
                return Ok(Some(frame));
            }
            self.skipped += 1;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::source::InMemoryTrajectory;
    use ndarray::Array2;

    fn trajectory(frames: usize) -> InMemoryTrajectory {
        InMemoryTrajectory::from_positions(
            Topology::anonymous(1),
            (0..frames)
                .map(|i| Array2::from_elem((1, 3), i as f64))
                .collect(),
        )
    }

    fn drain<S: FrameSource>(source: &mut S) -> Vec<usize> {
        let mut indices = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            indices.push(frame.index);
        }
        indices
    }

    #[test]
    fn invalid_windows_are_rejected() {
        assert!(matches!(
            FrameWindow::new(0, None, 0),
            Err(RmsfError::InvalidWindow(_))
        ));
        assert!(matches!(
            FrameWindow::new(5, Some(2), 1),
            Err(RmsfError::InvalidWindow(_))
        ));
        assert!(FrameWindow::new(5, Some(5), 1).is_ok());
    }

    #[test]
    fn window_membership_follows_start_stop_step() {
        let window = FrameWindow::new(2, Some(9), 3).unwrap();
        let kept: Vec<usize> = (0..12).filter(|&i| window.contains(i)).collect();
        assert_eq!(kept, vec![2, 5, 8]);
        assert_eq!(window.count_within(12), 3);
        assert_eq!(window.count_within(6), 2);
        assert_eq!(window.count_within(1), 0);
    }

    #[test]
    fn single_frame_window() {
        let window = FrameWindow::new(5, Some(6), 1).unwrap();
        let mut source = WindowedSource::new(trajectory(10), window).unwrap();
        assert_eq!(source.n_frames(), Some(1));
        assert_eq!(drain(&mut source), vec![5]);
        // Frames 0..=4 skipped, frame 6 read and then reading stops.
        assert_eq!(source.skipped(), 6);
        assert_eq!(source.n_frames(), Some(0));
    }

    #[test]
    fn stepped_window_reports_remaining_frames() {
        let window = FrameWindow::new(1, None, 2).unwrap();
        let mut source = WindowedSource::new(trajectory(8), window).unwrap();
        assert_eq!(source.n_frames(), Some(4));
        source.next_frame().unwrap();
        assert_eq!(source.n_frames(), Some(3));
        assert_eq!(drain(&mut source), vec![3, 5, 7]);
    }

    #[test]
    fn huge_step_keeps_only_the_start_frame() {
        let window = FrameWindow::new(0, None, usize::MAX).unwrap();
        assert_eq!(window.count_within(usize::MAX), 1);

        let mut source = WindowedSource::new(trajectory(4), window).unwrap();
        assert_eq!(source.n_frames(), Some(1));
        assert_eq!(drain(&mut source), vec![0]);
        assert_eq!(source.skipped(), 3);
    }

    #[test]
    fn default_window_passes_everything() {
        let mut source = WindowedSource::new(trajectory(3), FrameWindow::default()).unwrap();
        assert_eq!(drain(&mut source), vec![0, 1, 2]);
        assert_eq!(source.skipped(), 0);
    }
}
