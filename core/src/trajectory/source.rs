use crate::prelude::RmsfResult;
use crate::trajectory::frame::{Frame, Topology};
use ndarray::Array2;
use std::collections::VecDeque;

/// Supplies coordinate snapshots one at a time, in trajectory order.
pub trait FrameSource {
    fn topology(&self) -> &Topology;

    /// Frames still to come, when the source knows it.
    fn n_frames(&self) -> Option<usize>;

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>>;

    fn particle_count(&self) -> usize {
        self.topology().len()
    }
}

/// Frame source backed by frames already in memory.
pub struct InMemoryTrajectory {
    topology: Topology,
    frames: VecDeque<Frame>,
}

impl InMemoryTrajectory {
    pub fn new(topology: Topology, frames: Vec<Frame>) -> Self {
        Self {
            topology,
            frames: frames.into(),
        }
    }

    /// Indexes `positions` from zero, without times.
    pub fn from_positions(topology: Topology, positions: Vec<Array2<f64>>) -> Self {
        let frames = positions
            .into_iter()
            .enumerate()
            .map(|(index, positions)| Frame::new(index, None, positions))
            .collect();
        Self::new(topology, frames)
    }
}

impl FrameSource for InMemoryTrajectory {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn n_frames(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>> {
        Ok(self.frames.pop_front())
    }
}
