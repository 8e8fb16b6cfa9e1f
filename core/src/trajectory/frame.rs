use crate::math::coords::CoordsHelper;
use crate::prelude::FrameInput;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Ordered particle names of a trajectory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Topology {
    names: Vec<String>,
}

impl Topology {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Topology of `count` particles named `P0`, `P1`, ...
    pub fn anonymous(count: usize) -> Self {
        Self {
            names: (0..count).map(|i| format!("P{}", i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Topology restricted to `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            names: indices
                .iter()
                .filter_map(|&i| self.names.get(i).cloned())
                .collect(),
        }
    }
}

/// One coordinate snapshot pulled from a frame source.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position of the frame in its trajectory.
    pub index: usize,
    pub time: Option<f64>,
    pub positions: Array2<f64>,
}

impl Frame {
    pub fn new(index: usize, time: Option<f64>, positions: Array2<f64>) -> Self {
        Self {
            index,
            time,
            positions,
        }
    }

    pub fn particle_count(&self) -> usize {
        self.positions.nrows()
    }

    pub fn input(&self) -> FrameInput<'_> {
        FrameInput {
            positions: self.positions.view(),
            frame_index: self.index,
            time: self.time,
        }
    }
}

/// First line of a JSON Lines trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryHeader {
    pub particles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_frames: Option<usize>,
}

/// Every following line of a JSON Lines trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    pub positions: Vec<[f64; 3]>,
}

impl FrameRecord {
    pub fn into_frame(self, index: usize) -> Frame {
        Frame::new(index, self.time, CoordsHelper::from_rows(&self.positions))
    }
}
