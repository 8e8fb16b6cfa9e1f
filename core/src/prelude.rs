use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Shared configuration handed to an analysis stage before the first frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub particle_count: usize,
    /// Frames the driver expects to feed, when known; used for progress only.
    #[serde(default)]
    pub total_frames: Option<usize>,
    #[serde(default)]
    pub verbose: bool,
}

/// One coordinate snapshot handed to a stage by the driver loop.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub positions: ArrayView2<'a, f64>,
    /// Index of the frame in the underlying trajectory, not the processed count.
    pub frame_index: usize,
    pub time: Option<f64>,
}

/// Common error type for the accumulator, finalizer and trajectory plumbing.
#[derive(thiserror::Error, Debug)]
pub enum RmsfError {
    #[error("invalid particle count: {0}")]
    InvalidParticleCount(usize),
    #[error("frame index out of order: expected {expected}, found {found}")]
    FrameIndexOrderViolation { expected: usize, found: usize },
    #[error("snapshot shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("negative mean square fluctuation {value} for particle {particle}; overflow or underflow occurred")]
    NumericalFault { particle: usize, value: f64 },
    #[error("unsupported floating-point environment: {0}")]
    FloatEnvironment(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("invalid frame window: {0}")]
    InvalidWindow(String),
    #[error("malformed trajectory: {0}")]
    Trajectory(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type RmsfResult<T> = Result<T, RmsfError>;

/// Lifecycle contract for per-frame trajectory analyses.
///
/// The driver calls `prepare` once, `process_frame` once per frame in
/// trajectory order, and `conclude` once after the last frame.
pub trait AnalysisStage {
    type Output;

    fn prepare(&mut self, config: &AnalysisConfig) -> RmsfResult<()>;
    fn process_frame(&mut self, frame: FrameInput<'_>) -> RmsfResult<()>;
    fn conclude(&mut self) -> RmsfResult<Self::Output>;
}
