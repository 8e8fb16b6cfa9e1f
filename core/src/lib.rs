//! Streaming per-particle RMSF for the Rust RMSF toolkit.
//!
//! The accumulator keeps a running mean and a running weighted sum of
//! squared deviations per particle and axis (Welford's recurrence), so a
//! trajectory is analysed in one pass without retaining past frames.
//! Trajectory reading, particle selection and frame windows live beside the
//! core as frame sources that any driver loop can compose.

pub mod analysis;
pub mod math;
pub mod prelude;
pub mod telemetry;
pub mod trajectory;

pub use analysis::{FrameAccumulator, RmsfAnalysis, RmsfFinalizer, RmsfProfile};
pub use prelude::{AnalysisConfig, AnalysisStage, FrameInput, RmsfError, RmsfResult};
