pub mod accumulator;
pub mod finalizer;
pub mod rmsf;

pub use accumulator::FrameAccumulator;
pub use finalizer::{RmsfFinalizer, RmsfProfile};
pub use rmsf::RmsfAnalysis;
