pub mod frame;
pub mod jsonl;
pub mod selection;
pub mod source;
pub mod window;

pub use frame::{Frame, FrameRecord, Topology, TrajectoryHeader};
pub use jsonl::{JsonlTrajectoryReader, JsonlTrajectoryWriter};
pub use selection::{SelectedSource, Selection};
pub use source::{FrameSource, InMemoryTrajectory};
pub use window::{FrameWindow, WindowedSource};
