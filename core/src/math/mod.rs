pub mod coords;
pub mod precision;
pub mod stats;

pub use coords::CoordsHelper;
pub use precision::check_float_environment;
pub use stats::StatsHelper;
