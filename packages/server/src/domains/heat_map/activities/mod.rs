pub mod compute_snapshot;
pub mod statistics;

pub use compute_snapshot::*;
pub use statistics::*;
