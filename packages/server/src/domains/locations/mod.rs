pub mod models;
pub mod resolver;

pub use models::{DistrictEntry, DistrictTable};
pub use resolver::{LocationMatch, LocationResolver, ResolvedCoordinate};
