pub mod heat_map_point;
pub mod intensity;

pub use heat_map_point::*;
pub use intensity::*;
