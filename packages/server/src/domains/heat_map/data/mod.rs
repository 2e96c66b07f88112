pub mod heat_map_view;

pub use heat_map_view::*;
