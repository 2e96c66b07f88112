// HTTP routes
pub mod districts;
pub mod health;
pub mod heat_map;
pub mod stream;

pub use districts::*;
pub use health::*;
pub use heat_map::*;
pub use stream::*;
