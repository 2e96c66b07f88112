pub mod district;
pub mod lipa_city;

pub use district::*;
pub use lipa_city::*;
