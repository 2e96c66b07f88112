// Business domains
pub mod heat_map;
pub mod locations;
pub mod reports;
