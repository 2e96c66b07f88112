// Shelter Heat Map - API Core
//
// Aggregates lost, found and abuse reports into a per-location heat map of
// Lipa City for the shelter admin dashboard, with live updates over SSE.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
