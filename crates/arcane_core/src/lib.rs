pub mod bucket;
pub mod core_api;
pub mod snapshot;
pub mod stats;
