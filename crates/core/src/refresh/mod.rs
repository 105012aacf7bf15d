pub mod pipeline;
pub mod refresh_model;
pub mod refresh_service;
pub mod refresh_traits;

#[cfg(test)]
mod refresh_service_tests;

pub use pipeline::ValuationPipeline;
pub use refresh_model::*;
pub use refresh_service::RefreshCache;
pub use refresh_traits::SnapshotSource;
