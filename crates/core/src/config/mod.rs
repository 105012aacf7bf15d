pub mod config_model;
mod defaults;

pub use config_model::DashboardConfig;
pub use defaults::default_entities;
