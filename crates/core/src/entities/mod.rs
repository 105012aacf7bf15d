pub mod entities_model;

pub use entities_model::*;
