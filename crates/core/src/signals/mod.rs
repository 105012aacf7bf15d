pub mod classifier;
pub mod signals_model;

pub use classifier::{classify, stance};
pub use signals_model::*;
