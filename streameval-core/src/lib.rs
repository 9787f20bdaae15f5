pub mod config;
pub mod error;
pub mod evaluator;
pub mod flavor;
pub mod metrics;
pub mod model;
pub mod tracker;
pub mod types;

pub mod utils;

pub use types::*;
