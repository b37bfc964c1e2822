//! Document and configuration parsing.

pub mod config;
pub mod error;
pub mod value;

pub use config::{Distances, ExpandConfig, SheetDistances, StackConfig};
pub use error::Error;
pub use value::Value;
