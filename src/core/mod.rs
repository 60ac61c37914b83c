pub mod config;
pub mod error;
pub mod types;

pub use config::FireworksConfig;
pub use error::{FireworksError, Result};
pub use types::*;
