pub mod config;
pub mod error;
pub mod types;

pub use config::CuasConfig;
pub use error::{CuasError, Result};
pub use types::*;
