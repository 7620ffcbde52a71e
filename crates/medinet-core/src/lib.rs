pub mod config;
pub mod error;
pub mod types;

pub use config::MedinetConfig;
pub use error::{MedinetError, Result};
pub use types::*;
