// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid {name} window: {value} (must be at least 1)")]
    InvalidWindow { name: &'static str, value: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
