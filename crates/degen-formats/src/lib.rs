pub mod samples;
pub mod table;

use degen_core::DegenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Engine(#[from] DegenError),
}
