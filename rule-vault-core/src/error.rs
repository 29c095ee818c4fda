//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid policy line {line}: {reason}")]
    InvalidPolicyLine { line: usize, reason: String },
}
