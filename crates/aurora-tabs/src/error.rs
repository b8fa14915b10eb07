//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Tab registry is empty")]
    EmptyRegistry,

    #[error("Invalid load state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
