//! Aurora Storage Layer
//!
//! Whole-file JSON persistence for browser state.
//! Writes replace the target file atomically.

mod error;
mod file;

pub use error::StorageError;
pub use file::JsonFile;

pub type Result<T> = std::result::Result<T, StorageError>;
