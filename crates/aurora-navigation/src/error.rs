//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Could not read history: {0}")]
    PersistenceRead(#[source] aurora_storage::StorageError),

    #[error("Could not write history: {0}")]
    PersistenceWrite(#[source] aurora_storage::StorageError),
}
