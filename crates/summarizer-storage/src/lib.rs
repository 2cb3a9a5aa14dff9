pub mod accounts;
pub mod connection;
pub mod error;
pub mod submissions;

pub use accounts::AccountStore;
pub use connection::SqliteStorage;
pub use error::{StorageError, StorageResult};
pub use submissions::SubmissionStore;
