//! Domain layer: core entities with no framework dependencies.

pub mod transaction;
pub mod upload;

pub use transaction::Transaction;
pub use upload::UploadedFile;
