pub mod document_repo;
pub mod error;
pub mod memory;
pub mod user_repo;

pub use document_repo::{Document, DocumentStore, NewDocument, PgDocumentStore, ResourceKind};
pub use memory::{MemoryDocumentStore, MemoryUserDirectory};
pub use user_repo::{NewUser, PgUserDirectory, UserDirectory, UserRecord};
