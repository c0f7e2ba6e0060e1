pub mod memory;
pub mod store;
pub mod valkey;

pub use memory::MemoryRevocationStore;
pub use store::{RevocationError, RevocationStore};
pub use valkey::ValkeyRevocationStore;
