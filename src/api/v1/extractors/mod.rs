pub mod auth_ctx;
pub mod body;
pub mod public_id;

pub use auth_ctx::AuthCtx;
pub use body::{ApiJson, ApiQuery};
