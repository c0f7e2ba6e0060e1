/**
 * Responsibility
 *  - 公開 ID extractor の入口。handler からは PublicPostId などの alias だけを使う
 */
mod core;
mod types;

pub use core::{IdKind, PublicId};
pub use types::*;
