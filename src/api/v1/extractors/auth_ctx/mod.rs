/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - access guard が検証済みの IdentityClaim を handler に提供する
 * - 型 (IdentityClaim) は services::auth 側、HTTP / axum 依存は core に閉じ込める
 */

mod core;

pub use core::AuthCtx;
