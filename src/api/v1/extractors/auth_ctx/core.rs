use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::IdentityClaim;

/// Handler で、検証済みの IdentityClaim を受け取るための extractor
/// middleware が IdentityClaim を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (ミドルウェア未設定でも fail closed)
#[derive(Debug, Clone)]
pub struct AuthCtx(pub IdentityClaim);

impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityClaim>()
            .cloned()
            .map(AuthCtx)
            .ok_or(AppError::Unauthorized)
    }
}
