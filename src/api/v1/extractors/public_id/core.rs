/*
 * Responsibility
 * - Path の公開 ID (sqids) を受け、復号した内部 ID とリソース種別を handler に渡す
 * - 復号できない ID は 400 (INVALID_PUBLIC_ID)。存在確認 (404) は handler 側
 * 置かないもの
 *  - Post / Comment / Task といった具体リソース名 (types.rs 側)
 */
use std::marker::PhantomData;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::repos::ResourceKind;
use crate::state::AppState;

/// Tag types name the resource a public id belongs to.
pub trait IdKind: Send + Sync + 'static {
    const KIND: ResourceKind;
}

pub struct PublicId<T> {
    pub id: i64,
    _kind: PhantomData<fn() -> T>,
}

impl<T: IdKind> PublicId<T> {
    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }
}

impl<T> Clone for PublicId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PublicId<T> {}

impl<T: IdKind> FromRequestParts<AppState> for PublicId<T> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_PUBLIC_ID", "invalid id"))?;

        let id = state.id_codec.decode(&raw).inspect_err(|e| {
            tracing::debug!(kind = %T::KIND, public_id = %raw, error = %e, "public id rejected");
        })?;

        Ok(Self {
            id,
            _kind: PhantomData,
        })
    }
}

impl<T: IdKind> std::fmt::Debug for PublicId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicId")
            .field("kind", &T::KIND)
            .field("id", &self.id)
            .finish()
    }
}
