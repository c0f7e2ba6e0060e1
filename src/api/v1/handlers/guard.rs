/*
 * Responsibility
 * - 更新・削除系 handler の共通手順: 存在確認 (404) → ownership gate (403)
 * - documents.body <-> DTO の変換失敗はサーバー側の問題なので 500
 */
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::AppError;
use crate::repos::{Document, ResourceKind};
use crate::services::auth::{IdentityClaim, authorize};
use crate::state::AppState;

/// Load a document and make sure `claim` may mutate it.
///
/// Existence is checked first, so a missing resource is 404 for everyone.
pub(crate) async fn load_for_mutation(
    state: &AppState,
    kind: ResourceKind,
    id: i64,
    claim: &IdentityClaim,
    resource: &'static str,
) -> Result<Document, AppError> {
    let doc = state
        .documents
        .get(kind, id)
        .await?
        .ok_or(AppError::not_found(resource))?;

    authorize(Some(claim), doc.owner_id.as_ref())
        .into_result()
        .inspect_err(|_| {
            tracing::warn!(
                subject_id = %claim.subject_id,
                role = %claim.role,
                kind = %kind,
                document_id = doc.id,
                "ownership check denied mutation"
            );
        })?;

    Ok(doc)
}

pub(crate) fn decode_body<T: DeserializeOwned>(doc: &Document) -> Result<T, AppError> {
    serde_json::from_value(doc.body.clone()).map_err(|e| {
        tracing::error!(error = %e, kind = %doc.kind, document_id = doc.id, "stored body does not decode");
        AppError::Internal
    })
}

pub(crate) fn encode_body<T: Serialize>(body: &T) -> Result<Value, AppError> {
    serde_json::to_value(body).map_err(|e| {
        tracing::error!(error = %e, "failed to encode document body");
        AppError::Internal
    })
}
