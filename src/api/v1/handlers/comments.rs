/*
 * Responsibility
 * - /posts/{id}/comments (一覧・作成) と /comments/{id} (削除)
 * - 作成前に親 post の存在を確認する (無ければ 404)
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            comments::{CommentBody, CommentResponse, CreateCommentRequest},
            pagination::ListQuery,
        },
        extractors::{
            ApiJson, ApiQuery, AuthCtx,
            public_id::{PublicCommentId, PublicPostId},
        },
        handlers::guard::{decode_body, encode_body, load_for_mutation},
    },
    error::AppError,
    repos::{Document, NewDocument, ResourceKind},
    state::AppState,
};

fn doc_to_response(state: &AppState, doc: Document) -> Result<CommentResponse, AppError> {
    let body: CommentBody = decode_body(&doc)?;
    let post_id = doc.parent_id.ok_or_else(|| {
        tracing::error!(document_id = doc.id, "comment without parent post");
        AppError::Internal
    })?;

    Ok(CommentResponse {
        id: state.id_codec.encode(doc.id)?,
        post_id: state.id_codec.encode(post_id)?,
        content: body.content,
        author_id: doc.owner_id,
        created_at: doc.created_at,
    })
}

async fn ensure_post_exists(state: &AppState, post_id: i64) -> Result<(), AppError> {
    state
        .documents
        .get(ResourceKind::Post, post_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::not_found("post"))
}

pub async fn list_comments(
    State(state): State<AppState>,
    post_id: PublicPostId,
    ApiQuery(page): ApiQuery<ListQuery>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    ensure_post_exists(&state, post_id.id).await?;

    let docs = state
        .documents
        .list(
            ResourceKind::Comment,
            Some(post_id.id),
            page.limit(),
            page.offset(),
        )
        .await?;

    let mut res = Vec::with_capacity(docs.len());
    for doc in docs {
        res.push(doc_to_response(&state, doc)?);
    }

    Ok(Json(res))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    post_id: PublicPostId,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    ensure_post_exists(&state, post_id.id).await?;

    let doc = state
        .documents
        .insert(NewDocument {
            kind: ResourceKind::Comment,
            owner_id: claim.subject_id,
            parent_id: Some(post_id.id),
            body: encode_body(&CommentBody {
                content: req.content,
            })?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(doc_to_response(&state, doc)?)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    comment_id: PublicCommentId,
) -> Result<StatusCode, AppError> {
    let doc =
        load_for_mutation(&state, comment_id.kind(), comment_id.id, &claim, "comment").await?;

    if state.documents.delete(ResourceKind::Comment, doc.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("comment"))
    }
}
