/*
 * Responsibility
 * - /posts 系 CRUD handler + like の切り替え
 * - Path の {id} は公開 ID → extractor で復号化して内部 ID に変換して受け取る
 * - 作成者は AuthCtx の subject。request body からは受け取らない
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            pagination::ListQuery,
            posts::{CreatePostRequest, LikeResponse, PostBody, PostResponse, UpdatePostRequest},
        },
        extractors::{ApiJson, ApiQuery, AuthCtx, public_id::PublicPostId},
        handlers::guard::{decode_body, encode_body, load_for_mutation},
    },
    error::AppError,
    repos::{Document, NewDocument, ResourceKind},
    state::AppState,
};

fn doc_to_response(state: &AppState, doc: Document) -> Result<PostResponse, AppError> {
    let body: PostBody = decode_body(&doc)?;

    Ok(PostResponse {
        id: state.id_codec.encode(doc.id)?,
        title: body.title,
        content: body.content,
        category: body.category,
        tags: body.tags,
        author_id: doc.owner_id,
        like_count: body.likes.len(),
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    })
}

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<ListQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let docs = state
        .documents
        .list(ResourceKind::Post, None, page.limit(), page.offset())
        .await?;

    let mut res = Vec::with_capacity(docs.len());
    for doc in docs {
        res.push(doc_to_response(&state, doc)?);
    }

    Ok(Json(res))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let doc = state
        .documents
        .insert(NewDocument {
            kind: ResourceKind::Post,
            owner_id: claim.subject_id,
            parent_id: None,
            body: encode_body(&req.into_body())?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(doc_to_response(&state, doc)?)))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PublicPostId,
) -> Result<Json<PostResponse>, AppError> {
    let doc = state
        .documents
        .get(post_id.kind(), post_id.id)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(doc_to_response(&state, doc)?))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    post_id: PublicPostId,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    // 404 / 403 before looking at the payload
    let doc = load_for_mutation(&state, post_id.kind(), post_id.id, &claim, "post").await?;

    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let mut body: PostBody = decode_body(&doc)?;
    req.apply(&mut body);

    let doc = state
        .documents
        .replace_body(ResourceKind::Post, doc.id, encode_body(&body)?)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(doc_to_response(&state, doc)?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    post_id: PublicPostId,
) -> Result<StatusCode, AppError> {
    let doc = load_for_mutation(&state, post_id.kind(), post_id.id, &claim, "post").await?;

    if state.documents.delete(ResourceKind::Post, doc.id).await? {
        tracing::info!(subject_id = %claim.subject_id, document_id = doc.id, "post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post"))
    }
}

// Any authenticated subject may like a post; no ownership check.
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    post_id: PublicPostId,
) -> Result<Json<LikeResponse>, AppError> {
    let (liked, like_count) = state
        .documents
        .toggle_member(
            post_id.kind(),
            post_id.id,
            "likes",
            &claim.subject_id.to_string(),
        )
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(LikeResponse { liked, like_count }))
}
