/*
 * Responsibility
 * - /tasks 系 CRUD handler (一覧・参照も認証必須)
 * - 更新・削除は作成者 (created_by) か admin のみ
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
            tasks::{CreateTaskRequest, TaskBody, TaskResponse, UpdateTaskRequest},
        },
        extractors::{ApiJson, ApiQuery, AuthCtx, public_id::PublicTaskId},
        handlers::guard::{decode_body, encode_body, load_for_mutation},
    },
    error::AppError,
    repos::{Document, NewDocument, ResourceKind},
    state::AppState,
};

fn doc_to_response(state: &AppState, doc: Document) -> Result<TaskResponse, AppError> {
    let body: TaskBody = decode_body(&doc)?;

    Ok(TaskResponse {
        id: state.id_codec.encode(doc.id)?,
        title: body.title,
        description: body.description,
        status: body.status,
        priority: body.priority,
        deadline: body.deadline,
        assigned_to: body.assigned_to,
        created_by: doc.owner_id,
        created_at: doc.created_at,
        updated_at: doc.updated_at,
    })
}

pub async fn list_tasks(
    State(state): State<AppState>,
    _auth: AuthCtx,
    ApiQuery(page): ApiQuery<ListQuery>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let docs = state
        .documents
        .list(ResourceKind::Task, None, page.limit(), page.offset())
        .await?;

    let mut res = Vec::with_capacity(docs.len());
    for doc in docs {
        res.push(doc_to_response(&state, doc)?);
    }

    Ok(Json(res))
}

pub async fn create_task(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let doc = state
        .documents
        .insert(NewDocument {
            kind: ResourceKind::Task,
            owner_id: claim.subject_id,
            parent_id: None,
            body: encode_body(&req.into_body())?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(doc_to_response(&state, doc)?)))
}

pub async fn get_task(
    State(state): State<AppState>,
    _auth: AuthCtx,
    task_id: PublicTaskId,
) -> Result<Json<TaskResponse>, AppError> {
    let doc = state
        .documents
        .get(task_id.kind(), task_id.id)
        .await?
        .ok_or(AppError::not_found("task"))?;

    Ok(Json(doc_to_response(&state, doc)?))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    task_id: PublicTaskId,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    // 404 / 403 before looking at the payload
    let doc = load_for_mutation(&state, task_id.kind(), task_id.id, &claim, "task").await?;

    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let mut body: TaskBody = decode_body(&doc)?;
    req.apply(&mut body);

    let doc = state
        .documents
        .replace_body(ResourceKind::Task, doc.id, encode_body(&body)?)
        .await?
        .ok_or(AppError::not_found("task"))?;

    Ok(Json(doc_to_response(&state, doc)?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
    task_id: PublicTaskId,
) -> Result<StatusCode, AppError> {
    let doc = load_for_mutation(&state, task_id.kind(), task_id.id, &claim, "task").await?;

    if state.documents.delete(ResourceKind::Task, doc.id).await? {
        tracing::info!(subject_id = %claim.subject_id, document_id = doc.id, "task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("task"))
    }
}
