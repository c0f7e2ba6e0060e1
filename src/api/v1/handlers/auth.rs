/*
 * Responsibility
 * - POST /auth/register: ユーザー作成 (role は常に user)
 * - POST /auth/login: email + password を検証し credential を発行する
 * - GET /auth/me: 検証済みの IdentityClaim を返す
 * - POST /auth/logout: 提示された credential を失効させる
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{IdentityResponse, LoginRequest, RegisterRequest, TokenResponse, UserResponse},
        extractors::{ApiJson, AuthCtx},
    },
    error::AppError,
    repos::NewUser,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let password_hash = state.passwords.hash(&req.password).await?;

    let user = state
        .users
        .create(NewUser {
            user_name: req.name.trim().to_string(),
            email: req.email(),
            password_hash,
        })
        .await?;

    tracing::info!(subject_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    // Unknown email and wrong password get the same answer.
    let Some(user) = state.users.find_by_email(&req.email()).await? else {
        tracing::warn!("login for unknown email");
        return Err(AppError::Unauthorized);
    };

    if !state.passwords.verify(&req.password, &user.password_hash).await? {
        tracing::warn!(subject_id = %user.id, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let issued = state.auth.issue(user.id, user.role)?;

    tracing::info!(subject_id = %user.id, role = %user.role, "credential issued");

    Ok(Json(issued.into()))
}

pub async fn me(AuthCtx(claim): AuthCtx) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&claim))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthCtx(claim): AuthCtx,
) -> Result<StatusCode, AppError> {
    state.auth.revoke(&claim).await?;
    Ok(StatusCode::NO_CONTENT)
}
