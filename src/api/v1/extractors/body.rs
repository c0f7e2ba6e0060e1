/*
 * Responsibility
 * - axum の Json / Query を包み、rejection を AppError (400, JSON body) に揃える
 * - 素の JsonRejection / QueryRejection は text/plain で返ってしまうため
 */
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body. Syntax, shape and Content-Type errors are 400 `INVALID_BODY`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), "request body rejected");
                Err(AppError::bad_request("INVALID_BODY", rejection.body_text()))
            }
        }
    }
}

/// Query string. Unparseable values are 400 `INVALID_QUERY`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| AppError::bad_request("INVALID_QUERY", rejection.body_text()))
    }
}
