//! access guard: `Authorization: Bearer <jwt>` を検証 → IdentityClaim を extensions に入れる
//!
//! - 受け付ける形式は `Bearer <token>` のみ (生の token / cookie は 401)
//! - 失敗時は handler を呼ばずに 401 で打ち切る
//! - 署名・exp・iss/aud の検証と revocation の確認は AuthService 側

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Protect every route currently registered on `router`.
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/posts", post(create_post));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: only matched routes are guarded, unknown paths still 404
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    Ok(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // owned: no borrow of `req` may live across the await below
    let token = match bearer_token(req.headers()) {
        Ok(token) => token.to_owned(),
        Err(err) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                "missing or malformed bearer credential"
            );
            return Err(err);
        }
    };

    let claim = state.auth.authenticate(&token).await?;

    tracing::debug!(
        subject_id = %claim.subject_id,
        role = %claim.role,
        "request authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claim);

    Ok(next.run(req).await)
}
