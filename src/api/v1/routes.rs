/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - public (認証なし) と protected (access guard 適用) を分けて組み、最後に merge する
 * - 同じ path でも GET は public、PUT/DELETE は protected になり得る
 * - register / login は全環境で public
 */
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, logout, me, register},
    comments::{create_comment, delete_comment, list_comments},
    health::health,
    posts::{create_post, delete_post, get_post, list_posts, toggle_like, update_post},
    tasks::{create_task, delete_task, get_task, list_tasks, update_task},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/posts", get(list_posts))
        .route("/posts/{id}", get(get_post))
        .route("/posts/{id}/comments", get(list_comments));

    let protected = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
        .route("/posts", post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .route("/posts/{id}/like", post(toggle_like))
        .route("/posts/{id}/comments", post(create_comment))
        .route("/comments/{id}", delete(delete_comment))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        );

    public.merge(access::apply(protected, state))
}
