mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use access_guard::config::Config;
use access_guard::repos::ResourceKind;
use access_guard::services::auth::{CredentialIssuer, Role};

use common::{OTHER_SECRET, SECRET, TestApp, secret};

#[tokio::test]
async fn missing_credential_is_rejected_before_the_handler_runs() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/posts",
            None,
            Some(json!({ "title": "t", "content": "c" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(app.document_count(ResourceKind::Post).await, 0);
}

#[tokio::test]
async fn only_the_bearer_scheme_is_accepted() {
    let app = TestApp::spawn().await;
    let token = app.user_token();

    for header in [token.clone(), format!("Token {token}"), "Bearer".to_string()] {
        let (status, _) = app
            .send(Method::GET, "/api/v1/auth/me", Some(&header), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {header}");
    }

    let (status, body) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", &token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject_id"], app.user.to_string());
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn expired_and_foreign_credentials_are_rejected() {
    let app = TestApp::spawn().await;
    let config = &app.config;

    let expired = CredentialIssuer::new(
        &secret(SECRET),
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        3600,
    )
    .issue_at(app.admin, Role::Admin, Utc::now() - Duration::hours(2))
    .unwrap();

    let foreign = CredentialIssuer::new(
        &secret(OTHER_SECRET),
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        3600,
    )
    .issue(app.admin, Role::Admin)
    .unwrap();

    for token in [expired.token, foreign.token, "not-a-jwt".to_string()] {
        let (status, _) = app
            .send_bearer(
                Method::POST,
                "/api/v1/posts",
                &token,
                Some(json!({ "title": "t", "content": "c" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert_eq!(app.document_count(ResourceKind::Post).await, 0);
}

#[tokio::test]
async fn owner_may_update_and_others_get_forbidden() {
    let app = TestApp::spawn().await;
    let id = app.create_post(&app.user_token(), "mine").await;
    let uri = format!("/api/v1/posts/{id}");

    let (status, body) = app
        .send_bearer(
            Method::PUT,
            &uri,
            &app.other_user_token(),
            Some(json!({ "title": "hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = app
        .send_bearer(
            Method::PUT,
            &uri,
            &app.user_token(),
            Some(json!({ "title": "renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["author_id"], app.user.to_string());
}

#[tokio::test]
async fn admin_may_mutate_any_resource() {
    let app = TestApp::spawn().await;
    let id = app.create_post(&app.user_token(), "mine").await;
    let uri = format!("/api/v1/posts/{id}");

    let (status, body) = app
        .send_bearer(
            Method::PUT,
            &uri,
            &app.admin_token(),
            Some(json!({ "content": "moderated" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "moderated");
    // the owner is untouched by an admin edit
    assert_eq!(body["author_id"], app.user.to_string());

    let (status, _) = app
        .send_bearer(Method::DELETE, &uri, &app.admin_token(), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_owner_delete_is_forbidden_and_leaves_the_resource() {
    let app = TestApp::spawn().await;
    let id = app.create_post(&app.user_token(), "keep me").await;
    let uri = format!("/api/v1/posts/{id}");

    let (status, _) = app
        .send_bearer(Method::DELETE, &uri, &app.other_user_token(), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "keep me");
}

#[tokio::test]
async fn missing_resource_is_not_found_for_everyone() {
    let app = TestApp::spawn().await;
    let missing = app.state.id_codec.encode(9_999).unwrap();
    let uri = format!("/api/v1/posts/{missing}");

    for token in [app.user_token(), app.admin_token()] {
        let (status, _) = app
            .send_bearer(Method::DELETE, &uri, &token, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn missing_resource_without_credential_is_still_unauthorized() {
    let app = TestApp::spawn().await;
    let missing = app.state.id_codec.encode(9_999).unwrap();

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/v1/posts/{missing}"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_public_id_is_bad_request() {
    let app = TestApp::spawn().await;
    let (status, body) = app.send(Method::GET, "/api/v1/posts/!!", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PUBLIC_ID");
}

#[tokio::test]
async fn public_reads_do_not_need_a_credential() {
    let app = TestApp::spawn().await;
    app.create_post(&app.user_token(), "hello").await;

    let (status, body) = app.send(Method::GET, "/api/v1/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn comment_delete_is_gated_by_comment_owner() {
    let app = TestApp::spawn().await;
    let post_id = app.create_post(&app.user_token(), "thread").await;

    let (status, comment) = app
        .send_bearer(
            Method::POST,
            &format!("/api/v1/posts/{post_id}/comments"),
            &app.other_user_token(),
            Some(json!({ "content": "first" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{comment}");
    let uri = format!("/api/v1/comments/{}", comment["id"].as_str().unwrap());

    // owning the post does not grant rights over other people's comments
    let (status, _) = app
        .send_bearer(Method::DELETE, &uri, &app.user_token(), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send_bearer(Method::DELETE, &uri, &app.other_user_token(), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn tasks_require_a_credential_even_to_read() {
    let app = TestApp::spawn().await;

    let (status, _) = app.send(Method::GET, "/api/v1/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, task) = app
        .send_bearer(
            Method::POST,
            "/api/v1/tasks",
            &app.user_token(),
            Some(json!({ "title": "write report" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{task}");
    assert_eq!(task["status"], "pending");
    let uri = format!("/api/v1/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = app
        .send_bearer(
            Method::PUT,
            &uri,
            &app.other_user_token(),
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send_bearer(
            Method::PUT,
            &uri,
            &app.user_token(),
            Some(json!({ "status": "in-progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in-progress");
}

#[tokio::test]
async fn like_toggles_without_ownership() {
    let app = TestApp::spawn().await;
    let id = app.create_post(&app.user_token(), "likeable").await;
    let uri = format!("/api/v1/posts/{id}/like");

    let (status, body) = app
        .send_bearer(Method::POST, &uri, &app.other_user_token(), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "liked": true, "like_count": 1 }));

    let (_, body) = app
        .send_bearer(Method::POST, &uri, &app.other_user_token(), None)
        .await;
    assert_eq!(body, json!({ "liked": false, "like_count": 0 }));
}

#[tokio::test]
async fn logout_revokes_the_presented_credential() {
    let app = TestApp::spawn().await;
    let token = app.user_token();

    let (status, _) = app
        .send_bearer(Method::POST, "/api/v1/auth/logout", &token, None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", &token, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // a fresh credential for the same subject is unaffected
    let (status, _) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", &app.user_token(), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_then_login_yields_a_plain_user_credential() {
    let app = TestApp::spawn().await;

    let (status, user) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "carol",
                "email": "Carol@Example.com",
                "password": "hunter2hunter2"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    assert_eq!(user["email"], "carol@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let (status, issued) = app.login("carol@example.com", "hunter2hunter2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(issued["token_type"], "Bearer");
    assert_eq!(issued["expires_in"], 3600);

    let token = issued["access_token"].as_str().unwrap();
    let (status, me) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["subject_id"], user["id"]);
    assert_eq!(me["role"], "user");
}

#[tokio::test]
async fn role_supplied_at_registration_is_ignored() {
    let app = TestApp::spawn().await;

    let (status, user) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "mallory",
                "email": "mallory@example.com",
                "password": "password123",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "user");

    let (_, issued) = app.login("mallory@example.com", "password123").await;
    let token = issued["access_token"].as_str().unwrap();
    let (_, me) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", token, None)
        .await;
    assert_eq!(me["role"], "user");

    // and the credential cannot touch someone else's post
    let id = app.create_post(&app.user_token(), "not yours").await;
    let (status, _) = app
        .send_bearer(Method::DELETE, &format!("/api/v1/posts/{id}"), token, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_uses_the_role_on_record() {
    let app = TestApp::spawn().await;

    let (status, issued) = app.login("root@example.com", common::PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    let token = issued["access_token"].as_str().unwrap();
    let (_, me) = app
        .send_bearer(Method::GET, "/api/v1/auth/me", token, None)
        .await;
    assert_eq!(me["subject_id"], app.admin.to_string());
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_unauthorized() {
    let app = TestApp::spawn().await;

    for (email, password) in [
        ("alice@example.com", "not the password"),
        ("alice@example.com", ""),
        ("nobody@example.com", common::PASSWORD),
    ] {
        let (status, body) = app.login(email, password).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{email}");
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(body.get("access_token").is_none());
    }
}

#[tokio::test]
async fn registration_rejects_duplicates_and_weak_passwords() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "alice2", "email": "ALICE@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_EXISTS");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({ "name": "dave", "email": "dave@example.com", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "WEAK_PASSWORD");

    let (status, _) = app.login("dave@example.com", "short").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_is_available_in_production() {
    let mut config = Config::for_development(secret(SECRET));
    config.app_env = access_guard::config::AppEnv::Production;
    let app = TestApp::spawn_with(config).await;

    let (status, _) = app.login("alice@example.com", common::PASSWORD).await;
    assert_eq!(status, StatusCode::OK);

    // the old subject-id token endpoint is gone
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/auth/token",
            None,
            Some(json!({ "user_id": app.admin.to_string() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_owner_with_invalid_payload_still_gets_forbidden() {
    let app = TestApp::spawn().await;
    let id = app.create_post(&app.user_token(), "mine").await;

    let (status, body) = app
        .send_bearer(
            Method::PUT,
            &format!("/api/v1/posts/{id}"),
            &app.other_user_token(),
            Some(json!({ "title": "x".repeat(101) })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (_, task) = app
        .send_bearer(
            Method::POST,
            "/api/v1/tasks",
            &app.user_token(),
            Some(json!({ "title": "private" })),
        )
        .await;
    let (status, _) = app
        .send_bearer(
            Method::PUT,
            &format!("/api/v1/tasks/{}", task["id"].as_str().unwrap()),
            &app.other_user_token(),
            Some(json!({ "title": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_bodies_and_queries_get_the_json_error_shape() {
    let app = TestApp::spawn().await;
    let token = app.user_token();

    let (status, body) = app
        .send_raw(
            Method::POST,
            "/api/v1/posts",
            &token,
            Some("application/json"),
            "{\"title\": ",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_BODY");
    assert!(body["error"]["message"].is_string());

    let (status, body) = app
        .send_raw(Method::POST, "/api/v1/posts", &token, None, "{}")
        .await;
    assert!(status.is_client_error());
    assert_eq!(body["error"]["code"], "INVALID_BODY");

    let (status, body) = app
        .send(Method::GET, "/api/v1/posts?limit=abc", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");

    assert_eq!(app.document_count(ResourceKind::Post).await, 0);
}
