//! End-to-end checks against an in-process axum backend that mimics the blog
//! API's cookie + bearer auth: login sets a refresh cookie, protected routes
//! only accept `Authorization: Bearer <fresh token>`, and the refresh endpoint
//! mints that token from the cookie.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use blogsphere::net::types::{Credentials, PostStatus};
use blogsphere::routes::{Navigation, Route};
use blogsphere::{ApiError, App, ClientConfig};
use serde_json::{Value, json};

const FRESH_TOKEN: &str = "fresh-token";
const REFRESH_COOKIE: &str = "refreshToken=r1";

#[derive(Clone, Default)]
struct Backend {
    refreshes: Arc<AtomicUsize>,
}

impl Backend {
    fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

// =============================================================================
// fake server
// =============================================================================

fn has_refresh_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|pair| pair.trim() == REFRESH_COOKIE))
}

fn has_fresh_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {FRESH_TOKEN}"))
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "success": false, "message": message }))).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != "hunter2" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "message": "Invalid credentials" })))
            .into_response();
    }
    (
        [(header::SET_COOKIE, format!("{REFRESH_COOKIE}; Path=/; HttpOnly"))],
        Json(json!({ "success": true, "data": {} })),
    )
        .into_response()
}

async fn logout(headers: HeaderMap) -> Response {
    if !has_refresh_cookie(&headers) {
        return unauthorized("Unauthorized request");
    }
    (
        [(header::SET_COOKIE, "refreshToken=; Path=/; Max-Age=0".to_owned())],
        Json(json!({ "success": true, "data": {} })),
    )
        .into_response()
}

async fn refresh(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.refreshes.fetch_add(1, Ordering::SeqCst);
    if !has_refresh_cookie(&headers) {
        return unauthorized("Refresh token missing");
    }
    Json(json!({ "success": true, "data": { "accessToken": FRESH_TOKEN } })).into_response()
}

async fn current_user(headers: HeaderMap) -> Response {
    if !has_fresh_bearer(&headers) {
        return unauthorized("Unauthorized request");
    }
    Json(json!({ "success": true, "data": { "_id": "u1", "username": "alice" } })).into_response()
}

async fn inactive_posts(headers: HeaderMap) -> Response {
    if !has_fresh_bearer(&headers) {
        return unauthorized("Unauthorized request");
    }
    Json(json!({
        "success": true,
        "data": [{ "_id": "p1", "title": "Draft", "status": false, "owner": "u1" }]
    }))
    .into_response()
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let router = Router::new()
        .route("/api/v1/user/login", post(login))
        .route("/api/v1/user/logout", post(logout))
        .route("/api/v1/user/update-acess-token", post(refresh))
        .route("/api/v1/user/current-user", get(current_user))
        .route("/api/v1/blog/posts/inactive", get(inactive_posts))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

async fn start_app(base_url: &str) -> App {
    let config = ClientConfig::new(base_url).unwrap();
    App::start(&config).await.unwrap()
}

fn alice() -> Credentials {
    Credentials { email: "alice@example.com".into(), password: "hunter2".into() }
}

// =============================================================================
// scenarios
// =============================================================================

#[tokio::test]
async fn bootstrap_without_cookie_starts_logged_out() {
    let (base_url, backend) = spawn_backend().await;
    let app = start_app(&base_url).await;

    assert!(!app.session().is_authenticated());
    assert_eq!(backend.refresh_count(), 1);
    assert_eq!(app.navigate("/inactive-posts"), Navigation::Redirect { to: "/login", from: Some("/inactive-posts".into()) });
}

#[tokio::test]
async fn login_refreshes_from_cookie_and_replays() {
    let (base_url, backend) = spawn_backend().await;
    let app = start_app(&base_url).await;

    let user = app.login(&alice()).await.unwrap().unwrap();
    assert_eq!(user.username.as_deref(), Some("alice"));
    assert!(app.session().is_authenticated());
    assert_eq!(backend.refresh_count(), 2);
    assert_eq!(app.navigate("/inactive-posts"), Navigation::Render(Route::InactivePosts));

    let posts = app.call(app.api().inactive_posts()).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].status, PostStatus::Inactive);
    assert_eq!(backend.refresh_count(), 3);
}

#[tokio::test]
async fn bad_password_is_validation_failure() {
    let (base_url, backend) = spawn_backend().await;
    let app = start_app(&base_url).await;

    let wrong = Credentials { email: "alice@example.com".into(), password: "nope".into() };
    let err = app.login(&wrong).await.unwrap_err();
    assert_eq!(err, ApiError::Validation { status: 400, message: Some("Invalid credentials".into()) });
    assert!(!app.session().is_authenticated());
    assert_eq!(backend.refresh_count(), 1);
}

#[tokio::test]
async fn lost_refresh_cookie_ends_session() {
    let (base_url, _backend) = spawn_backend().await;
    let app = start_app(&base_url).await;
    app.login(&alice()).await.unwrap();

    app.logout().await.unwrap();
    assert!(!app.session().is_authenticated());

    // Pretend a stale view still thinks it is logged in.
    let user = serde_json::from_value(json!({ "_id": "u1" })).unwrap();
    app.session().login(user);
    let err = app.call(app.api().inactive_posts()).await.unwrap_err();
    assert_eq!(err, ApiError::RefreshFailed(Box::new(ApiError::Auth { message: Some("Refresh token missing".into()) })));
    assert!(!app.session().is_authenticated());
}
