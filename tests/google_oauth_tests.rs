mod common;

use axum::{
    Form, Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use url::Url;

const FAKE_AUTH_URL: &str = "https://id.example.test/o/oauth2/auth";

async fn google_site() -> common::TestSite {
    google_site_with(None).await
}

async fn google_site_with(provider: Option<SocketAddr>) -> common::TestSite {
    common::site_with(|cfg| {
        cfg.google_client_id = Some("client-123".to_string());
        cfg.google_client_secret = Some("shh".to_string());
        cfg.google_auth_url = FAKE_AUTH_URL.to_string();
        cfg.public_url = "http://folio.test".to_string();
        if let Some(addr) = provider {
            cfg.google_token_url = format!("http://{addr}/token");
            cfg.google_userinfo_url = format!("http://{addr}/userinfo");
        }
    })
    .await
}

/// Token and userinfo endpoints served in-process on an ephemeral port.
async fn spawn_provider(token_status: StatusCode) -> SocketAddr {
    let token = move |Form(form): Form<HashMap<String, String>>| async move {
        if token_status != StatusCode::OK {
            return token_status.into_response();
        }
        if form.get("code").map(String::as_str) != Some("c")
            || !form.contains_key("code_verifier")
        {
            return StatusCode::BAD_REQUEST.into_response();
        }
        Json(json!({
            "access_token": "tok",
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .into_response()
    };
    let userinfo = || async {
        Json(json!({ "sub": "g-1", "email": "a@example.org" })).into_response()
    };
    let app: Router = Router::new()
        .route("/token", post(token))
        .route("/userinfo", get(userinfo));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Starts a Google login and returns the `state` the site handed to the provider.
async fn begin_login(client: &mut common::Client) -> String {
    let start = client.get("/login/google").await;
    let location = Url::parse(start.location().unwrap()).unwrap();
    location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

#[tokio::test]
async fn login_redirects_to_provider_with_pkce_and_state() {
    let site = google_site().await;
    let mut client = site.client();

    let resp = client.get("/login/google").await;
    assert_eq!(resp.status, StatusCode::TEMPORARY_REDIRECT);
    let location = resp.location().expect("missing location header");
    assert!(location.starts_with(FAKE_AUTH_URL), "{location}");

    let url = Url::parse(location).unwrap();
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    assert_eq!(param("client_id").as_deref(), Some("client-123"));
    assert_eq!(
        param("redirect_uri").as_deref(),
        Some("http://folio.test/auth/google")
    );
    assert_eq!(param("code_challenge_method").as_deref(), Some("S256"));
    assert!(param("code_challenge").is_some());
    assert!(param("state").is_some());
    let scope = param("scope").unwrap();
    for expected in ["openid", "email", "profile"] {
        assert!(scope.split(' ').any(|s| s == expected), "{scope}");
    }

    let login = client.get("/login").await;
    assert!(login.body.contains("/login/google"));
}

#[tokio::test]
async fn callback_with_mismatched_state_fails_without_session() {
    let site = google_site().await;
    let mut client = site.client();

    client.get("/login/google").await;
    let resp = client.get("/auth/google?code=abc&state=not-the-state").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));

    let login = client.get("/login").await;
    assert!(login.body.contains(r#"class="flash flash-danger""#));
    assert_eq!(client.get("/admin").await.location(), Some("/login"));
}

#[tokio::test]
async fn callback_without_pending_login_fails() {
    let site = google_site().await;
    let mut client = site.client();

    let resp = client.get("/auth/google?code=abc&state=xyz").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn provider_error_fails_login() {
    let site = google_site().await;
    let mut client = site.client();

    let state = begin_login(&mut client).await;

    let resp = client
        .get(&format!("/auth/google?error=access_denied&state={state}"))
        .await;
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn first_google_login_signs_in_as_admin() {
    let provider = spawn_provider(StatusCode::OK).await;
    let site = google_site_with(Some(provider)).await;
    let mut client = site.client();

    let state = begin_login(&mut client).await;
    let resp = client
        .get(&format!("/auth/google?code=c&state={state}"))
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/admin"));

    let admin = client.get("/admin").await;
    assert_eq!(admin.status, StatusCode::OK);
    assert!(admin.body.contains(r#"class="flash flash-success""#));

    let (is_admin, email): (bool, Option<String>) =
        sqlx::query_as("SELECT is_admin, email FROM users WHERE google_id = ?")
            .bind("g-1")
            .fetch_one(site.state.storage.pool())
            .await
            .unwrap();
    assert!(is_admin);
    assert_eq!(email.as_deref(), Some("a@example.org"));
}

#[tokio::test]
async fn token_endpoint_failure_fails_login() {
    let provider = spawn_provider(StatusCode::INTERNAL_SERVER_ERROR).await;
    let site = google_site_with(Some(provider)).await;
    let mut client = site.client();

    let state = begin_login(&mut client).await;
    let resp = client
        .get(&format!("/auth/google?code=c&state={state}"))
        .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));

    let login = client.get("/login").await;
    assert!(login.body.contains(r#"class="flash flash-danger""#));
    assert_eq!(client.get("/admin").await.location(), Some("/login"));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(site.state.storage.pool())
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[tokio::test]
async fn unconfigured_google_login_redirects_back() {
    let site = common::site().await;
    let mut client = site.client();

    let resp = client.get("/login/google").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));

    let login = client.get("/login").await;
    assert!(login.body.contains(r#"class="flash flash-danger""#));
    assert!(!login.body.contains(r#"href="/login/google""#));
}
