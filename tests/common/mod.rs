#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use folio::config::Config;
use folio::router::{SiteState, site_router};
use folio::service::accounts;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "folio-test-boundary";

pub struct TestSite {
    pub state: SiteState,
    pub app: Router,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

pub async fn site() -> TestSite {
    site_with(|_| {}).await
}

pub async fn site_with(customize: impl FnOnce(&mut Config)) -> TestSite {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let upload_dir = dir.path().join("images");
    let mut cfg = Config {
        database_url: format!("sqlite:{}", dir.path().join("folio.sqlite").display()),
        upload_dir: upload_dir.clone(),
        insecure_cookie: true,
        ..Config::default()
    };
    customize(&mut cfg);

    let state = SiteState::from_config(&cfg)
        .await
        .expect("failed to build site state");
    let app = site_router(state.clone());
    TestSite {
        state,
        app,
        upload_dir,
        _dir: dir,
    }
}

impl TestSite {
    pub fn client(&self) -> Client {
        Client {
            app: self.app.clone(),
            cookies: HashMap::new(),
        }
    }

    /// A client signed in as a freshly created admin.
    pub async fn admin_client(&self) -> Client {
        accounts::create_admin(&self.state.storage, "admin", "hunter2")
            .await
            .expect("failed to create admin");
        let mut client = self.client();
        let resp = client
            .post_form("/login", &[("username", "admin"), ("password", "hunter2")])
            .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location(), Some("/admin"));
        client
    }

    /// A client signed in as a password user without the admin flag.
    pub async fn member_client(&self) -> Client {
        let hash = accounts::hash_password("letmein".to_string())
            .await
            .expect("failed to hash password");
        self.state
            .storage
            .insert_local_user("member", &hash, false)
            .await
            .expect("failed to insert member");
        let mut client = self.client();
        let resp = client
            .post_form("/login", &[("username", "member"), ("password", "letmein")])
            .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        client
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Drives the router in-process and keeps cookies between requests.
pub struct Client {
    app: Router,
    cookies: HashMap<String, String>,
}

impl Client {
    pub async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let builder = if self.cookies.is_empty() {
            builder
        } else {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder.header(header::COOKIE, cookie)
        };
        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");

        for set_cookie in resp.headers().get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("set-cookie was not ascii");
            let pair = raw.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                if value.is_empty() {
                    self.cookies.remove(name);
                } else {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }
        }

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).expect("response body was not utf-8"),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(uri), Body::empty())
            .await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    pub async fn post_multipart(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                ),
            Body::from(multipart_body(fields, files)),
        )
        .await
    }

    /// CSRF token embedded in the admin forms.
    pub async fn csrf_token(&mut self) -> String {
        let page = self.get("/admin/post/create").await;
        assert_eq!(page.status, StatusCode::OK);
        scrape_csrf(&page.body)
    }
}

pub fn scrape_csrf(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("page has no csrf field") + marker.len();
    let len = html[start..].find('"').expect("unterminated csrf value");
    html[start..start + len].to_string()
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
