use crate::views;
use axum::extract::multipart::MultipartError;
use axum::{http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::reqwest::Error as ReqwestClientError;
use oauth2::{HttpClientError, RequestTokenError, StandardErrorResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum SiteError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("OAuth2 token request error: {0}")]
    Oauth2Token(String),

    #[error("OAuth2 server error: {error}")]
    Oauth2Server { error: String },

    #[error("OAuth flow error: {0}")]
    OauthFlowError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid or missing CSRF token")]
    Forbidden,

    #[error("Not found")]
    NotFound,
}

impl
    From<
        RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    > for SiteError
{
    fn from(
        e: RequestTokenError<
            HttpClientError<ReqwestClientError>,
            StandardErrorResponse<BasicErrorResponseType>,
        >,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => SiteError::Oauth2Server {
                error: err.error().to_string(),
            },
            RequestTokenError::Request(req_e) => {
                SiteError::Oauth2Token(format!("request failed: {}", req_e))
            }
            RequestTokenError::Parse(parse_err, _body) => SiteError::Json(parse_err.into_inner()),
            RequestTokenError::Other(s) => SiteError::Oauth2Token(s),
        }
    }
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::NotFound => StatusCode::NOT_FOUND,
            SiteError::Forbidden => StatusCode::FORBIDDEN,
            SiteError::Multipart(e) => e.status(),
            SiteError::BadRequest(_) => StatusCode::BAD_REQUEST,
            SiteError::Oauth2Token(_)
            | SiteError::Oauth2Server { .. }
            | SiteError::OauthFlowError(_) => StatusCode::UNAUTHORIZED,
            SiteError::Reqwest(_) | SiteError::UrlParse(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match status {
            StatusCode::NOT_FOUND => "Page not found.",
            StatusCode::FORBIDDEN => "This request could not be verified. Reload the form and try again.",
            StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => {
                "The submitted form could not be read."
            }
            StatusCode::UNAUTHORIZED => "Authentication error.",
            StatusCode::BAD_GATEWAY => "Upstream service is unavailable.",
            _ => "Something went wrong.",
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, views::error_page(status, message)).into_response()
    }
}
