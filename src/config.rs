use crate::error::SiteError;
use base64::Engine;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URI: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Optional config file merged between the defaults and the environment.
pub const CONFIG_FILE: &str = "folio.toml";

/// Environment variables picked up by [`Config::figment`], lower-cased.
const ENV_KEYS: &[&str] = &[
    "listen_addr",
    "database_url",
    "loglevel",
    "secret_key",
    "upload_dir",
    "public_url",
    "google_client_id",
    "google_client_secret",
    "google_auth_url",
    "google_token_url",
    "google_userinfo_url",
    "insecure_cookie",
    "session_ttl_hours",
    "login_attempts_per_minute",
];

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: failed to load configuration: {e}"))
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Base64 encoded cookie key, 32 or 64 bytes once decoded.
    pub secret_key: String,
    pub upload_dir: PathBuf,
    pub public_url: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
    pub insecure_cookie: bool,
    pub session_ttl_hours: i64,
    pub login_attempts_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite://folio.db".to_string(),
            loglevel: "info".to_string(),
            secret_key: String::new(),
            upload_dir: PathBuf::from("static/images"),
            public_url: "http://localhost:8000".to_string(),
            google_client_id: None,
            google_client_secret: None,
            google_auth_url: GOOGLE_AUTH_URL.to_string(),
            google_token_url: GOOGLE_TOKEN_URI.to_string(),
            google_userinfo_url: GOOGLE_USERINFO_URI.to_string(),
            insecure_cookie: false,
            session_ttl_hours: 24,
            login_attempts_per_minute: 10,
        }
    }
}

impl Config {
    /// Defaults, then `folio.toml`, then environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::raw().only(ENV_KEYS))
    }

    pub fn load() -> Result<Self, SiteError> {
        Ok(Self::figment().extract()?)
    }

    /// Google login is offered only when both client credentials are present.
    pub fn google_enabled(&self) -> bool {
        matches!(
            (&self.google_client_id, &self.google_client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }

    pub fn google_redirect_url(&self) -> Result<Url, SiteError> {
        Ok(Url::parse(&self.public_url)?.join("/auth/google")?)
    }

    /// Decode `secret_key` into the 64 bytes a private cookie key needs.
    /// Returns `None` when no key is configured.
    pub fn cookie_key_bytes(&self) -> Result<Option<[u8; 64]>, SiteError> {
        let trimmed = self.secret_key.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        decode_cookie_key(trimmed).map(Some)
    }
}

fn decode_cookie_key(b64: &str) -> Result<[u8; 64], SiteError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| SiteError::InvalidConfig(format!("secret_key is not valid base64: {e}")))?;
    let mut out = [0u8; 64];
    match bytes.len() {
        // A 32 byte key is used for both signing and encryption halves.
        32 => {
            out[..32].copy_from_slice(&bytes);
            out[32..].copy_from_slice(&bytes);
        }
        64 => out.copy_from_slice(&bytes),
        n => {
            return Err(SiteError::InvalidConfig(format!(
                "secret_key must decode to 32 or 64 bytes, got {n}"
            )));
        }
    }
    Ok(out)
}
