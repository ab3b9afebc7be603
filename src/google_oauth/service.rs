use super::endpoints::{GoogleOauthEndpoints, GoogleUserInfo};
use crate::config::Config;
use crate::error::SiteError;

use oauth2::{AuthorizationCode, CsrfToken, PkceCodeChallenge, PkceCodeVerifier, TokenResponse};
use std::time::Duration;
use url::Url;

/// Client credentials and endpoint URLs for the Google login.
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub redirect_url: Url,
}

impl GoogleSettings {
    /// `None` when the client credentials are not configured.
    pub fn from_config(cfg: &Config) -> Result<Option<Self>, SiteError> {
        if !cfg.google_enabled() {
            return Ok(None);
        }
        let (Some(client_id), Some(client_secret)) =
            (cfg.google_client_id.clone(), cfg.google_client_secret.clone())
        else {
            return Ok(None);
        };
        Ok(Some(Self {
            client_id,
            client_secret,
            auth_url: cfg.google_auth_url.clone(),
            token_url: cfg.google_token_url.clone(),
            userinfo_url: cfg.google_userinfo_url.clone(),
            redirect_url: cfg.google_redirect_url()?,
        }))
    }
}

/// Pending authorization: where to send the browser and what to remember.
pub struct AuthorizeRedirect {
    pub url: Url,
    pub csrf_token: CsrfToken,
    pub pkce_verifier: String,
}

/// Service layer composing the Google OAuth operations.
#[derive(Clone)]
pub struct GoogleOauthService {
    settings: GoogleSettings,
    client: reqwest::Client,
}

impl GoogleOauthService {
    /// Create a new service with a preconfigured HTTP client.
    pub fn new(settings: GoogleSettings) -> Result<Self, SiteError> {
        let client = reqwest::Client::builder()
            .user_agent("folio-oauth/1.0".to_string())
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            // token endpoints must not be followed through redirects
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &GoogleSettings {
        &self.settings
    }

    pub fn authorize(&self) -> Result<AuthorizeRedirect, SiteError> {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        let (url, csrf_token) = GoogleOauthEndpoints::build_authorize_url(&self.settings, challenge)?;
        Ok(AuthorizeRedirect {
            url,
            csrf_token,
            pkce_verifier: verifier.secret().to_string(),
        })
    }

    /// Exchange the callback code and fetch the signed-in profile.
    pub async fn complete_login(
        &self,
        code: &str,
        pkce_verifier: String,
    ) -> Result<GoogleUserInfo, SiteError> {
        let token = GoogleOauthEndpoints::exchange_authorization_code(
            &self.settings,
            AuthorizationCode::new(code.to_owned()),
            PkceCodeVerifier::new(pkce_verifier),
            &self.client,
        )
        .await?;
        GoogleOauthEndpoints::fetch_userinfo(
            &self.settings,
            token.access_token().secret(),
            &self.client,
        )
        .await
    }
}
