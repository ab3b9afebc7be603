use crate::error::SiteError;
use crate::google_oauth::GoogleSettings;

use oauth2::{
    AuthUrl, AuthorizationCode, Client as OAuth2Client, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope,
    StandardRevocableToken, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenResponse,
    },
};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

const SCOPES: &[&str] = &["openid", "email", "profile"];

/// Subset of the OpenID Connect userinfo document the site cares about.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GoogleUserInfo {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Stateless Google OAuth Endpoints.
pub(super) struct GoogleOauthEndpoints;

impl GoogleOauthEndpoints {
    /// Consent page URL plus the CSRF state embedded in it.
    pub(super) fn build_authorize_url(
        settings: &GoogleSettings,
        challenge: PkceCodeChallenge,
    ) -> Result<(Url, CsrfToken), SiteError> {
        let client = build_oauth2_client(settings)?;
        let mut request = client.authorize_url(CsrfToken::new_random);
        for scope in SCOPES {
            request = request.add_scope(Scope::new((*scope).to_string()));
        }
        Ok(request.set_pkce_challenge(challenge).url())
    }

    pub(super) async fn exchange_authorization_code(
        settings: &GoogleSettings,
        code: AuthorizationCode,
        verifier: PkceCodeVerifier,
        http_client: &reqwest::Client,
    ) -> Result<BasicTokenResponse, SiteError> {
        let client = build_oauth2_client(settings)?;
        let token = client
            .exchange_code(code)
            .set_pkce_verifier(verifier)
            .request_async(http_client)
            .await?;
        info!("authorization code exchanged");
        Ok(token)
    }

    pub(super) async fn fetch_userinfo(
        settings: &GoogleSettings,
        access_token: &str,
        http_client: &reqwest::Client,
    ) -> Result<GoogleUserInfo, SiteError> {
        let profile = http_client
            .get(settings.userinfo_url.as_str())
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleUserInfo>()
            .await?;
        info!("fetched userinfo");
        Ok(profile)
    }
}

/// Build the Google OAuth2 client from the configured credentials.
fn build_oauth2_client(settings: &GoogleSettings) -> Result<GoogleOauth2Client, SiteError> {
    let client = OAuth2Client::new(ClientId::new(settings.client_id.clone()))
        .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
        .set_auth_uri(AuthUrl::new(settings.auth_url.clone())?)
        .set_token_uri(TokenUrl::new(settings.token_url.clone())?)
        .set_redirect_uri(RedirectUrl::from_url(settings.redirect_url.clone()));
    Ok(client)
}

pub(super) type GoogleOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
