use crate::google_oauth::GoogleOauthService;
use crate::middleware::auth::start_session;
use crate::middleware::cookies::{CookieSettings, clear_cookie};
use crate::middleware::flash::{Flash, redirect_with_flash};
use crate::service::accounts;
use crate::{SiteError, router::SiteState};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use oauth2::CsrfToken;
use serde::Deserialize;
use subtle::ConstantTimeEq;
use time::Duration;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const CSRF_COOKIE: &str = "oauth_csrf_token";
const PKCE_COOKIE: &str = "oauth_pkce_verifier";

/// GET /login/google -> redirects to Google's consent page.
pub async fn google_login(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let Some(google) = state.google.as_ref() else {
        return Ok(redirect_with_flash(
            jar,
            &state.cookies,
            Flash::danger("Google login is not configured."),
            "/login",
        ));
    };

    let pending = google.authorize()?;
    let jar = store_oauth_cookies(
        jar,
        &state.cookies,
        &pending.csrf_token,
        &pending.pkce_verifier,
    );

    info!("Dispatching OAuth redirect");
    Ok((jar, Redirect::temporary(pending.url.as_str())).into_response())
}

/// GET /auth/google -> exchanges the code, maps the profile to a user and signs in.
pub async fn google_callback(
    State(state): State<SiteState>,
    Query(query): Query<AuthCallbackQuery>,
    jar: PrivateCookieJar,
) -> Response {
    let (pkce_verifier, csrf_cookie, jar) = match load_oauth_session(jar) {
        Ok(data) => data,
        Err((jar, err)) => return login_failed(jar, &state.cookies, err),
    };

    let Some(google) = state.google.as_ref() else {
        return login_failed(
            jar,
            &state.cookies,
            SiteError::OauthFlowError("google login is not configured".to_string()),
        );
    };

    match complete(&state, google, &query, &pkce_verifier, &csrf_cookie).await {
        Ok(user_id) => {
            let jar = start_session(jar, &state.cookies, user_id);
            redirect_with_flash(
                jar,
                &state.cookies,
                Flash::success("Logged in successfully!"),
                "/admin",
            )
        }
        Err(err) => login_failed(jar, &state.cookies, err),
    }
}

async fn complete(
    state: &SiteState,
    google: &GoogleOauthService,
    query: &AuthCallbackQuery,
    pkce_verifier: &str,
    csrf_cookie: &str,
) -> Result<i64, SiteError> {
    if let Some(error) = query.error.as_deref() {
        return Err(SiteError::OauthFlowError(format!(
            "provider returned error `{error}`"
        )));
    }

    let state_param = query.state.as_deref().ok_or_else(|| {
        SiteError::OauthFlowError("missing `state` in callback".to_string())
    })?;
    if !bool::from(state_param.as_bytes().ct_eq(csrf_cookie.as_bytes())) {
        return Err(SiteError::OauthFlowError("CSRF token mismatch".to_string()));
    }

    let code = query
        .code
        .as_deref()
        .ok_or_else(|| SiteError::OauthFlowError("missing `code` in callback".to_string()))?;

    let profile = google
        .complete_login(code, pkce_verifier.to_string())
        .await?;
    let user = accounts::sign_in_google(&state.storage, &profile).await?;
    Ok(user.id)
}

fn store_oauth_cookies(
    jar: PrivateCookieJar,
    settings: &CookieSettings,
    csrf: &CsrfToken,
    pkce_verifier: &str,
) -> PrivateCookieJar {
    jar.add(settings.build(CSRF_COOKIE, csrf.secret().to_string(), Duration::minutes(15)))
        .add(settings.build(PKCE_COOKIE, pkce_verifier.to_string(), Duration::minutes(15)))
}

fn load_oauth_session(
    jar: PrivateCookieJar,
) -> Result<(String, String, PrivateCookieJar), (PrivateCookieJar, SiteError)> {
    let Some(csrf_cookie) = jar.get(CSRF_COOKIE).map(|c| c.value().to_owned()) else {
        let jar = clear_oauth_cookies(jar);
        return Err((
            jar,
            SiteError::OauthFlowError("Missing CSRF token in cookie".to_string()),
        ));
    };

    let Some(pkce_cookie) = jar.get(PKCE_COOKIE).map(|c| c.value().to_owned()) else {
        let jar = clear_oauth_cookies(jar);
        return Err((
            jar,
            SiteError::OauthFlowError("Missing PKCE verifier in cookie".to_string()),
        ));
    };

    let jar = clear_oauth_cookies(jar);

    Ok((pkce_cookie, csrf_cookie, jar))
}

fn clear_oauth_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(CSRF_COOKIE))
        .remove(clear_cookie(PKCE_COOKIE))
}

fn login_failed(jar: PrivateCookieJar, settings: &CookieSettings, err: SiteError) -> Response {
    warn!(error = %err, "google login failed");
    redirect_with_flash(
        jar,
        settings,
        Flash::danger("Login failed. Please try again."),
        "/login",
    )
}
