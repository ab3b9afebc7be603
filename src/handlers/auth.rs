use crate::middleware::auth::{end_session, read_session, start_session};
use crate::middleware::flash::{self, Flash, redirect_with_flash};
use crate::service::accounts;
use crate::{SiteError, router::SiteState, views};
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

/// Tracked usernames before idle limiter entries are dropped.
const LIMITER_PRUNE_LEN: usize = 4096;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login -> login form, or straight to the dashboard when already signed in.
pub async fn login_page(State(state): State<SiteState>, jar: PrivateCookieJar) -> Response {
    if read_session(&jar).is_some() {
        return Redirect::to("/admin").into_response();
    }
    let (jar, flashes) = flash::take(jar);
    (jar, views::auth::login(state.google.is_some(), "", &flashes)).into_response()
}

/// POST /login -> username/password sign-in.
pub async fn login_submit(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, SiteError> {
    let username = form.username.trim();
    let google_enabled = state.google.is_some();

    let limiter = &state.login_limiter;
    if limiter.len() > LIMITER_PRUNE_LEN {
        limiter.retain_recent();
    }
    if limiter.check_key(&username.to_lowercase()).is_err() {
        warn!(username = %username, "login rate limit exceeded");
        let flashes = [Flash::danger(
            "Too many login attempts. Please wait a minute and try again.",
        )];
        return Ok((
            StatusCode::TOO_MANY_REQUESTS,
            views::auth::login(google_enabled, username, &flashes),
        )
            .into_response());
    }

    let user = if username.is_empty() || form.password.trim().is_empty() {
        None
    } else {
        accounts::authenticate_local(&state.storage, username, &form.password).await?
    };

    let Some(user) = user else {
        info!(username = %username, "password login rejected");
        let flashes = [Flash::danger(
            "Login failed. Check your username and password.",
        )];
        return Ok(views::auth::login(google_enabled, username, &flashes).into_response());
    };

    info!(user_id = user.id, is_admin = user.is_admin, "password login");
    let jar = start_session(jar, &state.cookies, user.id);
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Logged in successfully!"),
        "/admin",
    ))
}

/// GET /logout
pub async fn logout(State(state): State<SiteState>, jar: PrivateCookieJar) -> Response {
    if let Some(session) = read_session(&jar) {
        info!(user_id = session.user_id, "logged out");
    }
    redirect_with_flash(
        end_session(jar),
        &state.cookies,
        Flash::success("You have been logged out."),
        "/",
    )
}
