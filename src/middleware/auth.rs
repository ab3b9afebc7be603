use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use base64::Engine;
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::cookies::{CookieSettings, clear_cookie};
use super::flash::{Flash, redirect_with_flash};
use crate::db::DbUser;
use crate::error::SiteError;
use crate::router::SiteState;

pub const SESSION_COOKIE: &str = "folio_session";

/// Payload of the encrypted session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub csrf: String,
    /// unix seconds
    pub exp: i64,
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Log `user_id` in, rotating the CSRF token.
pub fn start_session(
    jar: PrivateCookieJar,
    settings: &CookieSettings,
    user_id: i64,
) -> PrivateCookieJar {
    let session = SessionData {
        user_id,
        csrf: random_token(),
        exp: Utc::now().timestamp() + settings.session_ttl.whole_seconds(),
    };
    match serde_json::to_string(&session) {
        Ok(value) => jar.add(settings.build(SESSION_COOKIE, value, settings.session_ttl)),
        Err(e) => {
            warn!(error = %e, "failed to encode session");
            jar
        }
    }
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

/// The unexpired session carried by the request, if any.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionData> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let session: SessionData = serde_json::from_str(cookie.value()).ok()?;
    (session.exp > Utc::now().timestamp()).then_some(session)
}

/// Extractor for admin-only handlers.
///
/// Anonymous requests are sent to `/login`; signed-in users without the
/// admin flag are sent back to `/`.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub user: DbUser,
    pub csrf: String,
}

impl AdminSession {
    pub fn verify_csrf(&self, token: &str) -> Result<(), SiteError> {
        if bool::from(self.csrf.as_bytes().ct_eq(token.as_bytes())) {
            Ok(())
        } else {
            warn!(user_id = self.user.id, "rejected form with bad CSRF token");
            Err(SiteError::Forbidden)
        }
    }
}

impl FromRequestParts<SiteState> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SiteState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        let Some(session) = read_session(&jar) else {
            return Err(redirect_with_flash(
                jar,
                &state.cookies,
                Flash::info("Please log in to access this page."),
                "/login",
            ));
        };

        let user = state
            .storage
            .get_user(session.user_id)
            .await
            .map_err(IntoResponse::into_response)?;

        match user {
            Some(user) if user.is_admin => Ok(AdminSession {
                user,
                csrf: session.csrf,
            }),
            Some(user) => {
                warn!(user_id = user.id, path = %parts.uri.path(), "non-admin blocked from admin area");
                Err(redirect_with_flash(
                    jar,
                    &state.cookies,
                    Flash::danger("You do not have permission to access the admin area."),
                    "/",
                ))
            }
            None => Err(redirect_with_flash(
                end_session(jar),
                &state.cookies,
                Flash::info("Please log in to access this page."),
                "/login",
            )),
        }
    }
}
