//! One-shot messages shown on the next rendered page.

use super::cookies::{CookieSettings, clear_cookie};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::warn;

pub const FLASH_COOKIE: &str = "folio_flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }
}

fn queued(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

/// Queue a flash for the next page render.
pub fn push(jar: PrivateCookieJar, settings: &CookieSettings, flash: Flash) -> PrivateCookieJar {
    let mut flashes = queued(&jar);
    flashes.push(flash);
    match serde_json::to_string(&flashes) {
        Ok(value) => jar.add(settings.build(FLASH_COOKIE, value, Duration::minutes(5))),
        Err(e) => {
            warn!(error = %e, "failed to encode flash messages");
            jar
        }
    }
}

/// Drain queued flashes; the returned jar removes the cookie.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let flashes = queued(&jar);
    (jar.remove(clear_cookie(FLASH_COOKIE)), flashes)
}

/// 303 redirect carrying a flash message.
pub fn redirect_with_flash(
    jar: PrivateCookieJar,
    settings: &CookieSettings,
    flash: Flash,
    to: &str,
) -> Response {
    (push(jar, settings, flash), Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    #[test]
    fn pushed_flashes_are_taken_in_order() {
        let settings = CookieSettings::new(false, 1);
        let jar = PrivateCookieJar::new(Key::generate());
        let jar = push(jar, &settings, Flash::success("saved"));
        let jar = push(jar, &settings, Flash::danger("but check this"));

        let (jar, flashes) = take(jar);
        assert_eq!(
            flashes,
            vec![Flash::success("saved"), Flash::danger("but check this")]
        );

        let (_, again) = take(jar);
        assert!(again.is_empty());
    }
}
