use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Upper bound for `session_ttl_hours`, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Attributes shared by every cookie the site sets.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub session_ttl: Duration,
}

impl CookieSettings {
    pub fn new(secure: bool, session_ttl_hours: i64) -> Self {
        Self {
            secure,
            session_ttl: Duration::hours(session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
        }
    }

    pub fn build(&self, name: &str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build(Cookie::new(name.to_string(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }
}

pub fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ttl_is_clamped() {
        assert_eq!(
            CookieSettings::new(false, i64::MAX).session_ttl,
            Duration::hours(MAX_SESSION_TTL_HOURS)
        );
        assert_eq!(CookieSettings::new(false, -5).session_ttl, Duration::hours(1));
        assert_eq!(CookieSettings::new(true, 24).session_ttl, Duration::hours(24));
    }
}
