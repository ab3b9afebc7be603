use crate::db::{DbUser, SiteStorage};
use crate::error::SiteError;
use crate::google_oauth::GoogleUserInfo;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::LazyLock;
use tracing::{info, warn};

/// Verified against when the username has no local credential, so unknown
/// and known usernames cost the same Argon2 work.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| {
    let salt = SaltString::generate(rand::thread_rng());
    Argon2::default()
        .hash_password(b"folio-unknown-user", &salt)
        .map(|hash| hash.to_string())
        .inspect_err(|e| warn!(error = %e, "failed to build dummy password hash"))
        .ok()
});

pub async fn hash_password(password: String) -> Result<String, SiteError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SiteError::PasswordHash(e.to_string()))
    })
    .await?
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, SiteError> {
    tokio::task::spawn_blocking(move || {
        let parsed =
            PasswordHash::new(&hash).map_err(|e| SiteError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await?
}

/// Check a username/password pair. `Ok(None)` covers unknown users, users
/// without a local credential and wrong passwords alike.
pub async fn authenticate_local(
    storage: &SiteStorage,
    username: &str,
    password: &str,
) -> Result<Option<DbUser>, SiteError> {
    let user = storage.get_user_by_username(username).await?;
    let Some((user, hash)) = user.and_then(|u| u.password_hash.clone().map(|h| (u, h))) else {
        burn_verification(password.to_string()).await?;
        return Ok(None);
    };
    if verify_password(password.to_string(), hash).await? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

async fn burn_verification(password: String) -> Result<(), SiteError> {
    tokio::task::spawn_blocking(move || {
        let parsed = DUMMY_HASH.as_deref().and_then(|h| PasswordHash::new(h).ok());
        if let Some(parsed) = parsed {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
    })
    .await?;
    Ok(())
}

/// Map a Google profile onto a local user, creating it on first login.
/// Only the very first user of the site is granted admin.
pub async fn sign_in_google(
    storage: &SiteStorage,
    profile: &GoogleUserInfo,
) -> Result<DbUser, SiteError> {
    if profile.sub.is_empty() {
        return Err(SiteError::OauthFlowError(
            "userinfo response has an empty subject".to_string(),
        ));
    }
    let user = storage
        .upsert_google_user(&profile.sub, profile.email.as_deref())
        .await?;
    info!(
        user_id = user.id,
        is_admin = user.is_admin,
        "google account signed in"
    );
    Ok(user)
}

/// Create a local admin account. Fails if the username is taken.
pub async fn create_admin(
    storage: &SiteStorage,
    username: &str,
    password: &str,
) -> Result<i64, SiteError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(SiteError::BadRequest(
            "username and password must not be empty".to_string(),
        ));
    }
    if storage.get_user_by_username(username).await?.is_some() {
        return Err(SiteError::BadRequest(format!(
            "username '{username}' already exists"
        )));
    }
    let hash = hash_password(password.to_string()).await?;
    let id = storage.insert_local_user(username, &hash, true).await?;
    info!(user_id = id, username = %username, "admin account created");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_hash_is_a_usable_argon2_hash() {
        let hash = DUMMY_HASH.as_deref().expect("dummy hash was not built");
        let parsed = PasswordHash::new(hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"folio-unknown-user", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn unknown_usernames_are_rejected_after_verification() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("accounts.sqlite").display());
        let storage = crate::db::connect(&url).await.unwrap();

        let google_only = storage.upsert_google_user("g-1", None).await.unwrap();
        assert!(google_only.password_hash.is_none());

        assert!(
            authenticate_local(&storage, "nobody", "pw")
                .await
                .unwrap()
                .is_none()
        );
        burn_verification("pw".to_string()).await.unwrap();
    }
}
