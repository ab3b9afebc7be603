mod common;

use folio::google_oauth::GoogleUserInfo;
use folio::service::accounts;

fn profile(sub: &str, email: &str) -> GoogleUserInfo {
    GoogleUserInfo {
        sub: sub.to_string(),
        email: Some(email.to_string()),
        name: None,
    }
}

#[tokio::test]
async fn first_google_user_becomes_admin() {
    let site = common::site().await;
    let storage = &site.state.storage;

    let first = accounts::sign_in_google(storage, &profile("g-1", "one@example.org"))
        .await
        .unwrap();
    assert!(first.is_admin);

    let second = accounts::sign_in_google(storage, &profile("g-2", "two@example.org"))
        .await
        .unwrap();
    assert!(!second.is_admin);
    assert_ne!(first.id, second.id);

    // returning users keep their id and flag, email is refreshed
    let again = accounts::sign_in_google(storage, &profile("g-2", "new@example.org"))
        .await
        .unwrap();
    assert_eq!(again.id, second.id);
    assert!(!again.is_admin);
    assert_eq!(again.email.as_deref(), Some("new@example.org"));
}

#[tokio::test]
async fn google_user_after_bootstrap_admin_is_not_admin() {
    let site = common::site().await;
    let storage = &site.state.storage;

    accounts::create_admin(storage, "root", "secret").await.unwrap();
    let user = accounts::sign_in_google(storage, &profile("g-1", "one@example.org"))
        .await
        .unwrap();
    assert!(!user.is_admin);
}

#[tokio::test]
async fn empty_subject_is_rejected() {
    let site = common::site().await;
    assert!(
        accounts::sign_in_google(&site.state.storage, &profile("", "x@example.org"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn create_admin_hashes_and_rejects_duplicates() {
    let site = common::site().await;
    let storage = &site.state.storage;

    let id = accounts::create_admin(storage, " root ", "secret").await.unwrap();
    let user = storage.get_user(id).await.unwrap().unwrap();
    assert_eq!(user.username.as_deref(), Some("root"));
    assert!(user.is_admin);
    let hash = user.password_hash.unwrap();
    assert!(hash.starts_with("$argon2"));

    assert!(accounts::create_admin(storage, "root", "other").await.is_err());
    assert!(accounts::create_admin(storage, "blank", "").await.is_err());

    let ok = accounts::authenticate_local(storage, "root", "secret")
        .await
        .unwrap();
    assert_eq!(ok.map(|u| u.id), Some(id));
    let bad = accounts::authenticate_local(storage, "root", "wrong")
        .await
        .unwrap();
    assert!(bad.is_none());
}
