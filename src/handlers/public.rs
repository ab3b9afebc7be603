use crate::db::{AboutPage, HomePage};
use crate::middleware::flash;
use crate::{SiteError, router::SiteState, views};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

const RECENT_POSTS: i64 = 3;

/// GET / -> intro section and the latest posts.
pub async fn home(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let page = state
        .storage
        .home_page()
        .await?
        .unwrap_or_else(HomePage::defaults);
    let posts = state.storage.list_posts(Some(RECENT_POSTS)).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::public::home(&page, &posts, &flashes)).into_response())
}

/// GET /blog
pub async fn blog(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let posts = state.storage.list_posts(None).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::public::blog(&posts, &flashes)).into_response())
}

/// GET /portfolio
pub async fn portfolio(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let projects = state.storage.list_projects().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::public::portfolio(&projects, &flashes)).into_response())
}

/// GET /about -> biography, skills and the home page picture.
pub async fn about(
    State(state): State<SiteState>,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let about = state
        .storage
        .about_page()
        .await?
        .unwrap_or_else(AboutPage::defaults);
    let home = state
        .storage
        .home_page()
        .await?
        .unwrap_or_else(HomePage::defaults);
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::public::about(&about, &home, &flashes)).into_response())
}

pub async fn not_found() -> SiteError {
    SiteError::NotFound
}
