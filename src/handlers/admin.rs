use crate::middleware::AdminSession;
use crate::middleware::flash::{self, Flash, redirect_with_flash};
use crate::views::admin::FormTarget;
use crate::{SiteError, router::SiteState, views};
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

pub const DATE_FORMAT: &str = "%d %B %Y";

/// Body of forms that carry nothing but the CSRF token (delete buttons).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsrfForm {
    pub csrf_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub csrf_token: String,
    pub title: String,
    pub content: String,
}

impl PostForm {
    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// GET /admin
pub async fn dashboard(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let posts = state.storage.list_posts(None).await?;
    let projects = state.storage.list_projects().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::admin::dashboard(&posts, &projects, &admin.csrf, &flashes),
    )
        .into_response())
}

/// GET /admin/post/create
pub async fn post_create_page(admin: AdminSession, jar: PrivateCookieJar) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        views::admin::post_form(FormTarget::Create, "", "", &admin.csrf, &flashes),
    )
        .into_response()
}

/// POST /admin/post/create
pub async fn post_create(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Form(form): Form<PostForm>,
) -> Result<Response, SiteError> {
    admin.verify_csrf(&form.csrf_token)?;
    if !form.is_complete() {
        return Ok(invalid_post(FormTarget::Create, &form, &admin));
    }

    let date_posted = Utc::now().format(DATE_FORMAT).to_string();
    let id = state
        .storage
        .insert_post(&form.title, &form.content, &date_posted)
        .await?;
    info!(post_id = id, user_id = admin.user.id, "post created");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Post created!"),
        "/admin",
    ))
}

/// GET /admin/post/edit/{id}
pub async fn post_edit_page(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, SiteError> {
    let post = state.storage.get_post(id).await?.ok_or(SiteError::NotFound)?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::admin::post_form(
            FormTarget::Edit(post.id),
            &post.title,
            &post.content,
            &admin.csrf,
            &flashes,
        ),
    )
        .into_response())
}

/// POST /admin/post/edit/{id}
pub async fn post_edit(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, SiteError> {
    admin.verify_csrf(&form.csrf_token)?;
    if state.storage.get_post(id).await?.is_none() {
        return Err(SiteError::NotFound);
    }
    if !form.is_complete() {
        return Ok(invalid_post(FormTarget::Edit(id), &form, &admin));
    }

    state
        .storage
        .update_post(id, &form.title, &form.content)
        .await?;
    info!(post_id = id, user_id = admin.user.id, "post updated");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Post updated!"),
        "/admin",
    ))
}

/// POST /admin/post/delete/{id}
pub async fn post_delete(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, SiteError> {
    admin.verify_csrf(&form.csrf_token)?;
    state.storage.delete_post(id).await?;
    info!(post_id = id, user_id = admin.user.id, "post deleted");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Post deleted!"),
        "/admin",
    ))
}

fn invalid_post(target: FormTarget, form: &PostForm, admin: &AdminSession) -> Response {
    let flashes = [Flash::danger("Title and content are required.")];
    views::admin::post_form(target, &form.title, &form.content, &admin.csrf, &flashes)
        .into_response()
}
