use crate::db::{DEFAULT_PROFILE_PIC, HomePage};
use crate::middleware::AdminSession;
use crate::middleware::flash::{self, Flash, redirect_with_flash};
use crate::middleware::form::{ImageUpload, MultipartForm};
use crate::{SiteError, router::SiteState, views};
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use super::projects::IMAGE_FORMAT;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AboutForm {
    pub csrf_token: String,
    pub bio_text: String,
    pub skills: String,
}

/// GET /admin/home/edit
pub async fn home_edit_page(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let page = state.storage.home_page_or_create().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::admin::home_form(&page, &admin.csrf, &flashes)).into_response())
}

/// POST /admin/home/edit
pub async fn home_edit(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    form: MultipartForm,
) -> Result<Response, SiteError> {
    admin.verify_csrf(form.text("csrf_token"))?;
    let mut page = state.storage.home_page_or_create().await?;

    let title = form.text("intro_title");
    let subtitle = form.text("intro_subtitle");
    if title.trim().is_empty() || subtitle.trim().is_empty() {
        let submitted = views::admin::home_form(
            &with_submitted_text(&page, title, subtitle),
            &admin.csrf,
            &[Flash::danger("Intro title and subtitle are required.")],
        );
        return Ok(submitted.into_response());
    }

    match form.image("profile_pic") {
        ImageUpload::Rejected => {
            let submitted = views::admin::home_form(
                &with_submitted_text(&page, title, subtitle),
                &admin.csrf,
                &[Flash::danger(IMAGE_FORMAT)],
            );
            return Ok(submitted.into_response());
        }
        ImageUpload::Missing => {}
        ImageUpload::Accepted(file) => {
            let stored = state.uploads.save(&file.file_name, &file.bytes).await?;
            if let Some(old) = page
                .profile_pic
                .as_deref()
                .filter(|old| *old != DEFAULT_PROFILE_PIC && *old != stored.as_str())
            {
                state.uploads.remove(old).await;
            }
            page.profile_pic = Some(stored);
        }
    }

    page.intro_title = title.to_string();
    page.intro_subtitle = subtitle.to_string();
    state.storage.update_home_page(&page).await?;
    info!(user_id = admin.user.id, "home page updated");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Home page updated!"),
        "/admin",
    ))
}

/// GET /admin/about/edit
pub async fn about_edit_page(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
) -> Result<Response, SiteError> {
    let page = state.storage.about_page_or_create().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, views::admin::about_form(&page, &admin.csrf, &flashes)).into_response())
}

/// POST /admin/about/edit
pub async fn about_edit(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Form(form): Form<AboutForm>,
) -> Result<Response, SiteError> {
    admin.verify_csrf(&form.csrf_token)?;
    let mut page = state.storage.about_page_or_create().await?;
    page.bio_text = form.bio_text;
    page.skills = form.skills;

    if page.bio_text.trim().is_empty() || page.skills.trim().is_empty() {
        let flashes = [Flash::danger("Biography and skills are required.")];
        return Ok(views::admin::about_form(&page, &admin.csrf, &flashes).into_response());
    }

    state.storage.update_about_page(&page).await?;
    info!(user_id = admin.user.id, "about page updated");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("About page updated!"),
        "/admin",
    ))
}

/// The stored home page with the submitted text applied, for re-rendering.
fn with_submitted_text(page: &HomePage, title: &str, subtitle: &str) -> HomePage {
    HomePage {
        intro_title: title.to_string(),
        intro_subtitle: subtitle.to_string(),
        ..page.clone()
    }
}
