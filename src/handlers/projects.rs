use crate::middleware::AdminSession;
use crate::middleware::flash::{self, Flash, redirect_with_flash};
use crate::middleware::form::{ImageUpload, MultipartForm};
use crate::views::admin::FormTarget;
use crate::{SiteError, router::SiteState, views};
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::info;

use super::admin::CsrfForm;

pub const IMAGE_REQUIRED: &str = "You must upload an image for the project.";
pub const IMAGE_FORMAT: &str = "Image format not allowed. Use png, jpg, jpeg or gif.";
const DESCRIPTION_REQUIRED: &str = "Description is required.";

/// GET /admin/project/create
pub async fn project_create_page(admin: AdminSession, jar: PrivateCookieJar) -> Response {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        views::admin::project_form(FormTarget::Create, "", None, &admin.csrf, &flashes),
    )
        .into_response()
}

/// POST /admin/project/create
pub async fn project_create(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    form: MultipartForm,
) -> Result<Response, SiteError> {
    admin.verify_csrf(form.text("csrf_token"))?;
    let description = form.text("description");
    let rerender = |message: &str| {
        views::admin::project_form(
            FormTarget::Create,
            description,
            None,
            &admin.csrf,
            &[Flash::danger(message)],
        )
        .into_response()
    };

    if description.trim().is_empty() {
        return Ok(rerender(DESCRIPTION_REQUIRED));
    }
    let file = match form.image("project_image") {
        ImageUpload::Missing => return Ok(rerender(IMAGE_REQUIRED)),
        ImageUpload::Rejected => return Ok(rerender(IMAGE_FORMAT)),
        ImageUpload::Accepted(file) => file,
    };

    let image = state.uploads.save(&file.file_name, &file.bytes).await?;
    let id = state
        .storage
        .insert_project(description, Some(&image))
        .await?;
    info!(project_id = id, image = %image, user_id = admin.user.id, "project created");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Project created!"),
        "/admin",
    ))
}

/// GET /admin/project/edit/{id}
pub async fn project_edit_page(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, SiteError> {
    let project = state
        .storage
        .get_project(id)
        .await?
        .ok_or(SiteError::NotFound)?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        views::admin::project_form(
            FormTarget::Edit(project.id),
            &project.description,
            project.image_file.as_deref(),
            &admin.csrf,
            &flashes,
        ),
    )
        .into_response())
}

/// POST /admin/project/edit/{id}
///
/// A new image is written before the old one is removed, so a failed write
/// leaves the project pointing at a file that still exists.
pub async fn project_edit(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    form: MultipartForm,
) -> Result<Response, SiteError> {
    admin.verify_csrf(form.text("csrf_token"))?;
    let mut project = state
        .storage
        .get_project(id)
        .await?
        .ok_or(SiteError::NotFound)?;

    let description = form.text("description");
    let rerender = |message: &str, current_image: Option<&str>| {
        views::admin::project_form(
            FormTarget::Edit(id),
            description,
            current_image,
            &admin.csrf,
            &[Flash::danger(message)],
        )
        .into_response()
    };

    if description.trim().is_empty() {
        return Ok(rerender(DESCRIPTION_REQUIRED, project.image_file.as_deref()));
    }

    match form.image("project_image") {
        ImageUpload::Rejected => {
            return Ok(rerender(IMAGE_FORMAT, project.image_file.as_deref()));
        }
        ImageUpload::Missing if project.image_file.is_none() => {
            return Ok(rerender(IMAGE_REQUIRED, None));
        }
        ImageUpload::Missing => {}
        ImageUpload::Accepted(file) => {
            let stored = state.uploads.save(&file.file_name, &file.bytes).await?;
            if let Some(old) = project
                .image_file
                .as_deref()
                .filter(|old| *old != stored.as_str())
            {
                state.uploads.remove(old).await;
            }
            project.image_file = Some(stored);
        }
    }

    project.description = description.to_string();
    state.storage.update_project(&project).await?;
    info!(
        project_id = id,
        image = project.image_file.as_deref().unwrap_or(""),
        user_id = admin.user.id,
        "project updated"
    );
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Project updated!"),
        "/admin",
    ))
}

/// POST /admin/project/delete/{id}
pub async fn project_delete(
    State(state): State<SiteState>,
    admin: AdminSession,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, SiteError> {
    admin.verify_csrf(&form.csrf_token)?;
    let project = state
        .storage
        .get_project(id)
        .await?
        .ok_or(SiteError::NotFound)?;
    state.storage.delete_project(project.id).await?;
    if let Some(image) = project.image_file.as_deref() {
        state.uploads.remove(image).await;
    }
    info!(project_id = id, user_id = admin.user.id, "project deleted");
    Ok(redirect_with_flash(
        jar,
        &state.cookies,
        Flash::success("Project deleted!"),
        "/admin",
    ))
}
