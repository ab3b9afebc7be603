use super::{csrf_field, esc, image_url, layout};
use crate::db::{AboutPage, HomePage, Post, Project};
use crate::middleware::flash::Flash;
use axum::response::Html;
use std::fmt::Write;

/// Where a create/edit form posts back to.
#[derive(Debug, Clone, Copy)]
pub enum FormTarget {
    Create,
    Edit(i64),
}

impl FormTarget {
    fn action(self, kind: &str) -> String {
        match self {
            FormTarget::Create => format!("/admin/{kind}/create"),
            FormTarget::Edit(id) => format!("/admin/{kind}/edit/{id}"),
        }
    }

    fn heading(self, noun: &str) -> String {
        match self {
            FormTarget::Create => format!("New {noun}"),
            FormTarget::Edit(_) => format!("Edit {noun}"),
        }
    }
}

fn delete_button(action: &str, csrf: &str) -> String {
    format!(
        r#"<form method="post" action="{action}" class="inline">{}<button type="submit">Delete</button></form>"#,
        csrf_field(csrf)
    )
}

pub fn dashboard(posts: &[Post], projects: &[Project], csrf: &str, flashes: &[Flash]) -> Html<String> {
    let mut body = String::from(
        r#"<h1>Dashboard</h1><p><a href="/admin/home/edit">Edit home page</a> | <a href="/admin/about/edit">Edit about page</a> | <a href="/logout">Logout</a></p>
<h2>Posts</h2><p><a href="/admin/post/create">New post</a></p><table class="posts">"#,
    );
    for post in posts {
        let _ = write!(
            body,
            r#"<tr id="post-{id}"><td>{title}</td><td>{date}</td><td><a href="/admin/post/edit/{id}">Edit</a></td><td>{delete}</td></tr>"#,
            id = post.id,
            title = esc(&post.title),
            date = esc(&post.date_posted),
            delete = delete_button(&format!("/admin/post/delete/{}", post.id), csrf),
        );
    }
    body.push_str(
        r#"</table><h2>Projects</h2><p><a href="/admin/project/create">New project</a></p><table class="projects">"#,
    );
    for project in projects {
        let _ = write!(
            body,
            r#"<tr id="project-{id}"><td>{description}</td><td>{image}</td><td><a href="/admin/project/edit/{id}">Edit</a></td><td>{delete}</td></tr>"#,
            id = project.id,
            description = esc(&project.description),
            image = project.image_file.as_deref().map(esc).unwrap_or_default(),
            delete = delete_button(&format!("/admin/project/delete/{}", project.id), csrf),
        );
    }
    body.push_str("</table>");
    layout("Admin", flashes, &body)
}

pub fn post_form(
    target: FormTarget,
    title: &str,
    content: &str,
    csrf: &str,
    flashes: &[Flash],
) -> Html<String> {
    let heading = target.heading("post");
    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">{csrf}
<label>Title <input name="title" value="{title}"></label>
<label>Content <textarea name="content" rows="12">{content}</textarea></label>
<button type="submit">Save post</button>
</form>"#,
        action = target.action("post"),
        csrf = csrf_field(csrf),
        title = esc(title),
        content = esc(content),
    );
    layout(&heading, flashes, &body)
}

pub fn project_form(
    target: FormTarget,
    description: &str,
    current_image: Option<&str>,
    csrf: &str,
    flashes: &[Flash],
) -> Html<String> {
    let heading = target.heading("project");
    let current = current_image
        .map(|f| {
            format!(
                r#"<p>Current image: <img class="thumb" src="{}" alt="current image"></p>"#,
                image_url(f)
            )
        })
        .unwrap_or_default();
    let body = format!(
        r#"<h1>{heading}</h1>{current}
<form method="post" action="{action}" enctype="multipart/form-data">{csrf}
<label>Description <textarea name="description" rows="6">{description}</textarea></label>
<label>Image <input type="file" name="project_image" accept=".png,.jpg,.jpeg,.gif"></label>
<button type="submit">Save project</button>
</form>"#,
        action = target.action("project"),
        csrf = csrf_field(csrf),
        description = esc(description),
    );
    layout(&heading, flashes, &body)
}

pub fn home_form(page: &HomePage, csrf: &str, flashes: &[Flash]) -> Html<String> {
    let current = page
        .profile_pic
        .as_deref()
        .map(|f| format!(r#"<p>Current picture: <img class="thumb" src="{}" alt="profile picture"></p>"#, image_url(f)))
        .unwrap_or_default();
    let body = format!(
        r#"<h1>Edit home page</h1>{current}
<form method="post" action="/admin/home/edit" enctype="multipart/form-data">{csrf}
<label>Intro title <input name="intro_title" value="{title}"></label>
<label>Intro subtitle <textarea name="intro_subtitle" rows="3">{subtitle}</textarea></label>
<label>Profile picture <input type="file" name="profile_pic" accept=".png,.jpg,.jpeg,.gif"></label>
<button type="submit">Save changes</button>
</form>"#,
        csrf = csrf_field(csrf),
        title = esc(&page.intro_title),
        subtitle = esc(&page.intro_subtitle),
    );
    layout("Edit home page", flashes, &body)
}

pub fn about_form(page: &AboutPage, csrf: &str, flashes: &[Flash]) -> Html<String> {
    let body = format!(
        r#"<h1>Edit about page</h1>
<form method="post" action="/admin/about/edit">{csrf}
<label>Biography <textarea name="bio_text" rows="8">{bio}</textarea></label>
<label>Skills (comma separated) <textarea name="skills" rows="3">{skills}</textarea></label>
<button type="submit">Save changes</button>
</form>"#,
        csrf = csrf_field(csrf),
        bio = esc(&page.bio_text),
        skills = esc(&page.skills),
    );
    layout("Edit about page", flashes, &body)
}
