use super::{esc, image_url, layout};
use crate::db::{AboutPage, HomePage, Post, Project};
use crate::middleware::flash::Flash;
use axum::response::Html;
use std::fmt::Write;

fn post_list(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "<p>No posts yet.</p>".to_string();
    }
    let mut out = String::new();
    for post in posts {
        let _ = write!(
            out,
            r#"<article class="post" id="post-{id}"><h2>{title}</h2><small>{date}</small><div class="content">{content}</div></article>"#,
            id = post.id,
            title = esc(&post.title),
            date = esc(&post.date_posted),
            content = esc(&post.content),
        );
    }
    out
}

fn profile_picture(home: &HomePage) -> String {
    home.profile_pic
        .as_deref()
        .map(|pic| format!(r#"<img class="profile" src="{}" alt="profile picture">"#, image_url(pic)))
        .unwrap_or_default()
}

pub fn home(home: &HomePage, recent_posts: &[Post], flashes: &[Flash]) -> Html<String> {
    let body = format!(
        r#"<section class="intro">{pic}<h1>{title}</h1><p>{subtitle}</p></section>
<section><h2>Latest posts</h2>{posts}<p><a href="/blog">All posts</a></p></section>"#,
        pic = profile_picture(home),
        title = esc(&home.intro_title),
        subtitle = esc(&home.intro_subtitle),
        posts = post_list(recent_posts),
    );
    layout("Home", flashes, &body)
}

pub fn blog(posts: &[Post], flashes: &[Flash]) -> Html<String> {
    let body = format!("<h1>Blog</h1>{}", post_list(posts));
    layout("Blog", flashes, &body)
}

pub fn portfolio(projects: &[Project], flashes: &[Flash]) -> Html<String> {
    let mut items = String::new();
    for project in projects {
        let image = project
            .image_file
            .as_deref()
            .map(|f| format!(r#"<img class="thumb" src="{}" alt="project image">"#, image_url(f)))
            .unwrap_or_default();
        let _ = write!(
            items,
            r#"<article class="project" id="project-{}">{}<p class="content">{}</p></article>"#,
            project.id,
            image,
            esc(&project.description)
        );
    }
    if items.is_empty() {
        items.push_str("<p>No projects yet.</p>");
    }
    layout("Portfolio", flashes, &format!("<h1>Portfolio</h1>{items}"))
}

pub fn about(about: &AboutPage, home: &HomePage, flashes: &[Flash]) -> Html<String> {
    let mut skills = String::new();
    for skill in about.skill_list() {
        let _ = write!(skills, "<li>{}</li>", esc(skill));
    }
    let body = format!(
        r#"<h1>About</h1>{pic}<div class="content bio">{bio}</div><h2>Skills</h2><ul class="skills">{skills}</ul>"#,
        pic = profile_picture(home),
        bio = esc(&about.bio_text),
    );
    layout("About", flashes, &body)
}
