//! Server-rendered HTML. Every piece of stored or submitted text goes through
//! [`esc`] before it is written into markup.

pub mod admin;
pub mod auth;
pub mod public;

use crate::middleware::flash::Flash;
use axum::http::StatusCode;
use axum::response::Html;
use std::fmt::Write;

pub const IMAGE_ROUTE: &str = "/static/images";

/// Escape text for use in element content and quoted attribute values.
pub fn esc(text: &str) -> String {
    ammonia::clean_text(text)
}

pub fn image_url(filename: &str) -> String {
    format!("{IMAGE_ROUTE}/{}", esc(filename))
}

/// Hidden form field carrying the session CSRF token.
pub fn csrf_field(csrf: &str) -> String {
    format!(r#"<input type="hidden" name="csrf_token" value="{}">"#, esc(csrf))
}

pub fn layout(title: &str, flashes: &[Flash], body: &str) -> Html<String> {
    let mut messages = String::new();
    for flash in flashes {
        let _ = write!(
            messages,
            r#"<div class="flash flash-{}">{}</div>"#,
            flash.level.as_str(),
            esc(&flash.message)
        );
    }
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 56rem; margin: 0 auto; padding: 1rem; }}
nav a {{ margin-right: 1rem; }}
.flash {{ padding: .5rem 1rem; margin: .5rem 0; border-radius: 4px; }}
.flash-success {{ background: #e6f4ea; }}
.flash-info {{ background: #e8f0fe; }}
.flash-danger {{ background: #fce8e6; }}
.content {{ white-space: pre-wrap; }}
img.thumb {{ max-width: 16rem; }}
</style>
</head>
<body>
<nav><a href="/">Home</a><a href="/blog">Blog</a><a href="/portfolio">Portfolio</a><a href="/about">About</a><a href="/admin">Admin</a></nav>
{messages}
<main>
{body}
</main>
</body>
</html>"#,
        title = esc(title),
    ))
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    let body = format!(
        r#"<h1>{} {}</h1><p>{}</p><p><a href="/">Back to the home page</a></p>"#,
        status.as_u16(),
        esc(&title),
        esc(message)
    );
    layout(&title, &[], &body)
}
