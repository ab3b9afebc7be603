use super::{esc, layout};
use crate::middleware::flash::Flash;
use axum::response::Html;

pub fn login(google_enabled: bool, username: &str, flashes: &[Flash]) -> Html<String> {
    let google = if google_enabled {
        r#"<p><a class="google" href="/login/google">Sign in with Google</a></p>"#
    } else {
        ""
    };
    let body = format!(
        r#"<h1>Login</h1>{google}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Login</button>
</form>"#,
        username = esc(username),
    );
    layout("Login", flashes, &body)
}
