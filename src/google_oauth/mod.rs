//! Google sign-in: authorization-code flow with PKCE, then an OpenID userinfo lookup.

mod endpoints;
pub mod service;

pub use endpoints::GoogleUserInfo;
pub use service::{AuthorizeRedirect, GoogleOauthService, GoogleSettings};
