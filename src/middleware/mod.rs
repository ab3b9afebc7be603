pub mod auth;
pub mod cookies;
pub mod flash;
pub mod form;

pub use auth::AdminSession;
pub use cookies::CookieSettings;
pub use flash::Flash;
pub use form::MultipartForm;
