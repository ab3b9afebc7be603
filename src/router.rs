use crate::config::Config;
use crate::db::{self, SiteStorage};
use crate::error::SiteError;
use crate::google_oauth::{GoogleOauthService, GoogleSettings};
use crate::handlers::{admin, auth, google_oauth, pages, projects, public};
use crate::middleware::CookieSettings;
use crate::service::uploads::UploadStore;
use crate::views::IMAGE_ROUTE;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SiteState {
    pub storage: SiteStorage,
    pub uploads: UploadStore,
    pub google: Option<GoogleOauthService>,
    pub cookies: CookieSettings,
    /// Password login attempts, keyed by lower-cased username.
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
    key: Key,
}

impl SiteState {
    pub fn new(
        storage: SiteStorage,
        uploads: UploadStore,
        key: Key,
        cfg: &Config,
    ) -> Result<Self, SiteError> {
        let google = GoogleSettings::from_config(cfg)?
            .map(GoogleOauthService::new)
            .transpose()?;
        let per_minute =
            NonZeroU32::new(cfg.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        Ok(Self {
            storage,
            uploads,
            google,
            cookies: CookieSettings::new(!cfg.insecure_cookie, cfg.session_ttl_hours),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            key,
        })
    }

    /// Open the database, prepare the upload directory and derive the cookie key.
    pub async fn from_config(cfg: &Config) -> Result<Self, SiteError> {
        let storage = db::connect(&cfg.database_url).await?;
        let uploads = UploadStore::new(&cfg.upload_dir);
        uploads.ensure_dir().await?;

        let key = match cfg.cookie_key_bytes()? {
            Some(bytes) => Key::from(&bytes[..]),
            None => {
                warn!("secret_key not set; sessions will not survive a restart");
                Key::generate()
            }
        };

        let state = Self::new(storage, uploads, key, cfg)?;
        info!(
            upload_dir = %state.uploads.dir().display(),
            google_login = state.google.is_some(),
            "site state ready"
        );
        Ok(state)
    }
}

impl FromRef<SiteState> for Key {
    fn from_ref(state: &SiteState) -> Self {
        state.key.clone()
    }
}

pub fn site_router(state: SiteState) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/post/create",
            get(admin::post_create_page).post(admin::post_create),
        )
        .route(
            "/admin/post/edit/{id}",
            get(admin::post_edit_page).post(admin::post_edit),
        )
        .route("/admin/post/delete/{id}", post(admin::post_delete))
        .route(
            "/admin/project/create",
            get(projects::project_create_page).post(projects::project_create),
        )
        .route(
            "/admin/project/edit/{id}",
            get(projects::project_edit_page).post(projects::project_edit),
        )
        .route("/admin/project/delete/{id}", post(projects::project_delete))
        .route(
            "/admin/home/edit",
            get(pages::home_edit_page).post(pages::home_edit),
        )
        .route(
            "/admin/about/edit",
            get(pages::about_edit_page).post(pages::about_edit),
        )
        .layer(DefaultBodyLimit::disable());

    let images = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/", get(public::home))
        .route("/blog", get(public::blog))
        .route("/portfolio", get(public::portfolio))
        .route("/about", get(public::about))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/login/google", get(google_oauth::google_login))
        .route("/auth/google", get(google_oauth::google_callback))
        .merge(admin_routes)
        .nest_service(IMAGE_ROUTE, images)
        .fallback(public::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
