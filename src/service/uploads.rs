use crate::error::SiteError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Checks that `filename` has an extension from [`ALLOWED_EXTENSIONS`] (case-insensitive).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce a client supplied filename to a flat, ASCII-only name.
///
/// Path separators act as word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// The single directory user images are written to.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), SiteError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Write `bytes` under the sanitised form of `filename`, replacing any
    /// existing file of that name. Returns the stored name.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String, SiteError> {
        let name = secure_filename(filename);
        if name.is_empty() || !allowed_file(&name) {
            return Err(SiteError::BadRequest(format!(
                "unusable upload filename {filename:?}"
            )));
        }
        tokio::fs::write(self.path_of(&name), bytes).await?;
        info!(filename = %name, size = bytes.len(), "image stored");
        Ok(name)
    }

    /// Best-effort removal; failures are logged and ignored.
    pub async fn remove(&self, filename: &str) {
        let name = secure_filename(filename);
        if name.is_empty() {
            return;
        }
        match tokio::fs::remove_file(self.path_of(&name)).await {
            Ok(()) => info!(filename = %name, "image removed"),
            Err(e) => debug!(filename = %name, error = %e, "image removal skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_file_checks_last_extension() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("archive.tar.JPG"));
        assert!(allowed_file("a.jpeg"));
        assert!(allowed_file("anim.Gif"));
        assert!(!allowed_file("photo.webp"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("photo.png.exe"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn secure_filename_flattens_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("My cool photo.png"), "My_cool_photo.png");
        assert_eq!(secure_filename("C:\\Users\\me\\pic.jpg"), "C_Users_me_pic.jpg");
        assert_eq!(secure_filename("..hidden.gif"), "hidden.gif");
    }

    #[test]
    fn secure_filename_drops_non_ascii() {
        assert_eq!(secure_filename("fötö.png"), "ft.png");
        assert_eq!(secure_filename("日本.png"), "png");
        assert_eq!(secure_filename("..."), "");
    }

    #[tokio::test]
    async fn save_overwrites_and_remove_is_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let name = store.save("my pic.png", b"first").await.unwrap();
        assert_eq!(name, "my_pic.png");
        store.save("my pic.png", b"second").await.unwrap();
        assert_eq!(std::fs::read(store.path_of(&name)).unwrap(), b"second");

        store.remove(&name).await;
        assert!(!store.path_of(&name).exists());
        // second removal must not panic or error
        store.remove(&name).await;
    }

    #[tokio::test]
    async fn save_rejects_disallowed_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        assert!(store.save("script.sh", b"x").await.is_err());
        assert!(store.save("日本", b"x").await.is_err());
    }
}
