//! The upload directory: artwork images and order reference files.

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `data` under `name`, replacing any existing file of that name.
    /// `name` must already be a single plain path component.
    pub async fn save(&self, name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        if !is_plain_component(name) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("refusing to store upload as {:?}", name),
            ));
        }
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(name);
        tokio::fs::write(&path, data).await?;
        tracing::info!("Stored upload {} ({} bytes)", name, data.len());
        Ok(path)
    }

    /// Best-effort removal of previously saved uploads.
    pub async fn discard(&self, names: &[String]) {
        for name in names.iter().filter(|n| is_plain_component(n)) {
            if let Err(e) = tokio::fs::remove_file(self.root.join(name)).await {
                tracing::warn!("Could not remove upload {}: {}", name, e);
            }
        }
    }

    /// Map a requested relative path onto the upload directory.
    /// Absolute paths and anything climbing out with `..` map to nothing.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        let rel = Path::new(requested);
        if requested.is_empty()
            || !rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

/// Reduce a client-supplied filename to ASCII letters, digits, `_`, `.` and `-`.
///
/// Accented letters are decomposed first and keep their base letter.
/// Path separators and whitespace runs become `_`; leading and trailing dots
/// and underscores are stripped, so the result never names a parent directory.
/// May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(|c| c.is_ascii())
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stored name for an order reference file: `u{user_id}_{sanitized}`.
pub fn order_file_name(user_id: i64, original: &str) -> Option<String> {
    let clean = sanitize_filename(original);
    if clean.is_empty() {
        None
    } else {
        Some(format!("u{}_{}", user_id, clean))
    }
}

/// True when `name` is exactly one ordinary path component.
pub fn is_plain_component(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("a.png"), "a.png");
        assert_eq!(sanitize_filename("sketch-01_final.JPG"), "sketch-01_final.JPG");
    }

    #[test]
    fn sanitize_flattens_paths_and_spaces() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("my cat  photo.jpg"), "my_cat_photo.jpg");
        assert_eq!(sanitize_filename("C:\\Users\\me\\ref.png"), "C_Users_me_ref.png");
    }

    #[test]
    fn sanitize_drops_punctuation_and_non_ascii() {
        assert_eq!(sanitize_filename("a,b;c!.png"), "abc.png");
        assert_eq!(sanitize_filename("ескіз.png"), "png");
        assert_eq!(sanitize_filename("...hidden"), "hidden");
        assert_eq!(sanitize_filename("ескіз"), "");
    }

    #[test]
    fn sanitize_folds_accents_to_ascii() {
        assert_eq!(sanitize_filename("café.png"), "cafe.png");
        assert_eq!(sanitize_filename("Åsa Öberg.jpg"), "Asa_Oberg.jpg");
        assert_eq!(order_file_name(7, "naïve.png").as_deref(), Some("u7_naive.png"));
    }

    #[test]
    fn order_file_name_prefixes_user() {
        assert_eq!(order_file_name(7, "a.png").as_deref(), Some("u7_a.png"));
        assert_eq!(order_file_name(7, "b.png").as_deref(), Some("u7_b.png"));
        assert_eq!(order_file_name(7, "///"), None);
    }

    #[test]
    fn plain_components() {
        assert!(is_plain_component("sea.png"));
        assert!(is_plain_component("my sea, at dusk.png"));
        assert!(!is_plain_component(""));
        assert!(!is_plain_component("."));
        assert!(!is_plain_component(".."));
        assert!(!is_plain_component("a/b.png"));
        assert!(!is_plain_component("..\\b.png"));
    }

    #[test]
    fn resolve_rejects_escapes() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("u7_a.png"),
            Some(PathBuf::from("/srv/uploads/u7_a.png"))
        );
        assert_eq!(
            store.resolve("nested/x.png"),
            Some(PathBuf::from("/srv/uploads/nested/x.png"))
        );
        assert_eq!(store.resolve("../secret"), None);
        assert_eq!(store.resolve("a/../../secret"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve(""), None);
    }

    #[tokio::test]
    async fn save_writes_into_root() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path().join("uploads"));

        let path = store.save("u7_a.png", b"png-bytes").await.unwrap();

        assert_eq!(path, tmp.path().join("uploads/u7_a.png"));
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn discard_removes_saved_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        let kept = store.save("keep.png", b"k").await.unwrap();
        let gone = store.save("u7_a.png", b"a").await.unwrap();

        store
            .discard(&["u7_a.png".to_string(), "u7_missing.png".to_string()])
            .await;

        assert!(!gone.exists());
        assert!(kept.exists());
    }

    #[tokio::test]
    async fn save_refuses_path_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        assert!(store.save("../escape.png", b"x").await.is_err());
    }
}
