//! Image ingestion: local files become inline data URIs

use crate::descriptor::Patch;
use crate::Result;
use base64::Engine as _;
use std::path::Path;

/// Which upload control an image came through
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum UploadSlot {
    /// Replaces the logo
    Logo,
    /// Appended to the screenshots
    Screenshot,
}

impl UploadSlot {
    pub fn patch(self, uri: String) -> Patch {
        match self {
            UploadSlot::Logo => Patch::SetLogo(uri),
            UploadSlot::Screenshot => Patch::AddScreenshot(uri),
        }
    }
}

/// MIME type guessed from the file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Read `path` and produce the patch for `slot`
pub async fn ingest_image(path: &Path, slot: UploadSlot) -> Result<Patch> {
    let bytes = tokio::fs::read(path).await?;
    let mime = mime_for_path(path);
    log::debug!("ingested {} ({} bytes, {}) as {:?}", path.display(), bytes.len(), mime, slot);
    Ok(slot.patch(encode_data_uri(&bytes, mime)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(&PathBuf::from("a/b/logo.PNG")), "image/png");
        assert_eq!(mime_for_path(&PathBuf::from("shot.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(&PathBuf::from("icon.svg")), "image/svg+xml");
        assert_eq!(mime_for_path(&PathBuf::from("noext")), "application/octet-stream");
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(encode_data_uri(b"hello", "image/png"), "data:image/png;base64,aGVsbG8=");
        assert_eq!(encode_data_uri(b"", "image/gif"), "data:image/gif;base64,");
    }

    #[test]
    fn slots_map_to_patches() {
        assert_eq!(UploadSlot::Logo.patch("u".into()), Patch::SetLogo("u".into()));
        assert_eq!(
            UploadSlot::Screenshot.patch("u".into()),
            Patch::AddScreenshot("u".into())
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = ingest_image(Path::new("/definitely/not/here.png"), UploadSlot::Logo)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
