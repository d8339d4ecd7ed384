//! Export of the generated markup as a file

use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Where an export went and what was written
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// Hex SHA-256 of the written content
    pub sha256: String,
}

pub fn digest(markup: &str) -> String {
    hex::encode(Sha256::digest(markup.as_bytes()))
}

/// Write `markup` unchanged to `dir/file_name`, creating `dir` if needed
pub fn write_readme(dir: &Path, file_name: &str, markup: &str) -> Result<ExportReport> {
    let is_plain_name = Path::new(file_name)
        .file_name()
        .map(|n| n == file_name)
        .unwrap_or(false);
    if !is_plain_name {
        return Err(Error::ConfigError(format!(
            "export file name must be a plain file name, got {:?}",
            file_name
        )));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, markup)?;

    let report = ExportReport {
        path,
        bytes: markup.len(),
        sha256: digest(markup),
    };
    log::info!(
        "exported {} ({} bytes, sha256 {})",
        report.path.display(),
        report.bytes,
        report.sha256
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable() {
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn rejects_paths_as_file_names() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["", "../README.md", "sub/README.md", ".."] {
            assert!(
                matches!(write_readme(dir.path(), bad, "x"), Err(Error::ConfigError(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn writes_content_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let text = "\n<h1 align=\"center\">X</h1>\n\n";
        let report = write_readme(&dir.path().join("out"), "README.md", text).unwrap();
        assert_eq!(std::fs::read_to_string(&report.path).unwrap(), text);
        assert_eq!(report.bytes, text.len());
        assert_eq!(report.sha256, digest(text));
    }
}
