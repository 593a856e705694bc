//! Request-scoped scratch directory and generated-file bookkeeping.

use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;
use tempfile::TempDir;
use tracing::debug;

const WORKSPACE_PREFIX: &str = "docgen-";

/// Temporary directory owned by one request.
///
/// Removed by `close` on the success path; `Drop` removes it on every other
/// path, including early returns and panics.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()?;
        debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory and reports any failure.
    pub fn close(self) -> io::Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed workspace {}", path.display());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated files
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Docx,
    Pdf,
}

/// One output document, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub content: Bytes,
}

impl GeneratedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// `.docx` files are Word documents; everything else the generators emit is PDF.
    pub fn kind(&self) -> FileKind {
        if self.file_name.ends_with(".docx") {
            FileKind::Docx
        } else {
            FileKind::Pdf
        }
    }
}

/// Wire form of a generated file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedFile {
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Standard base64 with padding.
    pub content: String,
}

impl From<&GeneratedFile> for EncodedFile {
    fn from(file: &GeneratedFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            kind: file.kind(),
            content: STANDARD.encode(&file.content),
        }
    }
}

/// Reads every regular file directly under `dir`, sorted by file name.
pub async fn collect_files(dir: &Path) -> io::Result<Vec<GeneratedFile>> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let content = tokio::fs::read(entry.path()).await?;
        files.push(GeneratedFile::new(file_name, content));
    }
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_by_extension() {
        assert_eq!(GeneratedFile::new("a_Training_Log.docx", vec![1u8]).kind(), FileKind::Docx);
        assert_eq!(GeneratedFile::new("a_Certificate_01-01-2020.pdf", vec![1u8]).kind(), FileKind::Pdf);
        assert_eq!(GeneratedFile::new("unknown.bin", vec![1u8]).kind(), FileKind::Pdf);
    }

    #[test]
    fn test_encoded_file_wire_shape() {
        let encoded = EncodedFile::from(&GeneratedFile::new("x.pdf", b"%PDF".to_vec()));
        let json = serde_json::to_value(&encoded).unwrap();
        assert_eq!(json["fileName"], "x.pdf");
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["content"], "JVBERg==");
    }

    #[tokio::test]
    async fn test_collect_files_sorted_and_skips_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"b").unwrap();
        std::fs::write(dir.path().join("a.docx"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = collect_files(dir.path()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.docx", "b.pdf"]);
        assert_eq!(files[1].content, Bytes::from_static(b"b"));
    }

    #[test]
    fn test_workspace_close_removes_directory() {
        let ws = Workspace::create().unwrap();
        let path = ws.path().to_path_buf();
        std::fs::write(path.join("scratch.txt"), b"x").unwrap();
        assert!(path.exists());
        ws.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_workspace_drop_removes_directory() {
        let path = {
            let ws = Workspace::create().unwrap();
            ws.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_workspace_uses_prefix() {
        let ws = Workspace::create().unwrap();
        let name = ws.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("docgen-"), "{name}");
    }
}
