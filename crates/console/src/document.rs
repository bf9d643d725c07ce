//! Plain-text documents read from disk

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use legalmind_core::{DocumentTextProvider, Error, Result};

/// Document provider backed by a UTF-8 text file
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    name: String,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentTextProvider for FileDocument {
    fn name(&self) -> &str {
        &self.name
    }

    async fn document_text(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                tracing::debug!(path = %self.path.display(), bytes = text.len(), "Read document");
                Ok(text)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::DocumentUnavailable(format!(
                "{} not found",
                self.path.display()
            ))),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(Error::InvalidDocument(format!(
                "{} is not UTF-8 text",
                self.path.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Licensee shall pay $75,000.").unwrap();

        let doc = FileDocument::new(file.path());
        assert_eq!(doc.document_text().await.unwrap(), "Licensee shall pay $75,000.");
        assert!(!doc.name().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let doc = FileDocument::new("/nonexistent/contract.txt");
        assert_eq!(doc.name(), "contract.txt");
        assert!(matches!(
            doc.document_text().await,
            Err(Error::DocumentUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_binary_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x81]).unwrap();

        let doc = FileDocument::new(file.path());
        assert!(matches!(
            doc.document_text().await,
            Err(Error::InvalidDocument(_))
        ));
    }
}
