//! Document sources and sinks
//!
//! Reading the document is the session's only suspension point, so both
//! directions are async traits the host can implement.

use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Something a document can be read from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Read the whole document text
    async fn read(&self) -> SessionResult<String>;

    /// File name to suggest when saving, if the source has one
    fn name(&self) -> Option<String> {
        None
    }
}

/// Something a finished document can be written to
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write the final text; `suggested_name` is the file name to offer
    async fn write(&self, text: &str, suggested_name: &str) -> SessionResult<()>;
}

/// Document file on disk
///
/// As a sink it writes to its own path and ignores the suggested name.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    /// File at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSource for FileDocument {
    async fn read(&self) -> SessionResult<String> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SessionError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "document read");
        Ok(text)
    }

    fn name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

#[async_trait]
impl DocumentSink for FileDocument {
    async fn write(&self, text: &str, _suggested_name: &str) -> SessionResult<()> {
        tokio::fs::write(&self.path, text)
            .await
            .map_err(|e| SessionError::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "document written");
        Ok(())
    }
}

/// Sink that writes into a directory under the suggested name
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn write(&self, text: &str, suggested_name: &str) -> SessionResult<()> {
        let path = self.dir.join(suggested_name);
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| SessionError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "document written");
        Ok(())
    }
}

/// In-memory document, usable as source and sink
#[derive(Debug, Default)]
pub struct MemoryDocument {
    name: Option<String>,
    text: Mutex<String>,
    saved_as: Mutex<Option<String>>,
}

impl MemoryDocument {
    /// Document holding `text`
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: Mutex::new(text.into()),
            saved_as: Mutex::new(None),
        }
    }

    /// Builder: set the source file name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Current text
    pub async fn text(&self) -> String {
        self.text.lock().await.clone()
    }

    /// Name suggested by the last write
    pub async fn saved_as(&self) -> Option<String> {
        self.saved_as.lock().await.clone()
    }
}

#[async_trait]
impl DocumentSource for MemoryDocument {
    async fn read(&self) -> SessionResult<String> {
        Ok(self.text.lock().await.clone())
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

#[async_trait]
impl DocumentSink for MemoryDocument {
    async fn write(&self, text: &str, suggested_name: &str) -> SessionResult<()> {
        *self.text.lock().await = text.to_string();
        *self.saved_as.lock().await = Some(suggested_name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let doc = FileDocument::new(dir.path().join("page.html"));
        doc.write("<p>x</p>", "ignored.html").await.unwrap();
        assert_eq!(doc.read().await.unwrap(), "<p>x</p>");
        assert_eq!(doc.name().as_deref(), Some("page.html"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let doc = FileDocument::new("/nonexistent/labelize/page.html");
        assert!(matches!(doc.read().await, Err(SessionError::Io { .. })));
    }

    #[tokio::test]
    async fn directory_sink_uses_suggested_name() {
        let dir = tempfile::tempdir().unwrap();
        DirectorySink::new(dir.path()).write("x", "labeled.html").await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("labeled.html")).unwrap(), "x");
    }

    #[tokio::test]
    async fn memory_document_records_writes() {
        let doc = MemoryDocument::new("a").with_name("in.html");
        assert_eq!(doc.read().await.unwrap(), "a");
        doc.write("b", "out.html").await.unwrap();
        assert_eq!(doc.text().await, "b");
        assert_eq!(doc.saved_as().await.as_deref(), Some("out.html"));
    }
}
