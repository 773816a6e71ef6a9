//! Process-wide document session.
//!
//! Holds the currently established document. The handle is set once per
//! document and read by every pipeline invocation until a new document
//! replaces it. Invocations snapshot the handle at start, so replacing the
//! document cannot switch an in-flight invocation mid-query.

use crate::document::{DocumentSource, FileDocument};
use docqa_core::AppResult;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Shared holder for the established document.
#[derive(Default)]
pub struct DocumentSession {
    current: RwLock<Option<Arc<dyn DocumentSource>>>,
}

impl DocumentSession {
    /// Create an empty session with no established document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a file-backed document, replacing any previous one.
    pub fn establish_file(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let document = FileDocument::open(path.as_ref())?;
        tracing::info!("Established document: {}", document.describe());
        self.establish(Arc::new(document));
        Ok(())
    }

    /// Establish an arbitrary document source, replacing any previous one.
    pub fn establish(&self, document: Arc<dyn DocumentSource>) {
        let mut guard = self.current.write().expect("session lock poisoned");
        *guard = Some(document);
    }

    /// Whether a document is currently established.
    pub fn is_established(&self) -> bool {
        self.current
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Snapshot the current document handle.
    ///
    /// The returned handle stays valid for the whole invocation even if the
    /// session is re-established concurrently.
    pub fn snapshot(&self) -> Option<Arc<dyn DocumentSource>> {
        self.current.read().expect("session lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::AppError;

    struct StaticDocument(&'static str);

    impl DocumentSource for StaticDocument {
        fn extract(&self) -> AppResult<String> {
            Ok(self.0.to_string())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    #[test]
    fn test_empty_session() {
        let session = DocumentSession::new();
        assert!(!session.is_established());
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_establish_and_snapshot() {
        let session = DocumentSession::new();
        session.establish(Arc::new(StaticDocument("document text")));

        assert!(session.is_established());
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.extract().unwrap(), "document text");
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let session = DocumentSession::new();
        session.establish(Arc::new(StaticDocument("first")));

        let snapshot = session.snapshot().unwrap();
        session.establish(Arc::new(StaticDocument("second")));

        // The earlier snapshot still reads the first document
        assert_eq!(snapshot.extract().unwrap(), "first");
        assert_eq!(session.snapshot().unwrap().extract().unwrap(), "second");
    }

    #[test]
    fn test_establish_missing_file() {
        let session = DocumentSession::new();
        let result = session.establish_file("/nonexistent/file.md");
        assert!(matches!(result, Err(AppError::Document(_))));
        assert!(!session.is_established());
    }
}
