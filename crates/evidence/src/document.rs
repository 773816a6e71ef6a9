//! Document evidence source: text extraction from an established document.
//!
//! Extraction walks the document's units (lines for markdown and plain text,
//! text nodes for HTML) and concatenates per-unit text in document order. A
//! unit that yields no text contributes an empty string, so concatenation is
//! total over the whole document.

use docqa_core::{AppError, AppResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A source of primary (document) evidence.
///
/// Implementations extract the full text of an already-resolved document.
/// The pipeline treats the document itself as opaque; only the extracted
/// text crosses this boundary.
pub trait DocumentSource: Send + Sync {
    /// Extract the full document text, in document order.
    fn extract(&self) -> AppResult<String>;

    /// Human-readable description of the document (for logging).
    fn describe(&self) -> String;
}

/// Content type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    Html,
    PlainText,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("html") | Some("htm") => Self::Html,
            Some("txt") => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::PlainText => "text",
            Self::Unknown => "unknown",
        }
    }
}

/// A document backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    content_type: ContentType,
}

impl FileDocument {
    /// Resolve a document from a file path.
    ///
    /// The file must exist; content type is detected from the extension.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        if !path.is_file() {
            return Err(AppError::Document(format!(
                "Document file does not exist: {:?}",
                path
            )));
        }

        let content_type = ContentType::from_path(&path);

        Ok(Self { path, content_type })
    }

    /// The detected content type.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileDocument {
    fn extract(&self) -> AppResult<String> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Document(format!("Failed to read {:?}: {}", self.path, e)))?;

        if !is_likely_text(&raw) {
            tracing::warn!("Refusing likely binary file: {:?}", self.path);
            return Err(AppError::Document(
                "Binary documents are not supported".to_string(),
            ));
        }

        let text = match self.content_type {
            ContentType::Markdown => extract_markdown(&raw),
            ContentType::Html => extract_html(&raw),
            ContentType::PlainText | ContentType::Unknown => extract_plain(&raw),
        };

        tracing::debug!(
            "Extracted {} bytes from {:?} ({})",
            text.len(),
            self.path,
            self.content_type.as_str()
        );

        Ok(text)
    }

    fn describe(&self) -> String {
        format!("{:?} ({})", self.path, self.content_type.as_str())
    }
}

/// Extract text from markdown, line by line.
///
/// Header markers are stripped, code fences and horizontal rules are
/// structural and yield nothing. Each line is one unit; a unit with no text
/// contributes an empty string.
fn extract_markdown(raw: &str) -> String {
    let units: Vec<String> = raw
        .lines()
        .map(|line| {
            let trimmed = line.trim_start_matches('#').trim();

            if trimmed.starts_with("---")
                || trimmed.starts_with("```")
                || trimmed.starts_with("~~~")
            {
                String::new()
            } else {
                trimmed.to_string()
            }
        })
        .collect();

    join_units(&units)
}

/// Extract text from HTML by stripping tags.
///
/// Script and style elements yield nothing; every other text node is a unit.
fn extract_html(raw: &str) -> String {
    fn tag_starts_with(rest: &str, tag: &str) -> bool {
        rest.get(..tag.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(tag))
    }

    let mut result = String::with_capacity(raw.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, ch) in raw.char_indices() {
        if ch == '<' {
            in_tag = true;

            let rest = &raw[i..];
            if tag_starts_with(rest, "<script") {
                in_script = true;
            } else if tag_starts_with(rest, "</script") {
                in_script = false;
            } else if tag_starts_with(rest, "<style") {
                in_style = true;
            } else if tag_starts_with(rest, "</style") {
                in_style = false;
            }
        } else if ch == '>' {
            in_tag = false;
        } else if !in_tag && !in_script && !in_style {
            result.push(ch);
        }
    }

    // Collapse whitespace left behind by removed markup
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract plain text, line by line.
fn extract_plain(raw: &str) -> String {
    let units: Vec<String> = raw.lines().map(|line| line.trim().to_string()).collect();
    join_units(&units)
}

/// Concatenate per-unit text in document order.
///
/// Empty units are dropped from the joined output but never break the
/// concatenation.
fn join_units(units: &[String]) -> String {
    units
        .iter()
        .filter(|unit| !unit.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check if text is likely UTF-8 text (not binary).
fn is_likely_text(data: &str) -> bool {
    !data.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            ContentType::from_path(Path::new("file.md")),
            ContentType::Markdown
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.html")),
            ContentType::Html
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.txt")),
            ContentType::PlainText
        );
        assert_eq!(
            ContentType::from_path(Path::new("file.bin")),
            ContentType::Unknown
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = FileDocument::open("/nonexistent/file.md");
        assert!(matches!(result, Err(AppError::Document(_))));
    }

    #[test]
    fn test_extract_markdown() {
        let (_dir, path) = write_temp(
            "doc.md",
            "# Header\n\nSome text\n\n```rust\ncode\n```\n\nMore text\n",
        );
        let doc = FileDocument::open(path).unwrap();
        let text = doc.extract().unwrap();

        assert!(text.contains("Header"));
        assert!(text.contains("Some text"));
        assert!(text.contains("More text"));
        assert!(!text.contains("```"));
    }

    #[test]
    fn test_extract_html() {
        let (_dir, path) = write_temp(
            "doc.html",
            "<html><body><p>Hello <b>world</b></p><script>var x;</script></body></html>",
        );
        let doc = FileDocument::open(path).unwrap();
        let text = doc.extract().unwrap();

        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_extract_plain_text() {
        let (_dir, path) = write_temp("doc.txt", "line one\n\n  line two  \n");
        let doc = FileDocument::open(path).unwrap();
        let text = doc.extract().unwrap();

        assert_eq!(text, "line one\nline two");
    }

    #[test]
    fn test_empty_units_do_not_break_extraction() {
        let (_dir, path) = write_temp("doc.txt", "\n\n\n");
        let doc = FileDocument::open(path).unwrap();
        let text = doc.extract().unwrap();

        assert_eq!(text, "");
    }
}
