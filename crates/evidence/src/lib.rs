//! Evidence sources for the docqa pipeline.
//!
//! Two kinds of evidence feed answer generation:
//! - **Document evidence**: full text extracted from the established document
//!   (`document`, `session`)
//! - **Search evidence**: snippets returned by an external web search
//!   (`search`)
//!
//! Both are adapters around external capabilities; the pipeline consumes them
//! through the `DocumentSource` and `SearchProvider` traits.

pub mod document;
pub mod search;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use document::{ContentType, DocumentSource, FileDocument};
pub use search::{DuckDuckGoSearch, SearchProvider};
pub use session::DocumentSession;
pub use types::EvidenceBlock;
