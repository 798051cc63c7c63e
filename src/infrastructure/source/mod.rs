//! Document sources
//!
//! Implementations of the `DocumentSource` port.

mod discover;
mod memory;
mod yaml;

pub use discover::{discover_documents, IGNORE_FILE_NAME};
pub use memory::InMemoryDocumentSource;
pub use yaml::{parse_document, YamlDocumentSource};
