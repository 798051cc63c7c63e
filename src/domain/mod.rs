//! Domain Layer
//!
//! The definition model and everything that can be decided about it without
//! touching the file system.
//!
//! ## Structure
//!
//! - `value` - The tagged value tree a document parses into
//! - `document` - Definition documents and require references
//! - `value_objects/` - Immutable value types (CanonicalPath, warnings)
//! - `services/` - Merge engine, resolver, graph builder, analytics
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Pure Functions** - Merging is total and deterministic
//! 3. **Ports & Adapters** - Documents are loaded through the `DocumentSource` port

pub mod document;
pub mod ports;
pub mod services;
pub mod value;
pub mod value_objects;
