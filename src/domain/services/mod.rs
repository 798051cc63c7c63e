//! Domain Services
//!
//! Pure logic over definitions: merging, inheritance resolution, and the
//! dependency graph. I/O goes through the `DocumentSource` port.

pub mod analysis;
pub mod graph;
pub mod merge;
pub mod resolver;
pub mod structure;

pub use graph::{DependencyGraph, GraphBuilder, GraphError, GraphWarning, ModelNode, RequireEdge};
pub use merge::{merge, merge_all, merge_mappings, merge_owned};
pub use resolver::{
    BatchResolution, ModelFailure, RequirementResolver, ResolutionCache, ResolutionContext,
    ResolveError, VisitedSet,
};
pub use structure::{merge_structure, record_key, RecordKey};
