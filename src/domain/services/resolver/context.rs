//! Resolution context: the run-wide cache and the per-chain visited set.

use std::collections::{BTreeSet, HashMap};

use crate::domain::document::Document;
use crate::domain::value_objects::{CanonicalPath, ResolutionWarning};

/// Fully resolved documents by canonical path, for one run.
///
/// Populated lazily and never invalidated while the run lasts.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<CanonicalPath, Document>,
    hits: usize,
    misses: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resolved document, counting the hit or miss.
    pub fn lookup(&mut self, path: &CanonicalPath) -> Option<Document> {
        match self.entries.get(path) {
            Some(document) => {
                self.hits += 1;
                Some(document.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, path: CanonicalPath, document: Document) {
        self.entries.insert(path, document);
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// Documents in progress on one resolution chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet(BTreeSet<CanonicalPath>);

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: CanonicalPath) -> bool {
        self.0.insert(path)
    }

    pub fn contains(&self, path: &CanonicalPath) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.0.iter()
    }
}

/// State threaded through one resolution chain.
///
/// The cache and warning sink are shared by the whole run; the visited set
/// belongs to this chain alone. [`ResolutionContext::fork`] is the only way
/// to hand state to a sub-resolution, and it always copies the visited set,
/// so siblings never see each other's entries.
#[derive(Debug)]
pub struct ResolutionContext<'run> {
    cache: &'run mut ResolutionCache,
    warnings: &'run mut Vec<ResolutionWarning>,
    visited: VisitedSet,
}

impl<'run> ResolutionContext<'run> {
    pub fn new(
        cache: &'run mut ResolutionCache,
        warnings: &'run mut Vec<ResolutionWarning>,
    ) -> Self {
        Self {
            cache,
            warnings,
            visited: VisitedSet::new(),
        }
    }

    /// Context for a sub-resolution with its own copy of the visited set.
    pub fn fork(&mut self) -> ResolutionContext<'_> {
        ResolutionContext {
            cache: &mut *self.cache,
            warnings: &mut *self.warnings,
            visited: self.visited.clone(),
        }
    }

    pub fn cache(&mut self) -> &mut ResolutionCache {
        &mut *self.cache
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn enter(&mut self, path: CanonicalPath) {
        self.visited.insert(path);
    }

    /// Cycle edges skipped so far in this run.
    pub fn cycle_cuts(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| matches!(warning, ResolutionWarning::CircularRequire { .. }))
            .count()
    }

    pub fn warn(&mut self, warning: ResolutionWarning) {
        tracing::warn!(code = warning.code(), "{}", warning);
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forks_do_not_share_visited_entries() {
        let mut cache = ResolutionCache::new();
        let mut warnings = Vec::new();
        let mut root = ResolutionContext::new(&mut cache, &mut warnings);
        root.enter(CanonicalPath::new("root.yaml"));

        {
            let mut left = root.fork();
            left.enter(CanonicalPath::new("left.yaml"));
            assert!(left.visited().contains(&CanonicalPath::new("root.yaml")));
        }
        {
            let right = root.fork();
            assert!(!right.visited().contains(&CanonicalPath::new("left.yaml")));
        }

        assert_eq!(root.visited().len(), 1);
    }

    #[test]
    fn forks_share_the_cache() {
        let mut cache = ResolutionCache::new();
        let mut warnings = Vec::new();
        let path = CanonicalPath::new("d.yaml");
        {
            let mut root = ResolutionContext::new(&mut cache, &mut warnings);
            let mut child = root.fork();
            child.cache().insert(
                path.clone(),
                Document::new(
                    "d.yaml".into(),
                    crate::domain::document::DefinitionName::Declared("D".to_string()),
                    Vec::new(),
                    Default::default(),
                ),
            );
        }
        assert!(cache.contains(&path));
        assert!(cache.lookup(&path).is_some());
        assert_eq!(cache.hits(), 1);
    }
}
