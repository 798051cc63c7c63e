//! Requirement resolver
//!
//! Resolves a definition's `require` directives into one self-contained
//! document:
//! - parents apply in declared order, each layered over the ones before it
//! - the document's own body is layered last and wins over every parent
//! - nested `require` directives anywhere in the body resolve the same way
//! - a require that points back into the current chain is skipped with a
//!   warning
//! - every resolved document is cached by canonical path for the run, except
//!   one whose chain cut a cycle below a nested request

mod context;

use std::path::{Path, PathBuf};

use crate::domain::document::{parse_requires, Document, RequireRef, NAME_KEY, REQUIRE_KEY};
use crate::domain::ports::{DocumentSource, LoadError};
use crate::domain::value::{Mapping, Value};
use crate::domain::value_objects::{CanonicalPath, ResolutionWarning};

use super::merge::merge_mappings;

pub use context::{ResolutionCache, ResolutionContext, VisitedSet};

/// Default extension of definition files.
pub const DEFAULT_EXTENSION: &str = "yaml";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot resolve {path} (required by {required_by})")]
    Require {
        path: CanonicalPath,
        required_by: CanonicalPath,
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// The load failure at the bottom of the require chain.
    pub fn load_error(&self) -> &LoadError {
        match self {
            ResolveError::Load(err) => err,
            ResolveError::Require { source, .. } => source.load_error(),
        }
    }

    /// Requiring documents from the outermost inwards.
    pub fn chain(&self) -> Vec<&CanonicalPath> {
        let mut chain = Vec::new();
        let mut current = self;
        while let ResolveError::Require {
            required_by,
            source,
            ..
        } = current
        {
            chain.push(required_by);
            current = source;
        }
        chain
    }
}

/// A model that failed in a batch.
#[derive(Debug)]
pub struct ModelFailure {
    pub path: PathBuf,
    pub error: ResolveError,
}

/// Outcome of resolving several models against one cache.
#[derive(Debug, Default)]
pub struct BatchResolution {
    pub resolved: Vec<Document>,
    pub failures: Vec<ModelFailure>,
    pub warnings: Vec<ResolutionWarning>,
}

impl BatchResolution {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct RequirementResolver<S: DocumentSource> {
    source: S,
    source_root: PathBuf,
    extension: String,
    cache: ResolutionCache,
    warnings: Vec<ResolutionWarning>,
}

impl<S: DocumentSource> RequirementResolver<S> {
    pub fn new(source: S, source_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            source_root: source_root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            cache: ResolutionCache::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<ResolutionWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// File path a reference points at.
    pub fn reference_path(&self, reference: &RequireRef) -> PathBuf {
        reference.to_path(&self.source_root, &self.extension)
    }

    /// Resolve the model stored at `path`.
    pub fn resolve_path(&mut self, path: &Path) -> Result<Document, ResolveError> {
        let walker = Walker {
            source: &self.source,
            source_root: &self.source_root,
            extension: &self.extension,
        };
        let canonical = self.source.canonicalize(path);
        let ctx = ResolutionContext::new(&mut self.cache, &mut self.warnings);
        walker.resolve(ctx, canonical)
    }

    pub fn resolve_reference(&mut self, reference: &RequireRef) -> Result<Document, ResolveError> {
        let path = self.reference_path(reference);
        self.resolve_path(&path)
    }

    /// Resolve an already loaded document without caching it.
    pub fn resolve_document(&mut self, document: Document) -> Result<Document, ResolveError> {
        let walker = Walker {
            source: &self.source,
            source_root: &self.source_root,
            extension: &self.extension,
        };
        let ctx = ResolutionContext::new(&mut self.cache, &mut self.warnings);
        walker.resolve_loaded(ctx, document)
    }

    /// Resolve every model in `paths`, in order, sharing one cache.
    ///
    /// A failing model is reported and does not stop the others.
    pub fn resolve_manifest(&mut self, paths: &[PathBuf]) -> BatchResolution {
        let mut batch = BatchResolution::default();
        for path in paths {
            match self.resolve_path(path) {
                Ok(document) => batch.resolved.push(document),
                Err(error) => {
                    tracing::error!(path = %path.display(), "{}", error);
                    batch.failures.push(ModelFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }
        batch.warnings = self.take_warnings();
        tracing::debug!(
            resolved = batch.resolved.len(),
            failed = batch.failures.len(),
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "manifest resolved"
        );
        batch
    }
}

/// The recursive part of resolution, borrowing the resolver's settings so
/// the cache can travel separately inside the context.
struct Walker<'a, S: ?Sized> {
    source: &'a S,
    source_root: &'a Path,
    extension: &'a str,
}

impl<S: DocumentSource + ?Sized> Walker<'_, S> {
    fn resolve(
        &self,
        mut ctx: ResolutionContext<'_>,
        path: CanonicalPath,
    ) -> Result<Document, ResolveError> {
        if let Some(document) = ctx.cache().lookup(&path) {
            tracing::debug!(path = %path, "cache hit");
            return Ok(document);
        }

        tracing::debug!(path = %path, "loading");
        let document = self.source.load(path.as_path())?;
        let cuts_before = ctx.cycle_cuts();
        let resolved = self.resolve_loaded(ctx.fork(), document)?;

        // A cut edge makes the result depend on the chain above; only a
        // top-level resolution is free of that.
        if ctx.visited().is_empty() || ctx.cycle_cuts() == cuts_before {
            ctx.cache().insert(path, resolved.clone());
        } else {
            tracing::debug!(path = %path, "cycle-truncated, not cached");
        }
        Ok(resolved)
    }

    fn resolve_loaded(
        &self,
        mut ctx: ResolutionContext<'_>,
        document: Document,
    ) -> Result<Document, ResolveError> {
        let path = self.source.canonicalize(document.path());
        ctx.enter(path.clone());

        if document.name().is_placeholder() {
            ctx.warn(ResolutionWarning::MissingName {
                path: path.clone(),
                placeholder: document.name().to_string(),
            });
        }

        let own = self.visit_mapping(&mut ctx, &path, document.body().clone())?;
        let mut body = self.layer(&mut ctx, &path, document.requires(), own)?;

        body.remove(REQUIRE_KEY);
        body.insert(NAME_KEY.to_string(), Value::string(document.name().as_str()));

        Ok(Document::new(
            document.path().to_path_buf(),
            document.name().clone(),
            document.requires().to_vec(),
            body,
        ))
    }

    /// Layer `own` over the resolved parents, in declared order.
    fn layer(
        &self,
        ctx: &mut ResolutionContext<'_>,
        owner: &CanonicalPath,
        requires: &[RequireRef],
        own: Mapping,
    ) -> Result<Mapping, ResolveError> {
        let mut accumulated = Mapping::new();

        for reference in requires {
            let parent_path = self
                .source
                .canonicalize(&reference.to_path(self.source_root, self.extension));

            if ctx.visited().contains(&parent_path) {
                ctx.warn(ResolutionWarning::CircularRequire {
                    path: parent_path,
                    required_by: owner.clone(),
                });
                continue;
            }

            tracing::debug!(parent = %parent_path, child = %owner, "applying require");
            let parent = self
                .resolve(ctx.fork(), parent_path.clone())
                .map_err(|source| ResolveError::Require {
                    path: parent_path,
                    required_by: owner.clone(),
                    source: Box::new(source),
                })?;
            accumulated = merge_mappings(accumulated, parent.into_body());
        }

        Ok(merge_mappings(accumulated, own))
    }

    fn visit(
        &self,
        ctx: &mut ResolutionContext<'_>,
        owner: &CanonicalPath,
        value: Value,
    ) -> Result<Value, ResolveError> {
        match value {
            Value::Mapping(map) => self.visit_mapping(ctx, owner, map).map(Value::Mapping),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.visit(&mut ctx.fork(), owner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            scalar @ Value::Scalar(_) => Ok(scalar),
        }
    }

    /// Resolve the children of a mapping, then any `require` it carries.
    fn visit_mapping(
        &self,
        ctx: &mut ResolutionContext<'_>,
        owner: &CanonicalPath,
        mut map: Mapping,
    ) -> Result<Mapping, ResolveError> {
        let requires = match map.remove(REQUIRE_KEY) {
            Some(value) => parse_requires(&value).map_err(|message| LoadError::InvalidRequire {
                path: owner.as_path().to_path_buf(),
                message,
            })?,
            None => Vec::new(),
        };

        let mut own = Mapping::new();
        for (key, value) in map {
            let resolved = self.visit(&mut ctx.fork(), owner, value)?;
            own.insert(key, resolved);
        }

        if requires.is_empty() {
            return Ok(own);
        }
        self.layer(ctx, owner, &requires, own)
    }
}
