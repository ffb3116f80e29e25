//! Memoized annotation of color fields in a document tree.
//!
//! Every scalar bound to a key ending in the color suffix (default `"color"`)
//! is replaced with `{value, cct}`. Sequences inherit the key of the mapping
//! entry that holds them, so `palette_color: [...]` annotates each element.
//! The document root has no key and is never annotated itself.
//!
//! Failures are fail-fast: the first malformed color aborts the walk. With
//! [`Annotator::annotate`] the input is untouched and nothing is returned; with
//! [`Annotator::annotate_in_place`] entries visited before the failure keep
//! their annotations and the rest are left as they were.

use std::time::Instant;
use tracing::{debug, info};

use crate::cache::{CacheStats, CctCache};
use crate::diagnostics::SuppressionGuard;
use crate::document::{AnnotatedValue, Node};
use crate::error::{CctError, Result};
use crate::estimate::{Dispatcher, Estimator};
use crate::hex::{DecodeError, decode_hex};
use crate::method::Method;
use crate::utils::is_color_key;

pub const DEFAULT_KEY_SUFFIX: &str = "color";

pub struct Annotator<E = Dispatcher> {
    estimator: E,
    cache: CctCache,
    method: Method,
    key_suffix: String,
    suppress_diagnostics: bool,
}

#[derive(Debug, Default)]
struct Walk {
    visited: usize,
    annotated: usize,
}

impl Annotator<Dispatcher> {
    pub fn new() -> Self {
        Self::with_estimator(Dispatcher::standard())
    }
}

impl Default for Annotator<Dispatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Estimator> Annotator<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self {
            estimator,
            cache: CctCache::new(),
            method: Method::default(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
            suppress_diagnostics: true,
        }
    }

    /// Method used for every lookup. Set it before the first lookup; cached
    /// values are keyed by hex string only.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_key_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.key_suffix = suffix.into();
        self
    }

    pub fn with_diagnostics_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_diagnostics = suppress;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn key_suffix(&self) -> &str {
        &self.key_suffix
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Annotated copy of `document`.
    pub fn annotate(&self, document: &Node) -> Result<Node> {
        let mut annotated = document.clone();
        self.annotate_in_place(&mut annotated)?;
        Ok(annotated)
    }

    pub fn annotate_in_place(&self, document: &mut Node) -> Result<()> {
        let _quiet = self.suppression();
        let started = Instant::now();
        let mut walk = Walk::default();
        debug!(method = %self.method, suffix = %self.key_suffix, "annotating document");

        self.visit(None, document, &mut walk)?;

        let stats = self.cache.stats();
        info!(
            visited = walk.visited,
            annotated = walk.annotated,
            cache_size = stats.size,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            elapsed_us = started.elapsed().as_micros() as u64,
            "document annotated"
        );
        Ok(())
    }

    /// CCT for a single hex string, through the cache.
    pub fn hex_to_cct(&self, hex: &str) -> Result<f64> {
        let _quiet = self.suppression();
        self.lookup(hex)
    }

    fn suppression(&self) -> Option<SuppressionGuard> {
        self.suppress_diagnostics.then(SuppressionGuard::acquire)
    }

    fn lookup(&self, hex: &str) -> Result<f64> {
        self.cache.get_or_try_insert_with(hex, || {
            let rgb = decode_hex(hex).map_err(|source| CctError::decode(hex, source))?;
            self.estimator.estimate(rgb, self.method)
        })
    }

    fn visit(&self, key: Option<&str>, node: &mut Node, walk: &mut Walk) -> Result<()> {
        walk.visited += 1;
        match node {
            Node::Map(map) => {
                for (child_key, child) in map.iter_mut() {
                    self.visit(Some(child_key), child, walk)?;
                }
            }
            Node::List(items) => {
                for item in items.iter_mut() {
                    self.visit(key, item, walk)?;
                }
            }
            Node::Scalar(scalar) => {
                let Some(key) = key.filter(|k| is_color_key(k, &self.key_suffix)) else {
                    return Ok(());
                };
                let value = match scalar.as_str() {
                    Some(value) => value.to_string(),
                    None => {
                        debug!(key, kind = scalar.kind(), "color key bound to non-string");
                        return Err(CctError::decode(scalar.to_string(), DecodeError::NotAString));
                    }
                };
                let cct = self.lookup(&value)?;
                *node = Node::Annotated(AnnotatedValue { value, cct });
                walk.annotated += 1;
            }
            Node::Annotated(_) => {}
        }
        Ok(())
    }
}
