//! The asset dispatcher — one request in, one artifact out.
//!
//! [`AssetPipeline::handle`] runs the end-to-end sequence for a single asset:
//!
//! 1. Select the emission strategy (`inline=inline` → data URI, else file).
//! 2. No `resize` key → emit the source bytes unchanged and stop. This is
//!    the dominant path for ordinary assets: zero cache and zero transform
//!    activity.
//! 3. Parse the directive; a grammar failure fails the request.
//! 4. Compute the cache key from the source's stat snapshot.
//! 5. Cache hit → rewrite the logical path to `<dir>/<stem>.<format>` and
//!    emit the cached bytes.
//! 6. Cache miss → transform, record the result (one insert + flush pair per
//!    miss), rewrite the path, emit. A transform failure produces no cache
//!    write and no emission.
//!
//! ## Concurrency
//!
//! `handle` takes `&self`, so one pipeline serves rayon workers directly
//! (see [`AssetPipeline::run_batch`]). The cache index is the only shared
//! mutable state; it sits behind a mutex so in-process insert+flush pairs
//! are serialized. Steps within one request never reorder; a failed step
//! aborts only that asset.

use crate::cache::{CacheKey, ResizeCache};
use crate::directive::{DirectiveError, parse_directive, parse_query};
use crate::emit::{Artifact, EmitError, EmitStrategy, FileEmitter, InlineEmitter};
use crate::imaging::{BackendError, RasterBackend, transform};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error("image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// One inbound asset: where it lives, its raw bytes, and its query annotation.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub source_path: PathBuf,
    pub source_bytes: Vec<u8>,
    pub query: BTreeMap<String, String>,
}

impl AssetRequest {
    /// Build a request from a CLI spec of the form `path?query`.
    ///
    /// The path is canonicalized so cache keys stay stable regardless of the
    /// working directory the build runs from.
    pub fn load(spec: &str) -> Result<Self, ProcessError> {
        let (path, query) = match spec.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (spec, BTreeMap::new()),
        };
        let source_path = std::fs::canonicalize(path)?;
        let source_bytes = std::fs::read(&source_path)?;
        Ok(Self {
            source_path,
            source_bytes,
            query,
        })
    }

    fn wants_inline(&self) -> bool {
        self.query.get("inline").is_some_and(|v| v == "inline")
    }
}

/// Outcome of one handled request.
#[derive(Debug, Clone)]
pub struct ProcessedAsset {
    /// The asset's logical output path — the source path with its file name
    /// rewritten to `<stem>.<format>` when a transform ran.
    pub logical_path: PathBuf,
    pub artifact: Artifact,
    /// Served from the cache rather than freshly transformed.
    pub from_cache: bool,
    /// A resize directive was present and applied (cached or fresh).
    pub transformed: bool,
    pub emitted_bytes: usize,
}

/// The dispatcher: backend, injected cache store, and the two emitters.
pub struct AssetPipeline<B: RasterBackend> {
    backend: B,
    cache: Mutex<ResizeCache>,
    inline: InlineEmitter,
    file: FileEmitter,
}

impl<B: RasterBackend> AssetPipeline<B> {
    /// Construct with an explicitly opened cache store. Callers own the
    /// store's lifecycle, which keeps tests isolated to throwaway stores.
    pub fn new(backend: B, cache: ResizeCache, output_dir: &Path, inline_limit: usize) -> Self {
        let file = FileEmitter::new(output_dir);
        Self {
            backend,
            cache: Mutex::new(cache),
            inline: InlineEmitter::new(inline_limit, file.clone()),
            file,
        }
    }

    fn emit(
        &self,
        inline: bool,
        bytes: &[u8],
        logical_path: &Path,
    ) -> Result<Artifact, EmitError> {
        if inline {
            self.inline.emit(bytes, logical_path)
        } else {
            self.file.emit(bytes, logical_path)
        }
    }

    /// Handle one asset request end to end.
    pub fn handle(&self, request: &AssetRequest) -> Result<ProcessedAsset, ProcessError> {
        let Some(directive) = parse_directive(&request.source_path, &request.query)? else {
            // Passthrough: no directive, no cache, no transform
            let inline = request.wants_inline();
            let artifact = self.emit(inline, &request.source_bytes, &request.source_path)?;
            return Ok(ProcessedAsset {
                logical_path: request.source_path.clone(),
                artifact,
                from_cache: false,
                transformed: false,
                emitted_bytes: request.source_bytes.len(),
            });
        };

        let key = CacheKey::for_source(&request.source_path, &request.query)?;
        let logical_path = request
            .source_path
            .with_file_name(directive.output_file_name());

        let cached = self.cache.lock().unwrap().get(&key);
        if let Some(bytes) = cached {
            let artifact = self.emit(directive.inline, &bytes, &logical_path)?;
            return Ok(ProcessedAsset {
                logical_path,
                artifact,
                from_cache: true,
                transformed: true,
                emitted_bytes: bytes.len(),
            });
        }

        let bytes = transform(&self.backend, &request.source_bytes, &directive)?;
        {
            // One insert+flush pair per miss, serialized behind the lock
            let mut cache = self.cache.lock().unwrap();
            cache.insert(&key, &bytes);
            cache.flush()?;
        }

        let artifact = self.emit(directive.inline, &bytes, &logical_path)?;
        Ok(ProcessedAsset {
            logical_path,
            artifact,
            from_cache: false,
            transformed: true,
            emitted_bytes: bytes.len(),
        })
    }

    /// Handle a batch of independent requests in parallel. Result order
    /// matches input order; one failed asset never touches the others.
    pub fn run_batch(
        &self,
        requests: &[AssetRequest],
    ) -> Vec<Result<ProcessedAsset, ProcessError>> {
        requests.par_iter().map(|r| self.handle(r)).collect()
    }
}
