//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the two operations every backend must
//! support: measure (intrinsic dimensions from encoded bytes) and render
//! (decode, resize per policy, re-encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — the `image` crate,
//! statically linked, no system dependencies. Tests use a recording mock.

use super::params::RenderJob;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Result of a measure operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for raster engines.
///
/// Both operations work on in-memory byte buffers — the backend never touches
/// the filesystem or the cache. `Sync` so one backend instance can serve
/// rayon workers concurrently.
pub trait RasterBackend: Sync {
    /// Read intrinsic dimensions from encoded image bytes without a full decode.
    fn measure(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, resize according to the job's policy and box, and re-encode to
    /// the job's format. Returns the encoded bytes.
    fn render(&self, source: &[u8], job: &RenderJob) -> Result<Vec<u8>, BackendError>;
}
