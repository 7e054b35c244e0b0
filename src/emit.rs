//! Emission strategies — what happens to the final bytes.
//!
//! Orthogonal to whether a resize occurred: every request ends in exactly one
//! [`EmitStrategy::emit`] call. Two strategies exist, selected by the `inline`
//! query flag:
//!
//! - [`InlineEmitter`] — produces a `data:` URI when the payload is under a
//!   byte threshold, and falls back to its file emitter above it. The
//!   fallback is this strategy's own responsibility; callers never see it.
//! - [`FileEmitter`] — writes the bytes under the output directory, named
//!   after the logical path's file name.

use std::path::{Path, PathBuf};
use thiserror::Error;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid output path: {0}")]
    InvalidPath(PathBuf),
}

/// The artifact a strategy hands back to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A data URI carrying the bytes inline.
    Inline { uri: String },
    /// A file written under the output directory.
    File { path: PathBuf },
}

/// A downstream handler for final bytes.
pub trait EmitStrategy: Sync {
    /// Emit `bytes` for the asset whose logical output path is `logical_path`.
    /// The logical path determines the output file name and media type; it is
    /// not necessarily where bytes land on disk.
    fn emit(&self, bytes: &[u8], logical_path: &Path) -> Result<Artifact, EmitError>;
}

/// Writes bytes as discrete files under an output directory.
#[derive(Debug, Clone)]
pub struct FileEmitter {
    output_dir: PathBuf,
}

impl FileEmitter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }
}

impl EmitStrategy for FileEmitter {
    fn emit(&self, bytes: &[u8], logical_path: &Path) -> Result<Artifact, EmitError> {
        let file_name = logical_path
            .file_name()
            .ok_or_else(|| EmitError::InvalidPath(logical_path.to_path_buf()))?;

        let out_path = self.output_dir.join(file_name);
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(&out_path, bytes)?;
        Ok(Artifact::File { path: out_path })
    }
}

/// Default inline size threshold in bytes.
pub const DEFAULT_INLINE_LIMIT: usize = 8192;

/// Inlines bytes as a data URI when small enough, else falls back to writing
/// a file.
#[derive(Debug, Clone)]
pub struct InlineEmitter {
    limit: usize,
    fallback: FileEmitter,
}

impl InlineEmitter {
    pub fn new(limit: usize, fallback: FileEmitter) -> Self {
        Self { limit, fallback }
    }
}

impl EmitStrategy for InlineEmitter {
    fn emit(&self, bytes: &[u8], logical_path: &Path) -> Result<Artifact, EmitError> {
        if bytes.len() > self.limit {
            return self.fallback.emit(bytes, logical_path);
        }
        let media = media_type(logical_path);
        let uri = format!("data:{media};base64,{}", BASE64.encode(bytes));
        Ok(Artifact::Inline { uri })
    }
}

/// Media type for a data URI, derived from the logical path's extension.
fn media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
