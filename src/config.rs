//! Pipeline configuration module.
//!
//! Handles loading and validating `imgpipe.toml`. Configuration is flat:
//! stock defaults overridden by a single optional config file, with a couple
//! of CLI flags (`--out`, `--cache-dir`, `--no-cache`) taking final
//! precedence in `main`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! dir = "dist"              # Where file-emitted assets land
//!
//! [cache]
//! dir = ".imgpipe-cache"    # Where the resize index lives
//!
//! [inline]
//! limit = 8192              # Max bytes to inline as a data URI
//!
//! [breakpoints]
//! # Pixel size overrides for the xs/sm/md/lg/xl catalog
//! # sizes = { sm = 700 }
//!
//! [processing]
//! max_workers = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse — override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::breakpoints::Breakpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory when no
/// `--config` flag is given.
pub const DEFAULT_CONFIG_FILE: &str = "imgpipe.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline options loaded from `imgpipe.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Where file-emitted assets are written.
    pub output: OutputConfig,
    /// Where the transform cache index lives.
    pub cache: CacheConfig,
    /// Inline emission threshold.
    pub inline: InlineConfig,
    /// Breakpoint pixel-size overrides.
    pub breakpoints: BreakpointsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Options {
    /// Check value-level constraints that the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inline.limit == 0 {
            return Err(ConfigError::Validation(
                "inline.limit must be greater than 0".to_string(),
            ));
        }
        for (name, &px) in &self.breakpoints.sizes {
            Breakpoint::from_name(name).map_err(|_| {
                ConfigError::Validation(format!(
                    "breakpoints.sizes: unknown breakpoint '{name}' (expected xs, sm, md, lg, xl)"
                ))
            })?;
            if px < 2 {
                return Err(ConfigError::Validation(format!(
                    "breakpoints.sizes: '{name}' must be at least 2px"
                )));
            }
        }
        if let Some(0) = self.processing.max_workers {
            return Err(ConfigError::Validation(
                "processing.max_workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "dist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: ".imgpipe-cache".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineConfig {
    /// Payloads at most this many bytes become data URIs; larger ones fall
    /// back to file emission.
    pub limit: usize,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            limit: crate::emit::DEFAULT_INLINE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointsConfig {
    /// name → pixel size, merged over the built-in catalog defaults.
    pub sizes: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Max parallel workers. `None` means one per CPU core.
    pub max_workers: Option<usize>,
}

/// Resolve the worker count: user value clamped to core count, or core count
/// when unset. Users can constrain down, not up.
pub fn effective_workers(processing: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    processing.max_workers.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load options from an explicit path, or from `imgpipe.toml` in the working
/// directory when present, or stock defaults otherwise. Always validated.
pub fn load_options(path: Option<&Path>) -> Result<Options, ConfigError> {
    let options = match path {
        Some(p) => parse_file(p)?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                parse_file(default)?
            } else {
                Options::default()
            }
        }
    };
    options.validate()?;
    Ok(options)
}

fn parse_file(path: &Path) -> Result<Options, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Stock config with every option documented, for `imgpipe gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# imgpipe Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as imgpipe.toml in the directory you run imgpipe from,
# or point at it with --config. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Directory where file-emitted assets are written.
dir = "dist"

# ---------------------------------------------------------------------------
# Transform cache
# ---------------------------------------------------------------------------
[cache]
# Directory holding the resize index. Delete it to reset the cache;
# pass --no-cache to ignore it for one run.
dir = ".imgpipe-cache"

# ---------------------------------------------------------------------------
# Inline emission
# ---------------------------------------------------------------------------
[inline]
# Assets at most this many bytes are inlined as data URIs when the
# inline=inline query flag is set; larger assets fall back to files.
limit = 8192

# ---------------------------------------------------------------------------
# Responsive breakpoints
# ---------------------------------------------------------------------------
[breakpoints]
# Pixel-size overrides for the fixed xs/sm/md/lg/xl catalog.
# Defaults: xs=576, sm=768, md=992, lg=1200, xl=1900.
# sizes = { sm = 700, md = 1000 }

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Max parallel workers, capped at the CPU core count.
# Omit for auto (one worker per core).
# max_workers = 4
"#
}
