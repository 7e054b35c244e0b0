//! Resize directive parsing.
//!
//! An asset reference carries its transform request in a query annotation:
//!
//! ```text
//! hero.jpg?resize=800x600>&quality=80&format=webp&inline=inline
//! ```
//!
//! The `resize` value follows the grammar `digits? ('x' digits?)? flag?`
//! with `flag ∈ {'!', '>', '<', '^'}`. Empty digit groups mean "unset" —
//! derive from the source's corresponding intrinsic dimension. The other
//! recognized keys are `format`, `name`, `suffix`, `quality`, and `inline`.
//!
//! Parsing is pure: no filesystem access, no raster work. Defaulting rules
//! (format from the source extension, the synthesized output name) are
//! explicit steps here so they are testable in isolation rather than
//! scattered through the dispatcher.

use crate::imaging::{Quality, ResizePolicy};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectiveError {
    #[error("unknown resize flag: '{0}'")]
    UnknownResizeFlag(String),
}

/// A parsed resize directive with all defaults resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDirective {
    /// Target width; 0 means "derive from source".
    pub width: u32,
    /// Target height; 0 means "derive from source".
    pub height: u32,
    pub policy: ResizePolicy,
    /// Lowercase target format token. Defaults to the source file's extension.
    pub format: String,
    /// Output base name, without suffix or extension.
    pub name: String,
    /// Appended to `name` with a `-` separator when present.
    pub suffix: Option<String>,
    /// Encoder quality; `None` means "use the encoder default".
    pub quality: Option<Quality>,
    /// Emit as a data URI instead of a file.
    pub inline: bool,
}

impl ResizeDirective {
    /// Output stem: the resolved name with the suffix applied.
    pub fn output_stem(&self) -> String {
        match &self.suffix {
            Some(s) => format!("{}-{}", self.name, s),
            None => self.name.clone(),
        }
    }

    /// Output file name: `<stem>.<format>`.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.output_stem(), self.format)
    }

    /// Re-derive a canonical `resize` value for this directive.
    ///
    /// Unset dimensions render as empty digit groups, so `800x` round-trips
    /// as `800x` and a bare flag as `x^`.
    pub fn resize_spec(&self) -> String {
        let w = dim_str(self.width);
        let h = dim_str(self.height);
        let flag = self.policy.flag_char().map(String::from).unwrap_or_default();
        format!("{w}x{h}{flag}")
    }
}

fn dim_str(dim: u32) -> String {
    if dim == 0 { String::new() } else { dim.to_string() }
}

/// Split a raw query string into key→value pairs.
///
/// Pairs are separated by `&`; the first `=` splits key from value; bare keys
/// get an empty value. A leading `?` is tolerated. No percent-decoding — the
/// annotation grammar never needs it.
pub fn parse_query(raw: &str) -> BTreeMap<String, String> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Parse a resource's query annotation into a directive.
///
/// Returns `Ok(None)` when no `resize` key is present — the caller must treat
/// that as passthrough, not as an error. A `resize` value that fails the
/// grammar is an error before any transform work begins.
pub fn parse_directive(
    source_path: &Path,
    query: &BTreeMap<String, String>,
) -> Result<Option<ResizeDirective>, DirectiveError> {
    let Some(resize) = query.get("resize") else {
        return Ok(None);
    };

    let (width, height, policy) = parse_resize_value(resize)?;

    let format = query
        .get("format")
        .filter(|f| !f.is_empty())
        .map(|f| f.to_lowercase())
        .unwrap_or_else(|| source_extension(source_path));

    let name = query
        .get("name")
        .filter(|n| !n.is_empty())
        .cloned()
        .unwrap_or_else(|| synthesize_name(source_path, width, height, policy));

    let suffix = query.get("suffix").filter(|s| !s.is_empty()).cloned();

    let quality = query
        .get("quality")
        .and_then(|q| q.parse::<u32>().ok())
        .filter(|&q| q > 0)
        .map(Quality::new);

    let inline = query.get("inline").is_some_and(|v| v == "inline");

    Ok(Some(ResizeDirective {
        width,
        height,
        policy,
        format,
        name,
        suffix,
        quality,
        inline,
    }))
}

/// Parse a `resize` value against the grammar `digits? ('x' digits?)? flag?`.
///
/// The value is trimmed first. The empty string is valid (re-encode at source
/// dimensions). Anything else that fails the grammar carries the raw value in
/// the error.
fn parse_resize_value(raw: &str) -> Result<(u32, u32, ResizePolicy), DirectiveError> {
    let trimmed = raw.trim();
    let err = || DirectiveError::UnknownResizeFlag(raw.to_string());

    let (dims, policy) = match trimmed.chars().last().and_then(ResizePolicy::from_flag) {
        Some(policy) => (&trimmed[..trimmed.len() - 1], policy),
        None => (trimmed, ResizePolicy::Free),
    };

    let (w, h) = match dims.split_once('x') {
        Some((w, h)) => (w, h),
        None => (dims, ""),
    };

    let width = parse_dim(w).ok_or_else(err)?;
    let height = parse_dim(h).ok_or_else(err)?;
    Ok((width, height, policy))
}

/// An empty digit group is "unset" (0); otherwise strictly ASCII digits.
fn parse_dim(s: &str) -> Option<u32> {
    if s.is_empty() {
        return Some(0);
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Lowercased extension of the source path, empty when absent.
fn source_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Deterministic default output name: `<basename>@resize-<w>x<h><flag-suffix>`.
///
/// Unset dimensions render as empty strings; the `x` separator is always
/// present, so `800x`, `x600`, and `x` are all possible shapes.
fn synthesize_name(source_path: &Path, width: u32, height: u32, policy: ResizePolicy) -> String {
    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    format!(
        "{stem}@resize-{}x{}{}",
        dim_str(width),
        dim_str(height),
        policy.name_suffix()
    )
}
