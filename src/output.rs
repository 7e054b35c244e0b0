//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! One line per asset, echoing what the pipeline did with it:
//!
//! ```text
//! passthrough 'logo.svg' -> dist/logo.svg (4312 bytes)
//! load cache 'hero.jpg?resize=800x600>' -> dist/hero@resize-800x600-shrink-larger.jpg
//! save cache 'hero.jpg?resize=400x' -> data URI (6021 bytes)
//! error 'broken.jpg?resize=abc': unknown resize flag: 'abc'
//! ```
//!
//! followed by a summary: `Cache: 3 cached, 2 encoded, 1 passthrough (6 total)`.
//!
//! ## Media
//!
//! ```text
//! xs: (max-width: 575px)
//! sm: (min-width: 576px) and (max-width: 767px)
//! md: (min-width: 768px)
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `String`/`Vec<String>`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::emit::Artifact;
use crate::process::{ProcessError, ProcessedAsset};
use std::fmt;

/// Format the per-asset outcome line for a process run.
///
/// `spec` is the asset spec as the user wrote it (`path?query`).
pub fn format_asset_line(spec: &str, result: &Result<ProcessedAsset, ProcessError>) -> String {
    match result {
        Ok(asset) => {
            let action = if !asset.transformed {
                "passthrough"
            } else if asset.from_cache {
                "load cache"
            } else {
                "save cache"
            };
            format!("{action} '{spec}' -> {}", format_artifact(asset))
        }
        Err(err) => format!("error '{spec}': {err}"),
    }
}

fn format_artifact(asset: &ProcessedAsset) -> String {
    match &asset.artifact {
        Artifact::File { path } => format!("{} ({} bytes)", path.display(), asset.emitted_bytes),
        Artifact::Inline { .. } => format!("data URI ({} bytes)", asset.emitted_bytes),
    }
}

/// Format breakpoint media-query conditions, one line per breakpoint.
pub fn format_media_lines(conditions: &[(&'static str, String)]) -> Vec<String> {
    conditions
        .iter()
        .map(|(name, cond)| {
            if cond.is_empty() {
                format!("{name}:")
            } else {
                format!("{name}: {cond}")
            }
        })
        .collect()
}

/// Counters summarizing one process run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub passthrough: u32,
    pub cached: u32,
    pub encoded: u32,
    pub failed: u32,
}

impl RunStats {
    /// Tally one asset's outcome.
    pub fn record(&mut self, result: &Result<ProcessedAsset, ProcessError>) {
        match result {
            Ok(asset) if !asset.transformed => self.passthrough += 1,
            Ok(asset) if asset.from_cache => self.cached += 1,
            Ok(_) => self.encoded += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn from_results(results: &[Result<ProcessedAsset, ProcessError>]) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.record(result);
        }
        stats
    }

    pub fn total(&self) -> u32 {
        self.passthrough + self.cached + self.encoded + self.failed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.cached > 0 {
            parts.push(format!("{} cached", self.cached));
        }
        parts.push(format!("{} encoded", self.encoded));
        if self.passthrough > 0 {
            parts.push(format!("{} passthrough", self.passthrough));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        if parts.len() > 1 {
            write!(f, "{} ({} total)", parts.join(", "), self.total())
        } else {
            write!(f, "{}", parts[0])
        }
    }
}

/// Print per-asset lines and the run summary to stdout.
pub fn print_process_output(specs: &[String], results: &[Result<ProcessedAsset, ProcessError>]) {
    for (spec, result) in specs.iter().zip(results) {
        println!("{}", format_asset_line(spec, result));
    }
    println!("Cache: {}", RunStats::from_results(results));
}

/// Print media-query lines to stdout.
pub fn print_media_output(conditions: &[(&'static str, String)]) {
    for line in format_media_lines(conditions) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset(transformed: bool, from_cache: bool, inline: bool) -> ProcessedAsset {
        ProcessedAsset {
            logical_path: PathBuf::from("/content/img.jpg"),
            artifact: if inline {
                Artifact::Inline {
                    uri: "data:image/jpeg;base64,AAAA".to_string(),
                }
            } else {
                Artifact::File {
                    path: PathBuf::from("dist/img.jpg"),
                }
            },
            from_cache,
            transformed,
            emitted_bytes: 1234,
        }
    }

    // =========================================================================
    // format_asset_line
    // =========================================================================

    #[test]
    fn asset_line_passthrough() {
        let line = format_asset_line("logo.svg", &Ok(asset(false, false, false)));
        assert_eq!(line, "passthrough 'logo.svg' -> dist/img.jpg (1234 bytes)");
    }

    #[test]
    fn asset_line_cache_hit() {
        let line = format_asset_line("a.jpg?resize=800x", &Ok(asset(true, true, false)));
        assert!(line.starts_with("load cache 'a.jpg?resize=800x'"));
    }

    #[test]
    fn asset_line_fresh_encode() {
        let line = format_asset_line("a.jpg?resize=800x", &Ok(asset(true, false, false)));
        assert!(line.starts_with("save cache"));
    }

    #[test]
    fn asset_line_inline_shows_size_not_uri() {
        let line = format_asset_line("a.jpg?resize=8x&inline=inline", &Ok(asset(true, false, true)));
        assert!(line.ends_with("data URI (1234 bytes)"));
        assert!(!line.contains("base64"));
    }

    #[test]
    fn asset_line_error() {
        let err = ProcessError::Directive(crate::directive::DirectiveError::UnknownResizeFlag(
            "abc".to_string(),
        ));
        let line = format_asset_line("a.jpg?resize=abc", &Err(err));
        assert_eq!(line, "error 'a.jpg?resize=abc': unknown resize flag: 'abc'");
    }

    // =========================================================================
    // format_media_lines
    // =========================================================================

    #[test]
    fn media_lines_include_conditions() {
        let lines = format_media_lines(&[
            ("xs", "(max-width: 575px)".to_string()),
            ("sm", "(min-width: 576px)".to_string()),
        ]);
        assert_eq!(lines[0], "xs: (max-width: 575px)");
        assert_eq!(lines[1], "sm: (min-width: 576px)");
    }

    #[test]
    fn media_line_empty_condition_has_no_trailing_space() {
        let lines = format_media_lines(&[("xs", String::new())]);
        assert_eq!(lines[0], "xs:");
    }

    // =========================================================================
    // RunStats
    // =========================================================================

    #[test]
    fn stats_record_each_outcome() {
        let results = vec![
            Ok(asset(false, false, false)),
            Ok(asset(true, true, false)),
            Ok(asset(true, false, false)),
            Err(ProcessError::Directive(
                crate::directive::DirectiveError::UnknownResizeFlag("x!".to_string()),
            )),
        ];
        let stats = RunStats::from_results(&results);
        assert_eq!(stats.passthrough, 1);
        assert_eq!(stats.cached, 1);
        assert_eq!(stats.encoded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.total(), 4);
    }

    #[test]
    fn stats_display_full() {
        let stats = RunStats {
            passthrough: 1,
            cached: 3,
            encoded: 2,
            failed: 1,
        };
        assert_eq!(
            format!("{stats}"),
            "3 cached, 2 encoded, 1 passthrough, 1 failed (7 total)"
        );
    }

    #[test]
    fn stats_display_encodes_only() {
        let stats = RunStats {
            encoded: 3,
            ..RunStats::default()
        };
        assert_eq!(format!("{stats}"), "3 encoded");
    }

    #[test]
    fn stats_display_cached_and_encoded() {
        let stats = RunStats {
            cached: 5,
            encoded: 2,
            ..RunStats::default()
        };
        assert_eq!(format!("{stats}"), "5 cached, 2 encoded (7 total)");
    }
}
