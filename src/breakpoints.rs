//! Responsive breakpoint catalog and CSS media-query generation.
//!
//! The catalog is fixed and ordered — `xs < sm < md < lg < xl` — with
//! default pixel sizes callers can override. [`media_conditions`] turns a
//! selection of breakpoints into per-breakpoint media-query condition
//! strings:
//!
//! ```
//! use imgpipe::breakpoints::{Breakpoint, media_conditions};
//! use std::collections::BTreeMap;
//!
//! let conditions = media_conditions(
//!     &[Breakpoint::Sm, Breakpoint::Xs, Breakpoint::Md],
//!     &BTreeMap::new(),
//! );
//! assert_eq!(conditions[&Breakpoint::Xs], "(max-width: 575px)");
//! assert_eq!(
//!     conditions[&Breakpoint::Sm],
//!     "(min-width: 576px) and (max-width: 767px)"
//! );
//! assert_eq!(conditions[&Breakpoint::Md], "(min-width: 768px)");
//! ```
//!
//! Adjacent ranges don't overlap: each breakpoint's `max-width` is its own
//! size minus one, and the next breakpoint's `min-width` is that same size
//! unmodified. Everything here is pure — no I/O, deterministic given inputs.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BreakpointError {
    #[error("unknown breakpoint: '{0}'")]
    UnknownName(String),
}

/// A named responsive width threshold. Declaration order is catalog order,
/// which `Ord` (and therefore `BTreeMap` iteration) follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    /// The full catalog in canonical ascending order.
    pub const CATALOG: [Breakpoint; 5] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, BreakpointError> {
        match name {
            "xs" => Ok(Breakpoint::Xs),
            "sm" => Ok(Breakpoint::Sm),
            "md" => Ok(Breakpoint::Md),
            "lg" => Ok(Breakpoint::Lg),
            "xl" => Ok(Breakpoint::Xl),
            other => Err(BreakpointError::UnknownName(other.to_string())),
        }
    }

    /// Built-in pixel size, used when no override is given.
    pub fn default_size(self) -> u32 {
        match self {
            Breakpoint::Xs => 576,
            Breakpoint::Sm => 768,
            Breakpoint::Md => 992,
            Breakpoint::Lg => 1200,
            Breakpoint::Xl => 1900,
        }
    }
}

/// Generate media-query conditions for a selection of breakpoints.
///
/// The selection is filtered against the catalog in canonical order — input
/// order is irrelevant, duplicates collapse. Overrides take precedence over
/// the built-in sizes. For the breakpoint at position `i` of the filtered
/// sequence:
///
/// - not first: `(min-width: <previous size>px)`
/// - not last: `(max-width: <own size - 1>px)`
///
/// joined with `" and "`. A breakpoint that is both first and last yields an
/// empty condition (matches everything).
pub fn media_conditions(
    selected: &[Breakpoint],
    overrides: &BTreeMap<Breakpoint, u32>,
) -> BTreeMap<Breakpoint, String> {
    let ordered: Vec<Breakpoint> = Breakpoint::CATALOG
        .iter()
        .copied()
        .filter(|bp| selected.contains(bp))
        .collect();

    let size = |bp: Breakpoint| overrides.get(&bp).copied().unwrap_or(bp.default_size());

    let mut conditions = BTreeMap::new();
    for (i, &bp) in ordered.iter().enumerate() {
        let mut parts = Vec::new();
        if i > 0 {
            parts.push(format!("(min-width: {}px)", size(ordered[i - 1])));
        }
        if i + 1 != ordered.len() {
            parts.push(format!("(max-width: {}px)", size(bp) - 1));
        }
        conditions.insert(bp, parts.join(" and "));
    }
    conditions
}

/// Name-based convenience for the CLI: resolves names against the catalog
/// and keys the result by name.
pub fn media_conditions_by_name(
    selected: &[String],
    overrides: &BTreeMap<String, u32>,
) -> Result<Vec<(&'static str, String)>, BreakpointError> {
    let breakpoints: Vec<Breakpoint> = selected
        .iter()
        .map(|name| Breakpoint::from_name(name))
        .collect::<Result<_, _>>()?;

    let overrides: BTreeMap<Breakpoint, u32> = overrides
        .iter()
        .map(|(name, &px)| Breakpoint::from_name(name).map(|bp| (bp, px)))
        .collect::<Result<_, _>>()?;

    Ok(media_conditions(&breakpoints, &overrides)
        .into_iter()
        .map(|(bp, cond)| (bp.name(), cond))
        .collect())
}
