//! # imgpipe
//!
//! A build-time image transformation stage. Asset references carry an inline
//! resize directive in their query string — `hero.jpg?resize=800x600>&quality=80`
//! — and imgpipe parses the directive, resizes/re-encodes the image, memoizes
//! the result in an on-disk cache, and emits the bytes either as a data URI or
//! as a file in the output directory.
//!
//! # Architecture: One Request, Six Steps
//!
//! Every asset passes through the same strictly ordered sequence:
//!
//! ```text
//! 1. Select emission   inline=inline → data URI, else file
//! 2. Passthrough?      no resize key → emit source bytes unchanged, done
//! 3. Parse directive   grammar: digits? ('x' digits?)? [!></^]?
//! 4. Cache key         path + canonical query + size + mtime → SHA-256
//! 5. Probe cache       hit → emit cached bytes
//! 6. Transform         measure → resolve box → resize → encode,
//!                      then insert + flush, then emit
//! ```
//!
//! The dominant path for ordinary assets is step 2 — zero cache and zero
//! transform overhead when no resize was requested.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`directive`] | Query-annotation parsing — grammar validation and default resolution (format from extension, synthesized output names) |
//! | [`cache`] | Cache keys from filesystem metadata + the JSON-backed key→bytes store |
//! | [`imaging`] | Raster work: backend trait, pure dimension math, `image`-crate backend, the transform entry point |
//! | [`emit`] | The two emission strategies — inline data URI (with size-threshold fallback) and write-as-file |
//! | [`process`] | The dispatcher tying it all together: passthrough decision, cache probe, transform-on-miss, emission |
//! | [`breakpoints`] | Responsive breakpoint catalog and CSS media-query condition generation |
//! | [`config`] | `imgpipe.toml` loading, validation, and stock config generation |
//! | [`output`] | CLI output formatting — per-asset lines and run summaries |
//!
//! # Design Decisions
//!
//! ## Cache Is an Optimization, Never an Authority
//!
//! A corrupt or foreign cache entry is treated as a miss, not an error. The
//! worst a bad cache can do is cost one re-encode. The index is append-style:
//! no eviction, no TTL — delete the cache directory to reset it. Concurrent
//! processes racing to flush can drop each other's entries (last snapshot
//! wins); within one process, flushes are serialized behind a mutex.
//!
//! ## Policies Translate, They Don't Resample
//!
//! The five resize policies (`!` force, `>` shrink-only, `<` enlarge-only,
//! `^` cover-fill, none free) are resolved into target dimensions by pure
//! functions in [`imaging::calculations`]; actual resampling is the `image`
//! crate's Lanczos3. imgpipe never touches pixels itself.
//!
//! ## Injected Stores, No Globals
//!
//! The cache store is constructed by the caller and handed to the pipeline —
//! no module-level singleton. Tests run against throwaway stores in temp
//! directories.

pub mod breakpoints;
pub mod cache;
pub mod config;
pub mod directive;
pub mod emit;
pub mod imaging;
pub mod output;
pub mod process;
