//! Raster work — pure Rust, no system dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Measure** | `ImageReader::into_dimensions` (header read) |
//! | **Resize** | Lanczos3 via the `image` crate |
//! | **Encode** | `image` crate encoders, quality on JPEG |
//!
//! The module is split into:
//! - **Calculations**: pure functions for box resolution and policy math (unit testable)
//! - **Parameters**: data structures describing render jobs ([`ResizePolicy`], [`Quality`], [`RenderJob`])
//! - **Backend**: [`RasterBackend`] trait + [`RustBackend`]
//! - **Operations**: the [`transform`] entry point combining all three

pub mod backend;
pub mod calculations;
pub mod operations;
pub mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, RasterBackend};
pub use operations::transform;
pub use params::{Quality, RenderJob, ResizePolicy};
pub use rust_backend::RustBackend;
