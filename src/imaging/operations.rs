//! The transform entry point.
//!
//! Combines the directive with pure dimension math and backend execution:
//! measure the source, resolve the requested box, translate the policy into
//! a render job, and hand it to the backend. No disk or cache side effects —
//! those belong to the caller.

use super::backend::{BackendError, RasterBackend};
use super::calculations::resolve_box;
use super::params::RenderJob;
use crate::directive::ResizeDirective;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Transform source bytes according to a parsed directive.
///
/// Exactly one `measure` and one `render` backend call per invocation.
pub fn transform(
    backend: &impl RasterBackend,
    source: &[u8],
    directive: &ResizeDirective,
) -> Result<Vec<u8>> {
    let intrinsic = backend.measure(source)?;
    let (width, height) = resolve_box(intrinsic, directive.width, directive.height);

    let job = RenderJob {
        width,
        height,
        policy: directive.policy,
        quality: directive.quality,
        format: directive.format.clone(),
    };
    backend.render(source, &job)
}
