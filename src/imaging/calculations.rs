//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or pixels. The
//! backend calls [`target_dimensions`] to turn a resolved box and a policy
//! into the actual output dimensions before resampling.

use super::backend::Dimensions;
use super::params::ResizePolicy;

/// Resolve the requested box against intrinsic dimensions.
///
/// A directive dimension of 0 means "unset" — it is replaced by the source's
/// corresponding intrinsic dimension.
pub fn resolve_box(source: Dimensions, width: u32, height: u32) -> (u32, u32) {
    (
        if width == 0 { source.width } else { width },
        if height == 0 { source.height } else { height },
    )
}

/// Calculate final output dimensions for a source, box, and policy.
///
/// - `Free` / `ForceExact`: exactly the box, aspect not preserved.
/// - `ShrinkLarger`: aspect-preserving fit into the box, but only when the
///   source exceeds it in either dimension; otherwise source unchanged.
/// - `EnlargeSmaller`: aspect-preserving fit up to the box, but only when the
///   source is smaller in both dimensions; otherwise source unchanged.
/// - `FillArea`: cover the box preserving aspect; one dimension may overflow.
pub fn target_dimensions(
    source: (u32, u32),
    box_dims: (u32, u32),
    policy: ResizePolicy,
) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = box_dims;

    match policy {
        ResizePolicy::Free | ResizePolicy::ForceExact => (box_w, box_h),
        ResizePolicy::ShrinkLarger => {
            if src_w > box_w || src_h > box_h {
                fit_dimensions(source, box_dims)
            } else {
                source
            }
        }
        ResizePolicy::EnlargeSmaller => {
            if src_w < box_w && src_h < box_h {
                fit_dimensions(source, box_dims)
            } else {
                source
            }
        }
        ResizePolicy::FillArea => cover_dimensions(source, box_dims),
    }
}

/// Aspect-preserving fit: largest dimensions that fit inside the box.
///
/// Both dimensions scale by the same ratio; the constrained one matches the
/// box exactly, the other rounds.
fn fit_dimensions(source: (u32, u32), box_dims: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = box_dims;

    let ratio_w = box_w as f64 / src_w as f64;
    let ratio_h = box_h as f64 / src_h as f64;

    if ratio_w <= ratio_h {
        (box_w, (src_h as f64 * ratio_w).round().max(1.0) as u32)
    } else {
        ((src_w as f64 * ratio_h).round().max(1.0) as u32, box_h)
    }
}

/// Aspect-preserving cover: smallest dimensions that completely cover the box.
///
/// One dimension matches the box exactly, the other may exceed it.
fn cover_dimensions(source: (u32, u32), box_dims: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (box_w, box_h) = box_dims;

    let src_aspect = src_w as f64 / src_h as f64;
    let box_aspect = box_w as f64 / box_h as f64;

    if src_aspect > box_aspect {
        // Source is wider: height matches, width exceeds
        (
            (box_h as f64 * src_aspect).round().max(1.0) as u32,
            box_h,
        )
    } else {
        // Source is taller: width matches, height exceeds
        (
            box_w,
            (box_w as f64 / src_aspect).round().max(1.0) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // resolve_box tests
    // =========================================================================

    #[test]
    fn resolve_box_both_set() {
        let src = Dimensions {
            width: 1000,
            height: 800,
        };
        assert_eq!(resolve_box(src, 400, 300), (400, 300));
    }

    #[test]
    fn resolve_box_width_unset() {
        let src = Dimensions {
            width: 1000,
            height: 800,
        };
        assert_eq!(resolve_box(src, 0, 300), (1000, 300));
    }

    #[test]
    fn resolve_box_height_unset() {
        let src = Dimensions {
            width: 1000,
            height: 800,
        };
        assert_eq!(resolve_box(src, 400, 0), (400, 800));
    }

    #[test]
    fn resolve_box_both_unset() {
        let src = Dimensions {
            width: 1000,
            height: 800,
        };
        assert_eq!(resolve_box(src, 0, 0), (1000, 800));
    }

    // =========================================================================
    // Free / ForceExact
    // =========================================================================

    #[test]
    fn free_resizes_to_box_exactly() {
        // 800x600 → 400x500: aspect not preserved
        assert_eq!(
            target_dimensions((800, 600), (400, 500), ResizePolicy::Free),
            (400, 500)
        );
    }

    #[test]
    fn force_exact_ignores_aspect() {
        assert_eq!(
            target_dimensions((800, 600), (100, 100), ResizePolicy::ForceExact),
            (100, 100)
        );
    }

    // =========================================================================
    // ShrinkLarger ('>')
    // =========================================================================

    #[test]
    fn shrink_larger_shrinks_oversized_source() {
        // 1600x1200 into 800x800: fit by width → 800x600
        assert_eq!(
            target_dimensions((1600, 1200), (800, 800), ResizePolicy::ShrinkLarger),
            (800, 600)
        );
    }

    #[test]
    fn shrink_larger_never_enlarges() {
        // Source already fits the box: unchanged
        assert_eq!(
            target_dimensions((400, 300), (800, 800), ResizePolicy::ShrinkLarger),
            (400, 300)
        );
    }

    #[test]
    fn shrink_larger_triggers_on_one_oversized_dimension() {
        // Width fits, height exceeds → still shrinks
        assert_eq!(
            target_dimensions((400, 1000), (800, 500), ResizePolicy::ShrinkLarger),
            (200, 500)
        );
    }

    // =========================================================================
    // EnlargeSmaller ('<')
    // =========================================================================

    #[test]
    fn enlarge_smaller_enlarges_undersized_source() {
        // 400x300 up to 800x800: fit by width → 800x600
        assert_eq!(
            target_dimensions((400, 300), (800, 800), ResizePolicy::EnlargeSmaller),
            (800, 600)
        );
    }

    #[test]
    fn enlarge_smaller_never_shrinks() {
        // Source exceeds the box: unchanged
        assert_eq!(
            target_dimensions((1600, 1200), (800, 800), ResizePolicy::EnlargeSmaller),
            (1600, 1200)
        );
    }

    #[test]
    fn enlarge_smaller_requires_both_dimensions_smaller() {
        // Width smaller but height equal: unchanged
        assert_eq!(
            target_dimensions((400, 800), (800, 800), ResizePolicy::EnlargeSmaller),
            (400, 800)
        );
    }

    // =========================================================================
    // FillArea ('^')
    // =========================================================================

    #[test]
    fn fill_area_wider_source_overflows_width() {
        // 800x600 (4:3) covering 400x500: height matches, width = 500 * 4/3 = 667
        assert_eq!(
            target_dimensions((800, 600), (400, 500), ResizePolicy::FillArea),
            (667, 500)
        );
    }

    #[test]
    fn fill_area_taller_source_overflows_height() {
        // 600x800 (3:4) covering 500x400: width matches, height = 500 * 4/3 = 667
        assert_eq!(
            target_dimensions((600, 800), (500, 400), ResizePolicy::FillArea),
            (500, 667)
        );
    }

    #[test]
    fn fill_area_same_aspect_matches_box() {
        assert_eq!(
            target_dimensions((800, 600), (400, 300), ResizePolicy::FillArea),
            (400, 300)
        );
    }

    #[test]
    fn fill_area_may_upscale() {
        // Small source still fully covers the box
        assert_eq!(
            target_dimensions((100, 100), (200, 300), ResizePolicy::FillArea),
            (300, 300)
        );
    }
}
