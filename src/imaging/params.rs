//! Parameter types for raster operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the directive layer (which decides what a resize means)
//! and the [`backend`](super::backend) (which does the actual pixel work).
//! Keeping them here lets the raster layer stay self-contained: the backend
//! never sees a query string.
//!
//! ## Types
//!
//! - [`ResizePolicy`] — the five directive flags governing how the requested
//!   box interacts with the source dimensions.
//! - [`Quality`] — lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`RenderJob`] — full specification for one render: resolved box, policy,
//!   quality, target format token.

/// Resize policy selected by the directive's flag character.
///
/// | Flag | Policy | Behavior |
/// |------|--------|----------|
/// | (none) | `Free` | resize to the box exactly, aspect not preserved |
/// | `!` | `ForceExact` | force the box exactly, aspect not preserved |
/// | `>` | `ShrinkLarger` | fit into the box only if the source exceeds it |
/// | `<` | `EnlargeSmaller` | fit up to the box only if the source is smaller |
/// | `^` | `FillArea` | cover the box preserving aspect; one side may overflow |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizePolicy {
    #[default]
    Free,
    ForceExact,
    ShrinkLarger,
    EnlargeSmaller,
    FillArea,
}

impl ResizePolicy {
    /// Map a directive flag character to its policy. `None` for anything
    /// outside the recognized set.
    pub fn from_flag(c: char) -> Option<Self> {
        match c {
            '!' => Some(Self::ForceExact),
            '>' => Some(Self::ShrinkLarger),
            '<' => Some(Self::EnlargeSmaller),
            '^' => Some(Self::FillArea),
            _ => None,
        }
    }

    /// The flag character this policy is spelled with, if any.
    pub fn flag_char(self) -> Option<char> {
        match self {
            Self::Free => None,
            Self::ForceExact => Some('!'),
            Self::ShrinkLarger => Some('>'),
            Self::EnlargeSmaller => Some('<'),
            Self::FillArea => Some('^'),
        }
    }

    /// Suffix appended to synthesized output names.
    pub fn name_suffix(self) -> &'static str {
        match self {
            Self::Free => "",
            Self::ForceExact => "-ignore-aspect",
            Self::ShrinkLarger => "-shrink-larger",
            Self::EnlargeSmaller => "-enlarge-smaller",
            Self::FillArea => "-fill-area",
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Full specification for one render operation.
///
/// `width`/`height` are the *resolved box* — unset directive dimensions have
/// already been replaced by the source's intrinsic dimensions. The backend
/// applies `policy` to decide the final output dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub width: u32,
    pub height: u32,
    pub policy: ResizePolicy,
    /// Encoder quality; `None` means "use the encoder's default". Formats
    /// without a quality knob ignore it.
    pub quality: Option<Quality>,
    /// Lowercase target format token (`jpg`, `png`, `webp`, ...).
    pub format: String,
}
