//! Error types for fallible store, menu, and image operations.
//!
//! Interactive geometry never fails: stale ids, degenerate viewports and
//! undersized draws are silent no-ops. Only bulk writes, document parsing and
//! image checks surface errors to the caller.

use crate::doc::RegionId;

/// Rejected write to the region store. The store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// `add` was called with the store already full.
    #[error("region limit reached (max {max})")]
    CapacityReached { max: usize },

    /// A bulk write would leave more regions than allowed.
    #[error("too many regions: {count} (max {max})")]
    TooManyRegions { count: usize, max: usize },

    /// `add` was called with an id that is already present.
    #[error("region {id} already exists")]
    DuplicateId { id: RegionId },
}

/// Failure to read a menu document.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// The text is not valid JSON or does not match the document shape.
    #[error("invalid menu JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but would not fit in the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Background image outside what the menu API accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImageError {
    #[error("only JPEG or PNG images are allowed (got {mime})")]
    UnsupportedType { mime: String },

    #[error("image file must be {max} bytes or less (got {bytes})")]
    TooLarge { bytes: u64, max: u64 },

    #[error("image width must be between {min} and {max} pixels (got {width})")]
    Width { width: u32, min: u32, max: u32 },

    #[error("image height must be at least {min} pixels (got {height})")]
    Height { height: u32, min: u32 },

    #[error("image aspect ratio (width/height) must be at least {min} (got {ratio:.2})")]
    AspectRatio { ratio: f64, min: f64 },
}
