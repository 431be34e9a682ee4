//! Menu documents: export, lenient import, structural validation, and the
//! background-image rules.
//!
//! A [`RichMenuDoc`] is the JSON shape the menu API accepts (plus an optional
//! `imageUrl` extension the editor round-trips). Areas in a document have no
//! ids; importing assigns fresh ones.
//!
//! Validation here is structural only: area count and geometry against the
//! declared size. Action payloads are passed through as-is.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    IMAGE_MAX_BYTES, IMAGE_MAX_WIDTH, IMAGE_MIN_ASPECT, IMAGE_MIN_HEIGHT, IMAGE_MIN_WIDTH, MAX_REGIONS,
    PLACEHOLDER_MAX_HEIGHT_RATIO, PLACEHOLDER_MIN_WIDTH_RATIO,
};
use crate::doc::{Action, Bounds, Region};
use crate::error::{ImageError, MenuError};
use crate::mapper::CanvasSize;

/// Image MIME types the menu API accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

// =============================================================
// Settings
// =============================================================

/// Menu-level fields edited alongside the regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSettings {
    pub name: String,
    /// Label of the bar that opens the menu.
    pub chat_bar_text: String,
    /// Whether the menu opens by default.
    pub selected: bool,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            name: "My Rich Menu".to_owned(),
            chat_bar_text: "Tap here".to_owned(),
            selected: false,
        }
    }
}

// =============================================================
// Document
// =============================================================

/// One tap area as it appears in a menu document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuArea {
    pub bounds: Bounds,
    #[serde(default)]
    pub action: Action,
}

/// The menu API's rich-menu object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RichMenuDoc {
    pub size: CanvasSize,
    pub selected: bool,
    pub name: String,
    pub chat_bar_text: String,
    pub areas: Vec<MenuArea>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RichMenuDoc {
    /// Assemble a document from editor state. Region order becomes area order.
    #[must_use]
    pub fn from_parts(settings: &MenuSettings, size: CanvasSize, regions: &[Region]) -> Self {
        Self {
            size,
            selected: settings.selected,
            name: settings.name.clone(),
            chat_bar_text: settings.chat_bar_text.clone(),
            areas: regions.iter().map(|r| MenuArea { bounds: r.bounds, action: r.action.clone() }).collect(),
            image_url: None,
        }
    }

    /// Parse a document, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Json`] if `text` is not JSON or an area is malformed.
    pub fn from_json(text: &str) -> Result<Self, MenuError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Pretty-printed JSON ready for the menu API.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, MenuError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Menu-level settings carried by this document.
    #[must_use]
    pub fn settings(&self) -> MenuSettings {
        MenuSettings {
            name: self.name.clone(),
            chat_bar_text: self.chat_bar_text.clone(),
            selected: self.selected,
        }
    }

    /// Regions for this document's areas, each with a fresh id.
    #[must_use]
    pub fn to_regions(&self) -> Vec<Region> {
        self.areas.iter().map(|a| Region::new(a.bounds, a.action.clone())).collect()
    }

    /// Structural problems that would make the menu API reject this document.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.size.width <= 0 || self.size.height <= 0 {
            issues.push(ValidationIssue::InvalidSize { width: self.size.width, height: self.size.height });
        }
        if self.areas.len() > MAX_REGIONS {
            issues.push(ValidationIssue::TooManyAreas { count: self.areas.len(), max: MAX_REGIONS });
        }
        for (i, area) in self.areas.iter().enumerate() {
            let area_no = i + 1;
            let b = area.bounds;
            if b.x < 0 || b.y < 0 {
                issues.push(ValidationIssue::NegativeOrigin { area: area_no });
            }
            if b.width < 1 || b.height < 1 {
                issues.push(ValidationIssue::EmptyArea { area: area_no });
            }
            if b.right() > self.size.width || b.bottom() > self.size.height {
                issues.push(ValidationIssue::OutOfBounds { area: area_no });
            }
        }
        issues
    }
}

/// A structural problem found by [`RichMenuDoc::validate`]. Areas are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("size is invalid ({width}x{height})")]
    InvalidSize { width: i32, height: i32 },

    #[error("areas must number {max} or fewer (got {count})")]
    TooManyAreas { count: usize, max: usize },

    #[error("area {area}: x/y must be 0 or greater")]
    NegativeOrigin { area: usize },

    #[error("area {area}: width/height must be 1 or greater")]
    EmptyArea { area: usize },

    #[error("area {area}: bounds exceed the menu size")]
    OutOfBounds { area: usize },
}

// =============================================================
// Background image
// =============================================================

/// Check an uploaded file's type and size before decoding it.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedType`] or [`ImageError::TooLarge`].
pub fn check_image_file(mime: &str, bytes: u64) -> Result<(), ImageError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime) {
        return Err(ImageError::UnsupportedType { mime: mime.to_owned() });
    }
    if bytes > IMAGE_MAX_BYTES {
        return Err(ImageError::TooLarge { bytes, max: IMAGE_MAX_BYTES });
    }
    Ok(())
}

/// Check decoded image dimensions. Rules are tested in order: width, height,
/// aspect ratio.
///
/// # Errors
///
/// Returns the first [`ImageError`] rule the image breaks.
pub fn check_image_dimensions(width: u32, height: u32) -> Result<(), ImageError> {
    if !(IMAGE_MIN_WIDTH..=IMAGE_MAX_WIDTH).contains(&width) {
        return Err(ImageError::Width { width, min: IMAGE_MIN_WIDTH, max: IMAGE_MAX_WIDTH });
    }
    if height < IMAGE_MIN_HEIGHT {
        return Err(ImageError::Height { height, min: IMAGE_MIN_HEIGHT });
    }
    let ratio = f64::from(width) / f64::from(height);
    if ratio < IMAGE_MIN_ASPECT {
        return Err(ImageError::AspectRatio { ratio, min: IMAGE_MIN_ASPECT });
    }
    Ok(())
}

/// Whether `bounds` looks like a full-width banner left over from before an
/// image was chosen.
#[must_use]
pub fn is_placeholder_banner(bounds: Bounds, size: CanvasSize) -> bool {
    let width_ratio = f64::from(bounds.width) / f64::from(size.width.max(1));
    let height_ratio = f64::from(bounds.height) / f64::from(size.height.max(1));
    width_ratio >= PLACEHOLDER_MIN_WIDTH_RATIO && height_ratio <= PLACEHOLDER_MAX_HEIGHT_RATIO
}
