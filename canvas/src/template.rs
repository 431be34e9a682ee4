//! Preset region layouts.
//!
//! A template is a list of rectangles in normalized `0..=1` coordinates,
//! scaled to the current canvas and rounded to whole units. Applying one
//! replaces every existing region.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use crate::doc::{Action, Bounds, Region};
use crate::mapper::CanvasSize;

/// Rectangle in normalized canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A built-in layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Two rows of three.
    Grid2x3,
    /// Three rows of three.
    Grid3x3,
    /// Three full-height columns.
    ThreeColumns,
    /// Top and bottom halves.
    TwoRows,
    /// Three columns across the bottom 30%.
    BottomThree,
    /// One region covering the whole menu.
    Single,
}

impl Template {
    pub const ALL: [Self; 6] =
        [Self::Grid2x3, Self::Grid3x3, Self::ThreeColumns, Self::TwoRows, Self::BottomThree, Self::Single];

    /// Stable identifier for host UIs.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Grid2x3 => "2x3",
            Self::Grid3x3 => "3x3",
            Self::ThreeColumns => "3col",
            Self::TwoRows => "2row_top",
            Self::BottomThree => "bottom_3",
            Self::Single => "single",
        }
    }

    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Grid2x3 => "2 rows x 3 columns",
            Self::Grid3x3 => "3 x 3 grid",
            Self::ThreeColumns => "3 columns",
            Self::TwoRows => "Top / bottom",
            Self::BottomThree => "Bottom 3 columns",
            Self::Single => "Whole menu",
        }
    }

    /// Layout rectangles in normalized coordinates, in paint order.
    #[must_use]
    pub fn rects(self) -> Vec<UnitRect> {
        let third = 1.0 / 3.0;
        match self {
            Self::Grid2x3 => grid(2, 3),
            Self::Grid3x3 => grid(3, 3),
            Self::ThreeColumns => (0_u8..3).map(|c| unit(f64::from(c) * third, 0.0, third, 1.0)).collect(),
            Self::TwoRows => vec![unit(0.0, 0.0, 1.0, 0.5), unit(0.0, 0.5, 1.0, 0.5)],
            Self::BottomThree => (0_u8..3).map(|c| unit(f64::from(c) * third, 0.7, third, 0.3)).collect(),
            Self::Single => vec![unit(0.0, 0.0, 1.0, 1.0)],
        }
    }

    /// Fresh regions for this layout on `size`, each with the default action.
    #[must_use]
    pub fn build(self, size: CanvasSize) -> Vec<Region> {
        let w = f64::from(size.width);
        let h = f64::from(size.height);
        self.rects()
            .into_iter()
            .map(|r| {
                let bounds = Bounds::new(round(r.x * w), round(r.y * h), round(r.w * w), round(r.h * h));
                Region::new(bounds, Action::default())
            })
            .collect()
    }
}

fn unit(x: f64, y: f64, w: f64, h: f64) -> UnitRect {
    UnitRect { x, y, w, h }
}

fn grid(rows: u32, cols: u32) -> Vec<UnitRect> {
    let (rows_f, cols_f) = (f64::from(rows), f64::from(cols));
    (0..rows)
        .flat_map(|r| {
            (0..cols).map(move |c| unit(f64::from(c) / cols_f, f64::from(r) / rows_f, 1.0 / cols_f, 1.0 / rows_f))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn round(v: f64) -> i32 {
    v.round() as i32
}
