//! Document model: regions, their actions, and the ordered region store.
//!
//! This module defines what sits on the menu canvas (`Region`, `Bounds`,
//! `Action`), a sparse-update type for incremental edits (`RegionPatch`), and
//! the runtime store that owns the ordered collection (`RegionStore`).
//!
//! The store is written from many independent call sites: pointer drags on
//! every move event, template application, imported JSON, menus loaded from
//! the remote API. Every write therefore deduplicates by id and detects
//! value-identical results, so a redundant write never bumps the revision
//! counter that downstream consumers (re-render, persistence) watch.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MAX_REGIONS;
use crate::error::StoreError;
use crate::mapper::LogicalPoint;

/// Unique identifier for a region.
pub type RegionId = Uuid;

// =============================================================
// Bounds
// =============================================================

/// Axis-aligned rectangle in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Bounding box of two corner points, in either order.
    #[must_use]
    pub fn from_corners(a: LogicalPoint, b: LogicalPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: a.x.abs_diff(b.x).try_into().unwrap_or(i32::MAX),
            height: a.y.abs_diff(b.y).try_into().unwrap_or(i32::MAX),
        }
    }

    /// Exclusive right edge. Saturates for out-of-range imported bounds.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether `p` lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, p: LogicalPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

// =============================================================
// Actions
// =============================================================

/// What happens when a user taps a region.
///
/// Serialized with a `"type"` tag and camelCase fields, matching the menu
/// API's action objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Open a link.
    Uri {
        #[serde(default)]
        uri: String,
    },
    /// Send a text message as the user.
    Message {
        #[serde(default)]
        text: String,
    },
    /// Send a postback event to the bot's webhook.
    #[serde(rename_all = "camelCase")]
    Postback {
        #[serde(default)]
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<PostbackDisplay>,
    },
    /// Open a date and/or time picker and post the selection back.
    #[serde(rename = "datetimepicker")]
    DatetimePicker {
        #[serde(default)]
        data: String,
        #[serde(default)]
        mode: DatetimeMode,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<String>,
    },
    /// Switch the chat to another rich menu by alias.
    #[serde(rename = "richmenuswitch", rename_all = "camelCase")]
    RichMenuSwitch {
        #[serde(default, alias = "richMenuId")]
        rich_menu_alias_id: String,
        #[serde(default)]
        data: String,
    },
}

impl Default for Action {
    /// The action given to freshly drawn or templated regions.
    fn default() -> Self {
        Self::Message { text: "Hello".to_owned() }
    }
}

impl Action {
    /// Empty payload for `kind`, used when an editor switches a region's action type.
    #[must_use]
    pub fn blank(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Uri => Self::Uri { uri: String::new() },
            ActionKind::Message => Self::Message { text: String::new() },
            ActionKind::Postback => Self::Postback {
                data: String::new(),
                display_text: None,
                label: None,
                display: Some(PostbackDisplay::Nothing),
            },
            ActionKind::DatetimePicker => Self::DatetimePicker {
                data: String::new(),
                mode: DatetimeMode::Datetime,
                initial: None,
                max: None,
                min: None,
            },
            ActionKind::RichMenuSwitch => Self::RichMenuSwitch { rich_menu_alias_id: String::new(), data: String::new() },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Uri { .. } => ActionKind::Uri,
            Self::Message { .. } => ActionKind::Message,
            Self::Postback { .. } => ActionKind::Postback,
            Self::DatetimePicker { .. } => ActionKind::DatetimePicker,
            Self::RichMenuSwitch { .. } => ActionKind::RichMenuSwitch,
        }
    }
}

/// Discriminant of [`Action`], for type pickers and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Uri,
    Message,
    Postback,
    DatetimePicker,
    RichMenuSwitch,
}

impl ActionKind {
    pub const ALL: [Self; 5] = [Self::Uri, Self::Message, Self::Postback, Self::DatetimePicker, Self::RichMenuSwitch];

    /// Wire name used in the `"type"` tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Message => "message",
            Self::Postback => "postback",
            Self::DatetimePicker => "datetimepicker",
            Self::RichMenuSwitch => "richmenuswitch",
        }
    }
}

/// How the chat UI reacts after a postback tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostbackDisplay {
    /// Leave the menu as it is.
    #[serde(rename = "none")]
    Nothing,
    Close,
    Open,
    Keyboard,
    Voice,
}

/// Which picker a datetime action opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimeMode {
    Date,
    Time,
    #[default]
    Datetime,
}

impl DatetimeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
        }
    }
}

// =============================================================
// Region
// =============================================================

/// A rectangular tap zone with its action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Stable identity for the region's lifetime. Never reused.
    pub id: RegionId,
    /// Rectangle in logical canvas units.
    pub bounds: Bounds,
    /// Action fired on tap.
    pub action: Action,
}

impl Region {
    /// Create a region with a fresh id.
    #[must_use]
    pub fn new(bounds: Bounds, action: Action) -> Self {
        Self { id: Uuid::new_v4(), bounds, action }
    }
}

/// Sparse update for a region. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl RegionPatch {
    #[must_use]
    pub fn bounds(bounds: Bounds) -> Self {
        Self { bounds: Some(bounds), action: None }
    }

    #[must_use]
    pub fn action(action: Action) -> Self {
        Self { bounds: None, action: Some(action) }
    }

    fn apply_to(&self, region: &Region) -> Region {
        Region {
            id: region.id,
            bounds: self.bounds.unwrap_or(region.bounds),
            action: self.action.clone().unwrap_or_else(|| region.action.clone()),
        }
    }
}

// =============================================================
// Store
// =============================================================

/// Ordered, id-unique collection of regions.
///
/// Every successful mutation bumps [`RegionStore::revision`]; writes whose
/// outcome equals the current collection leave it untouched.
#[derive(Debug, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    revision: u64,
}

impl RegionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (templates, imports).
    ///
    /// Duplicate ids in `regions` collapse to one entry: the last occurrence's
    /// value, kept where the id first appeared. Returns `Ok(false)` when the
    /// deduplicated list equals the current collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TooManyRegions`] if more than [`MAX_REGIONS`]
    /// distinct regions remain; the store is not modified.
    pub fn replace_all(&mut self, regions: Vec<Region>) -> Result<bool, StoreError> {
        let next = dedupe_by_id(regions);
        if next.len() > MAX_REGIONS {
            return Err(StoreError::TooManyRegions { count: next.len(), max: MAX_REGIONS });
        }
        Ok(self.commit(next))
    }

    /// Update existing regions by id in place and append unseen ones.
    ///
    /// Regions absent from `incoming` are kept; order of existing regions
    /// never changes. Returns `Ok(false)` when nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TooManyRegions`] if the merged result would
    /// exceed [`MAX_REGIONS`]; the store is not modified.
    pub fn merge(&mut self, incoming: Vec<Region>) -> Result<bool, StoreError> {
        let incoming = dedupe_by_id(incoming);
        let mut merged = self.regions.clone();
        let slots: HashMap<RegionId, usize> = merged.iter().enumerate().map(|(i, r)| (r.id, i)).collect();

        for region in incoming {
            match slots.get(&region.id) {
                Some(&i) => merged[i] = region,
                None => merged.push(region),
            }
        }

        if merged.len() > MAX_REGIONS {
            return Err(StoreError::TooManyRegions { count: merged.len(), max: MAX_REGIONS });
        }
        Ok(self.commit(merged))
    }

    /// Apply `patch` to the region with `id`. Missing ids and patches that
    /// change nothing are no-ops returning `false`.
    pub fn update_one(&mut self, id: &RegionId, patch: &RegionPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let next = patch.apply_to(&self.regions[index]);
        if next == self.regions[index] {
            return false;
        }
        self.regions[index] = next;
        self.revision += 1;
        true
    }

    /// Remove a region by id, returning it if it was present.
    pub fn remove_one(&mut self, id: &RegionId) -> Option<Region> {
        let index = self.index_of(id)?;
        let removed = self.regions.remove(index);
        self.revision += 1;
        Some(removed)
    }

    /// Append a new region.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityReached`] when the store is full and
    /// [`StoreError::DuplicateId`] if the id is already present.
    pub fn add(&mut self, region: Region) -> Result<(), StoreError> {
        if self.regions.len() >= MAX_REGIONS {
            return Err(StoreError::CapacityReached { max: MAX_REGIONS });
        }
        if self.index_of(&region.id).is_some() {
            return Err(StoreError::DuplicateId { id: region.id });
        }
        self.regions.push(region);
        self.revision += 1;
        Ok(())
    }

    /// All regions in order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Return a reference to a region by id.
    #[must_use]
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == *id)
    }

    /// Position of a region in the collection.
    #[must_use]
    pub fn index_of(&self, id: &RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == *id)
    }

    /// Change counter; bumped exactly once per effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether another region can be added.
    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.regions.len() < MAX_REGIONS
    }

    /// Number of regions currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the store contains no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn commit(&mut self, next: Vec<Region>) -> bool {
        if next == self.regions {
            return false;
        }
        self.regions = next;
        self.revision += 1;
        true
    }
}

/// Collapse duplicate ids: the last value wins, at the first position.
fn dedupe_by_id(regions: Vec<Region>) -> Vec<Region> {
    let mut slots: HashMap<RegionId, usize> = HashMap::with_capacity(regions.len());
    let mut out: Vec<Region> = Vec::with_capacity(regions.len());
    for region in regions {
        if let Some(&i) = slots.get(&region.id) {
            out[i] = region;
        } else {
            slots.insert(region.id, out.len());
            out.push(region);
        }
    }
    out
}
