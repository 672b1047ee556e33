//! Data models for wiki units and their detail-page records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Panel layout slot reported for every unit.
///
/// The wiki renders every unit panel in the same slot, so detail pages carry
/// this as a constant. Kept literal on purpose; do not generalize without
/// confirming the site ever uses another value.
pub const POSITION: &str = "Middle Far Right";

/// One unit as assembled from a listing row, optionally enriched with its
/// detail page via [`Unit::merged_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Canonical unit name, unique within a fetch.
    pub name: String,
    /// Purchase costs by resource.
    pub costs: Costs,
    /// Combat stats.
    pub stats: Stats,
    /// Gameplay attributes and flags.
    pub attributes: Attributes,
    /// Related page and image locators.
    pub links: Links,
    /// Numeric unit category.
    #[serde(rename = "type")]
    pub unit_type: u32,
    /// Slash-joined dual name for composite entries.
    pub unit_spell: String,
    /// Ability text from the detail page, whitespace-collapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities: Option<String>,
    /// Change log keyed by ISO date, entries in document order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_history: Option<BTreeMap<String, Vec<String>>>,
    /// Panel layout hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Resource costs from the listing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costs {
    pub gold: u32,
    pub energy: u32,
    pub green: u32,
    pub blue: u32,
    pub red: u32,
}

/// Combat stats from the listing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub attack: u32,
    pub health: u32,
}

/// Gameplay attributes from the listing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub supply: u32,
    pub frontline: bool,
    pub fragile: bool,
    pub blocker: bool,
    pub prompt: bool,
    pub stamina: u32,
    pub lifespan: u32,
    pub build_time: u32,
    pub exhaust_turn: u32,
    pub exhaust_ability: u32,
}

/// Page and image locators attached to a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Relative path of the unit's own page. Always present once a listing
    /// row parses successfully.
    pub path: String,
    /// Artwork thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// In-game panel screenshot URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
}

impl Links {
    /// Key-wise merge with detail values winning on conflict. Keys only one
    /// side carries are kept.
    fn merged_with(&self, detail: &DetailLinks) -> Links {
        Links {
            path: detail.path.clone().unwrap_or_else(|| self.path.clone()),
            image: detail.image.clone().or_else(|| self.image.clone()),
            panel: detail.panel.clone().or_else(|| self.panel.clone()),
        }
    }
}

impl Unit {
    /// Builds a new record with `detail` layered on top of this one:
    /// structured sub-records merge key-wise (detail wins per key), scalar
    /// fields are overwritten, and fields only one side carries survive.
    /// Neither input is mutated.
    pub fn merged_with(&self, detail: &UnitDetail) -> Unit {
        Unit {
            name: detail.name.clone(),
            costs: self.costs,
            stats: self.stats,
            attributes: self.attributes,
            links: self.links.merged_with(&detail.links),
            unit_type: self.unit_type,
            unit_spell: self.unit_spell.clone(),
            abilities: Some(detail.abilities.clone()),
            change_history: Some(detail.change_history.clone()),
            position: Some(detail.position.clone()),
        }
    }
}

/// Everything a unit's detail page contributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDetail {
    /// Unit name as shown on the detail page.
    pub name: String,
    /// Ability text, whitespace-collapsed.
    pub abilities: String,
    /// Change log keyed by ISO date.
    pub change_history: BTreeMap<String, Vec<String>>,
    /// Locators found on the detail page.
    pub links: DetailLinks,
    /// Panel layout hint.
    pub position: String,
}

/// Locators a detail page may carry. All optional; the page path is merged
/// over the listing-provided one only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<String>,
}
