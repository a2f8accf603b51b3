//! Crop catalog and crop status registry.
//!
//! The catalog is a static template table. Planting offsets are expressed in
//! months relative to the location's last spring frost so that one template
//! serves every climate and both hemispheres.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::location::LocationConfig;

/* --------------------------------------------------------------------------
   Catalog types
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tolerance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CropSeason {
    Cool,
    Warm,
    Perennial,
}

/// A crop template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub key: &'static str,
    pub name: &'static str,
    pub family: &'static str,
    pub season: CropSeason,
    pub heat_tolerance: Tolerance,
    pub drought_tolerance: Tolerance,
    pub frost_hardy: bool,
    /// Days from direct sowing or transplanting to first harvest.
    pub days_to_maturity: u16,
    /// Months relative to last frost for starting seed indoors.
    pub sow_indoors_offset: Option<i8>,
    /// Months relative to last frost for sowing in place.
    pub direct_sow_offset: Option<i8>,
    /// Months relative to last frost for setting out transplants.
    pub transplant_offset: Option<i8>,
    /// Number of months the harvest continues once it starts.
    pub harvest_window_months: u8,
    /// Whether a second sowing two months before first frost is viable.
    pub fall_sowing: bool,
    pub min_zone: u8,
    pub max_zone: u8,
}

impl Crop {
    /// Offset (from last frost) of the planting that starts the harvest clock.
    pub fn planting_offset(&self) -> i8 {
        self.transplant_offset
            .or(self.direct_sow_offset)
            .unwrap_or(0)
    }

    /// Whole months from planting to first harvest, rounded up.
    pub fn months_to_maturity(&self) -> i8 {
        (self.days_to_maturity.div_ceil(30)).min(12) as i8
    }

    pub fn suits_zone(&self, zone: u8) -> bool {
        (self.min_zone..=self.max_zone).contains(&zone)
    }
}

macro_rules! crop {
    (
        $key:literal, $name:literal, $family:literal, $season:ident,
        heat: $heat:ident, drought: $drought:ident, hardy: $hardy:literal,
        days: $days:literal, indoors: $indoors:expr, direct: $direct:expr,
        transplant: $transplant:expr, harvest: $harvest:literal, fall: $fall:literal,
        zones: $min:literal..=$max:literal
    ) => {
        Crop {
            key: $key,
            name: $name,
            family: $family,
            season: CropSeason::$season,
            heat_tolerance: Tolerance::$heat,
            drought_tolerance: Tolerance::$drought,
            frost_hardy: $hardy,
            days_to_maturity: $days,
            sow_indoors_offset: $indoors,
            direct_sow_offset: $direct,
            transplant_offset: $transplant,
            harvest_window_months: $harvest,
            fall_sowing: $fall,
            min_zone: $min,
            max_zone: $max,
        }
    };
}

/// The built-in crop catalog, ordered by key.
pub static CATALOG: &[Crop] = &[
    crop!("basil", "Basil", "Lamiaceae", Warm,
        heat: Medium, drought: Low, hardy: false, days: 60,
        indoors: Some(-1), direct: None, transplant: Some(1), harvest: 3, fall: false,
        zones: 4..=11),
    crop!("bush_bean", "Bush Bean", "Fabaceae", Warm,
        heat: Medium, drought: Medium, hardy: false, days: 55,
        indoors: None, direct: Some(0), transplant: None, harvest: 2, fall: false,
        zones: 3..=10),
    crop!("carrot", "Carrot", "Apiaceae", Cool,
        heat: Low, drought: Medium, hardy: true, days: 70,
        indoors: None, direct: Some(-1), transplant: None, harvest: 2, fall: true,
        zones: 3..=10),
    crop!("cowpea", "Southern Pea", "Fabaceae", Warm,
        heat: High, drought: High, hardy: false, days: 70,
        indoors: None, direct: Some(1), transplant: None, harvest: 2, fall: false,
        zones: 5..=11),
    crop!("cucumber", "Cucumber", "Cucurbitaceae", Warm,
        heat: Medium, drought: Low, hardy: false, days: 60,
        indoors: None, direct: Some(1), transplant: None, harvest: 2, fall: false,
        zones: 4..=11),
    crop!("eggplant", "Eggplant", "Solanaceae", Warm,
        heat: High, drought: Medium, hardy: false, days: 80,
        indoors: Some(-2), direct: None, transplant: Some(1), harvest: 2, fall: false,
        zones: 4..=11),
    crop!("garlic", "Garlic", "Amaryllidaceae", Cool,
        heat: Medium, drought: High, hardy: true, days: 240,
        indoors: None, direct: Some(-6), transplant: None, harvest: 1, fall: false,
        zones: 3..=9),
    crop!("kale", "Kale", "Brassicaceae", Cool,
        heat: Medium, drought: Medium, hardy: true, days: 60,
        indoors: Some(-3), direct: None, transplant: Some(-1), harvest: 3, fall: true,
        zones: 2..=10),
    crop!("lettuce", "Lettuce", "Asteraceae", Cool,
        heat: Low, drought: Low, hardy: true, days: 45,
        indoors: None, direct: Some(-1), transplant: None, harvest: 2, fall: true,
        zones: 2..=11),
    crop!("melon", "Melon", "Cucurbitaceae", Warm,
        heat: High, drought: Medium, hardy: false, days: 85,
        indoors: Some(-1), direct: None, transplant: Some(1), harvest: 2, fall: false,
        zones: 4..=11),
    crop!("okra", "Okra", "Malvaceae", Warm,
        heat: High, drought: High, hardy: false, days: 60,
        indoors: None, direct: Some(1), transplant: None, harvest: 3, fall: false,
        zones: 5..=11),
    crop!("pepper", "Pepper", "Solanaceae", Warm,
        heat: High, drought: Medium, hardy: false, days: 80,
        indoors: Some(-2), direct: None, transplant: Some(1), harvest: 3, fall: false,
        zones: 3..=11),
    crop!("rosemary", "Rosemary", "Lamiaceae", Perennial,
        heat: High, drought: High, hardy: true, days: 90,
        indoors: None, direct: None, transplant: Some(1), harvest: 6, fall: false,
        zones: 7..=11),
    crop!("spinach", "Spinach", "Amaranthaceae", Cool,
        heat: Low, drought: Low, hardy: true, days: 40,
        indoors: None, direct: Some(-2), transplant: None, harvest: 2, fall: true,
        zones: 2..=9),
    crop!("summer_squash", "Summer Squash", "Cucurbitaceae", Warm,
        heat: Medium, drought: Low, hardy: false, days: 50,
        indoors: None, direct: Some(1), transplant: None, harvest: 3, fall: false,
        zones: 3..=11),
    crop!("sweet_potato", "Sweet Potato", "Convolvulaceae", Warm,
        heat: High, drought: High, hardy: false, days: 110,
        indoors: None, direct: None, transplant: Some(1), harvest: 1, fall: false,
        zones: 5..=11),
    crop!("swiss_chard", "Swiss Chard", "Amaranthaceae", Cool,
        heat: Medium, drought: Medium, hardy: true, days: 55,
        indoors: None, direct: Some(-1), transplant: None, harvest: 4, fall: false,
        zones: 3..=10),
    crop!("tomato", "Tomato", "Solanaceae", Warm,
        heat: Medium, drought: Medium, hardy: false, days: 75,
        indoors: Some(-2), direct: None, transplant: Some(1), harvest: 3, fall: false,
        zones: 3..=11),
];

/// Look up a crop template by key.
pub fn find_crop(key: &str) -> Option<&'static Crop> {
    CATALOG
        .binary_search_by(|crop| crop.key.cmp(key))
        .ok()
        .map(|index| &CATALOG[index])
}

/* --------------------------------------------------------------------------
   Crop status registry
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CropStatus {
    Growing,
    Dying,
    NotWanted,
    Untracked,
}

/// The three crop status sets stored with a garden.
///
/// The sets are expected to be disjoint but this is not enforced; see
/// [`status_of`](Self::status_of) for the precedence when they overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropStatusRegistry {
    pub growing: BTreeSet<String>,
    pub dying: BTreeSet<String>,
    pub not_wanted: BTreeSet<String>,
}

impl CropStatusRegistry {
    /// Parse the `cropStatus` value of a garden payload. Missing or `null`
    /// yields an empty registry.
    pub fn from_value(value: Option<&serde_json::Value>) -> Result<Self, CoreError> {
        match value {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(v) => serde_json::from_value(v.clone())
                .map_err(|e| CoreError::Validation(format!("Invalid crop status: {e}"))),
        }
    }

    /// Status of a crop. `notWanted` wins over `dying`, which wins over
    /// `growing`.
    pub fn status_of(&self, key: &str) -> CropStatus {
        if self.not_wanted.contains(key) {
            CropStatus::NotWanted
        } else if self.dying.contains(key) {
            CropStatus::Dying
        } else if self.growing.contains(key) {
            CropStatus::Growing
        } else {
            CropStatus::Untracked
        }
    }

    /// Every key present in at least one set, in sorted order.
    pub fn tracked_keys(&self) -> BTreeSet<&str> {
        self.growing
            .iter()
            .chain(&self.dying)
            .chain(&self.not_wanted)
            .map(String::as_str)
            .collect()
    }

    /// Keys that appear in more than one set.
    pub fn overlapping_keys(&self) -> Vec<&str> {
        self.tracked_keys()
            .into_iter()
            .filter(|key| {
                [&self.growing, &self.dying, &self.not_wanted]
                    .iter()
                    .filter(|set| set.contains(*key))
                    .count()
                    > 1
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.growing.is_empty() && self.dying.is_empty() && self.not_wanted.is_empty()
    }
}

/* --------------------------------------------------------------------------
   Suitability
   -------------------------------------------------------------------------- */

/// Base suitability score before climate adjustments.
const BASE_SCORE: i32 = 50;

/// A catalog crop ranked for a location.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSuggestion {
    pub crop: &'static Crop,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// Catalog crops that grow in the location's hardiness zone, best-suited
/// first.
pub fn suggest_crops(location: &LocationConfig) -> Vec<CropSuggestion> {
    let Some(zone) = location.zone_number() else {
        return Vec::new();
    };

    let mut suggestions: Vec<CropSuggestion> = CATALOG
        .iter()
        .filter(|crop| crop.suits_zone(zone))
        .map(|crop| score_crop(crop, location))
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score).then(a.crop.key.cmp(b.crop.key)));
    suggestions
}

fn score_crop(crop: &'static Crop, location: &LocationConfig) -> CropSuggestion {
    let mut score = BASE_SCORE;
    let mut reasons = Vec::new();

    if location.is_hot() {
        match crop.heat_tolerance {
            Tolerance::High => {
                score += 20;
                reasons.push("Thrives in hot summers".to_string());
            }
            Tolerance::Low => {
                score -= 20;
                reasons.push("Bolts or stalls in summer heat".to_string());
            }
            Tolerance::Medium => {}
        }
    }

    if location.is_dry() {
        match crop.drought_tolerance {
            Tolerance::High => {
                score += 15;
                reasons.push("Tolerates low rainfall".to_string());
            }
            Tolerance::Low => {
                score -= 15;
                reasons.push("Needs steady irrigation in a dry climate".to_string());
            }
            Tolerance::Medium => {}
        }
    }

    if location.frost_pocket && crop.frost_hardy {
        score += 10;
        reasons.push("Handles the late frosts of a frost pocket".to_string());
    }

    if crop.season == CropSeason::Cool && location.is_warm() && crop.fall_sowing {
        score += 5;
        reasons.push("Can be sown again for an autumn crop".to_string());
    }

    CropSuggestion {
        crop,
        score: score.clamp(0, 100) as u8,
        reasons,
    }
}
