//! Month-keyed garden care recommendations.
//!
//! Recommendations come from four sources: fixed seasonal tasks, frost
//! timing, climate thresholds (heat, drought, wet soil, wind), and the status
//! of each tracked crop. The combined list is ordered by priority and capped
//! at [`MAX_SEASONAL_RECOMMENDATIONS`].

use serde::Serialize;

use crate::calendar::{in_harvest_window, planting_months};
use crate::crops::{find_crop, CropStatus, CropStatusRegistry, Tolerance};
use crate::location::LocationConfig;
use crate::season::{Month, Season};

/// Upper bound on the length of [`seasonal_recommendations`].
pub const MAX_SEASONAL_RECOMMENDATIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Planting,
    Care,
    Harvest,
    Rescue,
    Removal,
    Protection,
    Watering,
    Soil,
    Planning,
}

/// Ordered so that sorting ascending puts the most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
}

impl Recommendation {
    fn new(
        category: RecommendationCategory,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            priority,
            title: title.into(),
            description: description.into(),
            crop: None,
        }
    }

    fn for_crop(mut self, key: &str) -> Self {
        self.crop = Some(key.to_string());
        self
    }
}

/// Recommendations for `month`, at most [`MAX_SEASONAL_RECOMMENDATIONS`].
pub fn seasonal_recommendations(
    month: Month,
    location: &LocationConfig,
    registry: &CropStatusRegistry,
) -> Vec<Recommendation> {
    let season = Season::for_month(month, location.hemisphere());

    let mut recommendations = Vec::new();
    recommendations.extend(frost_recommendations(month, location));
    recommendations.extend(climate_recommendations(season, location));
    for key in registry.tracked_keys() {
        recommendations.extend(crop_recommendations(key, month, location, registry));
    }
    recommendations.extend(season_tasks(season));

    // Stable sort keeps source order within a priority.
    recommendations.sort_by_key(|r| r.priority);
    recommendations.truncate(MAX_SEASONAL_RECOMMENDATIONS);
    recommendations
}

/// Recommendations for a single crop, driven by its status.
///
/// - growing: care, plus harvest when `month` is in its harvest window
/// - dying: rescue
/// - not wanted: removal
/// - untracked: planting, when `month` is one of its planting months
pub fn crop_recommendations(
    key: &str,
    month: Month,
    location: &LocationConfig,
    registry: &CropStatusRegistry,
) -> Vec<Recommendation> {
    let crop = find_crop(key);
    let name = crop.map_or(key, |c| c.name);
    let season = Season::for_month(month, location.hemisphere());

    match registry.status_of(key) {
        CropStatus::NotWanted => vec![Recommendation::new(
            RecommendationCategory::Removal,
            Priority::Low,
            format!("Remove {name}"),
            format!("Pull {name} and compost healthy material to free the bed for something you want."),
        )
        .for_crop(key)],

        CropStatus::Dying => {
            let cause = if season == Season::Summer && location.is_hot() {
                "heat stress is the likeliest cause; water at dawn and add afternoon shade"
            } else if location.is_wet() {
                "soggy soil is the likeliest cause; hold off watering and check for root rot"
            } else {
                "check soil moisture, inspect leaves for pests, and remove diseased growth"
            };
            vec![Recommendation::new(
                RecommendationCategory::Rescue,
                Priority::High,
                format!("Rescue {name}"),
                format!("{name} is struggling: {cause}."),
            )
            .for_crop(key)]
        }

        CropStatus::Growing => {
            let Some(crop) = crop else {
                return Vec::new();
            };
            let mut out = Vec::new();
            if in_harvest_window(crop, location, month) {
                out.push(
                    Recommendation::new(
                        RecommendationCategory::Harvest,
                        Priority::Medium,
                        format!("Harvest {name}"),
                        format!("{name} is in its harvest window; pick regularly to keep it producing."),
                    )
                    .for_crop(key),
                );
            }
            if season == Season::Summer
                && location.is_dry()
                && crop.drought_tolerance == Tolerance::Low
            {
                out.push(
                    Recommendation::new(
                        RecommendationCategory::Watering,
                        Priority::High,
                        format!("Keep {name} evenly watered"),
                        format!("{name} wilts quickly in dry weather; water deeply every two to three days."),
                    )
                    .for_crop(key),
                );
            } else {
                out.push(
                    Recommendation::new(
                        RecommendationCategory::Care,
                        Priority::Low,
                        format!("Tend {name}"),
                        format!("Check {name} weekly for pests and side-dress with compost."),
                    )
                    .for_crop(key),
                );
            }
            out
        }

        CropStatus::Untracked => match crop {
            Some(crop) if planting_months(crop, location).contains(&month) => {
                vec![Recommendation::new(
                    RecommendationCategory::Planting,
                    Priority::Medium,
                    format!("Plant {name}"),
                    format!("{} is a good month to start {name} in your garden.", month.name()),
                )
                .for_crop(key)]
            }
            _ => Vec::new(),
        },
    }
}

fn frost_recommendations(month: Month, location: &LocationConfig) -> Vec<Recommendation> {
    let last_frost = location.effective_last_frost();
    let first_frost = location.effective_first_frost();
    let mut out = Vec::new();

    if month == last_frost || month == last_frost.offset(-1) {
        out.push(Recommendation::new(
            RecommendationCategory::Protection,
            Priority::High,
            "Late frost risk",
            format!(
                "Your average last frost falls in {}. Keep frost cloth handy and hold tender transplants back.",
                last_frost.name()
            ),
        ));
    }
    if month == first_frost || month == first_frost.offset(-1) {
        out.push(Recommendation::new(
            RecommendationCategory::Protection,
            Priority::High,
            "First frost approaching",
            format!(
                "Expect the first frost in {}. Harvest tender crops and cover what remains on cold nights.",
                first_frost.name()
            ),
        ));
    }
    out
}

fn climate_recommendations(season: Season, location: &LocationConfig) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if season == Season::Summer && location.is_hot() {
        out.push(Recommendation::new(
            RecommendationCategory::Protection,
            Priority::High,
            "Shade against heat",
            format!(
                "Summer highs near {:.0}°F stress most vegetables. Use 30-40% shade cloth over leafy crops in the afternoon.",
                location.effective_summer_high_f()
            ),
        ));
    }

    if matches!(season, Season::Spring | Season::Summer) && location.is_dry() {
        out.push(Recommendation::new(
            RecommendationCategory::Watering,
            Priority::High,
            "Water deeply and mulch",
            "With little rainfall, water deeply once or twice a week and keep 3 inches of mulch on the beds.",
        ));
    }

    if matches!(season, Season::Spring | Season::Autumn) && location.is_wet() {
        out.push(Recommendation::new(
            RecommendationCategory::Soil,
            Priority::Medium,
            "Improve drainage",
            "Heavy rainfall waterlogs beds. Add compost and consider raised beds for root crops.",
        ));
    }

    if location.wind_exposed && matches!(season, Season::Autumn | Season::Winter | Season::Spring) {
        out.push(Recommendation::new(
            RecommendationCategory::Protection,
            Priority::Medium,
            "Shelter from wind",
            "Stake tall plants and put up a windbreak on the prevailing-wind side.",
        ));
    }

    out
}

fn season_tasks(season: Season) -> Vec<Recommendation> {
    let (first, second) = match season {
        Season::Winter => (
            ("Plan next season's beds", "Sketch crop rotation so no family returns to the same bed two years running."),
            ("Order seeds", "Order seed now while varieties are in stock."),
        ),
        Season::Spring => (
            ("Prepare beds", "Work in 2 inches of compost before planting."),
            ("Harden off seedlings", "Move indoor seedlings outside a few hours a day for a week before transplanting."),
        ),
        Season::Summer => (
            ("Mulch beds", "Mulch keeps roots cool and holds moisture through hot spells."),
            ("Scout for pests", "Walk the garden weekly and check leaf undersides."),
        ),
        Season::Autumn => (
            ("Sow a cover crop", "Cover bare beds with clover or winter rye to protect and feed the soil."),
            ("Clear spent plants", "Remove finished crops to cut overwintering pests and disease."),
        ),
    };

    vec![
        Recommendation::new(RecommendationCategory::Planning, Priority::Medium, first.0, first.1),
        Recommendation::new(RecommendationCategory::Planning, Priority::Low, second.0, second.1),
    ]
}
