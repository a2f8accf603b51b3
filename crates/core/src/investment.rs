//! Climate-driven infrastructure investment recommendations.
//!
//! Each candidate investment is scored against the location's climate
//! thresholds. Candidates that do not apply are dropped, the rest are ranked
//! by priority and then by cost, optionally filtered by budget.

use serde::Serialize;

use crate::location::{LocationConfig, SoilType};
use crate::recommendations::Priority;

/// Upper bound on the length of [`investment_recommendations`].
pub const MAX_INVESTMENTS: usize = 5;

/// Drip irrigation cost per square foot of bed, USD.
const DRIP_COST_PER_SQ_FT: f64 = 0.9;

/// Minimum drip irrigation kit cost, USD.
const DRIP_MIN_COST: u32 = 150;

/// Last frost month at or after which the season counts as short.
const SHORT_SEASON_LAST_FROST: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub key: &'static str,
    pub name: &'static str,
    pub priority: Priority,
    pub estimated_cost_usd: u32,
    pub rationale: String,
}

/// Ranked investments for `location`, at most [`MAX_INVESTMENTS`].
///
/// With a `budget`, investments costing more than it are left out.
pub fn investment_recommendations(location: &LocationConfig, budget: Option<u32>) -> Vec<Investment> {
    let mut candidates: Vec<Investment> = [
        rain_barrel(location),
        drip_irrigation(location),
        shade_cloth(location),
        frost_cloth(location),
        windbreak(location),
        raised_beds(location),
        soil_amendment(location),
        cold_frame(location),
    ]
    .into_iter()
    .flatten()
    .filter(|inv| budget.map_or(true, |limit| inv.estimated_cost_usd <= limit))
    .collect();

    candidates.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.estimated_cost_usd.cmp(&b.estimated_cost_usd))
    });
    candidates.truncate(MAX_INVESTMENTS);
    candidates
}

fn investment(
    key: &'static str,
    name: &'static str,
    priority: Priority,
    estimated_cost_usd: u32,
    rationale: impl Into<String>,
) -> Option<Investment> {
    Some(Investment {
        key,
        name,
        priority,
        estimated_cost_usd,
        rationale: rationale.into(),
    })
}

fn rain_barrel(location: &LocationConfig) -> Option<Investment> {
    let priority = if location.annual_rainfall_inches < 30.0 {
        Priority::High
    } else {
        Priority::Low
    };
    investment(
        "rain_barrel",
        "Rain barrel",
        priority,
        120,
        format!(
            "Captures roof runoff; with {:.0} in of rain a year every stored gallon offsets irrigation.",
            location.annual_rainfall_inches
        ),
    )
}

fn drip_irrigation(location: &LocationConfig) -> Option<Investment> {
    let priority = if location.annual_rainfall_inches < 25.0 || location.is_hot() {
        Priority::High
    } else if location.is_warm() {
        Priority::Medium
    } else {
        return None;
    };
    let cost = ((location.garden_size_sq_ft * DRIP_COST_PER_SQ_FT).round() as u32).max(DRIP_MIN_COST);
    investment(
        "drip_irrigation",
        "Drip irrigation",
        priority,
        cost,
        "Delivers water to roots with little evaporation, which matters most in hot or dry summers.",
    )
}

fn shade_cloth(location: &LocationConfig) -> Option<Investment> {
    let priority = if location.is_hot() {
        Priority::High
    } else if location.is_warm() {
        Priority::Medium
    } else {
        return None;
    };
    investment(
        "shade_cloth",
        "Shade cloth",
        priority,
        80,
        format!(
            "Summer highs around {:.0}°F scorch leafy crops; 30-40% shade cloth extends their season.",
            location.effective_summer_high_f()
        ),
    )
}

fn frost_cloth(location: &LocationConfig) -> Option<Investment> {
    let priority = if location.frost_pocket {
        Priority::High
    } else if location.winter_low_f <= 10.0 {
        Priority::Medium
    } else {
        return None;
    };
    investment(
        "frost_cloth",
        "Frost cloth",
        priority,
        40,
        "Row cover buys several degrees on frosty nights at both ends of the season.",
    )
}

fn windbreak(location: &LocationConfig) -> Option<Investment> {
    if !location.wind_exposed {
        return None;
    }
    investment(
        "windbreak",
        "Windbreak fence or hedge",
        Priority::High,
        300,
        "Wind dries soil and snaps stems; a windbreak shelters an area up to ten times its height.",
    )
}

fn raised_beds(location: &LocationConfig) -> Option<Investment> {
    let priority = if location.soil_type == SoilType::Clay || location.is_wet() {
        Priority::High
    } else if location.soil_type == SoilType::Sand {
        Priority::Medium
    } else {
        return None;
    };
    investment(
        "raised_beds",
        "Raised beds",
        priority,
        400,
        "Raised beds drain freely and warm early, sidestepping heavy or waterlogged native soil.",
    )
}

fn soil_amendment(location: &LocationConfig) -> Option<Investment> {
    let priority = match location.soil_type {
        SoilType::Clay | SoilType::Sand => Priority::Medium,
        SoilType::Loam | SoilType::Silt => Priority::Low,
    };
    investment(
        "soil_amendment",
        "Compost and soil amendment",
        priority,
        60,
        "Organic matter improves drainage in clay and water holding in sand.",
    )
}

fn cold_frame(location: &LocationConfig) -> Option<Investment> {
    let short_season = location.last_frost_month >= SHORT_SEASON_LAST_FROST
        && location.hemisphere() == crate::season::Hemisphere::Northern;
    let cold_zone = location.zone_number().is_some_and(|zone| zone <= 5);
    if !short_season && !cold_zone {
        return None;
    }
    investment(
        "cold_frame",
        "Cold frame",
        Priority::Medium,
        150,
        "A cold frame starts seedlings weeks before the last frost and stretches greens into winter.",
    )
}
