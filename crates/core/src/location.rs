//! Site and climate configuration for a garden.
//!
//! A stored garden carries only the keys its owner changed; everything else
//! comes from [`LocationConfig::default`]. Overrides are merged key by key on
//! top of the defaults and the result is validated as a whole.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::season::{Hemisphere, Month};

/// Summer high (°F) at or above which heat-stress guidance applies.
pub const HOT_SUMMER_THRESHOLD_F: f64 = 90.0;

/// Summer high (°F) at or above which warm-summer guidance applies.
pub const WARM_SUMMER_THRESHOLD_F: f64 = 85.0;

/// Annual rainfall (inches) below which a site is treated as dry.
pub const DRY_RAINFALL_THRESHOLD_IN: f64 = 20.0;

/// Annual rainfall (inches) above which a site is treated as wet.
pub const WET_RAINFALL_THRESHOLD_IN: f64 = 50.0;

/// Extra °F added to the summer high for urban heat islands.
const HEAT_ISLAND_BONUS_F: f64 = 5.0;

/// Extra °F added to the summer high for south-facing (sun-facing) slopes.
const SOUTH_FACING_BONUS_F: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Loam,
    Sand,
    Silt,
}

/// Climate and site attributes of a garden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationConfig {
    /// USDA hardiness zone, e.g. `"7b"`.
    pub hardiness_zone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub annual_rainfall_inches: f64,
    /// Average daily high of the hottest month, °F.
    pub summer_high_f: f64,
    /// Average annual extreme minimum, °F.
    pub winter_low_f: f64,
    /// Month of the average last spring frost (1-12).
    pub last_frost_month: u8,
    /// Month of the average first autumn frost (1-12).
    pub first_frost_month: u8,
    pub soil_type: SoilType,
    pub garden_size_sq_ft: f64,
    pub heat_island: bool,
    pub wind_exposed: bool,
    pub frost_pocket: bool,
    pub south_facing: bool,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            hardiness_zone: "7b".to_string(),
            latitude: 38.9,
            longitude: -77.04,
            annual_rainfall_inches: 40.0,
            summer_high_f: 88.0,
            winter_low_f: 10.0,
            last_frost_month: 4,
            first_frost_month: 10,
            soil_type: SoilType::Loam,
            garden_size_sq_ft: 200.0,
            heat_island: false,
            wind_exposed: false,
            frost_pocket: false,
            south_facing: false,
        }
    }
}

impl LocationConfig {
    /// Merge a JSON override object on top of the defaults.
    ///
    /// `None` and `null` yield the defaults. Keys that are not configuration
    /// fields are ignored. A non-object override, a mistyped value, or a
    /// merged config that fails [`validate`](Self::validate) is an error.
    pub fn with_overrides(overrides: Option<&serde_json::Value>) -> Result<Self, CoreError> {
        let overrides = match overrides {
            None | Some(serde_json::Value::Null) => return Ok(Self::default()),
            Some(serde_json::Value::Object(map)) => map,
            Some(_) => {
                return Err(CoreError::Validation(
                    "Location overrides must be a JSON object".to_string(),
                ))
            }
        };

        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => {
                return Err(CoreError::Internal(
                    "Default location did not serialize to an object".to_string(),
                ))
            }
        };

        for (key, value) in overrides {
            if merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        let config: Self = serde_json::from_value(serde_json::Value::Object(merged))
            .map_err(|e| CoreError::Validation(format!("Invalid location override: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.zone_number().is_none() {
            return Err(CoreError::Validation(format!(
                "Invalid hardiness zone '{}'. Expected a number 1-13 with optional 'a' or 'b'",
                self.hardiness_zone
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        if self.annual_rainfall_inches < 0.0 {
            return Err(CoreError::Validation(
                "Annual rainfall must not be negative".to_string(),
            ));
        }
        if self.garden_size_sq_ft <= 0.0 {
            return Err(CoreError::Validation(
                "Garden size must be positive".to_string(),
            ));
        }
        Month::new(self.last_frost_month)?;
        Month::new(self.first_frost_month)?;
        Ok(())
    }

    /// Numeric part of the hardiness zone (`"7b"` is 7).
    pub fn zone_number(&self) -> Option<u8> {
        let zone = self.hardiness_zone.trim().to_ascii_lowercase();
        let digits = zone.trim_end_matches(['a', 'b']);
        match digits.parse::<u8>() {
            Ok(n) if (1..=13).contains(&n) && zone.len() - digits.len() <= 1 => Some(n),
            _ => None,
        }
    }

    pub fn hemisphere(&self) -> Hemisphere {
        Hemisphere::from_latitude(self.latitude)
    }

    /// Summer high adjusted for heat-island and slope microclimates.
    pub fn effective_summer_high_f(&self) -> f64 {
        let mut high = self.summer_high_f;
        if self.heat_island {
            high += HEAT_ISLAND_BONUS_F;
        }
        if self.south_facing {
            high += SOUTH_FACING_BONUS_F;
        }
        high
    }

    /// Last frost month, one month later in frost pockets.
    pub fn effective_last_frost(&self) -> Month {
        let month = Month::new(self.last_frost_month).unwrap_or(Month::JANUARY);
        if self.frost_pocket {
            month.offset(1)
        } else {
            month
        }
    }

    /// First frost month, one month earlier in frost pockets.
    pub fn effective_first_frost(&self) -> Month {
        let month = Month::new(self.first_frost_month).unwrap_or(Month::DECEMBER);
        if self.frost_pocket {
            month.offset(-1)
        } else {
            month
        }
    }

    pub fn is_hot(&self) -> bool {
        self.effective_summer_high_f() >= HOT_SUMMER_THRESHOLD_F
    }

    pub fn is_warm(&self) -> bool {
        self.effective_summer_high_f() >= WARM_SUMMER_THRESHOLD_F
    }

    pub fn is_dry(&self) -> bool {
        self.annual_rainfall_inches < DRY_RAINFALL_THRESHOLD_IN
    }

    pub fn is_wet(&self) -> bool {
        self.annual_rainfall_inches > WET_RAINFALL_THRESHOLD_IN
    }
}
