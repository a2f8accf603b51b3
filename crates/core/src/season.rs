//! Calendar months, seasons and hemispheres.
//!
//! Every month-keyed service takes a validated [`Month`] so that range
//! checking happens once, at the boundary.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, 1 (January) through 12 (December).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    /// Validate a month number.
    pub fn new(number: u8) -> Result<Self, CoreError> {
        if (1..=12).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CoreError::Validation(format!(
                "Month must be between 1 and 12, got {number}"
            )))
        }
    }

    /// The month of a date.
    pub fn of<D: Datelike>(date: &D) -> Self {
        // `Datelike::month` is always 1..=12.
        Self(date.month() as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.0 - 1)]
    }

    /// Shift by `delta` months, wrapping around the year.
    pub fn offset(self, delta: i32) -> Self {
        let zero_based = (i32::from(self.0) - 1 + delta).rem_euclid(12);
        Self(zero_based as u8 + 1)
    }

    /// Whether this month falls in the inclusive window `start..=end`,
    /// where the window may wrap past December.
    pub fn within(self, start: Month, end: Month) -> bool {
        if start <= end {
            start <= self && self <= end
        } else {
            self >= start || self <= end
        }
    }
}

impl TryFrom<u8> for Month {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Northern,
    Southern,
}

impl Hemisphere {
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 0.0 {
            Self::Southern
        } else {
            Self::Northern
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Meteorological season for a month (Dec-Feb is northern winter).
    pub fn for_month(month: Month, hemisphere: Hemisphere) -> Self {
        let northern = match month.number() {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Autumn,
        };
        match hemisphere {
            Hemisphere::Northern => northern,
            Hemisphere::Southern => northern.opposite(),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Winter => Self::Summer,
            Self::Spring => Self::Autumn,
            Self::Summer => Self::Winter,
            Self::Autumn => Self::Spring,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }
}
