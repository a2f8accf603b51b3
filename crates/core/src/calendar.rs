//! Planting calendar generation from crop templates.
//!
//! Each catalog crop describes its sowing, transplanting and harvest timing
//! relative to last frost. Anchoring those offsets to a location's (effective)
//! last frost month yields concrete months; anchoring the months to a year
//! yields dated activities that may spill into the previous or next year.

use chrono::NaiveDate;
use serde::Serialize;

use crate::crops::{find_crop, Crop, CropSeason};
use crate::location::LocationConfig;
use crate::season::Month;

/// Months before first frost at which fall-sown crops go in.
const FALL_SOWING_LEAD_MONTHS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityKind {
    SowIndoors,
    DirectSow,
    Transplant,
    Harvest,
}

impl ActivityKind {
    fn verb(self) -> &'static str {
        match self {
            Self::SowIndoors => "Start seeds indoors",
            Self::DirectSow => "Sow outdoors",
            Self::Transplant => "Transplant",
            Self::Harvest => "Harvest",
        }
    }
}

/// One dated entry in a garden calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarActivity {
    pub crop_key: &'static str,
    pub crop_name: &'static str,
    pub kind: ActivityKind,
    /// First day of the month the activity starts in.
    pub date: NaiveDate,
    pub month: Month,
    /// Number of months the activity spans (harvests can run several).
    pub duration_months: u8,
    pub description: String,
}

/// Build the calendar for `crops` at `location` anchored to `year`.
///
/// Unknown crop keys are skipped. Activities are sorted by date, then crop,
/// then kind.
pub fn generate_calendar<S: AsRef<str>>(
    location: &LocationConfig,
    crops: &[S],
    year: i32,
) -> Vec<CalendarActivity> {
    let last_frost = location.effective_last_frost();
    let first_frost = location.effective_first_frost();

    let mut activities: Vec<CalendarActivity> = crops
        .iter()
        .filter_map(|key| find_crop(key.as_ref()))
        .flat_map(|crop| crop_activities(crop, last_frost, first_frost, year))
        .collect();

    activities.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.crop_key.cmp(b.crop_key))
            .then(a.kind.cmp(&b.kind))
    });
    activities.dedup();
    activities
}

/// Months in which `crop` is sown or planted out at `location`.
pub fn planting_months(crop: &Crop, location: &LocationConfig) -> Vec<Month> {
    let last_frost = location.effective_last_frost();
    let mut months: Vec<Month> = [
        crop.sow_indoors_offset,
        crop.direct_sow_offset,
        crop.transplant_offset,
    ]
    .into_iter()
    .flatten()
    .map(|offset| last_frost.offset(i32::from(offset)))
    .collect();

    if crop.fall_sowing {
        months.push(location.effective_first_frost().offset(-FALL_SOWING_LEAD_MONTHS));
    }

    months.sort();
    months.dedup();
    months
}

/// Inclusive `(start, end)` months of the main harvest at `location`.
pub fn harvest_window(crop: &Crop, location: &LocationConfig) -> (Month, Month) {
    let start = location
        .effective_last_frost()
        .offset(i32::from(crop.planting_offset()) + i32::from(crop.months_to_maturity()));
    let end = start.offset(i32::from(crop.harvest_window_months.max(1)) - 1);
    (start, end)
}

/// Whether `month` falls in any harvest window of `crop` at `location`,
/// including the autumn harvest of fall-sown crops.
pub fn in_harvest_window(crop: &Crop, location: &LocationConfig, month: Month) -> bool {
    let (start, end) = harvest_window(crop, location);
    if month.within(start, end) {
        return true;
    }
    match fall_harvest_window(crop, location) {
        Some((start, end)) => month.within(start, end),
        None => false,
    }
}

fn fall_harvest_window(crop: &Crop, location: &LocationConfig) -> Option<(Month, Month)> {
    if !crop.fall_sowing {
        return None;
    }
    let sow = location.effective_first_frost().offset(-FALL_SOWING_LEAD_MONTHS);
    let start = sow.offset(i32::from(crop.months_to_maturity()));
    Some((start, start.offset(i32::from(crop.harvest_window_months.max(1)) - 1)))
}

fn crop_activities(
    crop: &'static Crop,
    last_frost: Month,
    first_frost: Month,
    year: i32,
) -> Vec<CalendarActivity> {
    // Months are counted from January of `year` = 0 so offsets that cross a
    // year boundary land in the right year.
    let anchor = i32::from(last_frost.number()) - 1;
    let mut out = Vec::new();

    let mut push = |kind: ActivityKind, month_index: i32, duration: u8| {
        if let Some(activity) = dated_activity(crop, kind, year, month_index, duration) {
            out.push(activity);
        }
    };

    if let Some(offset) = crop.sow_indoors_offset {
        push(ActivityKind::SowIndoors, anchor + i32::from(offset), 1);
    }
    if let Some(offset) = crop.direct_sow_offset {
        push(ActivityKind::DirectSow, anchor + i32::from(offset), 1);
    }
    if let Some(offset) = crop.transplant_offset {
        push(ActivityKind::Transplant, anchor + i32::from(offset), 1);
    }

    let harvest_start =
        anchor + i32::from(crop.planting_offset()) + i32::from(crop.months_to_maturity());
    push(
        ActivityKind::Harvest,
        harvest_start,
        crop.harvest_window_months.max(1),
    );

    if crop.fall_sowing && crop.season == CropSeason::Cool {
        let mut fall_sow = i32::from(first_frost.number()) - 1 - FALL_SOWING_LEAD_MONTHS;
        // First frost precedes last frost in the southern calendar year.
        if fall_sow < anchor {
            fall_sow += 12;
        }
        push(ActivityKind::DirectSow, fall_sow, 1);
        push(
            ActivityKind::Harvest,
            fall_sow + i32::from(crop.months_to_maturity()),
            crop.harvest_window_months.max(1),
        );
    }

    out
}

fn dated_activity(
    crop: &'static Crop,
    kind: ActivityKind,
    year: i32,
    month_index: i32,
    duration_months: u8,
) -> Option<CalendarActivity> {
    let activity_year = year + month_index.div_euclid(12);
    let month_number = month_index.rem_euclid(12) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(activity_year, month_number, 1)?;
    let month = Month::of(&date);

    let description = if duration_months > 1 {
        format!(
            "{} {} from {} for about {duration_months} months",
            kind.verb(),
            crop.name,
            month.name()
        )
    } else {
        format!("{} {} in {}", kind.verb(), crop.name, month.name())
    };

    Some(CalendarActivity {
        crop_key: crop.key,
        crop_name: crop.name,
        kind,
        date,
        month,
        duration_months,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity<'a>(
        calendar: &'a [CalendarActivity],
        crop: &str,
        kind: ActivityKind,
    ) -> Vec<&'a CalendarActivity> {
        calendar
            .iter()
            .filter(|a| a.crop_key == crop && a.kind == kind)
            .collect()
    }

    #[test]
    fn tomato_calendar_follows_last_frost() {
        let location = LocationConfig::default(); // last frost in April
        let calendar = generate_calendar(&location, &["tomato"], 2025);

        let sow = activity(&calendar, "tomato", ActivityKind::SowIndoors);
        assert_eq!(sow[0].date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let transplant = activity(&calendar, "tomato", ActivityKind::Transplant);
        assert_eq!(transplant[0].month.number(), 5);

        // 75 days rounds up to 3 months after the May transplant.
        let harvest = activity(&calendar, "tomato", ActivityKind::Harvest);
        assert_eq!(harvest[0].month.number(), 8);
        assert_eq!(harvest[0].duration_months, 3);
    }

    #[test]
    fn calendar_is_sorted_and_skips_unknown_crops() {
        let location = LocationConfig::default();
        let calendar = generate_calendar(&location, &["pepper", "mandrake", "lettuce"], 2025);

        assert!(!calendar.is_empty());
        assert!(calendar.iter().all(|a| a.crop_key != "mandrake"));
        assert!(calendar.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn garlic_is_planted_the_previous_autumn() {
        let location = LocationConfig::default();
        let calendar = generate_calendar(&location, &["garlic"], 2025);

        let sow = activity(&calendar, "garlic", ActivityKind::DirectSow);
        assert_eq!(sow[0].date, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        let harvest = activity(&calendar, "garlic", ActivityKind::Harvest);
        assert_eq!(harvest[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn cool_season_crops_get_a_fall_sowing() {
        let location = LocationConfig::default(); // first frost in October
        let calendar = generate_calendar(&location, &["spinach"], 2025);

        let sowings = activity(&calendar, "spinach", ActivityKind::DirectSow);
        assert_eq!(sowings.len(), 2);
        assert_eq!(sowings[1].month.number(), 8);
    }

    #[test]
    fn southern_hemisphere_calendar_wraps_year() {
        let location = LocationConfig {
            latitude: -37.8,
            last_frost_month: 10,
            first_frost_month: 4,
            ..LocationConfig::default()
        };
        let calendar = generate_calendar(&location, &["melon"], 2025);

        let harvest = activity(&calendar, "melon", ActivityKind::Harvest);
        // Transplant in November, 85 days rounds to 3 months: February.
        assert_eq!(harvest[0].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
    }

    #[test]
    fn harvest_window_and_planting_months() {
        let location = LocationConfig::default();
        let tomato = find_crop("tomato").unwrap();

        let (start, end) = harvest_window(tomato, &location);
        assert_eq!((start.number(), end.number()), (8, 10));
        assert!(in_harvest_window(tomato, &location, Month::new(9).unwrap()));
        assert!(!in_harvest_window(tomato, &location, Month::new(4).unwrap()));

        let months: Vec<u8> = planting_months(tomato, &location)
            .into_iter()
            .map(Month::number)
            .collect();
        assert_eq!(months, vec![2, 5]);
    }

    #[test]
    fn frost_pocket_delays_everything_by_a_month() {
        let location = LocationConfig {
            frost_pocket: true,
            ..LocationConfig::default()
        };
        let tomato = find_crop("tomato").unwrap();
        let (start, _) = harvest_window(tomato, &location);
        assert_eq!(start.number(), 9);
    }
}
