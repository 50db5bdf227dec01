//! The inputs of a windrose query: which month, which years, which point.

use crate::cache::key::CacheKey;
use crate::types::period::{month_from_name, Month, StartEndDate, ARCHIVE_FIRST_YEAR};
use crate::{LatLon, WindroseError};
use bon::Builder;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Starting map point when nothing has been picked yet.
pub const DEFAULT_LOCATION: LatLon = LatLon(42.81, 17.52);

/// August.
pub const DEFAULT_MONTH: u32 = 8;

pub const DEFAULT_YEARS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

/// Years offered for selection.
pub const SELECTABLE_YEARS: RangeInclusive<i32> = 2000..=2025;

/// Application state handed to the client by whatever UI sits on top.
///
/// ```
/// use windrose::{LatLon, Selection};
///
/// let selection = Selection::builder()
///     .month(2)
///     .years([2020, 2021].into())
///     .location(LatLon(52.37, 4.89))
///     .build();
/// assert_eq!(selection.month, 2);
///
/// let default = Selection::default();
/// assert_eq!(default.month, 8);
/// assert_eq!(default.years.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Selection {
    pub month: u32,
    pub years: BTreeSet<i32>,
    #[builder(default = DEFAULT_LOCATION)]
    pub location: LatLon,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            month: DEFAULT_MONTH,
            years: DEFAULT_YEARS.into_iter().collect(),
            location: DEFAULT_LOCATION,
        }
    }
}

impl Selection {
    /// Changes the month by its English name, e.g. "February".
    pub fn set_month_name(&mut self, name: &str) -> Result<(), WindroseError> {
        self.month = month_from_name(name)
            .ok_or_else(|| WindroseError::UnknownMonthName(name.to_string()))?;
        Ok(())
    }

    /// Records a point picked on the map.
    pub fn select_location(&mut self, location: LatLon) {
        self.location = location;
    }

    pub fn years_vec(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }
}

/// A validated request: month number in range, at least one year, every year archived.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthRequest {
    pub month: u32,
    pub years: BTreeSet<i32>,
    pub location: LatLon,
    windows: Vec<(Month, StartEndDate)>,
    current_year: i32,
    /// Some window stops short of its month's last day.
    partial: bool,
}

impl MonthRequest {
    /// Validates the inputs against `today` and computes one date window per year.
    ///
    /// Duplicate years collapse; years are processed in ascending order.
    pub fn new(
        month: u32,
        years: &[i32],
        location: LatLon,
        today: NaiveDate,
    ) -> Result<Self, WindroseError> {
        let years: BTreeSet<i32> = years.iter().copied().collect();
        if years.is_empty() {
            return Err(WindroseError::EmptySelection);
        }
        if !valid_location(location) {
            return Err(WindroseError::InvalidLocation(location));
        }

        let mut windows = Vec::with_capacity(years.len());
        let mut partial = false;
        for &year in &years {
            let invalid = |reason: &'static str| WindroseError::InvalidDateRange {
                year,
                month,
                reason,
            };
            if !(1..=12).contains(&month) {
                return Err(invalid("month must be between 1 and 12"));
            }
            if year < ARCHIVE_FIRST_YEAR {
                return Err(invalid("archive data starts in 1940"));
            }
            let period = Month(year, month);
            let window = period
                .archive_range(today)
                .ok_or_else(|| invalid("month is not archived yet"))?;
            partial |= period.date_range() != Some(window);
            windows.push((period, window));
        }

        Ok(Self {
            month,
            years,
            location,
            windows,
            current_year: today.year(),
            partial,
        })
    }

    /// Per-year month and the date window to query for it, ascending by year.
    pub fn windows(&self) -> &[(Month, StartEndDate)] {
        &self.windows
    }

    /// True when the result can still change: the current year is included, or some
    /// month is cut short by the archive lag (e.g. last December in early January).
    /// Volatile results must not be cached for long.
    pub fn is_volatile(&self) -> bool {
        self.partial || self.years.contains(&self.current_year)
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.month, &self.years, self.location)
    }
}

fn valid_location(location: LatLon) -> bool {
    let LatLon(lat, lon) = location;
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
