//! Hourly calendar of the representative simulation year.

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::config::ConfigError;
use crate::error::EstimateError;

/// Hours in a representative (non-leap) year.
pub const HOURS_PER_YEAR: usize = 8760;

/// One simulated hour, in local civil time and as a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
}

/// The 8760 local hours of a year; 29 February is skipped in leap years.
#[derive(Debug, Clone)]
pub struct Timeline {
    year: i32,
    hours: Vec<Timestamp>,
}

impl Timeline {
    /// Builds the hourly timeline of `year` in timezone `tz`.
    ///
    /// Local times that occur twice (DST fall-back) map to the earlier
    /// instant; local times skipped by a spring-forward transition use the
    /// offset in effect just after it.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::Validation`] if the year cannot be represented.
    pub fn representative_year(year: i32, tz: Tz) -> Result<Self, EstimateError> {
        let invalid = || ConfigError {
            field: "simulation.year".into(),
            message: format!("cannot build a calendar for year {year}"),
        };
        let mut day = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let mut hours = Vec::with_capacity(HOURS_PER_YEAR);
        while day.year() == year {
            if !(day.month() == 2 && day.day() == 29) {
                for h in 0..24 {
                    let local = day.and_hms_opt(h, 0, 0).ok_or_else(invalid)?;
                    hours.push(Timestamp {
                        local,
                        utc: resolve_utc(tz, local),
                    });
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(Self { year, hours })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn hours(&self) -> &[Timestamp] {
        &self.hours
    }

    /// First local calendar day covered.
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.hours.first().map(|t| t.local.date())
    }

    /// Last local calendar day covered.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.hours.last().map(|t| t.local.date())
    }
}

fn resolve_utc(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let offset = tz.offset_from_utc_datetime(&local).fix();
            let shifted = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            Utc.from_utc_datetime(&shifted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn leap_year_has_8760_hours() {
        let t = Timeline::representative_year(2024, chrono_tz::Asia::Kolkata);
        let t = t.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(t.len(), HOURS_PER_YEAR);
        assert!(
            !t.hours()
                .iter()
                .any(|h| h.local.month() == 2 && h.local.day() == 29)
        );
    }

    #[test]
    fn common_year_has_8760_hours() {
        let t = Timeline::representative_year(2023, chrono_tz::UTC);
        assert_eq!(t.map(|t| t.len()).ok(), Some(HOURS_PER_YEAR));
    }

    #[test]
    fn kolkata_is_five_and_a_half_hours_ahead() {
        let t = Timeline::representative_year(2024, chrono_tz::Asia::Kolkata)
            .unwrap_or_else(|e| panic!("{e}"));
        let first = t.hours()[0];
        assert_eq!(first.local.hour(), 0);
        assert_eq!(first.utc.hour(), 18);
        assert_eq!(first.utc.minute(), 30);
        assert_eq!(first.utc.day(), 31);
    }

    #[test]
    fn dst_zone_still_has_one_entry_per_local_hour() {
        let t = Timeline::representative_year(2024, chrono_tz::Europe::Berlin)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(t.len(), HOURS_PER_YEAR);
        // Instants stay ordered even across the transitions.
        assert!(t.hours().windows(2).all(|w| w[0].utc <= w[1].utc));
    }

    #[test]
    fn calendar_bounds() {
        let t = Timeline::representative_year(2024, chrono_tz::UTC)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(t.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(t.last_day(), NaiveDate::from_ymd_opt(2024, 12, 31));
    }
}
