//! Day classification: weekday bucket, solar and lunar holidays, early access.
//!
//! A [`CalendarDay`] is derived on demand and never cached here. Holiday lookups
//! fail open: a failed read is logged and the day is treated as ordinary.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::lunar::{self, LunarTable};
use crate::ports::HolidayLookup;

pub const TAG_WEEKDAY: &str = "weekday";
pub const TAG_FRIDAY: &str = "friday";
pub const TAG_SATURDAY: &str = "saturday";
pub const TAG_SUNDAY: &str = "sunday";
pub const TAG_WEEKEND: &str = "weekend";
pub const TAG_HOLIDAY: &str = "holiday";
pub const TAG_LUNAR_HOLIDAY: &str = "lunar_holiday";
pub const TAG_EARLY: &str = "early";

pub const LUNAR_NEW_YEAR: &str = "Tết Âm lịch";

pub const DEFAULT_EARLY_ACCESS_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    Solar,
    Lunar,
}

/// One row of the holiday table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub name: String,
    pub date: NaiveDate,
    pub kind: HolidayKind,
    /// Recurring records repeat every year on the same month and day.
    #[serde(default)]
    pub recurring: bool,
}

impl HolidayRecord {
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}

/// Business attributes of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    #[serde(with = "weekday_name")]
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub is_friday: bool,
    pub is_holiday: bool,
    pub is_lunar_holiday: bool,
    pub is_early_access: bool,
    /// Tags in classification order: weekday kind, holiday, lunar holiday, early.
    pub day_type_tags: Vec<String>,
    pub holiday_name: Option<String>,
}

impl CalendarDay {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.day_type_tags.iter().any(|t| t == tag)
    }
}

mod weekday_name {
    use chrono::Weekday;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(weekday: &Weekday, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        })
    }
}

/// Friday through Sunday.
pub fn is_weekend_or_friday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= Weekday::Fri.num_days_from_monday()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `date` falls in `[release - 7 days, release)`.
pub fn early_access(date: NaiveDate, release: NaiveDate) -> bool {
    early_access_within(date, release, DEFAULT_EARLY_ACCESS_DAYS)
}

pub fn early_access_within(date: NaiveDate, release: NaiveDate, days: i64) -> bool {
    let window_start = release - Duration::days(days);
    date >= window_start && date < release
}

/// Classifies dates against a holiday collaborator.
pub struct DayClassifier<'a, H: HolidayLookup + ?Sized> {
    holidays: &'a H,
    lunar: LunarTable,
    early_access_days: i64,
}

impl<'a, H: HolidayLookup + ?Sized> DayClassifier<'a, H> {
    pub fn new(holidays: &'a H) -> Self {
        Self {
            holidays,
            lunar: LunarTable::vietnamese(),
            early_access_days: DEFAULT_EARLY_ACCESS_DAYS,
        }
    }

    pub fn with_early_access_days(mut self, days: i64) -> Self {
        self.early_access_days = days;
        self
    }

    pub fn classify(&self, date: NaiveDate) -> CalendarDay {
        self.classify_for_release(date, None)
    }

    /// Classify `date`, also tagging early access when the movie's release date
    /// is known.
    pub fn classify_for_release(&self, date: NaiveDate, release: Option<NaiveDate>) -> CalendarDay {
        let weekday = date.weekday();
        let mut day = CalendarDay {
            date,
            weekday,
            is_weekend: false,
            is_friday: false,
            is_holiday: false,
            is_lunar_holiday: false,
            is_early_access: false,
            day_type_tags: Vec::new(),
            holiday_name: None,
        };

        match weekday {
            Weekday::Fri => {
                day.is_friday = true;
                day.day_type_tags.push(TAG_FRIDAY.to_string());
                day.day_type_tags.push(TAG_WEEKDAY.to_string());
            }
            Weekday::Sat | Weekday::Sun => {
                day.is_weekend = true;
                let name = if weekday == Weekday::Sat {
                    TAG_SATURDAY
                } else {
                    TAG_SUNDAY
                };
                day.day_type_tags.push(name.to_string());
                day.day_type_tags.push(TAG_WEEKEND.to_string());
            }
            _ => day.day_type_tags.push(TAG_WEEKDAY.to_string()),
        }

        if let Some(name) = self.solar_holiday(date) {
            day.is_holiday = true;
            day.holiday_name = Some(name);
            day.day_type_tags.push(TAG_HOLIDAY.to_string());
        }

        if lunar::is_supported(date) {
            match self.lunar.to_lunar(date) {
                Ok(l) if l.is_lunar_new_year() => {
                    day.is_lunar_holiday = true;
                    day.holiday_name.get_or_insert_with(|| LUNAR_NEW_YEAR.to_string());
                    day.day_type_tags.push(TAG_LUNAR_HOLIDAY.to_string());
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(%date, error = %e, "lunar conversion skipped"),
            }
        }

        if let Some(release) = release {
            if early_access_within(date, release, self.early_access_days) {
                day.is_early_access = true;
                day.day_type_tags.push(TAG_EARLY.to_string());
            }
        }

        day
    }

    /// Name of the first solar holiday on `date`, in collaborator order.
    fn solar_holiday(&self, date: NaiveDate) -> Option<String> {
        match self.holidays.holidays_on(date) {
            Ok(records) => records
                .into_iter()
                .find(|r| r.kind == HolidayKind::Solar && r.falls_on(date))
                .map(|r| r.name),
            Err(e) => {
                tracing::warn!(
                    %date,
                    error = %e,
                    "holiday lookup failed, treating day as ordinary"
                );
                None
            }
        }
    }
}
