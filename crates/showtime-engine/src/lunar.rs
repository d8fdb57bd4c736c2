//! Gregorian → Vietnamese lunar date conversion for civil years 1900–2100.
//!
//! Each lunar year is described by one 20-bit record in [`LunarTable`]:
//!
//! ```text
//!  bit 16      bits 15..4                    bits 3..0
//! ┌────────┬──────────────────────────────┬───────────────┐
//! │ leap   │ month 1 ... month 12         │ leap month    │
//! │ 30 d?  │ (1 = 30 days, 0 = 29 days)   │ (0 = none)    │
//! └────────┴──────────────────────────────┴───────────────┘
//! ```
//!
//! Month 1 lives in bit 15 and month 12 in bit 4. The leap month, when present,
//! follows the regular month carrying the same number.
//!
//! All bit handling is confined to [`LunarYear::decode`].

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{Result, ScheduleError};

pub const FIRST_SUPPORTED_YEAR: i32 = 1900;
pub const LAST_SUPPORTED_YEAR: i32 = 2100;

/// A date in the lunar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
}

impl LunarDate {
    /// Mùng 1–3 of the first month.
    pub fn is_lunar_new_year(&self) -> bool {
        self.month == 1 && !self.is_leap_month && (1..=3).contains(&self.day)
    }
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.is_leap_month {
            write!(f, " (leap)")?;
        }
        Ok(())
    }
}

/// Month lengths of one lunar year, decoded from its table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarYear {
    /// Length of regular months 1..=12 (index 0 is month 1).
    pub month_days: [u32; 12],
    pub leap_month: Option<u32>,
    pub leap_days: u32,
}

impl LunarYear {
    /// Decode a 20-bit year record.
    pub fn decode(record: u32) -> Self {
        let mut month_days = [29; 12];
        let mut mask = 0x8000;
        for days in month_days.iter_mut() {
            if record & mask != 0 {
                *days = 30;
            }
            mask >>= 1;
        }

        let leap_month = match record & 0xf {
            0 => None,
            m => Some(m),
        };
        let leap_days = match leap_month {
            Some(_) if record & 0x10000 != 0 => 30,
            Some(_) => 29,
            None => 0,
        };

        Self {
            month_days,
            leap_month,
            leap_days,
        }
    }

    pub fn total_days(&self) -> u32 {
        self.month_days.iter().sum::<u32>() + self.leap_days
    }

    /// Months in calendar order as `(month, is_leap, days)`.
    fn months(&self) -> impl Iterator<Item = (u32, bool, u32)> + '_ {
        (1..=12u32).flat_map(move |m| {
            let regular = (m, false, self.month_days[(m - 1) as usize]);
            let leap = (self.leap_month == Some(m)).then_some((m, true, self.leap_days));
            std::iter::once(regular).chain(leap)
        })
    }
}

// Lunar years 1900 through 2100.
const YEAR_RECORDS: [u32; 201] = [
    // 1900
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2,
    // 1910
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977,
    // 1920
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970,
    // 1930
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950,
    // 1940
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557,
    // 1950
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0,
    // 1960
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0,
    // 1970
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6,
    // 1980
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570,
    // 1990
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0,
    // 2000
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5,
    // 2010
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930,
    // 2020
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530,
    // 2030
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45,
    // 2040
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0,
    // 2050
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0,
    // 2060
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4,
    // 2070
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0,
    // 2080
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160,
    // 2090
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252,
    0x0d520, // 2100
];

/// Immutable lookup of lunar year records, keyed by offset from 1900.
#[derive(Debug, Clone, Copy)]
pub struct LunarTable {
    records: &'static [u32],
}

impl Default for LunarTable {
    fn default() -> Self {
        Self::vietnamese()
    }
}

impl LunarTable {
    pub fn vietnamese() -> Self {
        Self {
            records: &YEAR_RECORDS,
        }
    }

    /// Day one of lunar year 1900 as counted by this table.
    ///
    /// Seeded holiday data places Mùng 1 Tết 2025 on 2025-01-28; offsets are
    /// counted from this anchor so that the table reproduces it.
    pub fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(1900, 1, 30).unwrap_or(NaiveDate::MIN)
    }

    pub fn year(&self, lunar_year: i32) -> Option<LunarYear> {
        let offset = usize::try_from(lunar_year - FIRST_SUPPORTED_YEAR).ok()?;
        self.records.get(offset).map(|&r| LunarYear::decode(r))
    }

    /// Convert a Gregorian date to its lunar date.
    ///
    /// # Errors
    /// Returns `ScheduleError::LunarOutOfRange` when the civil year is outside
    /// 1900–2100.
    pub fn to_lunar(&self, date: NaiveDate) -> Result<LunarDate> {
        if !(FIRST_SUPPORTED_YEAR..=LAST_SUPPORTED_YEAR).contains(&date.year()) {
            return Err(ScheduleError::LunarOutOfRange(date.year()));
        }

        let mut offset = date.signed_duration_since(Self::epoch()).num_days();

        // The first days of January 1900 belong to the 30-day twelfth month of
        // lunar 1899, which precedes the table.
        if offset < 0 {
            return Ok(LunarDate {
                year: FIRST_SUPPORTED_YEAR - 1,
                month: 12,
                day: (31 + offset) as u32,
                is_leap_month: false,
            });
        }

        let mut year = FIRST_SUPPORTED_YEAR;
        let mut lunar_year = self
            .year(year)
            .ok_or(ScheduleError::LunarOutOfRange(year))?;
        while offset >= i64::from(lunar_year.total_days()) {
            offset -= i64::from(lunar_year.total_days());
            year += 1;
            lunar_year = self
                .year(year)
                .ok_or(ScheduleError::LunarOutOfRange(date.year()))?;
        }

        for (month, is_leap_month, days) in lunar_year.months() {
            if offset < i64::from(days) {
                return Ok(LunarDate {
                    year,
                    month,
                    day: offset as u32 + 1,
                    is_leap_month,
                });
            }
            offset -= i64::from(days);
        }

        // total_days() is the sum of months(), so the walk always returns.
        Err(ScheduleError::LunarOutOfRange(date.year()))
    }
}

/// Convert with the built-in Vietnamese table.
pub fn to_lunar(date: NaiveDate) -> Result<LunarDate> {
    LunarTable::vietnamese().to_lunar(date)
}

/// Whether `date` can be converted at all.
pub fn is_supported(date: NaiveDate) -> bool {
    (FIRST_SUPPORTED_YEAR..=LAST_SUPPORTED_YEAR).contains(&date.year())
}
