use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Code Table 4.4 - Indicator of unit of time range.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table4_4 {
    Minute = 0,
    Hour,
    Day,
    Month,
    Year,
    Decade,
    Normal,
    Century,
    ThreeHours = 10,
    SixHours,
    TwelveHours,
    Second,
    Missing = 255,
}

/// Calendar field that a [`Table4_4`] unit advances.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CalendarField {
    Second,
    Minute,
    Hour,
    Month,
    Year,
}

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;
const YEAR: i64 = 365 * DAY;

impl Table4_4 {
    pub fn short_expr(&self) -> Option<&'static str> {
        match self {
            Self::Minute => Some("m"),
            Self::Hour => Some("h"),
            Self::Day => Some("D"),
            Self::Month => Some("M"),
            Self::Year => Some("Y"),
            Self::Decade => Some("10Y"),
            Self::Normal => Some("30Y"),
            Self::Century => Some("C"),
            Self::ThreeHours => Some("3h"),
            Self::SixHours => Some("6h"),
            Self::TwelveHours => Some("12h"),
            Self::Second => Some("s"),
            Self::Missing => None,
        }
    }

    /// Returns the calendar field and the number of its units that one unit
    /// of this code corresponds to.
    ///
    /// `Missing` has no calendar step; a forecast time in that unit does not
    /// move the valid time away from the reference time.
    pub fn calendar_step(&self) -> Option<(CalendarField, i64)> {
        let step = match self {
            Self::Minute => (CalendarField::Minute, 1),
            Self::Hour => (CalendarField::Hour, 1),
            Self::Day => (CalendarField::Hour, 24),
            Self::Month => (CalendarField::Month, 1),
            Self::Year => (CalendarField::Year, 1),
            Self::Decade => (CalendarField::Year, 10),
            Self::Normal => (CalendarField::Year, 30),
            Self::Century => (CalendarField::Year, 100),
            Self::ThreeHours => (CalendarField::Hour, 3),
            Self::SixHours => (CalendarField::Hour, 6),
            Self::TwelveHours => (CalendarField::Hour, 12),
            Self::Second => (CalendarField::Second, 1),
            Self::Missing => return None,
        };
        Some(step)
    }

    /// Returns the fixed number of seconds in one unit.
    ///
    /// Months count as 30 days and years as 365 days.
    pub fn seconds(&self) -> Option<i64> {
        let secs = match self {
            Self::Minute => 60,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Month => 30 * DAY,
            Self::Year => YEAR,
            Self::Decade => 10 * YEAR,
            Self::Normal => 30 * YEAR,
            Self::Century => 100 * YEAR,
            Self::ThreeHours => 3 * HOUR,
            Self::SixHours => 6 * HOUR,
            Self::TwelveHours => 12 * HOUR,
            Self::Second => 1,
            Self::Missing => return None,
        };
        Some(secs)
    }
}

/// Code Table 4.9 - Probability type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Table4_9 {
    BelowLowerLimit = 0,
    AboveUpperLimit,
    BetweenLimits,
    AboveLowerLimit,
    BelowUpperLimit,
    Missing = 255,
}
