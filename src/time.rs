use std::fmt;

use chrono::{DateTime, LocalResult, Months, TimeDelta, TimeZone, Utc};
use grib_template_derive::{Dump, TryFromSlice};
use log::{debug, warn};
use num::ToPrimitive;

use crate::{
    codetables::{CalendarField, Table4_4},
    error::GribError,
};

/// Date and time encoded as 7 octets (year, month, day, hour, minute and
/// second) in product definition templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct UtcDateTime {
    /// Year.
    pub year: u16,
    /// Month.
    pub month: u8,
    /// Day.
    pub day: u8,
    /// Hour.
    pub hour: u8,
    /// Minute.
    pub minute: u8,
    /// Second.
    pub second: u8,
}

impl UtcDateTime {
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Checks if all the octets are zero, which some producers write instead
    /// of an actual date and time.
    pub fn is_unset(&self) -> bool {
        *self == Self::new(0, 0, 0, 0, 0, 0)
    }

    /// Converts the value to a [`DateTime`].
    ///
    /// Hours greater than 23 are carried over into the following days.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let time = grib_pds::UtcDateTime::new(2024, 2, 28, 30, 0, 0);
    /// assert_eq!(
    ///     time.to_date_time(),
    ///     Ok(Utc.with_ymd_and_hms(2024, 2, 29, 6, 0, 0).unwrap())
    /// );
    /// ```
    pub fn to_date_time(&self) -> Result<DateTime<Utc>, GribError> {
        let extra_days = u32::from(self.hour / 24);
        let date_time = create_date_time(
            self.year.into(),
            self.month.into(),
            self.day.into(),
            u32::from(self.hour % 24),
            self.minute.into(),
            self.second.into(),
        )?;
        if extra_days == 0 {
            return Ok(date_time);
        }
        date_time
            .checked_add_days(chrono::Days::new(extra_days.into()))
            .ok_or_else(|| GribError::InvalidValueError(format!("invalid date time: {self}")))
    }

    /// Converts the value to a [`DateTime`], falling back to `ref_time` when
    /// all the octets are zero.
    pub fn to_date_time_or(&self, ref_time: DateTime<Utc>) -> Result<DateTime<Utc>, GribError> {
        if self.is_unset() {
            debug!("date and time octets are all zero; using the reference time {ref_time}");
            return Ok(ref_time);
        }
        self.to_date_time()
    }
}

impl fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02} UTC",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[inline]
pub(crate) fn create_date_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<DateTime<Utc>, GribError> {
    match Utc.with_ymd_and_hms(year, month, day, hour, minute, second) {
        LocalResult::Single(date_time) => Ok(date_time),
        _ => Err(GribError::InvalidValueError(format!(
            "invalid date time: {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        ))),
    }
}

/// Computes the valid time of a forecast by advancing `ref_time` by
/// `forecast_time` units of the Code Table 4.4 `unit`.
///
/// Months and years are added on the calendar, clamping the day to the end
/// of the resulting month. A missing unit (255) leaves the reference time
/// unchanged. So does any unit not defined in Code Table 4.4, which is
/// logged as a warning.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let ref_time = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
/// assert_eq!(
///     grib_pds::make_date(ref_time, 11, 2),
///     Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
/// );
/// assert_eq!(
///     grib_pds::make_date(ref_time, 3, 1),
///     Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
/// );
/// ```
pub fn make_date(ref_time: DateTime<Utc>, unit: u8, forecast_time: i32) -> DateTime<Utc> {
    let step = match Table4_4::try_from(unit) {
        Ok(unit) => unit.calendar_step(),
        Err(_) => {
            warn!("unknown time unit {unit}; the valid time is set to the reference time");
            None
        }
    };
    let Some((field, factor)) = step else {
        return ref_time;
    };

    let amount = factor * i64::from(forecast_time);
    let date = match field {
        CalendarField::Second => {
            TimeDelta::try_seconds(amount).and_then(|d| ref_time.checked_add_signed(d))
        }
        CalendarField::Minute => {
            TimeDelta::try_minutes(amount).and_then(|d| ref_time.checked_add_signed(d))
        }
        CalendarField::Hour => {
            TimeDelta::try_hours(amount).and_then(|d| ref_time.checked_add_signed(d))
        }
        CalendarField::Month => add_months(ref_time, amount),
        CalendarField::Year => amount
            .checked_mul(12)
            .and_then(|months| add_months(ref_time, months)),
    };
    date.unwrap_or_else(|| {
        warn!("forecast time {forecast_time} in unit {unit} is out of range; the valid time is set to the reference time");
        ref_time
    })
}

fn add_months(date_time: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let n = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date_time.checked_add_months(n)
    } else {
        date_time.checked_sub_months(n)
    }
}

/// Computes the number of whole `unit`s elapsed from `ref_time` to `date`.
///
/// Supported units are minute, hour, day, month, 3 hours, 6 hours, 12 hours
/// and second. A month is approximated as 30 days. A missing unit (255) has
/// no length, so the forecast time is always 0 as in [`make_date`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
///
/// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
/// assert_eq!(grib_pds::make_forecast_time(ref_time, date, 1), Ok(27));
/// assert_eq!(grib_pds::make_forecast_time(ref_time, date, 10), Ok(9));
/// assert_eq!(grib_pds::make_forecast_time(ref_time, date, 255), Ok(0));
/// assert_eq!(
///     grib_pds::make_forecast_time(ref_time, date, 4),
///     Err(grib_pds::GribError::TimeUnitNotSupported(4))
/// );
/// ```
pub fn make_forecast_time(
    ref_time: DateTime<Utc>,
    date: DateTime<Utc>,
    unit: u8,
) -> Result<i32, GribError> {
    let unit_secs = match Table4_4::try_from(unit) {
        Ok(
            code @ (Table4_4::Minute
            | Table4_4::Hour
            | Table4_4::Day
            | Table4_4::Month
            | Table4_4::ThreeHours
            | Table4_4::SixHours
            | Table4_4::TwelveHours
            | Table4_4::Second),
        ) => code.seconds(),
        Ok(Table4_4::Missing) => return Ok(0),
        _ => None,
    }
    .ok_or(GribError::TimeUnitNotSupported(unit))?;

    let elapsed = (date - ref_time).num_seconds();
    (elapsed / unit_secs).to_i32().ok_or_else(|| {
        GribError::InvalidValueError(format!(
            "forecast time from {ref_time} to {date} does not fit in 4 octets"
        ))
    })
}

/// Converts `value` in the Code Table 4.4 unit `from` into the unit `to`,
/// truncating toward zero.
///
/// # Examples
///
/// ```
/// assert_eq!(grib_pds::convert_time_value(6, 1, 0), Ok(360));
/// assert_eq!(grib_pds::convert_time_value(30, 1, 2), Ok(1));
/// ```
pub fn convert_time_value(value: i64, from: u8, to: u8) -> Result<i64, GribError> {
    if from == to {
        return Ok(value);
    }
    let unit_secs = |unit: u8| {
        Table4_4::try_from(unit)
            .ok()
            .and_then(|code| code.seconds())
            .ok_or(GribError::TimeUnitNotSupported(unit))
    };
    let (have, want) = (unit_secs(from)?, unit_secs(to)?);
    (i128::from(value) * i128::from(have) / i128::from(want))
        .to_i64()
        .ok_or_else(|| GribError::InvalidValueError(format!("time value {value} overflows")))
}
