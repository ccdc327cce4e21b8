//! Definitions of parameter sets used in product definition templates.

use std::{
    borrow::Cow,
    io::{Error, Write},
};

use chrono::{DateTime, Utc};
use grib_template_derive::{Dump, TryFromSlice};
use grib_template_helpers::DumpField;

use crate::{
    codetables::{Code, Name, Num, Table4_9},
    datatypes::{FixedSurface, ScaledValue, TimeInterval},
    def::grib2::{dump_items, read},
    error::GribError,
    time::{UtcDateTime, make_forecast_time},
};

/// Parameters of a product at a horizontal level or in a horizontal layer at
/// a point in time, occupying octets 12-34 of template 4.0.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct HorizontalProduct {
    /// Type of generating process (see Code table 4.3).
    pub generating_process_type: u8,
    /// Background generating process identifier (defined by originating
    /// centre).
    pub background_process_id: u8,
    /// Analysis or forecast generating process identifier (see Code ON388
    /// Table A).
    pub generating_process_id: u8,
    /// Hours after reference time data cutoff.
    pub hours_after_cutoff: u16,
    /// Minutes after reference time data cutoff.
    pub minutes_after_cutoff: u8,
    /// Indicator of unit of time range (see Code table 4.4).
    pub time_unit: u8,
    /// Forecast time in units defined by the previous octet.
    pub forecast_time: i32,
    /// First fixed surface.
    pub first_surface: FixedSurface,
    /// Second fixed surface.
    pub second_surface: FixedSurface,
}

impl HorizontalProduct {
    pub(crate) const SIZE: usize = 23;
}

/// Parameters identifying an individual ensemble forecast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct EnsembleMember {
    /// Type of ensemble forecast (see Code table 4.6).
    pub ensemble_forecast_type: u8,
    /// Perturbation number.
    pub perturbation_number: u8,
    /// Number of forecasts in ensemble.
    pub num_ensemble_forecasts: u8,
}

/// Parameters of a forecast derived from all ensemble members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct EnsembleDerived {
    /// Derived forecast (see Code table 4.7).
    pub derived_forecast_type: u8,
    /// Number of forecasts in the ensemble.
    pub num_ensemble_forecasts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct Probability {
    /// Forecast probability number.
    pub forecast_probability_number: u8,
    /// Total number of forecast probabilities.
    pub num_forecast_probabilities: u8,
    /// Probability type (see Code table 4.9).
    pub probability_type: u8,
    /// Lower limit.
    pub lower_limit: ScaledValue,
    /// Upper limit.
    pub upper_limit: ScaledValue,
}

impl Probability {
    /// Returns the probability type resolved against Code table 4.9.
    pub fn probability_type_code(&self) -> Code<Table4_9, u8> {
        Table4_9::try_from(self.probability_type).into()
    }

    /// Returns a short name describing the event whose probability is given,
    /// such as `below_0.5` or `between_1_and_2.5`.
    pub fn name(&self) -> String {
        let lower = decimal_string(
            self.lower_limit.value(),
            self.lower_limit.scale_factor,
        );
        let upper = decimal_string(
            self.upper_limit.value(),
            self.upper_limit.scale_factor,
        );
        match self.probability_type_code() {
            Name(Table4_9::BelowLowerLimit) => format!("below_{lower}"),
            Name(Table4_9::AboveUpperLimit) => format!("above_{upper}"),
            Name(Table4_9::BetweenLimits)
                if self.lower_limit.value() == self.upper_limit.value() =>
            {
                format!("equals_{lower}")
            }
            Name(Table4_9::BetweenLimits) => format!("between_{lower}_and_{upper}"),
            Name(Table4_9::AboveLowerLimit) => format!("above_{lower}"),
            Name(Table4_9::BelowUpperLimit) => format!("below_{upper}"),
            Name(Table4_9::Missing) | Num(_) => {
                format!("UnknownProbType={}", self.probability_type)
            }
        }
    }
}

// At least one decimal place is printed, and then trailing zeros are removed.
fn decimal_string(value: f64, scale_factor: i8) -> String {
    let places = usize::try_from(scale_factor).unwrap_or(0).max(1);
    let s = format!("{value:.places$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct Percentile {
    /// Percentile value (from 100% to 0%).
    pub percentile_value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct SpatialProcessing {
    /// Statistical process used within the spatial area defined by octet 36
    /// (see Code table 4.10).
    pub statistical_process_type: u8,
    /// Type of spatial processing used to arrive at given data value from
    /// source data (see Code table 4.15).
    pub spatial_process_type: u8,
    /// Number of data points used in spatial processing defined in octet 36.
    pub num_data_points: u8,
}

impl SpatialProcessing {
    pub(crate) const SIZE: usize = 3;
}

/// Parameters of a statistically processed product over a time interval.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticalInterval {
    /// Time of end of overall time interval.
    pub end_of_overall_time_interval: UtcDateTime,
    /// n - number of time range specifications describing the time intervals
    /// used to calculate the statistically processed field.
    pub num_time_ranges: u8,
    /// Total number of data values missing in statistical process.
    pub num_missing_vals: u32,
    /// Specifications of the time ranges.
    pub time_ranges: Vec<TimeInterval>,
    /// End of overall time interval resolved against the reference time.
    pub interval_time_end: DateTime<Utc>,
    /// Forecast time of the end of the interval, counted in the unit of the
    /// template's forecast time.
    pub forecast_time: i32,
}

impl StatisticalInterval {
    /// Number of octets before the time range specifications.
    pub(crate) const FIXED_SIZE: usize = 12;

    /// Reads the parameters starting at `pos` and resolves the end of the
    /// interval against `ref_time`, counting its forecast time in
    /// `time_unit`.
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        time_unit: u8,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let end_of_overall_time_interval: UtcDateTime = read(slice, pos)?;
        let num_time_ranges: u8 = read(slice, pos)?;
        let num_missing_vals = read(slice, pos)?;
        let time_ranges = (0..num_time_ranges)
            .map(|_| read(slice, pos))
            .collect::<Result<Vec<_>, _>>()?;
        let interval_time_end = end_of_overall_time_interval.to_date_time_or(ref_time)?;
        let forecast_time = make_forecast_time(ref_time, interval_time_end, time_unit)?;
        Ok(Self {
            end_of_overall_time_interval,
            num_time_ranges,
            num_missing_vals,
            time_ranges,
            interval_time_end,
            forecast_time,
        })
    }
}

// Resolved values are not on the wire and are left out.
impl grib_template_helpers::Dump for StatisticalInterval {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error> {
        self.end_of_overall_time_interval.dump_field(
            "end_of_overall_time_interval",
            parent,
            "",
            pos,
            output,
        )?;
        self.num_time_ranges
            .dump_field("num_time_ranges", parent, "", pos, output)?;
        self.num_missing_vals
            .dump_field("num_missing_vals", parent, "", pos, output)?;
        dump_items(&self.time_ranges, "time_ranges", parent, pos, output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct Aerosol {
    /// Aerosol type (see Code table 4.233).
    pub aerosol_type: u16,
    /// Type of interval for first and second size (see Code table 4.91).
    pub size_interval_type: u8,
    /// First size in metres.
    pub first_size: ScaledValue,
    /// Second size in metres.
    pub second_size: ScaledValue,
    /// Type of interval for first and second wavelength (see Code table
    /// 4.91).
    pub wavelength_interval_type: u8,
    /// First wavelength in metres.
    pub first_wavelength: ScaledValue,
    /// Second wavelength in metres.
    pub second_wavelength: ScaledValue,
}

impl Aerosol {
    pub(crate) const SIZE: usize = 24;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::TIME_INTERVAL_SIZE;

    fn probability(probability_type: u8, lower: (i8, i32), upper: (i8, i32)) -> Probability {
        Probability {
            forecast_probability_number: 1,
            num_forecast_probabilities: 1,
            probability_type,
            lower_limit: ScaledValue::new(lower.0, lower.1),
            upper_limit: ScaledValue::new(upper.0, upper.1),
        }
    }

    macro_rules! test_probability_names {
        ($(($name:ident, $type:expr, $lower:expr, $upper:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                assert_eq!(probability($type, $lower, $upper).name(), $expected);
            }
        )*);
    }

    test_probability_names! {
        (probability_name_below_lower_limit, 0, (3, 254), (0, 0), "below_0.254"),
        (probability_name_above_upper_limit, 1, (0, 0), (1, 50), "above_5"),
        (probability_name_between_limits, 2, (1, 5), (1, 25), "between_0.5_and_2.5"),
        (probability_name_equal_limits, 2, (0, 3), (0, 3), "equals_3"),
        (probability_name_above_lower_limit, 3, (-1, 5), (0, 0), "above_50"),
        (probability_name_below_upper_limit, 4, (0, 0), (2, 12345), "below_123.45"),
        (probability_name_with_unknown_type, 9, (0, 0), (0, 0), "UnknownProbType=9"),
    }

    #[test]
    fn probability_type_resolved_against_code_table() {
        assert_eq!(
            probability(3, (0, 0), (0, 0)).probability_type_code(),
            Name(Table4_9::AboveLowerLimit)
        );
        assert_eq!(probability(9, (0, 0), (0, 0)).probability_type_code(), Num(9));
        assert_eq!(
            probability(255, (0, 0), (0, 0)).name(),
            "UnknownProbType=255"
        );
    }

    #[test]
    fn horizontal_product_from_slice() -> Result<(), Box<dyn std::error::Error>> {
        use grib_template_helpers::TryFromSlice;

        let buf = [
            2, 0, 96, 0, 3, 30, 1, 0, 0, 0, 12, //
            103, 0, 0, 0, 0, 2, //
            255, 0xff, 0xff, 0xff, 0xff, 0xff,
        ];
        let mut pos = 0;
        let actual = HorizontalProduct::try_from_slice(&buf, &mut pos)?;
        assert_eq!(actual.generating_process_type, 2);
        assert_eq!(actual.generating_process_id, 96);
        assert_eq!(actual.hours_after_cutoff, 3);
        assert_eq!(actual.minutes_after_cutoff, 30);
        assert_eq!(actual.time_unit, 1);
        assert_eq!(actual.forecast_time, 12);
        assert_eq!(actual.first_surface, FixedSurface::new(103, 0, 2));
        assert!(actual.second_surface.is_missing());
        assert_eq!(pos, HorizontalProduct::SIZE);
        Ok(())
    }

    fn interval_octets(time_unit_of_ranges: u8) -> Vec<u8> {
        let mut buf = vec![0; 12];
        buf[7] = 1;
        buf.extend_from_slice(&[1, 2, time_unit_of_ranges, 0, 0, 0, 6, 255, 0, 0, 0, 0]);
        buf
    }

    #[test]
    fn statistical_interval_with_unset_end_falls_back_to_reference_time()
    -> Result<(), Box<dyn std::error::Error>> {
        use chrono::TimeZone;

        let buf = interval_octets(1);
        let ref_time = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut pos = 0;
        let actual = StatisticalInterval::decode(&buf, &mut pos, 1, ref_time)?;
        assert_eq!(actual.interval_time_end, ref_time);
        assert_eq!(actual.forecast_time, 0);
        assert_eq!(actual.time_ranges.len(), 1);
        assert_eq!(pos, StatisticalInterval::FIXED_SIZE + TIME_INTERVAL_SIZE);
        Ok(())
    }

    #[test]
    fn statistical_interval_in_missing_time_unit() -> Result<(), Box<dyn std::error::Error>> {
        use chrono::TimeZone;

        let mut buf = interval_octets(255);
        buf[..7].copy_from_slice(&[0x07, 0xe8, 5, 2, 0, 0, 0]);
        let ref_time = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut pos = 0;
        let actual = StatisticalInterval::decode(&buf, &mut pos, 255, ref_time)?;
        assert_eq!(
            actual.interval_time_end,
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()
        );
        assert_eq!(actual.forecast_time, 0);
        Ok(())
    }

    #[test]
    fn statistical_interval_with_truncated_time_ranges_fails() {
        use chrono::TimeZone;

        let buf = interval_octets(1);
        let ref_time = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut pos = 0;
        let result = StatisticalInterval::decode(&buf[..20], &mut pos, 1, ref_time);
        assert!(matches!(
            result,
            Err(GribError::BuildError(crate::error::BuildError::ReadError(_)))
        ));
    }
}
