use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
    io::{Error, Write},
};

use grib_template_derive::{Dump, TryFromSlice};
use grib_template_helpers::{DumpField, TryFromSlice as _, TryFromSliceResult};

use crate::{
    codetables::{grib2::Table4_4, *},
    utils::apply_scale_factor,
};

/// A pair of a decimal scale factor and a scaled value, representing
/// `scaled_value * 10^-scale_factor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct ScaledValue {
    /// Scale factor.
    pub scale_factor: i8,
    /// Scaled value.
    pub scaled_value: i32,
}

impl ScaledValue {
    pub fn new(scale_factor: i8, scaled_value: i32) -> Self {
        Self {
            scale_factor,
            scaled_value,
        }
    }

    /// Returns the value with the scale factor applied.
    ///
    /// A missing scaled value results in NaN, and a missing scale factor is
    /// treated as no scaling.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(grib_pds::ScaledValue::new(1, 50).value(), 5.0);
    /// assert!(grib_pds::ScaledValue::new(0, i32::MIN + 1).value().is_nan());
    /// ```
    pub fn value(&self) -> f64 {
        if self.value_is_nan() {
            f64::NAN
        } else if self.scale_factor_is_nan() {
            f64::from(self.scaled_value)
        } else {
            apply_scale_factor(self.scale_factor.into(), self.scaled_value)
        }
    }

    /// Checks if the scale factor should be treated as missing.
    pub fn scale_factor_is_nan(&self) -> bool {
        // Handle as NaN if all bits are 1. Note that this is i8::MIN + 1 and not
        // i8::MIN.
        self.scale_factor == i8::MIN + 1
    }

    /// Checks if the scaled value should be treated as missing.
    pub fn value_is_nan(&self) -> bool {
        // Handle as NaN if all bits are 1. Note that this is i32::MIN + 1 and not
        // i32::MIN.
        self.scaled_value == i32::MIN + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct FixedSurface {
    /// Type of fixed surface (see Code table 4.5).
    pub surface_type: u8,
    /// Scale factor of fixed surface.
    pub scale_factor: i8,
    /// Scaled value of fixed surface.
    pub scaled_value: i32,
}

impl FixedSurface {
    pub fn new(surface_type: u8, scale_factor: i8, scaled_value: i32) -> Self {
        Self {
            surface_type,
            scale_factor,
            scaled_value,
        }
    }

    /// Returns the value of the surface with the scale factor applied.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(grib_pds::FixedSurface::new(103, 0, 2).value(), 2.0);
    /// assert_eq!(grib_pds::FixedSurface::new(100, -2, 850).value(), 85000.0);
    /// ```
    pub fn value(&self) -> f64 {
        ScaledValue::new(self.scale_factor, self.scaled_value).value()
    }

    /// Returns the unit string defined for the type of the surface, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// assert_eq!(grib_pds::FixedSurface::new(100, 0, 0).unit(), Some("Pa"));
    /// ```
    pub fn unit(&self) -> Option<&str> {
        let unit = match self.surface_type {
            11 => "m",
            12 => "m",
            13 => "%",
            18 => "Pa",
            20 => "K",
            21 => "kg m-3",
            22 => "kg m-3",
            23 => "Bq m-3",
            24 => "Bq m-3",
            25 => "dBZ",
            26 => "m",
            27 => "m",
            30 => "m",
            100 => "Pa",
            102 => "m",
            103 => "m",
            104 => r#""sigma" value"#,
            106 => "m",
            107 => "K",
            108 => "Pa",
            109 => "K m2 kg-1 s-1",
            114 => "Numeric",
            117 => "m",
            151 => "Numeric",
            152 => "Numeric",
            160 => "m",
            161 => "m",
            168 => "Numeric",
            169 => "kg m-3",
            170 => "K",
            171 => "m2 s-1",
            _ => return None,
        };
        Some(unit)
    }

    /// Checks if the surface is absent, i.e. its type is "missing" (255).
    pub fn is_missing(&self) -> bool {
        self.surface_type == 255
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastTime {
    pub unit: Code<Table4_4, u8>,
    pub value: i32,
}

impl ForecastTime {
    pub fn new(unit: Code<Table4_4, u8>, value: i32) -> Self {
        Self { unit, value }
    }

    pub fn from_numbers(unit: u8, value: i32) -> Self {
        let unit = Table4_4::try_from(unit).into();
        Self { unit, value }
    }
}

impl Display for ForecastTime {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.value)?;

        match &self.unit {
            Name(unit) => {
                if let Some(expr) = unit.short_expr() {
                    write!(f, " [{expr}]")?;
                }
            }
            Num(num) => {
                write!(f, " [unit: {num}]")?;
            }
        }

        Ok(())
    }
}

/// Start and end of the time interval over which a field is statistically
/// processed, both as forecast times counted from the reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForecastTimeInterval {
    pub start: i64,
    pub end: i64,
}

impl ForecastTimeInterval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// One specification of a time range over which statistical processing is
/// done, occupying 12 octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct TimeInterval {
    /// Statistical process used to calculate the processed field from the
    /// field at each time increment during the time range (see Code table
    /// 4.10).
    pub stat_process_type: u8,
    /// Type of time increment between successive fields used in the
    /// statistical processing (see Code table 4.11).
    pub time_increment_type: u8,
    /// Indicator of unit of time for time range over which statistical
    /// processing is done (see Code table 4.4).
    pub time_range_unit: u8,
    /// Length of the time range over which statistical processing is done, in
    /// units defined by the previous octet.
    pub time_range_length: u32,
    /// Indicator of unit of time for the increment between the successive
    /// fields used (see Code table 4.4).
    pub time_increment_unit: u8,
    /// Time increment between successive fields, in units defined by the
    /// previous octet.
    pub time_increment: u32,
}

pub(crate) const TIME_INTERVAL_SIZE: usize = 12;

impl TimeInterval {
    /// Checks if the increment is given in no unit (255), i.e. not specified.
    pub fn increment_is_unspecified(&self) -> bool {
        self.time_increment_unit == 255
    }
}

impl Display for TimeInterval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "statistical process {}, increment type {}, range {} (unit {}), increment {} (unit {})",
            self.stat_process_type,
            self.time_increment_type,
            self.time_range_length,
            self.time_range_unit,
            self.time_increment,
            self.time_increment_unit,
        )
    }
}

/// Spectral band contributing to a satellite product.
///
/// Reading and dumping follow the 11-octet layout of template 4.31. Bands of
/// template 4.30 are handled through [`ShortSatelliteBand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromSlice, Dump)]
pub struct SatelliteBand {
    /// Satellite series (code table defined by originating/generating centre).
    pub series: u16,
    /// Satellite number (code table defined by originating/generating centre).
    pub number: u16,
    /// Instrument type (code table defined by originating/generating centre).
    pub instrument_type: u16,
    /// Central wave number in m-1.
    pub central_wave_number: ScaledValue,
}

impl SatelliteBand {
    /// Returns the central wave number with the scale factor applied.
    pub fn value(&self) -> f64 {
        self.central_wave_number.value()
    }
}

/// Band of template 4.30, whose instrument type is 1 octet long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortSatelliteBand(pub SatelliteBand);

impl grib_template_helpers::TryFromSlice for ShortSatelliteBand {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
        let series = u16::try_from_slice(slice, pos)?;
        let number = u16::try_from_slice(slice, pos)?;
        let instrument_type = u8::try_from_slice(slice, pos)?;
        let central_wave_number = ScaledValue::try_from_slice(slice, pos)?;
        Ok(Self(SatelliteBand {
            series,
            number,
            instrument_type: instrument_type.into(),
            central_wave_number,
        }))
    }
}

impl grib_template_helpers::Dump for ShortSatelliteBand {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error> {
        let band = &self.0;
        band.series.dump_field("series", parent, "", pos, output)?;
        band.number.dump_field("number", parent, "", pos, output)?;
        // Read from a single octet, so the value always fits.
        (band.instrument_type as u8).dump_field("instrument_type", parent, "", pos, output)?;
        band.central_wave_number
            .dump_field("central_wave_number", parent, "", pos, output)
    }
}
