use std::{
    borrow::Cow,
    fmt::{self, Display, Formatter},
    io::Write,
    slice::Iter,
    sync::OnceLock,
};

use chrono::{DateTime, Utc};
use grib_template_derive::Dump;
use grib_template_helpers::{Dump as _, DumpField};
use log::warn;

use crate::{
    datatypes::*,
    def::grib2::{template::param_set::SpatialProcessing, *},
    error::*,
    octets::Octets,
    time::{convert_time_value, make_date},
};

const MIN_SECTION_SIZE: usize = 9;
const SECTION_NUM: u8 = 4;
const COORDINATE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Dump)]
pub struct SectionHeader {
    /// Length of section in octets (nn).
    pub len: u32,
    /// Number of section.
    pub sect_num: u8,
}

/// Product definition section (section 4) decoded into the template it
/// declares.
///
/// Values derived from the template, such as the forecast date, are computed
/// on first access and cached, so that a record can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct ProdDefinition {
    octets: Octets,
    ref_time: DateTime<Utc>,
    template: ProdDefinitionTemplate,
    template_len: usize,
    forecast_date: OnceLock<DateTime<Utc>>,
    forecast_time_interval: OnceLock<Option<ForecastTimeInterval>>,
}

impl ProdDefinition {
    /// Decodes the whole section beginning at octet 1, with the reference time
    /// of the message it belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let mut buf = vec![0; 34];
    /// buf[4] = 4;
    /// buf[7..9].copy_from_slice(&99_u16.to_be_bytes());
    /// let result = grib_pds::ProdDefinition::from_payload(buf.into_boxed_slice(), ref_time);
    /// assert_eq!(result.err(), Some(grib_pds::GribError::TemplateNotSupported(99)));
    /// ```
    pub fn from_payload(payload: Box<[u8]>, ref_time: DateTime<Utc>) -> Result<Self, GribError> {
        let size = payload.len();
        if size < MIN_SECTION_SIZE {
            return Err(BuildError::SectionSizeTooSmall(size).into());
        }
        let octets = Octets::new(payload);
        let sect_num = octets.octet(5);
        if sect_num != SECTION_NUM {
            return Err(BuildError::SectionNumberMismatch(sect_num).into());
        }

        let template_num = octets.uint2(8);
        let layout =
            TemplateLayout::of(template_num).ok_or(GribError::TemplateNotSupported(template_num))?;
        let template_len = layout.template_len(&octets)?;
        let num_coordinates = usize::from(octets.uint2(6));
        if size < template_len + num_coordinates * COORDINATE_SIZE {
            return Err(BuildError::SectionSizeTooSmall(size).into());
        }

        let template = ProdDefinitionTemplate::decode(template_num, &octets, ref_time)?;
        Ok(Self {
            octets,
            ref_time,
            template,
            template_len,
            forecast_date: OnceLock::new(),
            forecast_time_interval: OnceLock::new(),
        })
    }

    pub fn from_slice(slice: &[u8], ref_time: DateTime<Utc>) -> Result<Self, GribError> {
        Self::from_payload(slice.into(), ref_time)
    }

    pub fn iter(&self) -> Iter<u8> {
        self.octets.iter()
    }

    pub fn octets(&self) -> &Octets {
        &self.octets
    }

    pub fn header(&self) -> SectionHeader {
        SectionHeader {
            len: self.section_len(),
            sect_num: self.section_num(),
        }
    }

    /// Length of section in octets, as written in octets 1-4.
    pub fn section_len(&self) -> u32 {
        self.octets.uint4(1)
    }

    pub fn section_num(&self) -> u8 {
        self.octets.octet(5)
    }

    /// Number of coordinate values after template.
    pub fn num_coordinates(&self) -> u16 {
        self.octets.uint2(6)
    }

    /// Product definition template number (see Code table 4.0).
    pub fn template_num(&self) -> u16 {
        self.template.template_num()
    }

    pub fn template(&self) -> &ProdDefinitionTemplate {
        &self.template
    }

    /// Returns the number of octets occupied by the section up to the end of
    /// the template, excluding the coordinate values.
    pub fn template_length(&self) -> usize {
        self.template_len
    }

    /// Parameter category (see Code table 4.1).
    pub fn parameter_category(&self) -> u8 {
        self.octets.octet(10)
    }

    /// Parameter number (see Code table 4.2).
    pub fn parameter_number(&self) -> u8 {
        self.octets.octet(11)
    }

    pub fn ref_time(&self) -> DateTime<Utc> {
        self.ref_time
    }

    /// Type of generating process (see Code table 4.3).
    pub fn generating_process_type(&self) -> u8 {
        match &self.template {
            ProdDefinitionTemplate::_4_30(t) => t.generating_process_type,
            ProdDefinitionTemplate::_4_31(t) => t.generating_process_type,
            template => template
                .horizontal()
                .map(|h| h.generating_process_type)
                .unwrap_or(self.octets.octet(12)),
        }
    }

    /// Analysis or forecast generating process identifier, or the observation
    /// generating process identifier for satellite products.
    pub fn generating_process_id(&self) -> u8 {
        match &self.template {
            ProdDefinitionTemplate::_4_30(t) => t.observation_process_id,
            ProdDefinitionTemplate::_4_31(t) => t.observation_process_id,
            template => template
                .horizontal()
                .map(|h| h.generating_process_id)
                .unwrap_or(self.octets.octet(14)),
        }
    }

    pub fn background_process_id(&self) -> Option<u8> {
        self.template.horizontal().map(|h| h.background_process_id)
    }

    pub fn hours_after_cutoff(&self) -> Option<u16> {
        self.template.horizontal().map(|h| h.hours_after_cutoff)
    }

    pub fn minutes_after_cutoff(&self) -> Option<u8> {
        self.template.horizontal().map(|h| h.minutes_after_cutoff)
    }

    /// Indicator of unit of time range (see Code table 4.4).
    ///
    /// Satellite products have no forecast time and report 0 (minute).
    pub fn time_unit(&self) -> u8 {
        self.template.horizontal().map_or(0, |h| h.time_unit)
    }

    /// Forecast time in units of [`time_unit`](Self::time_unit).
    ///
    /// For products over a time interval, this is the forecast time of the end
    /// of the interval.
    pub fn forecast_time(&self) -> i32 {
        if let Some(interval) = self.template.as_interval() {
            return interval.interval().forecast_time;
        }
        self.template.horizontal().map_or(0, |h| h.forecast_time)
    }

    pub fn forecast_time_with_unit(&self) -> ForecastTime {
        ForecastTime::from_numbers(self.time_unit(), self.forecast_time())
    }

    /// Returns the date and time the forecast is valid at.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let mut buf = vec![0; 34];
    /// buf[3] = 34;
    /// buf[4] = 4;
    /// buf[17] = 1;
    /// buf[21] = 36;
    /// let pds = grib_pds::ProdDefinition::from_slice(&buf, ref_time).unwrap();
    /// assert_eq!(
    ///     pds.forecast_date(),
    ///     Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    /// );
    /// ```
    pub fn forecast_date(&self) -> DateTime<Utc> {
        *self
            .forecast_date
            .get_or_init(|| make_date(self.ref_time, self.time_unit(), self.forecast_time()))
    }

    /// Returns the start and end of the time interval as forecast times in
    /// units of [`time_unit`](Self::time_unit), for products over a time
    /// interval.
    pub fn forecast_time_interval(&self) -> Option<ForecastTimeInterval> {
        *self
            .forecast_time_interval
            .get_or_init(|| self.compute_forecast_time_interval())
    }

    fn compute_forecast_time_interval(&self) -> Option<ForecastTimeInterval> {
        let interval = self.template.as_interval()?;
        let time_unit = self.time_unit();
        let mut increment = 0_i64;
        for range in interval.time_ranges() {
            if range.time_range_unit != time_unit {
                warn!(
                    "time range unit {} differs from the forecast time unit {time_unit}",
                    range.time_range_unit
                );
            }
            increment += i64::from(range.time_range_length);
            if !range.increment_is_unspecified() {
                if range.time_increment_unit != time_unit {
                    warn!(
                        "time increment unit {} differs from the forecast time unit {time_unit}",
                        range.time_increment_unit
                    );
                }
                increment += i64::from(range.time_increment);
            }
        }
        let end = i64::from(interval.interval().forecast_time);
        Some(ForecastTimeInterval::new(end - increment, end))
    }

    /// Returns [`forecast_time_interval`](Self::forecast_time_interval)
    /// converted into another unit of Code table 4.4.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let mut buf = vec![0; 34];
    /// buf[3] = 34;
    /// buf[4] = 4;
    /// let pds = grib_pds::ProdDefinition::from_slice(&buf, ref_time).unwrap();
    /// assert_eq!(pds.forecast_time_interval_in(1), Ok(None));
    /// ```
    pub fn forecast_time_interval_in(
        &self,
        unit: u8,
    ) -> Result<Option<ForecastTimeInterval>, GribError> {
        let Some(interval) = self.forecast_time_interval() else {
            return Ok(None);
        };
        let from = self.time_unit();
        let start = convert_time_value(interval.start, from, unit)?;
        let end = convert_time_value(interval.end, from, unit)?;
        Ok(Some(ForecastTimeInterval::new(start, end)))
    }

    /// End of the overall time interval, for products over a time interval.
    pub fn interval_time_end(&self) -> Option<DateTime<Utc>> {
        self.template.as_interval().map(|i| i.interval_time_end())
    }

    /// Statistical process (see Code table 4.10) of the first time range of
    /// products over a time interval, or of the spatial processing of
    /// template 4.15.
    pub fn statistical_process_type(&self) -> Option<u8> {
        if let Some(interval) = self.template.as_interval() {
            return interval.statistical_process_type();
        }
        self.template
            .as_spatial()
            .map(|spatial| spatial.statistical_process_type)
    }

    pub fn fixed_surfaces(&self) -> Option<(FixedSurface, FixedSurface)> {
        self.template
            .horizontal()
            .map(|h| (h.first_surface, h.second_surface))
    }

    /// Type of first fixed surface (see Code table 4.5).
    pub fn level_type1(&self) -> Option<u8> {
        self.template
            .horizontal()
            .map(|h| h.first_surface.surface_type)
    }

    /// Scaled value of first fixed surface.
    pub fn level_value1(&self) -> Option<f64> {
        self.template.horizontal().map(|h| h.first_surface.value())
    }

    /// Type of second fixed surface (see Code table 4.5).
    pub fn level_type2(&self) -> Option<u8> {
        self.template
            .horizontal()
            .map(|h| h.second_surface.surface_type)
    }

    /// Scaled value of second fixed surface.
    pub fn level_value2(&self) -> Option<f64> {
        self.template.horizontal().map(|h| h.second_surface.value())
    }

    pub fn is_interval(&self) -> bool {
        self.template.as_interval().is_some()
    }

    pub fn is_ensemble(&self) -> bool {
        self.template.as_ensemble().is_some()
    }

    pub fn is_ensemble_derived(&self) -> bool {
        self.template.as_ensemble_derived().is_some()
    }

    pub fn is_probability(&self) -> bool {
        self.template.as_probability().is_some()
    }

    pub fn is_percentile(&self) -> bool {
        self.template.as_percentile().is_some()
    }

    pub fn is_satellite(&self) -> bool {
        self.template.as_satellite().is_some()
    }

    pub fn is_aerosol(&self) -> bool {
        self.template.as_aerosol().is_some()
    }

    pub fn is_spatial(&self) -> bool {
        self.template.as_spatial().is_some()
    }

    pub fn as_interval(&self) -> Option<&dyn PdsInterval> {
        self.template.as_interval()
    }

    pub fn as_ensemble(&self) -> Option<&dyn PdsEnsemble> {
        self.template.as_ensemble()
    }

    pub fn as_ensemble_derived(&self) -> Option<&dyn PdsEnsembleDerived> {
        self.template.as_ensemble_derived()
    }

    pub fn as_probability(&self) -> Option<&dyn PdsProbability> {
        self.template.as_probability()
    }

    pub fn as_percentile(&self) -> Option<&dyn PdsPercentile> {
        self.template.as_percentile()
    }

    pub fn as_satellite(&self) -> Option<&dyn PdsSatellite> {
        self.template.as_satellite()
    }

    pub fn as_aerosol(&self) -> Option<&dyn PdsAerosol> {
        self.template.as_aerosol()
    }

    pub fn as_spatial(&self) -> Option<&SpatialProcessing> {
        self.template.as_spatial()
    }

    pub fn perturbation_type(&self) -> Option<u8> {
        self.as_ensemble().map(|e| e.perturbation_type())
    }

    pub fn perturbation_number(&self) -> Option<u8> {
        self.as_ensemble().map(|e| e.perturbation_number())
    }

    /// Number of forecasts in the ensemble, for both individual and derived
    /// ensemble forecasts.
    pub fn num_ensemble_forecasts(&self) -> Option<u8> {
        self.as_ensemble()
            .map(|e| e.num_ensemble_forecasts())
            .or_else(|| {
                self.as_ensemble_derived()
                    .map(|e| e.num_ensemble_forecasts())
            })
    }

    pub fn derived_forecast_type(&self) -> Option<u8> {
        self.as_ensemble_derived()
            .map(|e| e.derived_forecast_type())
    }

    pub fn probability_type(&self) -> Option<u8> {
        self.as_probability().map(|p| p.probability_type())
    }

    pub fn probability_lower_limit(&self) -> Option<f64> {
        self.as_probability().map(|p| p.probability_lower_limit())
    }

    pub fn probability_upper_limit(&self) -> Option<f64> {
        self.as_probability().map(|p| p.probability_upper_limit())
    }

    pub fn probability_name(&self) -> Option<String> {
        self.as_probability().map(|p| p.probability_name())
    }

    pub fn percentile_value(&self) -> Option<u8> {
        self.as_percentile().map(|p| p.percentile_value())
    }

    pub fn satellite_bands(&self) -> Option<&[SatelliteBand]> {
        self.as_satellite().map(|s| s.bands())
    }

    /// Returns the coordinate values following the template, as IEEE 32-bit
    /// floats.
    pub fn extra_coordinates(&self) -> Vec<f32> {
        (0..usize::from(self.num_coordinates()))
            .map(|i| self.octets.float4(self.template_len + 1 + i * COORDINATE_SIZE))
            .collect()
    }

    /// Writes every decoded field with the octets it was read from.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let mut buf = vec![0; 34];
    /// buf[3] = 34;
    /// buf[4] = 4;
    /// let pds = grib_pds::ProdDefinition::from_slice(&buf, ref_time).unwrap();
    /// let mut out = Vec::new();
    /// pds.dump(&mut out).unwrap();
    /// let out = String::from_utf8(out).unwrap();
    /// let lines = out.lines().collect::<Vec<_>>();
    /// assert!(lines[0].starts_with("1-4       len = 34"));
    /// assert!(lines[1].starts_with("5         sect_num = 4"));
    /// assert!(lines[lines.len() - 1].starts_with("31-34     horizontal.second_surface.scaled_value = 0"));
    /// ```
    pub fn dump<W: Write>(&self, output: &mut W) -> Result<(), std::io::Error> {
        let mut pos = 1;
        self.header().dump(None, &mut pos, output)?;
        self.num_coordinates()
            .dump_field("num_coordinates", None, "", &mut pos, output)?;
        self.template_num()
            .dump_field("template_num", None, "", &mut pos, output)?;
        self.parameter_category()
            .dump_field("parameter_category", None, "", &mut pos, output)?;
        self.parameter_number()
            .dump_field("parameter_number", None, "", &mut pos, output)?;
        self.template.dump(None, &mut pos, output)?;
        let parent = Cow::Borrowed("coordinates");
        for (i, value) in self.extra_coordinates().iter().enumerate() {
            value.dump_field(&i.to_string(), Some(&parent), "", &mut pos, output)?;
        }
        Ok(())
    }
}

impl Display for ProdDefinition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "template 4.{}, parameter {}-{}, forecast time {}",
            self.template_num(),
            self.parameter_category(),
            self.parameter_number(),
            self.forecast_time_with_unit(),
        )?;
        if let (Some(level_type), Some(level_value)) = (self.level_type1(), self.level_value1()) {
            write!(f, ", level {level_type}:{level_value}")?;
        }
        Ok(())
    }
}
