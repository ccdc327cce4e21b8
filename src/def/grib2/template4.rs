use std::{
    borrow::Cow,
    io::{Error, Write},
};

use chrono::{DateTime, Utc};
use grib_template_derive::{Dump, TryFromSlice};
use grib_template_helpers::{DumpField, TryFromSlice as _, TryFromSliceResult};

use self::param_set::*;
use super::{capability::*, dump_items, read};
use crate::{
    datatypes::{SatelliteBand, ShortSatelliteBand},
    error::GribError,
    time::UtcDateTime,
};

pub mod param_set;

/// Product definition template 4.0 - Analysis or forecast at a horizontal
/// level or in a horizontal layer at a point in time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_0 {
    pub horizontal: HorizontalProduct,
}

/// Product definition template 4.1 - Individual ensemble forecast, control
/// and perturbed, at a horizontal level or in a horizontal layer at a point in
/// time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_1 {
    pub horizontal: HorizontalProduct,
    pub ensemble: EnsembleMember,
}

/// Product definition template 4.2 - Derived forecasts based on all ensemble
/// members at a horizontal level or in a horizontal layer at a point in time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_2 {
    pub horizontal: HorizontalProduct,
    pub ensemble_derived: EnsembleDerived,
}

/// Product definition template 4.5 - Probability forecasts at a horizontal
/// level or in a horizontal layer at a point in time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_5 {
    pub horizontal: HorizontalProduct,
    pub probability: Probability,
}

/// Product definition template 4.6 - Percentile forecasts at a horizontal
/// level or in a horizontal layer at a point in time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_6 {
    pub horizontal: HorizontalProduct,
    pub percentile: Percentile,
}

/// Product definition template 4.8 - Average, accumulation, extreme values or
/// other statistically processed values at a horizontal level or in a
/// horizontal layer in a continuous or non-continuous time interval.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_8 {
    pub horizontal: HorizontalProduct,
    pub interval: StatisticalInterval,
}

impl Template4_8 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            interval,
        })
    }
}

/// Product definition template 4.9 - Probability forecasts at a horizontal
/// level or in a horizontal layer in a continuous or non-continuous time
/// interval.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_9 {
    pub horizontal: HorizontalProduct,
    pub probability: Probability,
    pub interval: StatisticalInterval,
}

impl Template4_9 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let probability = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            probability,
            interval,
        })
    }
}

/// Product definition template 4.10 - Percentile forecasts at a horizontal
/// level or in a horizontal layer in a continuous or non-continuous time
/// interval.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_10 {
    pub horizontal: HorizontalProduct,
    pub percentile: Percentile,
    pub interval: StatisticalInterval,
}

impl Template4_10 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let percentile = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            percentile,
            interval,
        })
    }
}

/// Product definition template 4.11 - Individual ensemble forecast, control
/// and perturbed, at a horizontal level or in a horizontal layer, in a
/// continuous or non-continuous time interval.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_11 {
    pub horizontal: HorizontalProduct,
    pub ensemble: EnsembleMember,
    pub interval: StatisticalInterval,
}

impl Template4_11 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let ensemble = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            ensemble,
            interval,
        })
    }
}

/// Product definition template 4.12 - Derived forecasts based on all ensemble
/// members at a horizontal level or in a horizontal layer, in a continuous or
/// non-continuous time interval.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_12 {
    pub horizontal: HorizontalProduct,
    pub ensemble_derived: EnsembleDerived,
    pub interval: StatisticalInterval,
}

impl Template4_12 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let ensemble_derived = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            ensemble_derived,
            interval,
        })
    }
}

/// Product definition template 4.15 - Average, accumulation, extreme values or
/// other statistically-processed values over a spatial area at a horizontal
/// level or in a horizontal layer at a point in time.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_15 {
    pub horizontal: HorizontalProduct,
    pub spatial: SpatialProcessing,
}

/// Product definition template 4.30 - Satellite product.
///
/// This template is deprecated in favour of template 4.31.
#[derive(Debug, Clone, PartialEq)]
pub struct Template4_30 {
    /// Type of generating process (see Code table 4.3).
    pub generating_process_type: u8,
    /// Observation generating process identifier (defined by originating
    /// centre).
    pub observation_process_id: u8,
    /// Number of contributing spectral bands (NB).
    pub num_bands: u8,
    pub bands: Vec<SatelliteBand>,
}

impl Template4_30 {
    pub(crate) const BAND_SIZE: usize = 10;
}

impl grib_template_helpers::TryFromSlice for Template4_30 {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
        let generating_process_type = u8::try_from_slice(slice, pos)?;
        let observation_process_id = u8::try_from_slice(slice, pos)?;
        let num_bands = u8::try_from_slice(slice, pos)?;
        let bands = (0..num_bands)
            .map(|_| ShortSatelliteBand::try_from_slice(slice, pos).map(|band| band.0))
            .collect::<TryFromSliceResult<Vec<_>>>()?;
        Ok(Self {
            generating_process_type,
            observation_process_id,
            num_bands,
            bands,
        })
    }
}

impl grib_template_helpers::Dump for Template4_30 {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error> {
        self.generating_process_type
            .dump_field("generating_process_type", parent, "", pos, output)?;
        self.observation_process_id
            .dump_field("observation_process_id", parent, "", pos, output)?;
        self.num_bands
            .dump_field("num_bands", parent, "", pos, output)?;
        let bands = self
            .bands
            .iter()
            .copied()
            .map(ShortSatelliteBand)
            .collect::<Vec<_>>();
        dump_items(&bands, "bands", parent, pos, output)
    }
}

/// Product definition template 4.31 - Satellite product.
#[derive(Debug, Clone, PartialEq)]
pub struct Template4_31 {
    /// Type of generating process (see Code table 4.3).
    pub generating_process_type: u8,
    /// Observation generating process identifier (defined by originating
    /// centre).
    pub observation_process_id: u8,
    /// Number of contributing spectral bands (NB).
    pub num_bands: u8,
    pub bands: Vec<SatelliteBand>,
}

impl Template4_31 {
    pub(crate) const BAND_SIZE: usize = 11;
}

impl grib_template_helpers::TryFromSlice for Template4_31 {
    fn try_from_slice(slice: &[u8], pos: &mut usize) -> TryFromSliceResult<Self> {
        let generating_process_type = u8::try_from_slice(slice, pos)?;
        let observation_process_id = u8::try_from_slice(slice, pos)?;
        let num_bands = u8::try_from_slice(slice, pos)?;
        let bands = (0..num_bands)
            .map(|_| SatelliteBand::try_from_slice(slice, pos))
            .collect::<TryFromSliceResult<Vec<_>>>()?;
        Ok(Self {
            generating_process_type,
            observation_process_id,
            num_bands,
            bands,
        })
    }
}

impl grib_template_helpers::Dump for Template4_31 {
    fn dump<W: Write>(
        &self,
        parent: Option<&Cow<str>>,
        pos: &mut usize,
        output: &mut W,
    ) -> Result<(), Error> {
        self.generating_process_type
            .dump_field("generating_process_type", parent, "", pos, output)?;
        self.observation_process_id
            .dump_field("observation_process_id", parent, "", pos, output)?;
        self.num_bands
            .dump_field("num_bands", parent, "", pos, output)?;
        dump_items(&self.bands, "bands", parent, pos, output)
    }
}

/// Product definition template 4.48 - Analysis or forecast at a horizontal
/// level or in a horizontal layer at a point in time for optical properties of
/// aerosol.
#[derive(Debug, Clone, PartialEq, TryFromSlice, Dump)]
pub struct Template4_48 {
    pub aerosol: Aerosol,
    pub horizontal: HorizontalProduct,
}

/// Product definition template 4.61 - Individual ensemble forecast, control
/// and perturbed, at a horizontal level or in a horizontal layer, in a
/// continuous or non-continuous time interval with model version date.
#[derive(Debug, Clone, PartialEq, Dump)]
pub struct Template4_61 {
    pub horizontal: HorizontalProduct,
    pub ensemble: EnsembleMember,
    /// Model version date.
    pub model_version_date: UtcDateTime,
    pub interval: StatisticalInterval,
}

impl Template4_61 {
    pub(crate) fn decode(
        slice: &[u8],
        pos: &mut usize,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        let horizontal: HorizontalProduct = read(slice, pos)?;
        let ensemble = read(slice, pos)?;
        let model_version_date = read(slice, pos)?;
        let interval = StatisticalInterval::decode(slice, pos, horizontal.time_unit, ref_time)?;
        Ok(Self {
            horizontal,
            ensemble,
            model_version_date,
            interval,
        })
    }
}

macro_rules! impl_capability {
    ($trait:ident, $getter:ident -> $ret:ty, $field:ident, [$($ty:ty),*]) => ($(
        impl $trait for $ty {
            fn $getter(&self) -> &$ret {
                &self.$field
            }
        }
    )*);
}

impl_capability!(
    PdsInterval,
    interval -> StatisticalInterval,
    interval,
    [Template4_8, Template4_9, Template4_10, Template4_11, Template4_12, Template4_61]
);
impl_capability!(
    PdsEnsemble,
    ensemble -> EnsembleMember,
    ensemble,
    [Template4_1, Template4_11, Template4_61]
);
impl_capability!(
    PdsEnsembleDerived,
    ensemble_derived -> EnsembleDerived,
    ensemble_derived,
    [Template4_2, Template4_12]
);
impl_capability!(
    PdsProbability,
    probability -> Probability,
    probability,
    [Template4_5, Template4_9]
);
impl_capability!(
    PdsPercentile,
    percentile -> Percentile,
    percentile,
    [Template4_6, Template4_10]
);
impl_capability!(PdsAerosol, aerosol -> Aerosol, aerosol, [Template4_48]);

impl PdsSatellite for Template4_30 {
    fn bands(&self) -> &[SatelliteBand] {
        &self.bands
    }
}

impl PdsSatellite for Template4_31 {
    fn bands(&self) -> &[SatelliteBand] {
        &self.bands
    }
}
