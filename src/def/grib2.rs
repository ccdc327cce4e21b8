//! Definitions of product definition templates contained in GRIB2 data.

use std::{
    borrow::Cow,
    io::{Error, Write},
};

use chrono::{DateTime, Utc};
use grib_template_derive::Dump;
use grib_template_helpers::{DumpField, TryFromSlice};

use crate::{
    datatypes::TIME_INTERVAL_SIZE,
    error::{BuildError, GribError},
    octets::Octets,
};

pub use self::capability::*;
use self::template::param_set::{Aerosol, HorizontalProduct, SpatialProcessing, StatisticalInterval};

// Templates begin after the parameter category and number, i.e. at octet 12.
const TEMPLATE_START: usize = 11;
const HORIZONTAL_END: usize = TEMPLATE_START + HorizontalProduct::SIZE;

#[derive(Debug, Clone, PartialEq, Dump)]
#[repr(u16)]
pub enum ProdDefinitionTemplate {
    _4_0(template4::Template4_0) = 0,
    _4_1(template4::Template4_1) = 1,
    _4_2(template4::Template4_2) = 2,
    _4_5(template4::Template4_5) = 5,
    _4_6(template4::Template4_6) = 6,
    _4_8(template4::Template4_8) = 8,
    _4_9(template4::Template4_9) = 9,
    _4_10(template4::Template4_10) = 10,
    _4_11(template4::Template4_11) = 11,
    _4_12(template4::Template4_12) = 12,
    _4_15(template4::Template4_15) = 15,
    _4_30(template4::Template4_30) = 30,
    _4_31(template4::Template4_31) = 31,
    _4_48(template4::Template4_48) = 48,
    _4_61(template4::Template4_61) = 61,
}

/// Octet layout of a template: the number of octets of its fixed part and,
/// for templates followed by a list of repeated structures, the octet
/// holding their count and the size of each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TemplateLayout {
    fixed_len: usize,
    repeated: Option<(usize, usize)>,
}

impl TemplateLayout {
    const fn fixed(fixed_len: usize) -> Self {
        Self {
            fixed_len,
            repeated: None,
        }
    }

    const fn repeated(fixed_len: usize, count_octet: usize, item_size: usize) -> Self {
        Self {
            fixed_len,
            repeated: Some((count_octet, item_size)),
        }
    }

    // Intervals place their count 7 octets after the start.
    const fn interval(start: usize) -> Self {
        Self::repeated(
            start - 1 + StatisticalInterval::FIXED_SIZE,
            start + 7,
            TIME_INTERVAL_SIZE,
        )
    }

    pub(crate) fn of(template_num: u16) -> Option<Self> {
        let layout = match template_num {
            0 => Self::fixed(HORIZONTAL_END),
            1 => Self::fixed(37),
            2 => Self::fixed(36),
            5 => Self::fixed(47),
            6 => Self::fixed(35),
            8 => Self::interval(35),
            9 => Self::interval(48),
            10 => Self::interval(36),
            11 => Self::interval(38),
            12 => Self::interval(37),
            15 => Self::fixed(HORIZONTAL_END + SpatialProcessing::SIZE),
            30 => Self::repeated(14, 14, template4::Template4_30::BAND_SIZE),
            31 => Self::repeated(14, 14, template4::Template4_31::BAND_SIZE),
            48 => Self::fixed(HORIZONTAL_END + Aerosol::SIZE),
            61 => Self::interval(45),
            _ => return None,
        };
        Some(layout)
    }

    /// Returns the number of octets the template occupies in `octets`,
    /// excluding the coordinate values following it.
    pub(crate) fn template_len(&self, octets: &Octets) -> Result<usize, BuildError> {
        let size = octets.len();
        if size < self.fixed_len {
            return Err(BuildError::SectionSizeTooSmall(size));
        }
        let len = match self.repeated {
            Some((count_octet, item_size)) => {
                self.fixed_len + usize::from(octets.octet(count_octet)) * item_size
            }
            None => self.fixed_len,
        };
        Ok(len)
    }
}

impl ProdDefinitionTemplate {
    /// Decodes the template numbered `template_num` from the octets of a whole
    /// section whose length has been validated against the template layout.
    pub(crate) fn decode(
        template_num: u16,
        octets: &Octets,
        ref_time: DateTime<Utc>,
    ) -> Result<Self, GribError> {
        use template4::*;

        let slice = octets.as_slice();
        let mut pos = TEMPLATE_START;
        let template = match template_num {
            0 => Self::_4_0(read(slice, &mut pos)?),
            1 => Self::_4_1(read(slice, &mut pos)?),
            2 => Self::_4_2(read(slice, &mut pos)?),
            5 => Self::_4_5(read(slice, &mut pos)?),
            6 => Self::_4_6(read(slice, &mut pos)?),
            8 => Self::_4_8(Template4_8::decode(slice, &mut pos, ref_time)?),
            9 => Self::_4_9(Template4_9::decode(slice, &mut pos, ref_time)?),
            10 => Self::_4_10(Template4_10::decode(slice, &mut pos, ref_time)?),
            11 => Self::_4_11(Template4_11::decode(slice, &mut pos, ref_time)?),
            12 => Self::_4_12(Template4_12::decode(slice, &mut pos, ref_time)?),
            15 => Self::_4_15(read(slice, &mut pos)?),
            30 => Self::_4_30(read(slice, &mut pos)?),
            31 => Self::_4_31(read(slice, &mut pos)?),
            48 => Self::_4_48(read(slice, &mut pos)?),
            61 => Self::_4_61(Template4_61::decode(slice, &mut pos, ref_time)?),
            _ => return Err(GribError::TemplateNotSupported(template_num)),
        };
        Ok(template)
    }

    /// Returns the template number.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    ///
    /// let mut buf = vec![0; 34];
    /// buf[3] = 34;
    /// buf[4] = 4;
    /// let ref_time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let pds = grib_pds::ProdDefinition::from_slice(&buf, ref_time).unwrap();
    /// assert_eq!(pds.template().template_num(), 0);
    /// ```
    pub fn template_num(&self) -> u16 {
        match self {
            Self::_4_0(_) => 0,
            Self::_4_1(_) => 1,
            Self::_4_2(_) => 2,
            Self::_4_5(_) => 5,
            Self::_4_6(_) => 6,
            Self::_4_8(_) => 8,
            Self::_4_9(_) => 9,
            Self::_4_10(_) => 10,
            Self::_4_11(_) => 11,
            Self::_4_12(_) => 12,
            Self::_4_15(_) => 15,
            Self::_4_30(_) => 30,
            Self::_4_31(_) => 31,
            Self::_4_48(_) => 48,
            Self::_4_61(_) => 61,
        }
    }

    /// Returns the parameters of a product at a horizontal level or in a
    /// horizontal layer, which satellite products do not have.
    pub fn horizontal(&self) -> Option<&HorizontalProduct> {
        match self {
            Self::_4_0(t) => Some(&t.horizontal),
            Self::_4_1(t) => Some(&t.horizontal),
            Self::_4_2(t) => Some(&t.horizontal),
            Self::_4_5(t) => Some(&t.horizontal),
            Self::_4_6(t) => Some(&t.horizontal),
            Self::_4_8(t) => Some(&t.horizontal),
            Self::_4_9(t) => Some(&t.horizontal),
            Self::_4_10(t) => Some(&t.horizontal),
            Self::_4_11(t) => Some(&t.horizontal),
            Self::_4_12(t) => Some(&t.horizontal),
            Self::_4_15(t) => Some(&t.horizontal),
            Self::_4_30(_) | Self::_4_31(_) => None,
            Self::_4_48(t) => Some(&t.horizontal),
            Self::_4_61(t) => Some(&t.horizontal),
        }
    }

    pub fn as_interval(&self) -> Option<&dyn PdsInterval> {
        match self {
            Self::_4_8(t) => Some(t),
            Self::_4_9(t) => Some(t),
            Self::_4_10(t) => Some(t),
            Self::_4_11(t) => Some(t),
            Self::_4_12(t) => Some(t),
            Self::_4_61(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_ensemble(&self) -> Option<&dyn PdsEnsemble> {
        match self {
            Self::_4_1(t) => Some(t),
            Self::_4_11(t) => Some(t),
            Self::_4_61(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_ensemble_derived(&self) -> Option<&dyn PdsEnsembleDerived> {
        match self {
            Self::_4_2(t) => Some(t),
            Self::_4_12(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_probability(&self) -> Option<&dyn PdsProbability> {
        match self {
            Self::_4_5(t) => Some(t),
            Self::_4_9(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_percentile(&self) -> Option<&dyn PdsPercentile> {
        match self {
            Self::_4_6(t) => Some(t),
            Self::_4_10(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_satellite(&self) -> Option<&dyn PdsSatellite> {
        match self {
            Self::_4_30(t) => Some(t),
            Self::_4_31(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_aerosol(&self) -> Option<&dyn PdsAerosol> {
        match self {
            Self::_4_48(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_spatial(&self) -> Option<&SpatialProcessing> {
        match self {
            Self::_4_15(t) => Some(&t.spatial),
            _ => None,
        }
    }
}

/// Reads a value at `pos`, advancing it past the octets read.
pub(crate) fn read<T: TryFromSlice>(slice: &[u8], pos: &mut usize) -> Result<T, GribError> {
    T::try_from_slice(slice, pos).map_err(|e| BuildError::ReadError(e.to_owned()).into())
}

/// Dumps the items of a list of structures, naming them `name[i]`.
pub(crate) fn dump_items<T: grib_template_helpers::Dump, W: Write>(
    items: &[T],
    name: &str,
    parent: Option<&Cow<str>>,
    pos: &mut usize,
    output: &mut W,
) -> Result<(), Error> {
    for (i, item) in items.iter().enumerate() {
        item.dump_field(&format!("{name}[{i}]"), parent, "", pos, output)?;
    }
    Ok(())
}

pub mod template {
    //! GRIB2 template definitions.

    pub use super::template4::*;

    pub mod param_set {
        //! Definitions of parameter sets used in GRIB2 templates.

        pub use super::super::template4::param_set::*;
    }
}

mod capability;
mod template4;
