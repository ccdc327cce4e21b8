//! Decoder for the Product Definition Section (section 4) of GRIB2 data.
//!
//! A section is decoded from its raw octets and the reference time of the
//! message into a [`ProdDefinition`], which exposes the level, time and
//! template-specific parameters of the product.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use grib_pds::ProdDefinition;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut buf = vec![0_u8; 47];
//!     buf[3] = 47; // section length
//!     buf[4] = 4; // section number
//!     buf[8] = 5; // template 4.5
//!     buf[17] = 1; // forecast time in hours
//!     buf[21] = 6;
//!     buf[36] = 3; // probability of exceeding the lower limit
//!     buf[37] = 1;
//!     buf[41] = 5;
//!
//!     let ref_time = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
//!     let pds = ProdDefinition::from_slice(&buf, ref_time)?;
//!     assert!(pds.is_probability());
//!     assert_eq!(pds.probability_lower_limit(), Some(0.5));
//!     assert_eq!(pds.probability_name().as_deref(), Some("above_0.5"));
//!     assert_eq!(pds.forecast_date(), Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap());
//!     Ok(())
//! }
//! ```

pub mod codetables;
mod datatypes;
pub mod def;
mod error;
mod octets;
mod time;
mod utils;

pub use grib_template_helpers::Dump;

pub use crate::{
    datatypes::*,
    def::grib2::{
        PdsAerosol, PdsEnsemble, PdsEnsembleDerived, PdsInterval, PdsPercentile, PdsProbability,
        PdsSatellite, ProdDefinitionTemplate,
    },
    error::*,
    octets::Octets,
    time::{UtcDateTime, convert_time_value, make_date, make_forecast_time},
    utils::apply_scale_factor,
};
