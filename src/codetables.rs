//! Code tables referenced from product definition templates.

pub use self::core::*;
pub use self::grib2::{CalendarField, Table4_4, Table4_9};

mod core;
pub mod grib2;
