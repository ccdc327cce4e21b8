use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GribError {
    BuildError(BuildError),
    /// Product definition template number not covered by this crate.
    TemplateNotSupported(u16),
    /// Code Table 4.4 unit that cannot be used for the requested computation.
    TimeUnitNotSupported(u8),
    InvalidValueError(String),
}

impl Error for GribError {
    fn description(&self) -> &str {
        "grib error"
    }
}

impl From<BuildError> for GribError {
    fn from(e: BuildError) -> Self {
        Self::BuildError(e)
    }
}

impl Display for GribError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::BuildError(e) => write!(f, "{e}"),
            Self::TemplateNotSupported(num) => {
                write!(f, "Product definition template 4.{num} is not supported")
            }
            Self::TimeUnitNotSupported(unit) => {
                write!(f, "Time unit (code table 4.4) {unit} is not supported")
            }
            Self::InvalidValueError(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildError {
    SectionSizeTooSmall(usize),
    SectionNumberMismatch(u8),
    ReadError(String),
}

impl Error for BuildError {
    fn description(&self) -> &str {
        "grib build error"
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::SectionSizeTooSmall(i) => write!(f, "Section size is too small: {i}"),
            Self::SectionNumberMismatch(i) => write!(f, "Not a product definition section: {i}"),
            Self::ReadError(s) => write!(f, "Read error: {s}"),
        }
    }
}
