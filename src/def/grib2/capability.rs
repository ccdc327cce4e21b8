//! Capabilities shared by groups of product definition templates.
//!
//! Each trait is implemented by every template struct carrying the
//! corresponding parameters, and records expose them as trait objects through
//! `as_*()` methods.

use chrono::{DateTime, Utc};

use super::template4::param_set::{
    Aerosol, EnsembleDerived, EnsembleMember, Percentile, Probability, StatisticalInterval,
};
use crate::datatypes::{SatelliteBand, TimeInterval};

/// Products statistically processed over a time interval (templates 4.8 to
/// 4.12 and 4.61).
pub trait PdsInterval {
    fn interval(&self) -> &StatisticalInterval;

    /// End of the overall time interval.
    fn interval_time_end(&self) -> DateTime<Utc> {
        self.interval().interval_time_end
    }

    fn time_ranges(&self) -> &[TimeInterval] {
        &self.interval().time_ranges
    }

    fn num_missing_vals(&self) -> u32 {
        self.interval().num_missing_vals
    }

    /// Statistical process of the first time range.
    ///
    /// All the time ranges are assumed to share one process.
    fn statistical_process_type(&self) -> Option<u8> {
        self.time_ranges()
            .first()
            .map(|range| range.stat_process_type)
    }
}

/// Individual ensemble forecasts (templates 4.1, 4.11 and 4.61).
pub trait PdsEnsemble {
    fn ensemble(&self) -> &EnsembleMember;

    /// Type of ensemble forecast (see Code table 4.6).
    fn perturbation_type(&self) -> u8 {
        self.ensemble().ensemble_forecast_type
    }

    fn perturbation_number(&self) -> u8 {
        self.ensemble().perturbation_number
    }

    fn num_ensemble_forecasts(&self) -> u8 {
        self.ensemble().num_ensemble_forecasts
    }
}

/// Forecasts derived from all ensemble members (templates 4.2 and 4.12).
pub trait PdsEnsembleDerived {
    fn ensemble_derived(&self) -> &EnsembleDerived;

    /// Derived forecast (see Code table 4.7).
    fn derived_forecast_type(&self) -> u8 {
        self.ensemble_derived().derived_forecast_type
    }

    fn num_ensemble_forecasts(&self) -> u8 {
        self.ensemble_derived().num_ensemble_forecasts
    }
}

/// Probability forecasts (templates 4.5 and 4.9).
pub trait PdsProbability {
    fn probability(&self) -> &Probability;

    /// Probability type (see Code table 4.9).
    fn probability_type(&self) -> u8 {
        self.probability().probability_type
    }

    fn forecast_probability_number(&self) -> u8 {
        self.probability().forecast_probability_number
    }

    fn num_forecast_probabilities(&self) -> u8 {
        self.probability().num_forecast_probabilities
    }

    fn probability_lower_limit(&self) -> f64 {
        self.probability().lower_limit.value()
    }

    fn probability_upper_limit(&self) -> f64 {
        self.probability().upper_limit.value()
    }

    fn probability_name(&self) -> String {
        self.probability().name()
    }
}

/// Percentile forecasts (templates 4.6 and 4.10).
pub trait PdsPercentile {
    fn percentile(&self) -> &Percentile;

    fn percentile_value(&self) -> u8 {
        self.percentile().percentile_value
    }
}

/// Satellite products (templates 4.30 and 4.31).
pub trait PdsSatellite {
    fn bands(&self) -> &[SatelliteBand];

    fn num_bands(&self) -> usize {
        self.bands().len()
    }
}

/// Optical properties of aerosol (template 4.48).
pub trait PdsAerosol {
    fn aerosol(&self) -> &Aerosol;

    /// Aerosol type (see Code table 4.233).
    fn aerosol_type(&self) -> u16 {
        self.aerosol().aerosol_type
    }

    /// Returns the first and second sizes in metres.
    fn sizes(&self) -> (f64, f64) {
        let aerosol = self.aerosol();
        (aerosol.first_size.value(), aerosol.second_size.value())
    }

    /// Returns the first and second wavelengths in metres.
    fn wavelengths(&self) -> (f64, f64) {
        let aerosol = self.aerosol();
        (
            aerosol.first_wavelength.value(),
            aerosol.second_wavelength.value(),
        )
    }
}
