use std::{sync::Arc, thread};

use chrono::{TimeZone, Utc};
use grib_pds::*;

mod utils;

use utils::{PdsBuilder, ref_time};

#[test]
fn probability_forecast() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(5, 47)
        .parameter(1, 2)
        .forecast_time(1, 6)
        .octet(35, 1)
        .octet(36, 2)
        .octet(37, 2)
        .scaled(38, 1, 50)
        .scaled(43, 1, 800)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert_eq!(pds.template_num(), 5);
    assert_eq!((pds.parameter_category(), pds.parameter_number()), (1, 2));
    assert!(pds.is_probability());
    assert!(!pds.is_interval());
    assert_eq!(pds.probability_type(), Some(2));
    assert_eq!(pds.probability_lower_limit(), Some(5.0));
    assert_eq!(pds.probability_upper_limit(), Some(80.0));
    assert_eq!(
        pds.probability_name().as_deref(),
        Some("between_5_and_80")
    );
    let probability = pds.as_probability().ok_or("not a probability")?;
    assert_eq!(probability.forecast_probability_number(), 1);
    assert_eq!(probability.num_forecast_probabilities(), 2);
    assert_eq!(pds.template_length(), 47);
    Ok(())
}

#[test]
fn accumulation_over_time_interval() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(8, 70)
        .parameter(1, 8)
        .forecast_time(1, 6)
        .date_time(35, (2024, 3, 1), (12, 0, 0))
        .octet(42, 2)
        .time_range(47, 1, 1, 4, 255, 0)
        .time_range(59, 1, 1, 2, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_interval());
    assert_eq!(pds.forecast_time(), 12);
    assert_eq!(
        pds.forecast_time_interval(),
        Some(ForecastTimeInterval::new(6, 12))
    );
    assert_eq!(
        pds.forecast_time_interval_in(0)?,
        Some(ForecastTimeInterval::new(360, 720))
    );
    assert_eq!(
        pds.interval_time_end(),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    );
    assert_eq!(
        pds.forecast_date(),
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(pds.statistical_process_type(), Some(1));
    let interval = pds.as_interval().ok_or("not an interval")?;
    assert_eq!(interval.time_ranges().len(), 2);
    assert_eq!(interval.num_missing_vals(), 0);
    Ok(())
}

#[test]
fn interval_with_increments() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(8, 58)
        .forecast_time(1, 0)
        .date_time(35, (2024, 3, 2), (0, 0, 0))
        .octet(42, 1)
        .time_range(47, 0, 1, 18, 1, 3)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert_eq!(
        pds.forecast_time_interval(),
        Some(ForecastTimeInterval::new(3, 24))
    );
    Ok(())
}

#[test]
fn interval_end_with_all_zero_octets() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(8, 58)
        .forecast_time(1, 0)
        .octet(42, 1)
        .time_range(47, 4, 1, 3, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert_eq!(pds.interval_time_end(), Some(ref_time()));
    assert_eq!(pds.forecast_time(), 0);
    assert_eq!(
        pds.forecast_time_interval(),
        Some(ForecastTimeInterval::new(-3, 0))
    );
    Ok(())
}

#[test]
fn intervals_in_missing_time_unit() -> Result<(), Box<dyn std::error::Error>> {
    // Template number and the first octet of the end of the overall interval.
    let templates = [(8, 35), (9, 48), (10, 36), (11, 38), (12, 37), (61, 45)];
    for (template_num, start) in templates {
        let buf = PdsBuilder::new(template_num, start + 23)
            .forecast_time(255, 0)
            .date_time(start, (2024, 3, 2), (0, 0, 0))
            .octet(start + 7, 1)
            .time_range(start + 12, 1, 255, 24, 255, 0)
            .build();
        let pds = ProdDefinition::from_slice(&buf, ref_time())?;

        assert!(pds.is_interval(), "template 4.{template_num}");
        assert_eq!(pds.forecast_time(), 0, "template 4.{template_num}");
        assert_eq!(
            pds.interval_time_end(),
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
            "template 4.{template_num}"
        );
        assert_eq!(
            pds.forecast_time_interval(),
            Some(ForecastTimeInterval::new(-24, 0)),
            "template 4.{template_num}"
        );
        assert_eq!(pds.forecast_date(), ref_time(), "template 4.{template_num}");
    }
    Ok(())
}

#[test]
fn interval_end_with_hour_rollover() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(9, 71)
        .forecast_time(1, 0)
        .octet(37, 3)
        .scaled(38, 0, 1)
        .date_time(48, (2024, 2, 29), (36, 0, 0))
        .octet(55, 1)
        .time_range(60, 1, 1, 12, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_interval());
    assert!(pds.is_probability());
    assert_eq!(
        pds.interval_time_end(),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    );
    assert_eq!(
        pds.forecast_time_interval(),
        Some(ForecastTimeInterval::new(0, 12))
    );
    assert_eq!(pds.probability_name().as_deref(), Some("above_1"));
    Ok(())
}

#[test]
fn ensemble_member() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(1, 37)
        .forecast_time(1, 24)
        .octet(35, 3)
        .octet(36, 7)
        .octet(37, 21)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_ensemble());
    assert!(!pds.is_probability());
    assert_eq!(pds.perturbation_type(), Some(3));
    assert_eq!(pds.perturbation_number(), Some(7));
    assert_eq!(pds.num_ensemble_forecasts(), Some(21));
    assert_eq!(pds.probability_lower_limit(), None);
    assert_eq!(
        pds.forecast_date(),
        Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
    );
    Ok(())
}

#[test]
fn ensemble_member_with_model_version_date() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(61, 68)
        .forecast_time(1, 0)
        .octet(35, 1)
        .octet(36, 4)
        .octet(37, 51)
        .date_time(38, (2023, 6, 27), (0, 0, 0))
        .date_time(45, (2024, 4, 1), (0, 0, 0))
        .octet(52, 1)
        .time_range(57, 0, 2, 30, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_ensemble());
    assert!(pds.is_interval());
    assert_eq!(pds.perturbation_number(), Some(4));
    assert_eq!(pds.time_unit(), 1);
    assert_eq!(pds.forecast_time(), 744);
    let ProdDefinitionTemplate::_4_61(template) = pds.template() else {
        return Err("not template 4.61".into());
    };
    assert_eq!(
        template.model_version_date,
        UtcDateTime::new(2023, 6, 27, 0, 0, 0)
    );
    assert_eq!(pds.statistical_process_type(), Some(0));
    Ok(())
}

#[test]
fn satellite_products() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(30, 34)
        .octet(12, 8)
        .octet(13, 1)
        .octet(14, 2)
        .uint2(15, 2)
        .uint2(17, 16)
        .octet(19, 4)
        .scaled(20, 0, 930)
        .uint2(25, 2)
        .uint2(27, 16)
        .octet(29, 4)
        .scaled(30, 2, 152_500)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_satellite());
    assert_eq!(pds.generating_process_type(), 8);
    assert_eq!(pds.generating_process_id(), 1);
    assert_eq!(pds.time_unit(), 0);
    assert_eq!(pds.forecast_time(), 0);
    assert_eq!(pds.level_type1(), None);
    assert_eq!(pds.forecast_date(), ref_time());
    let bands = pds.satellite_bands().ok_or("no bands")?;
    assert_eq!(bands.len(), 2);
    assert_eq!((bands[0].series, bands[0].number), (2, 16));
    assert_eq!(bands[0].value(), 930.0);
    assert_eq!(bands[1].value(), 1525.0);

    let buf = PdsBuilder::new(31, 25)
        .octet(14, 1)
        .uint2(15, 3)
        .uint2(17, 5)
        .uint2(19, 300)
        .scaled(21, 0, 1000)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    let satellite = pds.as_satellite().ok_or("not a satellite product")?;
    assert_eq!(satellite.num_bands(), 1);
    assert_eq!(satellite.bands()[0].instrument_type, 300);
    assert_eq!(satellite.bands()[0].value(), 1000.0);
    Ok(())
}

#[test]
fn aerosol_optical_properties() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(48, 58)
        .uint2(12, 62001)
        .octet(14, 0)
        .scaled(15, 9, 5)
        .scaled(20, 9, 20)
        .octet(25, 0)
        .scaled(26, 9, 545)
        .scaled(31, 9, 565)
        .octet(36, 2)
        .octet(42, 1)
        .int4(43, 3)
        .octet(47, 1)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert!(pds.is_aerosol());
    let aerosol = pds.as_aerosol().ok_or("not an aerosol product")?;
    assert_eq!(aerosol.aerosol_type(), 62001);
    assert_eq!(aerosol.sizes(), (5e-9, 2e-8));
    assert_eq!(aerosol.wavelengths(), (5.45e-7, 5.65e-7));
    assert_eq!(pds.generating_process_type(), 2);
    assert_eq!(pds.time_unit(), 1);
    assert_eq!(pds.forecast_time(), 3);
    assert_eq!(pds.level_type1(), Some(1));
    Ok(())
}

macro_rules! test_capabilities {
    ($(($name:ident, $template_num:expr, $len:expr, $expected:expr),)*) => ($(
        #[test]
        fn $name() -> Result<(), Box<dyn std::error::Error>> {
            let buf = PdsBuilder::new($template_num, $len).build();
            let pds = ProdDefinition::from_slice(&buf, ref_time())?;
            let actual = [
                pds.is_interval(),
                pds.is_ensemble(),
                pds.is_ensemble_derived(),
                pds.is_probability(),
                pds.is_percentile(),
                pds.is_satellite(),
                pds.is_aerosol(),
                pds.is_spatial(),
            ];
            assert_eq!(actual, $expected);
            assert_eq!(pds.template_length(), $len);
            Ok(())
        }
    )*);
}

test_capabilities! {
    (capabilities_of_template_0, 0, 34, [false, false, false, false, false, false, false, false]),
    (capabilities_of_template_1, 1, 37, [false, true, false, false, false, false, false, false]),
    (capabilities_of_template_2, 2, 36, [false, false, true, false, false, false, false, false]),
    (capabilities_of_template_5, 5, 47, [false, false, false, true, false, false, false, false]),
    (capabilities_of_template_6, 6, 35, [false, false, false, false, true, false, false, false]),
    (capabilities_of_template_8, 8, 46, [true, false, false, false, false, false, false, false]),
    (capabilities_of_template_9, 9, 59, [true, false, false, true, false, false, false, false]),
    (capabilities_of_template_10, 10, 47, [true, false, false, false, true, false, false, false]),
    (capabilities_of_template_11, 11, 49, [true, true, false, false, false, false, false, false]),
    (capabilities_of_template_12, 12, 48, [true, false, true, false, false, false, false, false]),
    (capabilities_of_template_15, 15, 37, [false, false, false, false, false, false, false, true]),
    (capabilities_of_template_30, 30, 14, [false, false, false, false, false, true, false, false]),
    (capabilities_of_template_31, 31, 14, [false, false, false, false, false, true, false, false]),
    (capabilities_of_template_48, 48, 58, [false, false, false, false, false, false, true, false]),
    (capabilities_of_template_61, 61, 56, [true, true, false, false, false, false, false, false]),
}

#[test]
fn derived_and_percentile_forecasts() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(12, 60)
        .forecast_time(1, 0)
        .octet(35, 2)
        .octet(36, 10)
        .date_time(37, (2024, 3, 1), (6, 0, 0))
        .octet(44, 1)
        .time_range(49, 2, 1, 6, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;
    assert_eq!(pds.derived_forecast_type(), Some(2));
    assert_eq!(pds.num_ensemble_forecasts(), Some(10));
    assert_eq!(pds.statistical_process_type(), Some(2));
    assert_eq!(
        pds.forecast_time_interval(),
        Some(ForecastTimeInterval::new(0, 6))
    );

    let buf = PdsBuilder::new(10, 59)
        .forecast_time(1, 0)
        .octet(35, 90)
        .date_time(36, (2024, 3, 1), (3, 0, 0))
        .octet(43, 1)
        .time_range(48, 3, 1, 3, 255, 0)
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;
    assert_eq!(pds.percentile_value(), Some(90));
    assert_eq!(pds.statistical_process_type(), Some(3));
    assert_eq!(pds.forecast_time(), 3);
    Ok(())
}

#[test]
fn unsupported_template() {
    let buf = PdsBuilder::new(99, 34).build();
    let result = ProdDefinition::from_slice(&buf, ref_time());
    assert_eq!(result.err(), Some(GribError::TemplateNotSupported(99)));
}

macro_rules! test_too_short_sections {
    ($(($name:ident, $template_num:expr, $len:expr),)*) => ($(
        #[test]
        fn $name() {
            let buf = PdsBuilder::new($template_num, $len).build();
            let result = ProdDefinition::from_slice(&buf, ref_time());
            assert_eq!(
                result.err(),
                Some(GribError::BuildError(BuildError::SectionSizeTooSmall($len)))
            );
        }
    )*);
}

test_too_short_sections! {
    (too_short_template_0, 0, 33),
    (too_short_template_5, 5, 46),
    (too_short_template_6, 6, 34),
    (too_short_template_10, 10, 46),
    (too_short_template_48, 48, 57),
}

#[test]
fn extra_coordinates() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(0, 34)
        .forecast_time(1, 0)
        .octet(23, 105)
        .int4(25, 1)
        .coordinates(&[0.5, 1.0, 2.5])
        .build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert_eq!(pds.num_coordinates(), 3);
    assert_eq!(pds.template_length(), 34);
    assert_eq!(pds.section_len(), 46);
    assert_eq!(pds.extra_coordinates(), vec![0.5, 1.0, 2.5]);
    assert_eq!(pds.level_value1(), Some(1.0));
    Ok(())
}

#[test]
fn forecast_date_with_unknown_unit() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(0, 34).forecast_time(200, 12).build();
    let pds = ProdDefinition::from_slice(&buf, ref_time())?;

    assert_eq!(pds.forecast_date(), ref_time());
    assert_eq!(pds.forecast_time_with_unit().to_string(), "12 [unit: 200]");
    Ok(())
}

#[test]
fn sharing_records_between_threads() -> Result<(), Box<dyn std::error::Error>> {
    let buf = PdsBuilder::new(8, 58)
        .forecast_time(1, 0)
        .date_time(35, (2024, 3, 2), (6, 0, 0))
        .octet(42, 1)
        .time_range(47, 1, 1, 6, 255, 0)
        .build();
    let pds = Arc::new(ProdDefinition::from_slice(&buf, ref_time())?);

    let handles = (0..4)
        .map(|_| {
            let pds = Arc::clone(&pds);
            thread::spawn(move || (pds.forecast_date(), pds.forecast_time_interval()))
        })
        .collect::<Vec<_>>();
    for handle in handles {
        let (date, interval) = handle.join().map_err(|_| "thread panicked")?;
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 2, 6, 0, 0).unwrap());
        assert_eq!(interval, Some(ForecastTimeInterval::new(24, 30)));
    }
    Ok(())
}
