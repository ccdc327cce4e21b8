pub mod grib2;
