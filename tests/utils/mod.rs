#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn ref_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// Builder of product definition sections, written with 1-based octet
/// numbers.
pub(crate) struct PdsBuilder {
    buf: Vec<u8>,
}

impl PdsBuilder {
    pub(crate) fn new(template_num: u16, len: usize) -> Self {
        Self { buf: vec![0; len] }
            .octet(5, 4)
            .uint2(8, template_num)
    }

    pub(crate) fn octet(mut self, n: usize, value: u8) -> Self {
        self.buf[n - 1] = value;
        self
    }

    pub(crate) fn signed_octet(self, n: usize, value: i8) -> Self {
        let magnitude = value.unsigned_abs();
        let sign = if value < 0 { 0x80 } else { 0 };
        self.octet(n, sign | magnitude)
    }

    pub(crate) fn uint2(mut self, n: usize, value: u16) -> Self {
        self.buf[n - 1..n + 1].copy_from_slice(&value.to_be_bytes());
        self
    }

    pub(crate) fn uint4(mut self, n: usize, value: u32) -> Self {
        self.buf[n - 1..n + 3].copy_from_slice(&value.to_be_bytes());
        self
    }

    pub(crate) fn int4(self, n: usize, value: i32) -> Self {
        let magnitude = value.unsigned_abs();
        let sign = if value < 0 { 0x8000_0000 } else { 0 };
        self.uint4(n, sign | magnitude)
    }

    pub(crate) fn scaled(self, n: usize, scale_factor: i8, scaled_value: i32) -> Self {
        self.signed_octet(n, scale_factor).int4(n + 1, scaled_value)
    }

    pub(crate) fn parameter(self, category: u8, number: u8) -> Self {
        self.octet(10, category).octet(11, number)
    }

    /// Sets the unit and value of the forecast time of templates based on
    /// template 4.0.
    pub(crate) fn forecast_time(self, unit: u8, value: i32) -> Self {
        self.octet(18, unit).int4(19, value)
    }

    pub(crate) fn date_time(
        self,
        n: usize,
        (year, month, day): (u16, u8, u8),
        (hour, minute, second): (u8, u8, u8),
    ) -> Self {
        self.uint2(n, year)
            .octet(n + 2, month)
            .octet(n + 3, day)
            .octet(n + 4, hour)
            .octet(n + 5, minute)
            .octet(n + 6, second)
    }

    pub(crate) fn time_range(
        self,
        n: usize,
        stat_process_type: u8,
        range_unit: u8,
        range_length: u32,
        increment_unit: u8,
        increment: u32,
    ) -> Self {
        self.octet(n, stat_process_type)
            .octet(n + 1, 2)
            .octet(n + 2, range_unit)
            .uint4(n + 3, range_length)
            .octet(n + 7, increment_unit)
            .uint4(n + 8, increment)
    }

    /// Appends coordinate values after the current end of the section.
    pub(crate) fn coordinates(mut self, values: &[f32]) -> Self {
        for value in values {
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
        self.uint2(6, values.len() as u16)
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let len = self.buf.len() as u32;
        self.uint4(1, len).buf
    }
}
