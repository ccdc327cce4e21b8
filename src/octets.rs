use std::slice::Iter;

use crate::utils::{GribInt, read_as};

/// Read-only view of the raw octets of a section.
///
/// All accessors take 1-based octet numbers, as the WMO Manual on Codes does,
/// so that decoders can be written against the published template tables.
/// Octet numbers beyond the end of the section are a programming error and
/// panic; callers validate the section length before reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Octets {
    payload: Box<[u8]>,
}

impl Octets {
    pub fn new(payload: Box<[u8]>) -> Self {
        Self { payload }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn iter(&self) -> Iter<u8> {
        self.payload.iter()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the unsigned value of octet `n`.
    ///
    /// # Examples
    ///
    /// ```
    /// let octets = grib_pds::Octets::new(vec![0x00, 0x00, 0x00, 0x22, 0x04].into_boxed_slice());
    /// assert_eq!(octets.octet(5), 4);
    /// ```
    #[inline]
    pub fn octet(&self, n: usize) -> u8 {
        self.payload[n - 1]
    }

    /// Returns octet `n` interpreted as a sign-magnitude integer.
    #[inline]
    pub fn signed_octet(&self, n: usize) -> i8 {
        self.octet(n).as_grib_int()
    }

    /// Returns the big-endian unsigned integer stored in octets `n` and `n + 1`.
    #[inline]
    pub fn uint2(&self, n: usize) -> u16 {
        let payload = &self.payload;
        read_as!(u16, payload, n - 1)
    }

    /// Returns the big-endian unsigned integer stored in octets `n` to `n + 3`.
    #[inline]
    pub fn uint4(&self, n: usize) -> u32 {
        let payload = &self.payload;
        read_as!(u32, payload, n - 1)
    }

    /// Returns octets `n` and `n + 1` interpreted as a sign-magnitude integer.
    #[inline]
    pub fn int2(&self, n: usize) -> i16 {
        self.uint2(n).as_grib_int()
    }

    /// Returns octets `n` to `n + 3` interpreted as a sign-magnitude integer.
    ///
    /// # Examples
    ///
    /// ```
    /// let octets = grib_pds::Octets::new(vec![0x80, 0x00, 0x00, 0x05].into_boxed_slice());
    /// assert_eq!(octets.int4(1), -5);
    /// ```
    #[inline]
    pub fn int4(&self, n: usize) -> i32 {
        self.uint4(n).as_grib_int()
    }

    /// Returns octets `n` to `n + 3` interpreted as an IEEE 32-bit float.
    #[inline]
    pub fn float4(&self, n: usize) -> f32 {
        f32::from_bits(self.uint4(n))
    }
}
