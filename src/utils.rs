pub(crate) trait GribInt<I> {
    fn as_grib_int(&self) -> I;
}

macro_rules! add_impl_for_ints {
    ($(($ty_src:ty, $ty_dst:ty),)*) => ($(
        impl GribInt<$ty_dst> for $ty_src {
            fn as_grib_int(&self) -> $ty_dst {
                if self.leading_zeros() == 0 {
                    let abs = (self << 1 >> 1) as $ty_dst;
                    -abs
                } else {
                    *self as $ty_dst
                }
            }
        }
    )*);
}

add_impl_for_ints! {
    (u8, i8),
    (u16, i16),
    (u32, i32),
}

macro_rules! read_as {
    ($ty:ty, $buf:ident, $start:expr) => {{
        let end = $start + std::mem::size_of::<$ty>();
        <$ty>::from_be_bytes($buf[$start..end].try_into().unwrap())
    }};
}
pub(crate) use read_as;

/// Applies a decimal scale factor to an integer-encoded value, i.e. returns
/// `value * 10^-scale`.
///
/// Zero scale factors and zero values are returned as they are without any
/// floating point arithmetic.
///
/// # Examples
///
/// ```
/// assert_eq!(grib_pds::apply_scale_factor(2, 12345), 123.45);
/// assert_eq!(grib_pds::apply_scale_factor(-1, 5), 50.0);
/// assert_eq!(grib_pds::apply_scale_factor(0, 7), 7.0);
/// ```
pub fn apply_scale_factor(scale: i32, value: i32) -> f64 {
    let value = f64::from(value);
    if scale == 0 || value == 0.0 {
        return value;
    }
    // Dividing by an exact power of ten keeps results such as 123.45
    // identical to their literals.
    let exp = i32::try_from(scale.unsigned_abs()).unwrap_or(i32::MAX);
    let factor = 10_f64.powi(exp);
    if scale > 0 {
        value / factor
    } else {
        value * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_grib_i8() {
        let input: Vec<u8> = vec![0b01000000, 0b00000001, 0b10000001, 0b11000000];
        let output: Vec<i8> = vec![64, 1, -1, -64];

        let mut actual = Vec::new();
        let mut pos = 0;
        while pos < input.len() {
            let val = read_as!(u8, input, pos);
            pos += 1;
            let val = val.as_grib_int();
            actual.push(val);
        }

        assert_eq!(actual, output);
    }

    #[test]
    fn into_grib_i16() {
        let input: Vec<u8> = vec![
            0b00000000, 0b01000000, 0b00000000, 0b00000001, 0b10000000, 0b00000001, 0b10000000,
            0b01000000,
        ];
        let output: Vec<i16> = vec![64, 1, -1, -64];

        let mut actual = Vec::new();
        let mut pos = 0;
        while pos < input.len() {
            let val = read_as!(u16, input, pos);
            pos += 2;
            let val = val.as_grib_int();
            actual.push(val);
        }

        assert_eq!(actual, output);
    }

    #[test]
    fn into_grib_i32_with_all_bits_set() {
        assert_eq!(u32::MAX.as_grib_int(), i32::MIN + 1);
    }

    macro_rules! test_scale_factor_application {
        ($(($name:ident, $scale:expr, $value:expr, $expected:expr),)*) => ($(
            #[test]
            fn $name() {
                assert_eq!(apply_scale_factor($scale, $value), $expected);
            }
        )*);
    }

    test_scale_factor_application! {
        (scale_factor_application_with_zero_scale, 0, 12345, 12345.0),
        (scale_factor_application_with_zero_value, 3, 0, 0.0),
        (scale_factor_application_with_positive_scale, 2, 12345, 123.45),
        (scale_factor_application_with_negative_scale, -2, 15, 1500.0),
        (scale_factor_application_with_negative_value, 1, -50, -5.0),
        (scale_factor_application_with_largest_scale, i32::MAX, 5, 0.0),
        (scale_factor_application_with_smallest_scale, i32::MIN, 5, f64::INFINITY),
        (scale_factor_application_with_smallest_scale_and_negative_value, i32::MIN, -5, f64::NEG_INFINITY),
    }
}
