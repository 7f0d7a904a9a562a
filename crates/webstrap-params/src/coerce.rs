//! Scalar coercion rules.
//!
//! Each rule turns raw parameter text into a typed value, returning `None`
//! when the text does not fit the target type. Defaults are applied by the
//! accessors, never here.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Accepted timestamp layouts, tried in order. All are UTC.
pub const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S%.fZ",
];

/// Types that can be read from raw parameter text.
pub trait Coerce: Sized {
    /// Parses `raw`, returning `None` if it is not a valid value.
    fn coerce(raw: &str) -> Option<Self>;
}

impl Coerce for String {
    fn coerce(raw: &str) -> Option<Self> {
        Some(raw.to_owned())
    }
}

macro_rules! coerce_signed {
    ($($ty:ty),*) => {$(
        impl Coerce for $ty {
            fn coerce(raw: &str) -> Option<Self> {
                raw.parse().ok()
            }
        }
    )*};
}

// Unsigned values take no sign, not even `+`.
macro_rules! coerce_unsigned {
    ($($ty:ty),*) => {$(
        impl Coerce for $ty {
            fn coerce(raw: &str) -> Option<Self> {
                if raw.starts_with('+') {
                    return None;
                }
                raw.parse().ok()
            }
        }
    )*};
}

coerce_signed!(i8, i16, i32, i64, isize);
coerce_unsigned!(u8, u16, u32, u64, usize);

/// True if `raw` spells an infinity rather than overflowing into one.
fn spells_infinity(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! coerce_float {
    ($($ty:ty),*) => {$(
        impl Coerce for $ty {
            fn coerce(raw: &str) -> Option<Self> {
                let value: $ty = raw.parse().ok()?;
                if value.is_infinite() && !spells_infinity(raw) {
                    return None;
                }
                Some(value)
            }
        }
    )*};
}

coerce_float!(f32, f64);

/// Lenient boolean.
///
/// Case-insensitive. Anything starting with `Y` is true and anything
/// starting with `N` is false; otherwise `1`, `t`, `true`, `0`, `f` and
/// `false` are accepted.
impl Coerce for bool {
    fn coerce(raw: &str) -> Option<Self> {
        let upper = raw.to_uppercase();
        match upper.as_bytes().first()? {
            b'Y' => return Some(true),
            b'N' => return Some(false),
            _ => {}
        }
        match upper.as_str() {
            "1" | "T" | "TRUE" => Some(true),
            "0" | "F" | "FALSE" => Some(false),
            _ => None,
        }
    }
}

/// Fixed-width date-time prefixes; `d` is a digit, anything else literal.
const TIMESTAMP_SHAPES: [&[u8]; 2] = [b"dddd-dd-ddTdd:dd:dd", b"ddddddddTdddddd"];

/// chrono accepts unpadded fields and a leap second, so the exact layout is
/// checked before parsing.
fn has_timestamp_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    TIMESTAMP_SHAPES.iter().any(|shape| {
        if bytes.len() < shape.len() {
            return false;
        }
        let (head, tail) = bytes.split_at(shape.len());
        let fits = head.iter().zip(shape.iter()).all(|(&b, &s)| {
            if s == b'd' {
                b.is_ascii_digit()
            } else {
                b == s
            }
        });
        // seconds are the last two digits of the head
        fits && head[shape.len() - 2] < b'6' && has_timestamp_tail(tail)
    })
}

/// `Z`, or a non-empty fraction followed by `Z`.
fn has_timestamp_tail(tail: &[u8]) -> bool {
    match tail {
        [b'Z'] => true,
        [b'.', fraction @ .., b'Z'] => {
            !fraction.is_empty() && fraction.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

impl Coerce for DateTime<Utc> {
    fn coerce(raw: &str) -> Option<Self> {
        if !has_timestamp_shape(raw) {
            return None;
        }
        TIMESTAMP_FORMATS.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(raw, format)
                .ok()
                .map(|naive| naive.and_utc())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use proptest::prelude::*;

    fn instant(millis: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2020, 7, 15)
            .unwrap()
            .and_hms_milli_opt(9, 43, 26, millis)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(String::coerce(" a b "), Some(" a b ".to_string()));
        assert_eq!(String::coerce(""), Some(String::new()));
    }

    #[test]
    fn test_signed_integers() {
        assert_eq!(i32::coerce("42"), Some(42));
        assert_eq!(i32::coerce("-42"), Some(-42));
        assert_eq!(i32::coerce("+42"), Some(42));
        assert_eq!(i64::coerce("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(isize::coerce("7"), Some(7));
    }

    #[test]
    fn test_signed_overflow_is_rejected() {
        assert_eq!(i8::coerce("300"), None);
        assert_eq!(i8::coerce("-129"), None);
        assert_eq!(i16::coerce("32768"), None);
        assert_eq!(i64::coerce("9223372036854775808"), None);
    }

    #[test]
    fn test_integer_shape_errors() {
        for raw in ["", "abc", "1.5", " 1", "1 ", "0x10", "1e3", "-", "+"] {
            assert_eq!(i32::coerce(raw), None, "{raw:?}");
            assert_eq!(u32::coerce(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn test_unsigned_integers() {
        assert_eq!(u8::coerce("255"), Some(255));
        assert_eq!(u8::coerce("256"), None);
        assert_eq!(u8::coerce("-1"), None);
        assert_eq!(u64::coerce("18446744073709551615"), Some(u64::MAX));
        assert_eq!(u16::coerce("+1"), None);
        assert_eq!(usize::coerce("9"), Some(9));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::coerce("123"), Some(123.0));
        assert_eq!(f64::coerce("-1.5e3"), Some(-1500.0));
        assert_eq!(f32::coerce("0.25"), Some(0.25));
        assert_eq!(f64::coerce(".5"), Some(0.5));
        assert_eq!(f64::coerce("abc"), None);
        assert_eq!(f64::coerce(""), None);
    }

    #[test]
    fn test_float_overflow_is_rejected() {
        assert_eq!(f32::coerce("1e39"), None);
        assert_eq!(f64::coerce("1e400"), None);
        assert_eq!(f64::coerce("-1e400"), None);
        assert_eq!(f32::coerce("3.4e38"), Some(3.4e38));
    }

    #[test]
    fn test_float_special_spellings() {
        assert_eq!(f64::coerce("inf"), Some(f64::INFINITY));
        assert_eq!(f64::coerce("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(f32::coerce("+INF"), Some(f32::INFINITY));
        assert!(f64::coerce("NaN").is_some_and(f64::is_nan));
    }

    #[test]
    fn test_hex_float_is_rejected() {
        assert_eq!(f64::coerce("0x1p-2"), None);
        assert_eq!(f32::coerce("0X1.8p1"), None);
        assert_eq!(f64::coerce("0x_1p0"), None);
    }

    #[test]
    fn test_bool_true_class() {
        for raw in ["true", "TRUE", "True", "t", "T", "1", "yes", "YES", "y", "Y", "yep"] {
            assert_eq!(bool::coerce(raw), Some(true), "{raw:?}");
        }
    }

    #[test]
    fn test_bool_false_class() {
        for raw in ["false", "FALSE", "f", "F", "0", "no", "NO", "n", "N", "nonsense"] {
            assert_eq!(bool::coerce(raw), Some(false), "{raw:?}");
        }
    }

    #[test]
    fn test_bool_rejects_other_tokens() {
        for raw in ["", "2", "on", "off", "truthy", " true", "-1"] {
            assert_eq!(bool::coerce(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(DateTime::<Utc>::coerce("2020-07-15T09:43:26Z"), Some(instant(0)));
        assert_eq!(DateTime::<Utc>::coerce("2020-07-15T09:43:26.578Z"), Some(instant(578)));
        assert_eq!(DateTime::<Utc>::coerce("20200715T094326Z"), Some(instant(0)));
        assert_eq!(DateTime::<Utc>::coerce("20200715T094326.578Z"), Some(instant(578)));
    }

    #[test]
    fn test_timestamp_nanosecond_precision() {
        let ts = DateTime::<Utc>::coerce("2020-07-15T09:43:26.123456789Z").unwrap();
        assert_eq!(ts.nanosecond(), 123_456_789);
    }

    #[test]
    fn test_timestamp_rejects_other_layouts() {
        for raw in [
            "",
            "2020-07-15",
            "2020-07-15T09:43:26",
            "2020-07-15T09:43:26+01:00",
            "2020-07-15 09:43:26Z",
            "2020-13-15T09:43:26Z",
            "20200715094326Z",
            "yesterday",
            "2020-7-5T9:3:6Z",
            "20-07-15T09:43:26Z",
            "2020-07-15T09:43:60Z",
            "20200715T094360Z",
            "2020-07-15T09:43:26.Z",
            "2020-07-15T09:43:26.12aZ",
            "2020-07-15T09:43:26ZZ",
        ] {
            assert_eq!(DateTime::<Utc>::coerce(raw), None, "{raw:?}");
        }
    }

    proptest! {
        #[test]
        fn i64_round_trips(v in any::<i64>()) {
            prop_assert_eq!(i64::coerce(&v.to_string()), Some(v));
        }

        #[test]
        fn i8_round_trips(v in any::<i8>()) {
            prop_assert_eq!(i8::coerce(&v.to_string()), Some(v));
        }

        #[test]
        fn u32_round_trips(v in any::<u32>()) {
            prop_assert_eq!(u32::coerce(&v.to_string()), Some(v));
        }

        #[test]
        fn u16_rejects_out_of_range(v in (u32::from(u16::MAX) + 1)..=u32::MAX) {
            prop_assert_eq!(u16::coerce(&v.to_string()), None);
        }

        #[test]
        fn unsigned_rejects_negatives(v in i64::MIN..0) {
            prop_assert_eq!(u64::coerce(&v.to_string()), None);
        }

        #[test]
        fn f64_round_trips(v in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
            prop_assert_eq!(f64::coerce(&v.to_string()).map(f64::to_bits), Some(v.to_bits()));
        }

        #[test]
        fn f32_round_trips(v in any::<f32>().prop_filter("finite", |f| f.is_finite())) {
            prop_assert_eq!(f32::coerce(&v.to_string()).map(f32::to_bits), Some(v.to_bits()));
        }

        #[test]
        fn bool_never_panics(raw in "\\PC*") {
            let _ = bool::coerce(&raw);
        }

        #[test]
        fn timestamp_round_trips(secs in 0i64..4_102_444_800) {
            let ts = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let raw = ts.format("%Y-%m-%dT%H:%M:%SZ").to_string();
            prop_assert_eq!(DateTime::<Utc>::coerce(&raw), Some(ts));
            let compact = ts.format("%Y%m%dT%H%M%SZ").to_string();
            prop_assert_eq!(DateTime::<Utc>::coerce(&compact), Some(ts));
        }
    }
}
