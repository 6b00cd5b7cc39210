//! Canonical text rendering of field values.
//!
//! The bytes produced here are hashed directly, so every rule is part of
//! the fingerprint format:
//!
//! - an absent field, a top-level null, or a null reference writes nothing
//! - references are followed to their target
//! - timestamps render in UTC as `2004-07-29 02:24:50 +0000 UTC`, with the
//!   fractional second appended only when non-zero (trailing zeros trimmed)
//! - floats use their shortest round-trip digits, in exponent form
//!   (`1.5e+07`, `1e-05`) when the decimal exponent is below -4 or at
//!   least 6
//! - arrays render as `[a b c]`, maps as `map[k1:v1 k2:v2]` in key order,
//!   nested nulls as `<nil>`
//! - strings are written raw; nothing separates consecutive fields

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use sentinel_core::Value;

/// Write the canonical rendering of `value` into `out`.
pub fn write_value<W: Write + ?Sized>(out: &mut W, value: Option<&Value>) -> fmt::Result {
    match value.and_then(Value::resolve) {
        None | Some(Value::Null) => Ok(()),
        Some(value) => write!(out, "{}", Canonical(value)),
    }
}

/// Display adapter applying the canonical rendering to a value.
pub struct Canonical<'a>(pub &'a Value);

impl fmt::Display for Canonical<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null | Value::Ref(None) => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write_float(f, *x),
            Value::String(s) => f.write_str(s),
            Value::Timestamp(ts) => write_timestamp(f, ts),
            Value::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{}", Canonical(item))?;
                }
                f.write_char(']')
            }
            Value::Map(fields) => {
                f.write_str("map[")?;
                for (i, (key, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{key}:{}", Canonical(item))?;
                }
                f.write_char(']')
            }
            Value::Ref(Some(target)) => write!(f, "{}", Canonical(target)),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("NaN");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "+Inf" } else { "-Inf" });
    }
    if x == 0.0 {
        return f.write_str(if x.is_sign_negative() { "-0" } else { "0" });
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.8123e1".
    let sci = format!("{x:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.write_str(&sci);
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return f.write_str(&sci);
    };

    if (-4..6).contains(&exp) {
        write!(f, "{x}")
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

fn write_timestamp(f: &mut fmt::Formatter<'_>, ts: &DateTime<FixedOffset>) -> fmt::Result {
    let utc = ts.with_timezone(&Utc);
    write!(f, "{}", utc.format("%Y-%m-%d %H:%M:%S"))?;

    // Leap seconds are carried as nanos >= 1e9.
    let nanos = utc.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let frac = format!("{nanos:09}");
        write!(f, ".{}", frac.trim_end_matches('0'))?;
    }
    f.write_str(" +0000 UTC")
}
