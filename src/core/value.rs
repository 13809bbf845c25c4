// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! `Variant`: a tagged numeric union for deserialized scalar values.
//!
//! Strings are never stored here — a `string` field becomes a
//! [`crate::core::flat::FlatMessage`] `name` entry, not a `value` entry.

use crate::core::error::IntrospectionError;
use std::fmt;

/// A single deserialized scalar, tagged with its wire-level numeric kind.
///
/// `Time`/`Duration` keep `sec`/`nsec` apart rather than collapsing to a
/// single nanosecond count: ROS1 emits each as one flattened value entry but
/// the two halves have different signedness (`sec` is signed for `Duration`,
/// unsigned for `Time`) and collapsing early would make `convert::<f64>()`
/// lossy for large timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Time { sec: u32, nsec: u32 },
    Duration { sec: i32, nsec: i32 },
}

impl Variant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Variant::Bool(_) => "Bool",
            Variant::Int8(_) => "Int8",
            Variant::Int16(_) => "Int16",
            Variant::Int32(_) => "Int32",
            Variant::Int64(_) => "Int64",
            Variant::UInt8(_) => "UInt8",
            Variant::UInt16(_) => "UInt16",
            Variant::UInt32(_) => "UInt32",
            Variant::UInt64(_) => "UInt64",
            Variant::Float32(_) => "Float32",
            Variant::Float64(_) => "Float64",
            Variant::Time { .. } => "Time",
            Variant::Duration { .. } => "Duration",
        }
    }

    /// Widen to `f64`. `Time`/`Duration` convert via `sec as f64 + nsec as
    /// f64 * 1e-9`, matching `ros::Time::toSec()`/`ros::Duration::toSec()`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Variant::Bool(v) => v as u8 as f64,
            Variant::Int8(v) => v as f64,
            Variant::Int16(v) => v as f64,
            Variant::Int32(v) => v as f64,
            Variant::Int64(v) => v as f64,
            Variant::UInt8(v) => v as f64,
            Variant::UInt16(v) => v as f64,
            Variant::UInt32(v) => v as f64,
            Variant::UInt64(v) => v as f64,
            Variant::Float32(v) => v as f64,
            Variant::Float64(v) => v,
            Variant::Time { sec, nsec } => sec as f64 + nsec as f64 * 1e-9,
            Variant::Duration { sec, nsec } => sec as f64 + nsec as f64 * 1e-9,
        }
    }

    /// Narrowing conversion into a concrete target type — an integer, a
    /// float, or [`RosTime`]. Integer targets range-check; non-TIME numeric
    /// casts truncate toward zero like a C-style cast; [`RosTime`] requires
    /// a non-negative, finite source. Used by downstream consumers that know
    /// at the call site which type they want regardless of what was stored.
    pub fn convert<T: TryFromVariant>(&self) -> Result<T, IntrospectionError> {
        T::try_from_variant(self)
    }
}

/// Implemented for the concrete numeric types `Variant::convert` can target.
pub trait TryFromVariant: Sized {
    fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError>;
}

/// Truncate `x` toward zero into an `i128`, the way a C-style numeric cast
/// would, failing only when `x` is non-finite or wouldn't fit in `i128` at
/// all. Narrowing into the caller's actual target width is still checked
/// afterward by `<$t>::try_from`.
fn truncate_float_to_wide(x: f64, from: &Variant, to: &'static str) -> Result<i128, IntrospectionError> {
    let truncated = x.trunc();
    if !truncated.is_finite() || truncated < i128::MIN as f64 || truncated > i128::MAX as f64 {
        return Err(IntrospectionError::ConversionOutOfRange {
            from: from.type_name().to_string(),
            to: to.to_string(),
        });
    }
    Ok(truncated as i128)
}

macro_rules! impl_try_from_variant_int {
    ($t:ty) => {
        impl TryFromVariant for $t {
            fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError> {
                let wide: i128 = match *v {
                    Variant::Bool(b) => b as i128,
                    Variant::Int8(x) => x as i128,
                    Variant::Int16(x) => x as i128,
                    Variant::Int32(x) => x as i128,
                    Variant::Int64(x) => x as i128,
                    Variant::UInt8(x) => x as i128,
                    Variant::UInt16(x) => x as i128,
                    Variant::UInt32(x) => x as i128,
                    Variant::UInt64(x) => x as i128,
                    // Non-TIME numeric casts apply C-style truncation rather
                    // than failing outright.
                    Variant::Float32(x) => truncate_float_to_wide(x as f64, v, stringify!($t))?,
                    Variant::Float64(x) => truncate_float_to_wide(x, v, stringify!($t))?,
                    Variant::Time { sec, nsec } => {
                        return Err(IntrospectionError::ConversionOutOfRange {
                            from: format!("Time({sec},{nsec})"),
                            to: stringify!($t).to_string(),
                        })
                    }
                    Variant::Duration { sec, nsec } => {
                        return Err(IntrospectionError::ConversionOutOfRange {
                            from: format!("Duration({sec},{nsec})"),
                            to: stringify!($t).to_string(),
                        })
                    }
                };
                <$t>::try_from(wide).map_err(|_| IntrospectionError::ConversionOutOfRange {
                    from: v.type_name().to_string(),
                    to: stringify!($t).to_string(),
                })
            }
        }
    };
}

impl_try_from_variant_int!(i8);
impl_try_from_variant_int!(i16);
impl_try_from_variant_int!(i32);
impl_try_from_variant_int!(i64);
impl_try_from_variant_int!(u8);
impl_try_from_variant_int!(u16);
impl_try_from_variant_int!(u32);
impl_try_from_variant_int!(u64);

impl TryFromVariant for f32 {
    fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError> {
        Ok(v.as_f64() as f32)
    }
}

impl TryFromVariant for f64 {
    fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError> {
        Ok(v.as_f64())
    }
}

impl TryFromVariant for bool {
    fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError> {
        match *v {
            Variant::Bool(b) => Ok(b),
            Variant::Int8(x) => Ok(x != 0),
            Variant::UInt8(x) => Ok(x != 0),
            _ => Err(IntrospectionError::ConversionOutOfRange {
                from: v.type_name().to_string(),
                to: "bool".to_string(),
            }),
        }
    }
}

/// The `TIME` conversion target for `Variant::convert`, alongside the
/// integer and float targets: `convert<T>()` is defined for
/// `T ∈ {integers, floats, TIME}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosTime {
    pub sec: u32,
    pub nsec: u32,
}

impl TryFromVariant for RosTime {
    /// `Variant::Time` passes through unchanged. Every other numeric kind
    /// converts via `as_f64()` and then the float-to-TIME rule: the value
    /// must be non-negative and finite, `sec = floor(x)`, `nsec =
    /// round((x - sec) * 1e9)`.
    fn try_from_variant(v: &Variant) -> Result<Self, IntrospectionError> {
        if let Variant::Time { sec, nsec } = *v {
            return Ok(RosTime { sec, nsec });
        }

        let secs = v.as_f64();
        if !secs.is_finite() || secs < 0.0 {
            return Err(IntrospectionError::ConversionOutOfRange {
                from: v.type_name().to_string(),
                to: "Time".to_string(),
            });
        }
        match time_from_secs_f64(secs) {
            Variant::Time { sec, nsec } => Ok(RosTime { sec, nsec }),
            _ => unreachable!("time_from_secs_f64 always returns Variant::Time"),
        }
    }
}

/// Build a `Variant::Time` from `f64` seconds, the reverse of `as_f64`.
/// `nsec` is clamped into `[0, 1_000_000_000)` by carrying whole seconds.
pub fn time_from_secs_f64(secs: f64) -> Variant {
    let sec = secs.floor();
    let nsec = ((secs - sec) * 1_000_000_000.0).round();
    let (sec, nsec) = normalize_sec_nsec(sec as i64, nsec as i64);
    Variant::Time {
        sec: sec as u32,
        nsec: nsec as u32,
    }
}

/// Build a `Variant::Duration` from `f64` seconds, the reverse of `as_f64`.
pub fn duration_from_secs_f64(secs: f64) -> Variant {
    let sec = secs.trunc();
    let nsec = ((secs - sec) * 1_000_000_000.0).round();
    let (sec, nsec) = normalize_sec_nsec(sec as i64, nsec as i64);
    Variant::Duration {
        sec: sec as i32,
        nsec: nsec as i32,
    }
}

fn normalize_sec_nsec(mut sec: i64, mut nsec: i64) -> (i64, i64) {
    while nsec < 0 {
        nsec += 1_000_000_000;
        sec -= 1;
    }
    while nsec >= 1_000_000_000 {
        nsec -= 1_000_000_000;
        sec += 1;
    }
    (sec, nsec)
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Bool(v) => write!(f, "{v}"),
            Variant::Int8(v) => write!(f, "{v}"),
            Variant::Int16(v) => write!(f, "{v}"),
            Variant::Int32(v) => write!(f, "{v}"),
            Variant::Int64(v) => write!(f, "{v}"),
            Variant::UInt8(v) => write!(f, "{v}"),
            Variant::UInt16(v) => write!(f, "{v}"),
            Variant::UInt32(v) => write!(f, "{v}"),
            Variant::UInt64(v) => write!(f, "{v}"),
            Variant::Float32(v) => write!(f, "{v}"),
            Variant::Float64(v) => write!(f, "{v}"),
            Variant::Time { sec, nsec } => write!(f, "{sec}.{nsec:09}"),
            Variant::Duration { sec, nsec } => write!(f, "{sec}.{nsec:09}"),
        }
    }
}
