//! JSON encoders with a fallback hook.
//!
//! Natively serializable values ([`Encodable::Json`] and lists of them) are
//! emitted as-is. Everything else is handed to [`JsonEncoder::fallback`],
//! which either produces a JSON value or fails with
//! [`JsonableError::Unserializable`].
//!
//! Two encoders ship with the crate:
//!
//! - [`FrameworkEncoder`]: dates, times, durations, decimals and UUIDs.
//! - [`ModelEncoder`]: wraps another encoder and additionally turns model
//!   instances into field mappings.
//!
//! ```rust,ignore
//! use chopin_jsonable::{Encodable, JsonEncoder, ModelEncoder};
//!
//! let json = ModelEncoder::new().encode(Encodable::Model(&contact))?;
//! ```

use std::fmt::{self, Write as _};

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone,
    Timelike,
};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::error::JsonableError;
use crate::model::{Model, model_to_dict};

/// The shapes an encoder dispatches over.
#[derive(Clone)]
pub enum Encodable<'a> {
    /// Already a JSON value; never reaches the fallback hook.
    Json(Value),
    /// Encoded element by element.
    List(Vec<Encodable<'a>>),
    Model(&'a dyn Model),
    DateTime(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
    Decimal(Decimal),
    Uuid(Uuid),
    /// A value of the named type that no encoder knows about.
    Opaque(&'static str),
}

impl Encodable<'_> {
    /// Placeholder for a value of type `T` with no JSON representation.
    pub fn opaque<T: ?Sized>() -> Encodable<'static> {
        Encodable::Opaque(std::any::type_name::<T>())
    }
}

impl fmt::Debug for Encodable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encodable::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Encodable::List(items) => f.debug_tuple("List").field(items).finish(),
            Encodable::Model(m) => f.debug_tuple("Model").field(&m.model_name()).finish(),
            Encodable::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Encodable::NaiveDateTime(v) => f.debug_tuple("NaiveDateTime").field(v).finish(),
            Encodable::Date(v) => f.debug_tuple("Date").field(v).finish(),
            Encodable::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Encodable::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Encodable::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            Encodable::Uuid(v) => f.debug_tuple("Uuid").field(v).finish(),
            Encodable::Opaque(name) => f.debug_tuple("Opaque").field(name).finish(),
        }
    }
}

impl From<Value> for Encodable<'static> {
    fn from(value: Value) -> Self {
        Encodable::Json(value)
    }
}

impl<'a, T: ToEncodable + ?Sized> From<&'a T> for Encodable<'a> {
    fn from(value: &'a T) -> Self {
        value.to_encodable()
    }
}

/// Conversion of a field value into an [`Encodable`].
pub trait ToEncodable {
    fn to_encodable(&self) -> Encodable<'_>;
}

macro_rules! impl_native {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToEncodable for $ty {
                fn to_encodable(&self) -> Encodable<'_> {
                    Encodable::Json(Value::from(*self))
                }
            }
        )*
    };
}

impl_native!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool
);

impl ToEncodable for str {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Json(Value::from(self))
    }
}

impl ToEncodable for String {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Json(Value::String(self.clone()))
    }
}

impl ToEncodable for Value {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Json(self.clone())
    }
}

impl<T: ToEncodable> ToEncodable for Option<T> {
    fn to_encodable(&self) -> Encodable<'_> {
        match self {
            Some(value) => value.to_encodable(),
            None => Encodable::Json(Value::Null),
        }
    }
}

impl<T: ToEncodable> ToEncodable for Vec<T> {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::List(self.iter().map(ToEncodable::to_encodable).collect())
    }
}

impl<Tz: TimeZone> ToEncodable for DateTime<Tz> {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::DateTime(self.with_timezone(&self.offset().fix()))
    }
}

impl ToEncodable for NaiveDateTime {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::NaiveDateTime(*self)
    }
}

impl ToEncodable for NaiveDate {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Date(*self)
    }
}

impl ToEncodable for NaiveTime {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Time(*self)
    }
}

impl ToEncodable for TimeDelta {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Duration(*self)
    }
}

impl ToEncodable for Decimal {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Decimal(*self)
    }
}

impl ToEncodable for Uuid {
    fn to_encodable(&self) -> Encodable<'_> {
        Encodable::Uuid(*self)
    }
}

/// A JSON encoder with an overridable fallback hook.
pub trait JsonEncoder: Send + Sync {
    /// Called for every value that isn't natively serializable.
    fn fallback(&self, value: Encodable<'_>) -> Result<Value, JsonableError>;

    fn to_value(&self, value: Encodable<'_>) -> Result<Value, JsonableError> {
        match value {
            Encodable::Json(value) => Ok(value),
            Encodable::List(items) => items
                .into_iter()
                .map(|item| self.to_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => self.fallback(other),
        }
    }

    /// Encode to a compact JSON string.
    fn encode(&self, value: Encodable<'_>) -> Result<String, JsonableError> {
        Ok(serde_json::to_string(&self.to_value(value)?)?)
    }
}

/// The base encoder: knows dates, times, durations, decimals and UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameworkEncoder;

impl JsonEncoder for FrameworkEncoder {
    fn fallback(&self, value: Encodable<'_>) -> Result<Value, JsonableError> {
        let encoded = match value {
            Encodable::Json(value) => return Ok(value),
            list @ Encodable::List(_) => return self.to_value(list),
            Encodable::Model(model) => {
                return Err(JsonableError::Unserializable(model.model_name()));
            }
            Encodable::Opaque(type_name) => return Err(JsonableError::Unserializable(type_name)),
            Encodable::DateTime(dt) => format_datetime(&dt),
            Encodable::NaiveDateTime(dt) => format_naive_datetime(&dt),
            Encodable::Date(date) => date.format("%Y-%m-%d").to_string(),
            Encodable::Time(time) => format_time(&time),
            Encodable::Duration(delta) => duration_iso_string(delta),
            Encodable::Decimal(decimal) => decimal.to_string(),
            Encodable::Uuid(uuid) => uuid.hyphenated().to_string(),
        };
        Ok(Value::String(encoded))
    }
}

/// Encoder that turns model instances into field mappings and hands every
/// other value to the wrapped encoder.
#[derive(Debug, Clone, Default)]
pub struct ModelEncoder<E = FrameworkEncoder> {
    base: E,
}

impl ModelEncoder {
    pub fn new() -> Self {
        ModelEncoder {
            base: FrameworkEncoder,
        }
    }
}

impl<E: JsonEncoder> ModelEncoder<E> {
    /// Wrap a custom base encoder.
    pub fn wrapping(base: E) -> Self {
        ModelEncoder { base }
    }

    pub fn base(&self) -> &E {
        &self.base
    }
}

impl<E: JsonEncoder> JsonEncoder for ModelEncoder<E> {
    fn fallback(&self, value: Encodable<'_>) -> Result<Value, JsonableError> {
        match value {
            Encodable::Model(model) => model_to_dict(model, self).map(Value::Object),
            other => self.base.fallback(other),
        }
    }
}

// ── Formatting ─────────────────────────────────────────────────

/// Appends `.mmm` when the value has a non-zero microsecond part.
fn push_millis(out: &mut String, nanos: u32) {
    // leap seconds carry nanos >= 1_000_000_000
    let micros = (nanos % 1_000_000_000) / 1_000;
    if micros != 0 {
        let _ = write!(out, ".{:03}", micros / 1_000);
    }
}

fn format_naive_datetime(dt: &NaiveDateTime) -> String {
    let mut out = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
    push_millis(&mut out, dt.nanosecond());
    out
}

fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    let mut out = format_naive_datetime(&dt.naive_local());
    let offset = dt.offset().local_minus_utc();
    if offset == 0 {
        out.push('Z');
        return out;
    }

    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.unsigned_abs();
    let _ = write!(out, "{sign}{:02}:{:02}", offset / 3600, offset % 3600 / 60);
    if offset % 60 != 0 {
        let _ = write!(out, ":{:02}", offset % 60);
    }
    out
}

fn format_time(time: &NaiveTime) -> String {
    let mut out = time.format("%H:%M:%S").to_string();
    push_millis(&mut out, time.nanosecond());
    out
}

/// ISO 8601 duration, e.g. `P1DT02H03M04.000005S` or `-P0DT00H00M30S`.
pub fn duration_iso_string(delta: TimeDelta) -> String {
    let (sign, delta) = if delta < TimeDelta::zero() {
        ("-", -delta)
    } else {
        ("", delta)
    };

    let total_seconds = delta.num_seconds();
    let micros = delta.subsec_nanos() / 1_000;
    let days = total_seconds / 86_400;
    let rest = total_seconds % 86_400;
    let (hours, minutes, seconds) = (rest / 3600, rest % 3600 / 60, rest % 60);

    let fraction = if micros != 0 {
        format!(".{micros:06}")
    } else {
        String::new()
    };
    format!("{sign}P{days}DT{hours:02}H{minutes:02}M{seconds:02}{fraction}S")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;

    #[derive(Model)]
    struct Event {
        id: u32,
        starts_at: NaiveDateTime,
        length: TimeDelta,
    }

    #[test]
    fn test_duration_iso_string() {
        let delta = TimeDelta::days(1)
            + TimeDelta::hours(2)
            + TimeDelta::minutes(3)
            + TimeDelta::seconds(4)
            + TimeDelta::microseconds(5);
        assert_eq!(duration_iso_string(delta), "P1DT02H03M04.000005S");
        assert_eq!(duration_iso_string(TimeDelta::zero()), "P0DT00H00M00S");
        assert_eq!(duration_iso_string(TimeDelta::seconds(-30)), "-P0DT00H00M30S");
    }

    #[test]
    fn test_push_millis_truncates_microseconds() {
        let mut out = String::new();
        push_millis(&mut out, 123_456_789);
        assert_eq!(out, ".123");

        let mut out = String::new();
        push_millis(&mut out, 999);
        assert_eq!(out, "");

        let mut out = String::new();
        push_millis(&mut out, 500_000);
        assert_eq!(out, ".000");
    }

    #[test]
    fn test_model_fields_use_framework_rules() {
        let event = Event {
            id: 7,
            starts_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_milli_opt(9, 30, 0, 250)
                .unwrap(),
            length: TimeDelta::minutes(90),
        };

        let value = ModelEncoder::new().to_value(Encodable::Model(&event)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "starts_at": "2024-03-01T09:30:00.250",
                "length": "P0DT01H30M00S",
            })
        );
    }
}
