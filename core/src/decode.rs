//! Lenient, observable decoding of loosely-typed JSON lists.
//!
//! # Design
//! The backend is not strict about field types, so a list response is decoded
//! element by element through `Fields`, whose typed accessors substitute the
//! zero value whenever a key is absent or holds the wrong JSON type. Every
//! substitution is recorded as a `Fallback` in a shared `DecodeReport`
//! instead of aborting the list, so callers and tests can see exactly which
//! fields were invented.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Why a field was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    Missing,
    WrongType,
    UnknownValue(String),
}

/// One substituted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// Position of the element in the response array.
    pub index: usize,
    pub field: &'static str,
    pub reason: FallbackReason,
}

/// Everything that was papered over while decoding one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// The top-level value was not an array and was treated as `[]`.
    pub not_an_array: bool,
    pub fallbacks: Vec<Fallback>,
}

impl DecodeReport {
    pub fn is_clean(&self) -> bool {
        !self.not_an_array && self.fallbacks.is_empty()
    }

    /// Fallbacks recorded for a single element.
    pub fn for_index(&self, index: usize) -> impl Iterator<Item = &Fallback> {
        self.fallbacks.iter().filter(move |f| f.index == index)
    }

    pub fn has(&self, index: usize, field: &str) -> bool {
        self.for_index(index).any(|f| f.field == field)
    }
}

/// A record that can be built from one loosely-typed JSON object.
pub trait LenientDecode: Sized {
    fn decode(fields: &mut Fields<'_>) -> Self;
}

/// Decode `value` as an array of `T`, using `now` for unreadable timestamps.
pub fn decode_list<T: LenientDecode>(value: &Value, now: DateTime<Utc>) -> (Vec<T>, DecodeReport) {
    let mut report = DecodeReport::default();
    let Some(elements) = value.as_array() else {
        if !value.is_null() {
            tracing::debug!("expected a JSON array, got {}; decoding as empty", kind(value));
        }
        report.not_an_array = true;
        return (Vec::new(), report);
    };

    let items = elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            let mut fields = Fields {
                element,
                index,
                now,
                report: &mut report,
            };
            T::decode(&mut fields)
        })
        .collect::<Vec<_>>();

    if !report.fallbacks.is_empty() {
        tracing::debug!(
            elements = items.len(),
            fallbacks = report.fallbacks.len(),
            "decoded list with default substitutions"
        );
    }
    (items, report)
}

/// Typed, defaulting accessors over one array element.
pub struct Fields<'a> {
    element: &'a Value,
    index: usize,
    now: DateTime<Utc>,
    report: &'a mut DecodeReport,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.element.get(key).filter(|v| !v.is_null())
    }

    fn record(&mut self, field: &'static str, reason: FallbackReason) {
        tracing::debug!(index = self.index, field, ?reason, "field fell back to default");
        self.report.fallbacks.push(Fallback {
            index: self.index,
            field,
            reason,
        });
    }

    fn missing_or_wrong(&mut self, field: &'static str, present: bool) {
        let reason = if present {
            FallbackReason::WrongType
        } else {
            FallbackReason::Missing
        };
        self.record(field, reason);
    }

    pub fn string(&mut self, field: &'static str) -> String {
        match self.get(field) {
            Some(Value::String(s)) => s.clone(),
            other => {
                self.missing_or_wrong(field, other.is_some());
                String::new()
            }
        }
    }

    /// Optional string: absence or `null` is a normal value, only a wrong
    /// type counts as a fallback.
    pub fn opt_string(&mut self, field: &'static str) -> Option<String> {
        match self.get(field) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.record(field, FallbackReason::WrongType);
                None
            }
        }
    }

    /// Integer field. Numeric strings are accepted; fractions and values
    /// outside `i64` are a wrong type, not truncated.
    pub fn int(&mut self, field: &'static str) -> i64 {
        let parsed = match self.get(field) {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) => n,
            None => {
                let present = self.get(field).is_some();
                self.missing_or_wrong(field, present);
                0
            }
        }
    }

    /// Non-negative counter; negative values fall back to 0.
    pub fn count(&mut self, field: &'static str) -> u32 {
        let raw = self.int(field);
        u32::try_from(raw).unwrap_or_else(|_| {
            self.record(field, FallbackReason::WrongType);
            0
        })
    }

    pub fn float(&mut self, field: &'static str) -> f64 {
        match self.get(field).and_then(Value::as_f64) {
            Some(f) => f,
            None => {
                let present = self.get(field).is_some();
                self.missing_or_wrong(field, present);
                0.0
            }
        }
    }

    pub fn bool(&mut self, field: &'static str) -> bool {
        match self.get(field) {
            Some(Value::Bool(b)) => *b,
            other => {
                self.missing_or_wrong(field, other.is_some());
                false
            }
        }
    }

    /// Array of strings. A single non-string entry invalidates the whole
    /// array, matching a strict `[String]` cast.
    pub fn string_list(&mut self, field: &'static str) -> Vec<String> {
        let strings = self.get(field).and_then(Value::as_array).and_then(|arr| {
            arr.iter()
                .map(|v| v.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        });
        match strings {
            Some(list) => list,
            None => {
                let present = self.get(field).is_some();
                self.missing_or_wrong(field, present);
                Vec::new()
            }
        }
    }

    /// Enumerated string; unknown values become `default`.
    pub fn enum_or<E: FromStr>(&mut self, field: &'static str, default: E) -> E {
        match self.get(field) {
            Some(Value::String(s)) => match s.parse::<E>() {
                Ok(e) => e,
                Err(_) => {
                    self.record(field, FallbackReason::UnknownValue(s.clone()));
                    default
                }
            },
            other => {
                self.missing_or_wrong(field, other.is_some());
                default
            }
        }
    }

    /// Array of enumerated strings; unknown entries are dropped and recorded.
    pub fn enum_list<E: FromStr>(&mut self, field: &'static str) -> Vec<E> {
        let raw = self.string_list(field);
        let mut out = Vec::with_capacity(raw.len());
        for s in raw {
            match s.parse::<E>() {
                Ok(e) => out.push(e),
                Err(_) => self.record(field, FallbackReason::UnknownValue(s)),
            }
        }
        out
    }

    /// Epoch milliseconds, then RFC 3339, then the decode-time clock.
    pub fn timestamp(&mut self, field: &'static str) -> DateTime<Utc> {
        let parsed = match self.get(field) {
            Some(Value::Number(n)) => n.as_f64().and_then(from_epoch_millis),
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            _ => None,
        };
        match parsed {
            Some(ts) => ts,
            None => {
                let present = self.get(field).is_some();
                self.missing_or_wrong(field, present);
                self.now
            }
        }
    }
}

fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_micros((millis * 1000.0).round() as i64)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
