//! Event records flowing through Sentinel processors.
//!
//! An event is a timestamp plus a tree of named fields. Fields are
//! addressed with dot-separated paths (`beat.host`); the reserved path
//! `@timestamp` addresses the event timestamp itself.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::EventError;

/// Path of the event timestamp.
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// Nested field map, ordered by key.
pub type Fields = BTreeMap<String, Value>;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// A point in time, keeping the offset it was recorded with.
    Timestamp(DateTime<FixedOffset>),
    Array(Vec<Value>),
    Map(Fields),
    /// A shared reference to another value; `None` is a null reference.
    Ref(Option<Arc<Value>>),
}

impl Value {
    /// Wrap a value in a shared reference.
    pub fn reference(value: impl Into<Value>) -> Self {
        Value::Ref(Some(Arc::new(value.into())))
    }

    /// Follow references to the underlying value.
    ///
    /// Returns `None` for a null reference.
    pub fn resolve(&self) -> Option<&Value> {
        let mut current = self;
        while let Value::Ref(target) = current {
            current = target.as_deref()?;
        }
        Some(current)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.resolve()? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v.fixed_offset())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Fields> for Value {
    fn from(v: Fields) -> Self {
        Value::Map(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null | Value::Ref(None) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::UInt(u) => serde_json::Value::from(*u),
            // JSON has no NaN or infinities.
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(fields) => fields_to_json(fields),
            Value::Ref(Some(target)) => serde_json::Value::from(target.as_ref()),
        }
    }
}

fn fields_to_json(fields: &Fields) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
            .collect(),
    )
}

/// An event record: optional timestamp plus nested fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub fields: Fields,
}

impl Event {
    pub fn new(fields: Fields) -> Self {
        Self {
            timestamp: None,
            fields,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<DateTime<FixedOffset>>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Look up a field by dotted path.
    ///
    /// References along the path are followed. A missing segment, or a
    /// segment that is not a map, yields `None`.
    pub fn get_value(&self, path: &str) -> Option<Cow<'_, Value>> {
        if path == TIMESTAMP_FIELD {
            return self.timestamp.map(|ts| Cow::Owned(Value::Timestamp(ts)));
        }

        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current.resolve()? {
                Value::Map(inner) => current = inner.get(segment)?,
                _ => return None,
            }
        }
        Some(Cow::Borrowed(current))
    }

    /// Set a field by dotted path, creating intermediate maps as needed.
    ///
    /// Returns the value previously stored at `path`, if any.
    pub fn put_value(&mut self, path: &str, value: Value) -> Result<Option<Value>, EventError> {
        if path == TIMESTAMP_FIELD {
            return match value.resolve() {
                Some(Value::Timestamp(ts)) => {
                    Ok(self.timestamp.replace(*ts).map(Value::Timestamp))
                }
                _ => Err(EventError::TimestampType),
            };
        }

        let (parents, leaf) = match path.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut map = &mut self.fields;
        if let Some(parents) = parents {
            for segment in parents.split('.') {
                let entry = map
                    .entry(segment.to_string())
                    .or_insert_with(|| Value::Map(Fields::new()));
                map = match entry {
                    Value::Map(inner) => inner,
                    _ => {
                        return Err(EventError::NotAnObject {
                            path: path.to_string(),
                            segment: segment.to_string(),
                        })
                    }
                };
            }
        }

        Ok(map.insert(leaf.to_string(), value))
    }

    /// Build an event from a JSON object.
    ///
    /// A top-level `@timestamp` string is parsed as RFC 3339.
    pub fn from_json(json: serde_json::Value) -> Result<Self, EventError> {
        let serde_json::Value::Object(map) = json else {
            return Err(EventError::ExpectedObject);
        };

        let mut event = Event::default();
        for (key, value) in map {
            if key == TIMESTAMP_FIELD {
                let serde_json::Value::String(raw) = value else {
                    return Err(EventError::TimestampType);
                };
                let ts = DateTime::parse_from_rfc3339(&raw)
                    .map_err(|source| EventError::InvalidTimestamp { value: raw, source })?;
                event.timestamp = Some(ts);
            } else {
                event.fields.insert(key, Value::from(value));
            }
        }
        Ok(event)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut json = fields_to_json(&self.fields);
        if let (Some(ts), serde_json::Value::Object(map)) = (&self.timestamp, &mut json) {
            map.insert(
                TIMESTAMP_FIELD.to_string(),
                serde_json::Value::String(ts.to_rfc3339()),
            );
        }
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        let mut beat = Fields::new();
        beat.insert("host".to_string(), Value::from("example"));
        beat.insert("version".to_string(), Value::from(7));

        let mut fields = Fields::new();
        fields.insert("message".to_string(), Value::from("hello"));
        fields.insert("beat".to_string(), Value::Map(beat));
        Event::new(fields).with_timestamp(Utc.timestamp_opt(1091067890, 0).unwrap())
    }

    #[test]
    fn get_top_level_and_nested() {
        let event = sample_event();
        assert_eq!(event.get_value("message").as_deref(), Some(&Value::from("hello")));
        assert_eq!(event.get_value("beat.host").as_deref(), Some(&Value::from("example")));
        assert_eq!(event.get_value("beat.version").as_deref(), Some(&Value::Int(7)));
    }

    #[test]
    fn get_missing_paths() {
        let event = sample_event();
        assert!(event.get_value("other").is_none());
        assert!(event.get_value("beat.name").is_none());
        // Walking through a scalar is not an error.
        assert!(event.get_value("message.length").is_none());
    }

    #[test]
    fn get_timestamp_field() {
        let event = sample_event();
        let ts = event.get_value(TIMESTAMP_FIELD).unwrap();
        match &*ts {
            Value::Timestamp(t) => assert_eq!(t.timestamp(), 1091067890),
            other => panic!("expected timestamp, got {other:?}"),
        }

        assert!(Event::default().get_value(TIMESTAMP_FIELD).is_none());
    }

    #[test]
    fn get_follows_references() {
        let mut inner = Fields::new();
        inner.insert("name".to_string(), Value::from("svc"));

        let mut fields = Fields::new();
        fields.insert("service".to_string(), Value::reference(Value::Map(inner)));
        let event = Event::new(fields);

        assert_eq!(event.get_value("service.name").as_deref(), Some(&Value::from("svc")));
    }

    #[test]
    fn put_creates_intermediate_maps() {
        let mut event = Event::default();
        let previous = event.put_value("a.b.c", Value::from("x")).unwrap();
        assert!(previous.is_none());
        assert_eq!(event.get_value("a.b.c").as_deref(), Some(&Value::from("x")));
    }

    #[test]
    fn put_overwrites_existing() {
        let mut event = sample_event();
        let previous = event.put_value("message", Value::from("bye")).unwrap();
        assert_eq!(previous, Some(Value::from("hello")));
        assert_eq!(event.get_value("message").as_deref(), Some(&Value::from("bye")));
    }

    #[test]
    fn put_through_scalar_fails() {
        let mut event = sample_event();
        let result = event.put_value("message.hash", Value::from("x"));
        assert!(matches!(
            result,
            Err(EventError::NotAnObject { ref segment, .. }) if segment == "message"
        ));
        assert_eq!(event.get_value("message").as_deref(), Some(&Value::from("hello")));
    }

    #[test]
    fn put_timestamp_requires_time() {
        let mut event = sample_event();
        assert!(matches!(
            event.put_value(TIMESTAMP_FIELD, Value::from("now")),
            Err(EventError::TimestampType)
        ));
    }

    #[test]
    fn resolve_null_reference() {
        assert!(Value::Ref(None).resolve().is_none());
        let nested = Value::reference(Value::reference(8));
        assert_eq!(nested.resolve(), Some(&Value::Int(8)));
    }

    #[test]
    fn json_conversion() {
        let json = serde_json::json!({
            "@timestamp": "2004-07-29T04:24:50+02:00",
            "record_number": 1888399992,
            "big": 18446744073709551615u64,
            "ratio": 0.5,
            "beat": {"host": "example"},
            "tags": ["a", null],
        });

        let event = Event::from_json(json).unwrap();
        assert_eq!(event.timestamp.unwrap().timestamp(), 1091067890);
        assert_eq!(event.get_value("record_number").as_deref(), Some(&Value::Int(1888399992)));
        assert_eq!(event.get_value("big").as_deref(), Some(&Value::UInt(u64::MAX)));
        assert_eq!(event.get_value("ratio").as_deref(), Some(&Value::Float(0.5)));
        assert_eq!(event.get_value("beat.host").as_deref(), Some(&Value::from("example")));

        let back = event.to_json();
        assert_eq!(back["@timestamp"], "2004-07-29T04:24:50+02:00");
        assert_eq!(back["beat"]["host"], "example");
        assert_eq!(back["tags"][1], serde_json::Value::Null);
    }

    #[test]
    fn json_rejects_non_objects_and_bad_timestamps() {
        assert!(matches!(
            Event::from_json(serde_json::json!([1, 2])),
            Err(EventError::ExpectedObject)
        ));
        assert!(matches!(
            Event::from_json(serde_json::json!({"@timestamp": "yesterday"})),
            Err(EventError::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            Event::from_json(serde_json::json!({"@timestamp": 12})),
            Err(EventError::TimestampType)
        ));
    }
}
