//! Condition-to-JSON conversion for the canonical filter wire format.
//!
//! Converts one structured [`Condition`] to/from one canonical filter object
//! (the format the textarea mirror and external consumers use). Pure and
//! stateless; decode tolerates sloppy hand-edited entries.
//!
//! # JSON Format
//!
//! ```json
//! { "field": "tag", "key": "plan", "relation": ">", "value": "10" }
//! { "field": "location", "lat": "37.7", "long": "-122.4", "radius": "50" }
//! { "field": "first_session", "relation": ">", "hours_ago": "48" }
//! { "field": "country", "relation": "=", "value": "United States" }
//! { "operator": "OR" }
//! ```

use serde_json::{json, Map, Value};

use crate::condition::{Condition, PropertyValues};
use crate::field::Field;
use crate::relation::Relation;
use crate::schema::Prop;

/// Converts a condition to its canonical filter object.
///
/// Returns `None` when a required identifying property is missing (a Tag
/// condition with an empty key); such conditions are dropped from the
/// serialized document.
#[must_use]
pub fn encode(condition: &Condition) -> Option<Value> {
    match condition.field {
        Field::Tag => encode_tag(condition),
        Field::Location => Some(json!({
            "field": "location",
            "lat": condition.get(Prop::Lat).unwrap_or(""),
            "long": condition.get(Prop::Long).unwrap_or(""),
            "radius": condition.get(Prop::Radius).unwrap_or(""),
        })),
        Field::FirstSession | Field::LastSession => Some(json!({
            "field": condition.field.wire_name(),
            "relation": condition.relation().code(),
            "hours_ago": condition.get(Prop::HoursAgo).unwrap_or(""),
        })),
        _ => {
            let relation = condition.relation();
            let mut obj = Map::new();
            obj.insert("field".into(), condition.field.wire_name().into());
            obj.insert("relation".into(), relation.code().into());
            if let Some(value) = condition.get(Prop::Value) {
                obj.insert("value".into(), value.into());
            }
            Some(Value::Object(obj))
        }
    }
}

fn encode_tag(condition: &Condition) -> Option<Value> {
    let key = condition.get(Prop::Key)?.trim();
    if key.is_empty() {
        return None;
    }

    let relation = condition.relation();
    match relation {
        Relation::Exists | Relation::NotExists => Some(json!({
            "field": "tag",
            "key": key,
            "relation": relation.code(),
        })),
        Relation::TimeElapsedGt | Relation::TimeElapsedLt => {
            let value = condition.get(Prop::Value).unwrap_or("");
            let value = if value.is_empty() { "0" } else { value };
            Some(json!({
                "field": "tag",
                "key": key,
                "relation": relation.code(),
                "value": value,
            }))
        }
        _ => Some(json!({
            "field": "tag",
            "key": key,
            "relation": relation.code(),
            "value": condition.get(Prop::Value).unwrap_or(""),
        })),
    }
}

/// Converts a canonical filter object back to a condition.
///
/// Dispatches on the entry's `field` name, case-insensitively. Unknown field
/// names return `None` so the caller can skip the entry without aborting the
/// surrounding document. Accepts `tag_key` as an input alias for a Tag
/// entry's `key`; relation strings may be codes, phrases, or synonyms.
#[must_use]
pub fn decode(entry: &Value) -> Option<Condition> {
    let obj = entry.as_object()?;
    let field_name = obj.get("field").and_then(Value::as_str).unwrap_or("");
    let field = Field::from_wire(field_name)?;

    let mut values = PropertyValues::new();
    match field {
        Field::Tag => {
            let key = obj.get("key").or_else(|| obj.get("tag_key"));
            values.insert(Prop::Key, stringify(key));

            let relation = decoded_relation(obj, Relation::Eq);
            values.insert(Prop::Relation, relation.phrase().to_string());
            if !matches!(relation, Relation::Exists | Relation::NotExists) {
                values.insert(Prop::Value, stringify(obj.get("value")));
            }
        }
        Field::Location => {
            values.insert(Prop::Radius, stringify(obj.get("radius")));
            values.insert(Prop::Lat, stringify(obj.get("lat")));
            values.insert(Prop::Long, stringify(obj.get("long")));
        }
        Field::FirstSession | Field::LastSession => {
            let relation = decoded_relation(obj, Relation::Gt);
            values.insert(Prop::Relation, relation.phrase().to_string());
            values.insert(Prop::HoursAgo, stringify(obj.get("hours_ago")));
        }
        _ => {
            let relation = decoded_relation(obj, Relation::Eq);
            values.insert(Prop::Relation, relation.phrase().to_string());
            values.insert(Prop::Value, stringify(obj.get("value")));
        }
    }

    Some(Condition::new(field, values))
}

fn decoded_relation(obj: &Map<String, Value>, default: Relation) -> Relation {
    let raw = obj.get("relation").and_then(Value::as_str).unwrap_or("");
    Relation::parse_or(raw, default)
}

/// Stringifies a scalar JSON value the way the wire format expects: strings
/// pass through, numbers and booleans render, null/absent become empty.
fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// True when the entry is a group separator (an object carrying an
/// `operator` key).
#[must_use]
pub fn is_separator(entry: &Value) -> bool {
    entry
        .as_object()
        .is_some_and(|obj| obj.contains_key("operator"))
}

/// True when the entry is specifically the OR separator.
#[must_use]
pub fn is_or_separator(entry: &Value) -> bool {
    entry
        .as_object()
        .and_then(|obj| obj.get("operator"))
        .and_then(Value::as_str)
        .is_some_and(|op| op.eq_ignore_ascii_case("OR"))
}

/// The canonical OR separator entry.
#[must_use]
pub fn separator() -> Value {
    json!({ "operator": "OR" })
}
