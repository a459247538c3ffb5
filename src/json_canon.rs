// src/json_canon.rs

use std::collections::BTreeSet;

use crate::panel::PanelState;
use crate::types::{FieldValue, Fingerprint};

use serde_json::{Map, Value};

/// Fingerprint of a panel snapshot.
///
/// Object keys are sorted, array elements are sorted by their own canonical
/// form, and every primitive is written as a quoted string, so `1`, `"1"` and
/// multi-choice selection order all collapse to the same output. Multi-choice
/// values are sets: repeated options count once.
pub fn encode(state: &PanelState) -> Fingerprint {
    let obj: Map<String, Value> = state
        .iter()
        .map(|(k, v)| (k.clone(), snapshot_json(v)))
        .collect();

    Fingerprint::from_canonical(canonical_value_string(&Value::Object(obj)))
}

fn snapshot_json(v: &FieldValue) -> Value {
    match v {
        FieldValue::Choices(selected) => Value::Array(
            selected
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(|s| Value::String(s.clone()))
                .collect(),
        ),
        other => other.to_json(),
    }
}

pub fn canonical_value_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical_value(&mut out, value);
    out
}

fn write_canonical_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => write_quoted(out, ""),
        Value::Bool(b) => write_quoted(out, if *b { "true" } else { "false" }),
        Value::Number(n) => write_quoted(out, &n.to_string()),
        Value::String(s) => write_quoted(out, s),
        Value::Array(arr) => {
            let mut parts: Vec<String> = arr.iter().map(canonical_value_string).collect();
            parts.sort();

            out.push('[');
            out.push_str(&parts.join(","));
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();

            out.push('{');
            let mut first = true;
            for k in keys {
                if !first {
                    out.push(',');
                }
                first = false;

                write_quoted(out, k);
                out.push(':');
                write_canonical_value(out, &map[k]);
            }
            out.push('}');
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    // Value's Display is serde_json's compact string escaping.
    out.push_str(&Value::String(s.to_owned()).to_string());
}

// ======================================================
// Unit Tests
// ======================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use serde_json::json;

    fn bag_state(treatment: &[&str]) -> PanelState {
        let mut s = PanelState::default();
        s.set("recorder", FieldValue::Text("Alice".into()));
        s.set("season", FieldValue::Text("2024".into()));
        s.set(
            "treatment",
            FieldValue::Choices(treatment.iter().map(|t| t.to_string()).collect()),
        );
        s
    }

    #[test]
    fn multi_choice_selection_order_is_ignored() {
        let a = encode(&bag_state(&["slip", "paint"]));
        let b = encode(&bag_state(&["paint", "slip"]));
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            r#"{"recorder":"Alice","season":"2024","treatment":["paint","slip"]}"#
        );
    }

    #[test]
    fn repeated_selections_count_once() {
        let a = encode(&bag_state(&["slip", "paint"]));
        let b = encode(&bag_state(&["slip", "paint", "slip"]));
        assert_eq!(a, b);
    }

    #[test]
    fn field_insertion_order_is_ignored() {
        let mut a = PanelState::default();
        a.set("z", FieldValue::Text("1".into()));
        a.set("a", FieldValue::Flag(true));

        let mut b = PanelState::default();
        b.set("a", FieldValue::Flag(true));
        b.set("z", FieldValue::Text("1".into()));

        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn empty_panel_encodes_to_empty_object() {
        assert_eq!(encode(&PanelState::default()).as_str(), "{}");
    }

    #[test]
    fn primitives_collapse_to_their_string_form() {
        let v1 = json!({"n": 1, "b": true});
        let v2 = json!({"n": "1", "b": "true"});
        assert_eq!(canonical_value_string(&v1), canonical_value_string(&v2));
    }

    #[test]
    fn different_values_give_different_fingerprints() {
        let a = encode(&bag_state(&["slip"]));
        let b = encode(&bag_state(&["slip", "paint"]));
        assert_ne!(a, b);
    }

    #[test]
    fn nested_arrays_of_objects_are_sorted_canonically() {
        let v1 = json!([{"b": 2, "a": 1}, {"c": [3, 1]}]);
        let v2 = json!([{"c": [1, 3]}, {"a": 1, "b": 2}]);
        assert_eq!(canonical_value_string(&v1), canonical_value_string(&v2));
    }
}
