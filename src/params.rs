//! Typed name/value request parameters and the per-call expected-error table.
//!
//! Resource clients build their calls out of these pieces; the transport in
//! [`crate::http`] consumes them. The body encoding reproduces the ARI wire
//! quirk where the first body parameter selects between two JSON shapes.

use serde_json::{Map, Value, json};

/// A single named request parameter. Values arrive already stringified by
/// the resource clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Expected status code and its human description for one specific call.
///
/// The same status code means different things for different operations, so
/// each call site supplies its own table. This is data, not logic.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedError {
    pub code: u16,
    pub description: &'static str,
}

impl ExpectedError {
    #[must_use]
    pub const fn new(code: u16, description: &'static str) -> Self {
        Self { code, description }
    }
}

/// Selector key that switches the body encoding to the `fields` shape.
const FIELDS_SELECTOR: &str = "fields";

/// Encode body parameters into the JSON document ARI expects.
///
/// The first parameter is a selector and is excluded from the output:
/// when its name is `fields` the remainder serializes as
/// `{"fields":[{"attribute":k,"value":v},...]}`, otherwise as
/// `{"variables":{k:v,...}}`. Returns `None` for an empty parameter list
/// (no body at all).
#[must_use]
pub fn encode_body(params: &[Param]) -> Option<Value> {
    let (selector, rest) = params.split_first()?;

    if selector.name == FIELDS_SELECTOR {
        let fields: Vec<Value> = rest
            .iter()
            .map(|p| json!({ "attribute": p.name, "value": p.value }))
            .collect();
        Some(json!({ "fields": fields }))
    } else {
        let mut variables = Map::new();
        for p in rest {
            variables.insert(p.name.clone(), Value::String(p.value.clone()));
        }
        Some(json!({ "variables": variables }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_selector_yields_attribute_value_array() {
        let params = vec![
            Param::new("fields", ""),
            Param::new("ENABLED", "yes"),
            Param::new("MAX_CALLS", "10"),
        ];

        let body = encode_body(&params).expect("non-empty params produce a body");
        assert_eq!(
            body,
            json!({
                "fields": [
                    { "attribute": "ENABLED", "value": "yes" },
                    { "attribute": "MAX_CALLS", "value": "10" },
                ]
            })
        );
    }

    #[test]
    fn other_selector_yields_variables_map() {
        let params = vec![
            Param::new("variables", ""),
            Param::new("CALLERID", "alice"),
            Param::new("CHANNEL(language)", "en"),
        ];

        let body = encode_body(&params).expect("non-empty params produce a body");
        assert_eq!(
            body,
            json!({
                "variables": {
                    "CALLERID": "alice",
                    "CHANNEL(language)": "en",
                }
            })
        );
    }

    #[test]
    fn empty_params_have_no_body() {
        assert!(encode_body(&[]).is_none(), "no params means no body");
    }

    #[test]
    fn fields_selector_with_no_entries_is_empty_array() {
        let params = vec![Param::new("fields", "")];
        let body = encode_body(&params).expect("selector alone still yields a body");
        assert_eq!(body, json!({ "fields": [] }));
    }
}
