//
//  gitlab3
//  api/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request Parameters and Form Encoding
//!
//! GitLab is a Rails application, so request parameters use Rails-style
//! bracket encoding whether they travel in the query string (GET/DELETE) or
//! in a form body (POST/PUT):
//!
//! | Value | Wire form |
//! |-------|-----------|
//! | scalar | `key=value` |
//! | bool | `key=true` / `key=false` |
//! | null | omitted |
//! | array | `key[]=a&key[]=b` |
//! | mapping | `key[sub]=value` |
//! | array of mappings | `key[][sub]=value` |
//!
//! # Example
//!
//! ```rust
//! use gitlab3::api::Params;
//! use serde_json::json;
//!
//! let params = Params::new()
//!     .set("title", "Crash on start")
//!     .set("labels", json!(["bug", "p1"]));
//!
//! assert_eq!(
//!     params.to_form(),
//!     "labels%5B%5D=bug&labels%5B%5D=p1&title=Crash+on+start"
//! );
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::api::common::{Error, Result};

/// Mapping of request parameter names to JSON-like values.
///
/// Values may be scalars, arrays or nested mappings. `Params` is cheap to
/// clone and is never mutated by the client, so one value can be reused
/// across calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds params from any serializable struct or map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `value` does not serialize to a
    /// JSON object.
    pub fn from_serialize<S: Serialize + ?Sized>(value: &S) -> Result<Self> {
        let value =
            serde_json::to_value(value).map_err(|e| Error::InvalidParams(e.to_string()))?;
        Self::try_from(value)
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy of these params with `key` overridden.
    pub fn merged(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut copy = self.clone();
        copy.insert(key, value);
        copy
    }

    /// Reads `key` as an unsigned integer, accepting JSON numbers and
    /// numeric strings.
    pub fn get_u32(&self, key: &str) -> Option<u32> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Flattens the params into ordered `(key, value)` pairs using Rails
    /// bracket conventions. Null values and empty collections produce no
    /// pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            flatten(key.clone(), value, &mut pairs);
        }
        pairs
    }

    /// Encodes the params as `application/x-www-form-urlencoded`.
    pub fn to_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, b.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
        Value::String(s) => out.push((key, s.clone())),
        Value::Array(items) => {
            for item in items {
                flatten(format!("{key}[]"), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten(format!("{key}[{sub}]"), item, out);
            }
        }
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = Error;

    /// Accepts only JSON objects; anything else is a contract error.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidParams(format!(
                "params must be a mapping, got {other}"
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// One step of a Rails bracket key: `[name]` or `[]`.
    #[derive(Debug)]
    enum Seg {
        Name(String),
        Push,
    }

    fn parse_key(key: &str) -> (String, Vec<Seg>) {
        let (base, rest) = match key.find('[') {
            Some(idx) => (&key[..idx], &key[idx..]),
            None => (key, ""),
        };
        let segs = rest
            .split(']')
            .filter(|part| part.starts_with('['))
            .map(|part| match &part[1..] {
                "" => Seg::Push,
                name => Seg::Name(name.to_string()),
            })
            .collect();
        (base.to_string(), segs)
    }

    fn insert(slot: &mut Value, segs: &[Seg], value: String) {
        match segs.split_first() {
            None => *slot = Value::String(value),
            Some((Seg::Name(name), rest)) => {
                if !slot.is_object() {
                    *slot = json!({});
                }
                let map = slot.as_object_mut().unwrap();
                let child = map.entry(name.clone()).or_insert(Value::Null);
                insert(child, rest, value);
            }
            Some((Seg::Push, rest)) => {
                if !slot.is_array() {
                    *slot = json!([]);
                }
                let items = slot.as_array_mut().unwrap();
                match rest.first() {
                    None => items.push(Value::String(value)),
                    Some(Seg::Name(name)) => {
                        let reuse = items
                            .last()
                            .and_then(Value::as_object)
                            .is_some_and(|last| !last.contains_key(name));
                        if !reuse {
                            items.push(json!({}));
                        }
                        let last = items.last_mut().unwrap();
                        insert(last, rest, value);
                    }
                    Some(Seg::Push) => {
                        items.push(Value::Null);
                        let last = items.last_mut().unwrap();
                        insert(last, rest, value);
                    }
                }
            }
        }
    }

    /// Reference Rails-style decoder for `application/x-www-form-urlencoded`.
    fn decode(form: &str) -> Value {
        let mut root = json!({});
        for (key, value) in form_urlencoded::parse(form.as_bytes()) {
            let (base, segs) = parse_key(&key);
            let map = root.as_object_mut().unwrap();
            let slot = map.entry(base).or_insert(Value::Null);
            insert(slot, &segs, value.into_owned());
        }
        root
    }

    /// Wire encoding is textual, so compare against a stringified copy.
    fn stringify(value: &Value) -> Value {
        match value {
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Array(items) => Value::Array(items.iter().map(stringify).collect()),
            Value::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), stringify(v))).collect(),
            ),
            other => other.clone(),
        }
    }

    #[test]
    fn test_scalar_encoding() {
        let params = Params::new()
            .set("title", "a b&c")
            .set("confidential", true)
            .set("weight", 3)
            .set("milestone_id", Value::Null);
        assert_eq!(
            params.to_pairs(),
            vec![
                ("confidential".to_string(), "true".to_string()),
                ("title".to_string(), "a b&c".to_string()),
                ("weight".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(params.to_form(), "confidential=true&title=a+b%26c&weight=3");
    }

    #[test]
    fn test_nested_pairs() {
        let params: Params = json!({
            "labels": ["bug", "ui"],
            "author": {"id": 5, "name": "root"},
            "actions": [{"action": "create", "file_path": "a.txt"}]
        })
        .try_into()
        .unwrap();
        assert_eq!(
            params.to_pairs(),
            vec![
                ("actions[][action]".to_string(), "create".to_string()),
                ("actions[][file_path]".to_string(), "a.txt".to_string()),
                ("author[id]".to_string(), "5".to_string()),
                ("author[name]".to_string(), "root".to_string()),
                ("labels[]".to_string(), "bug".to_string()),
                ("labels[]".to_string(), "ui".to_string()),
            ]
        );
    }

    #[test]
    fn test_nested_round_trip() {
        let original = json!({
            "name": "gitlab3 client",
            "visibility_level": 20,
            "tags": ["rust", "api", "v3"],
            "import": {"url": "https://example.com/x.git", "mirror": false},
            "files": [
                {"path": "README.md", "mode": "100644"},
                {"path": "src/lib.rs", "mode": "100644"}
            ],
            "matrix": {"rows": ["a", "b"], "meta": {"depth": 2}}
        });
        let params = Params::try_from(original.clone()).unwrap();

        assert_eq!(decode(&params.to_form()), stringify(&original));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = Params::try_from(json!(["page", 1])).unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct NewLabel<'a> {
            name: &'a str,
            color: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<&'a str>,
        }

        let params = Params::from_serialize(&NewLabel {
            name: "bug",
            color: "#ff0000",
            description: None,
        })
        .unwrap();
        assert_eq!(params.to_form(), "color=%23ff0000&name=bug");
        assert!(Params::from_serialize(&vec![1, 2]).is_err());
    }

    #[test]
    fn test_get_u32_accepts_strings() {
        let params = Params::new().set("per_page", "50").set("page", 3);
        assert_eq!(params.get_u32("per_page"), Some(50));
        assert_eq!(params.get_u32("page"), Some(3));
        assert_eq!(params.get_u32("missing"), None);
    }

    #[test]
    fn test_merged_leaves_original_untouched() {
        let base = Params::new().set("per_page", 2);
        let paged = base.merged("page", 4);
        assert!(!base.contains("page"));
        assert_eq!(paged.get_u32("page"), Some(4));
    }
}
