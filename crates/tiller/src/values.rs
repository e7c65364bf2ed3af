//! The bound-value store shared by options and positional arguments.

use indexmap::IndexMap;
use serde_json::Value;

use crate::param::sequence;

/// Keys owned by the built-in options, excluded from the user-facing view.
pub(crate) const BUILTIN_KEYS: [&str; 3] = ["help", "version", "verbosity"];

/// Parsed values indexed by camelCase attribute name, plus the synthetic
/// positional entries collected for tokens no declared argument claimed.
#[derive(Debug, Default)]
pub struct Values {
    named: IndexMap<String, Value>,
    rest: Vec<Value>,
}

impl Values {
    /// The single mutation primitive.
    ///
    /// A `None` key appends a synthetic positional entry; a variadic bind
    /// merges the sequence-coerced value onto the existing entry;
    /// everything else overwrites. Returns whether the bound value is
    /// meaningful, i.e. not one of `true`/`false`/`null`.
    pub fn set(&mut self, key: Option<&str>, value: Value, variadic: bool) -> bool {
        let meaningful = !matches!(value, Value::Null | Value::Bool(_));

        match key {
            None => self.rest.push(value),
            Some(key) if variadic => {
                let entry = self
                    .named
                    .entry(key.to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !entry.is_array() {
                    *entry = Value::Array(Vec::new());
                }
                if let Value::Array(items) = entry {
                    items.extend(sequence(value));
                }
            }
            Some(key) => {
                self.named.insert(key.to_string(), value);
            }
        }

        meaningful
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// String view of a bound value, handy in actions and interact hooks.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Synthetic positional entries in arrival order.
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    pub(crate) fn named(&self) -> &IndexMap<String, Value> {
        &self.named
    }

    /// Whether any entry carries real evidence of user input. Bools,
    /// nulls, empty strings, empty sequences, a zero and the built-in keys
    /// do not count.
    pub(crate) fn has_meaningful(&self) -> bool {
        self.rest.iter().any(is_meaningful)
            || self.named.iter().any(|(key, value)| {
                !BUILTIN_KEYS.contains(&key.as_str()) && is_meaningful(value)
            })
    }
}

fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Object(_) => true,
    }
}
