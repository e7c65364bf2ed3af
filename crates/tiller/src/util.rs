//! Token normalization and the string helpers shared across the input
//! pipeline.

use serde_json::Value;

use crate::param::Param;

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Derive the camelCase attribute name under which a parameter's value is
/// stored (`--foo-bar` becomes `fooBar`). Dashes, underscores and
/// whitespace are word boundaries; the leading character is lowercased.
pub fn to_camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut boundary = false;
    for c in raw.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            boundary = true;
            continue;
        }
        if boundary && !out.is_empty() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        boundary = false;
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => out,
    }
}

/// Split compact argv forms into canonical single tokens:
///
/// - `-x=value` splits on every `=` into `-x`, `value`, ...
/// - `-abc` (two or more word characters after a single dash) splits into
///   `-a`, `-b`, `-c`, which is what makes `-VVV` a repeatable counter
/// - `--long=value` splits on every `=`
///
/// Everything else passes through untouched. Order is preserved exactly;
/// no token is dropped or duplicated.
pub fn normalize_args(args: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(args.len());

    for arg in args {
        let mut chars = arg.chars();
        let lead = chars.next();
        let second = chars.next();
        let third = chars.next();

        if lead == Some('-') && second.is_some_and(is_word) && third == Some('=') {
            normalized.extend(arg.split('=').map(str::to_string));
        } else if lead == Some('-') && second.is_some_and(is_word) && third.is_some_and(is_word) {
            for c in arg.trim_start_matches('-').chars() {
                normalized.push(format!("-{c}"));
            }
        } else if let Some(rest) = arg.strip_prefix("--") {
            match rest.find('=') {
                Some(eq) if eq > 0 && !rest[..eq].contains(char::is_whitespace) => {
                    normalized.extend(arg.split('=').map(str::to_string));
                }
                _ => normalized.push(arg.clone()),
            }
        } else {
            normalized.push(arg.clone());
        }
    }

    normalized
}

/// Normalize a candidate value for a parameter before binding:
///
/// - a boolean-style option ignores the textual value and binds the
///   negation of its configured default
/// - a variadic parameter wraps the value as a one-element sequence
///   (accumulation happens in the value store)
/// - an absent value binds `Null` for required parameters (deferring the
///   failure to validation) and `true` otherwise
/// - anything else runs through the parameter's filter
pub fn normalize_value(param: &dyn Param, value: Option<&str>) -> Value {
    if param.is_bool() {
        return Value::Bool(!param.default().as_bool().unwrap_or(false));
    }

    if param.is_variadic() {
        return match value {
            Some(v) => Value::Array(vec![Value::String(v.to_string())]),
            None => Value::Array(Vec::new()),
        };
    }

    match value {
        None if param.is_required() => Value::Null,
        None => Value::Bool(true),
        Some(v) => param.filter_value(v),
    }
}

/// Edit distance between two strings, used for command suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let substitution = if ca == *cb { prev } else { prev + 1 };
            prev = row[j + 1];
            row[j + 1] = substitution.min(prev + 1).min(row[j] + 1);
        }
    }

    row[b_chars.len()]
}
