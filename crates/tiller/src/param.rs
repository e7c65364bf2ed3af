//! Declared parameters: flag-style options and positional arguments.
//!
//! Both variants are built from a raw declaration string. Options use
//! `"-p|--port"` (separators `|`, whitespace, `,`); arguments use `"name"`
//! or `"name:default"`, where `+` inside the declaration decodes to a
//! space.

use serde_json::Value;

use crate::util;

/// Value filter applied once per raw token bound to a parameter.
pub type FilterFn = Box<dyn Fn(&str) -> Value>;

/// Capabilities shared by options and positional arguments.
pub trait Param {
    fn name(&self) -> &str;
    fn raw(&self) -> &str;
    fn description(&self) -> &str;
    /// The configured default. Variadic parameters always surface a
    /// sequence, wrapping a scalar default as a one-element array.
    fn default(&self) -> Value;
    fn is_required(&self) -> bool;
    fn is_variadic(&self) -> bool;
    /// Whether presence alone flips a boolean default (options declared
    /// with `-with-` or `-no-`).
    fn is_bool(&self) -> bool {
        false
    }
    /// Run the declared filter over a raw token, identity into a string
    /// when none is set.
    fn filter_value(&self, raw: &str) -> Value;
    /// camelCase key under which the bound value is stored.
    fn attribute_name(&self) -> String {
        util::to_camel_case(self.name())
    }
}

struct ParamCore {
    raw: String,
    name: String,
    description: String,
    default: Value,
    required: bool,
    variadic: bool,
    filter: Option<FilterFn>,
}

impl ParamCore {
    fn new(raw: &str, name: String, description: &str, default: Value) -> Self {
        Self {
            raw: raw.to_string(),
            name,
            description: description.to_string(),
            default,
            required: false,
            variadic: false,
            filter: None,
        }
    }

    fn default_for(&self, variadic: bool) -> Value {
        if variadic {
            Value::Array(sequence(self.default.clone()))
        } else {
            self.default.clone()
        }
    }

    fn filter_value(&self, raw: &str) -> Value {
        match &self.filter {
            Some(filter) => filter(raw),
            None => Value::String(raw.to_string()),
        }
    }
}

/// `(array)` coercion: null becomes empty, sequences stay, scalars wrap.
pub(crate) fn sequence(value: Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// A named, flag-style parameter (`-p`, `--port`), optionally carrying a
/// value.
pub struct Opt {
    core: ParamCore,
    short: String,
    long: String,
}

impl Opt {
    /// Declare an option from a raw form like `"-p|--port"`,
    /// `"--with-color"` or `"--no-cache"`.
    ///
    /// The first part becomes the short form, the second the long form; a
    /// single-form declaration reports that form for both. A `-with-`
    /// declaration defaults to `false`, a `-no-` declaration to `true`.
    pub fn new(raw: &str, description: &str) -> Self {
        let default = if raw.contains("-with-") {
            Value::Bool(false)
        } else if raw.contains("-no-") {
            Value::Bool(true)
        } else {
            Value::Null
        };

        let parts: Vec<&str> = raw
            .split(|c: char| c.is_whitespace() || c == ',' || c == '|')
            .filter(|part| !part.is_empty())
            .collect();
        let short = parts.first().copied().unwrap_or(raw).to_string();
        let long = parts
            .get(1)
            .copied()
            .map(str::to_string)
            .unwrap_or_else(|| short.clone());

        let name = long.replace("--", "").replace("no-", "").replace("with-", "");

        Self {
            core: ParamCore::new(raw, name, description, default),
            short,
            long,
        }
    }

    /// Set the default value. Declaration-derived boolean defaults win:
    /// this is a no-op for `-with-`/`-no-` options.
    pub fn default_value(mut self, default: Value) -> Self {
        if !self.is_bool() {
            self.core.default = default;
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.core.required = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.core.variadic = true;
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> Value + 'static,
    {
        self.core.filter = Some(Box::new(filter));
        self
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn long(&self) -> &str {
        &self.long
    }

    /// Whether the given argv token selects this option (exact match
    /// against the short or long form).
    pub fn is(&self, token: &str) -> bool {
        self.short == token || self.long == token
    }
}

impl Param for Opt {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn raw(&self) -> &str {
        &self.core.raw
    }

    fn description(&self) -> &str {
        &self.core.description
    }

    fn default(&self) -> Value {
        self.core.default_for(self.core.variadic)
    }

    fn is_required(&self) -> bool {
        self.core.required
    }

    fn is_variadic(&self) -> bool {
        self.core.variadic
    }

    fn is_bool(&self) -> bool {
        self.long.contains("-no-") || self.long.contains("-with-")
    }

    fn filter_value(&self, raw: &str) -> Value {
        self.core.filter_value(raw)
    }
}

/// A positional parameter, bound by declaration order.
pub struct Arg {
    core: ParamCore,
}

impl Arg {
    /// Declare an argument from `"name"` or `"name:default"`; `+` inside
    /// the declaration decodes to a space, so `"dir:tmp+45"` defaults to
    /// `"tmp 45"`.
    pub fn new(raw: &str, description: &str) -> Self {
        let mut name = raw.to_string();
        let mut default = Value::Null;

        if raw.contains(':') {
            let decoded = raw.replace('+', " ");
            if let Some((head, tail)) = decoded.split_once(':') {
                name = head.to_string();
                default = Value::String(tail.to_string());
            }
        }

        Self {
            core: ParamCore::new(raw, name, description, default),
        }
    }

    /// Set the default value. A declaration-supplied default wins.
    pub fn default_value(mut self, default: Value) -> Self {
        if self.core.default.is_null() {
            self.core.default = default;
            self.prepare_default();
        }
        self
    }

    pub fn required(mut self) -> Self {
        self.core.required = true;
        self
    }

    /// Mark the argument variadic. A string default containing a comma
    /// splits once into a two-entry default sequence.
    pub fn variadic(mut self) -> Self {
        self.core.variadic = true;
        self.prepare_default();
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> Value + 'static,
    {
        self.core.filter = Some(Box::new(filter));
        self
    }

    fn prepare_default(&mut self) {
        if !self.core.variadic {
            return;
        }
        if let Value::String(s) = &self.core.default {
            if let Some((head, tail)) = s.split_once(',') {
                self.core.default = Value::Array(vec![
                    Value::String(head.to_string()),
                    Value::String(tail.to_string()),
                ]);
            }
        }
    }
}

impl Param for Arg {
    fn name(&self) -> &str {
        &self.core.name
    }

    fn raw(&self) -> &str {
        &self.core.raw
    }

    fn description(&self) -> &str {
        &self.core.description
    }

    fn default(&self) -> Value {
        self.core.default_for(self.core.variadic)
    }

    fn is_required(&self) -> bool {
        self.core.required
    }

    fn is_variadic(&self) -> bool {
        self.core.variadic
    }

    fn filter_value(&self, raw: &str) -> Value {
        self.core.filter_value(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_short_and_long_forms() {
        let opt = Opt::new("-x|--long", "");
        assert_eq!(opt.short(), "-x");
        assert_eq!(opt.long(), "--long");
        assert!(opt.is("-x"));
        assert!(opt.is("--long"));
        assert!(!opt.is("--other"));
    }

    #[test]
    fn option_single_form_reports_both() {
        let opt = Opt::new("--port", "");
        assert_eq!(opt.short(), "--port");
        assert_eq!(opt.long(), "--port");
        assert_eq!(opt.name(), "port");
        assert_eq!(opt.attribute_name(), "port");
    }

    #[test]
    fn option_separators() {
        for raw in ["-p|--port", "-p --port", "-p,--port"] {
            let opt = Opt::new(raw, "");
            assert_eq!(opt.short(), "-p", "raw: {raw}");
            assert_eq!(opt.long(), "--port", "raw: {raw}");
        }
    }

    #[test]
    fn option_name_strips_boolean_markers() {
        let with = Opt::new("--with-foo", "");
        assert_eq!(with.name(), "foo");
        assert!(with.is_bool());
        assert_eq!(with.default(), json!(false));

        let no = Opt::new("--no-foo", "");
        assert_eq!(no.name(), "foo");
        assert!(no.is_bool());
        assert_eq!(no.default(), json!(true));
    }

    #[test]
    fn boolean_default_is_not_overridable() {
        let opt = Opt::new("--with-color", "").default_value(json!("red"));
        assert_eq!(opt.default(), json!(false));
    }

    #[test]
    fn option_attribute_name_is_camel_case() {
        let opt = Opt::new("-e|--exec-dir", "");
        assert_eq!(opt.name(), "exec-dir");
        assert_eq!(opt.attribute_name(), "execDir");
    }

    #[test]
    fn variadic_option_default_wraps_scalar() {
        let opt = Opt::new("-p", "").default_value(json!(34)).variadic();
        assert_eq!(opt.default(), json!([34]));
    }

    #[test]
    fn option_filter() {
        let opt = Opt::new("-p", "").filter(|raw| json!(raw.len()));
        assert_eq!(opt.filter_value("foo"), json!(3));

        let plain = Opt::new("-p", "");
        assert_eq!(plain.filter_value("foo"), json!("foo"));
    }

    #[test]
    fn argument_with_default() {
        let arg = Arg::new("dir:tmp", "");
        assert_eq!(arg.name(), "dir");
        assert_eq!(arg.default(), json!("tmp"));
    }

    #[test]
    fn argument_plus_decodes_to_space() {
        let arg = Arg::new("dir:tmp+45", "");
        assert_eq!(arg.default(), json!("tmp 45"));
    }

    #[test]
    fn variadic_argument_comma_default_splits() {
        let arg = Arg::new("dir:tmp+45,tmp+90", "").variadic();
        assert_eq!(arg.name(), "dir");
        assert_eq!(arg.default(), json!(["tmp 45", "tmp 90"]));
    }

    #[test]
    fn variadic_argument_default_wraps_scalar() {
        let arg = Arg::new("files", "").default_value(json!("file1")).variadic();
        assert_eq!(arg.default(), json!(["file1"]));
    }

    #[test]
    fn plain_argument_has_no_default() {
        let arg = Arg::new("file", "");
        assert_eq!(arg.default(), Value::Null);
        assert!(!arg.is_required());
        assert!(!arg.is_variadic());
    }
}
