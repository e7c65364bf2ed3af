//! The token-scanning state machine at the center of the framework.
//!
//! A parser is created by its command, mutated only during `parse()`, and
//! read afterward through accessors. It is single use: one instance per
//! invocation.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, ParamKind, Result};
use crate::param::{Arg, Opt, Param};
use crate::util;
use crate::values::{Values, BUILTIN_KEYS};

/// How a completed scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every token was consumed and validation passed.
    Complete,
    /// A help request aborted the scan: an explicit `-h|--help`, or the
    /// unknown-option downgrade when no real values were collected yet.
    Help,
    /// `-v|--version` aborted the scan.
    Version,
}

/// Signal returned by a user option callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Bind the value as usual after the callback.
    Bound,
    /// The callback did its own bookkeeping; skip auto-binding for this
    /// occurrence.
    Suppressed,
}

pub(crate) type EventFn = Box<dyn FnMut(&mut Values, Option<&str>) -> EventOutcome>;

/// Per-option handlers fired when the option token is matched.
pub(crate) enum Handler {
    ShowHelp,
    ShowVersion,
    CountVerbosity,
    Custom(EventFn),
}

/// Whether an option token consumed its lookahead, or aborted the scan.
enum OptionFlow {
    Consumed,
    Kept,
    Halt(ParseOutcome),
}

pub struct Parser {
    options: IndexMap<String, Opt>,
    arguments: IndexMap<String, Arg>,
    values: Values,
    events: IndexMap<String, Handler>,
    last_variadic: Option<String>,
    allow_unknown: bool,
    has_variadic_arg: bool,
    version: String,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Self {
            options: IndexMap::new(),
            arguments: IndexMap::new(),
            values: Values::default(),
            events: IndexMap::new(),
            last_variadic: None,
            allow_unknown: false,
            has_variadic_arg: false,
            version: String::new(),
        }
    }

    /// Register an option. Its attribute name must be unique across the
    /// shared option/argument namespace.
    pub(crate) fn add_opt(&mut self, opt: Opt) -> Result<()> {
        let attr = opt.attribute_name();
        if self.values.contains(&attr) {
            return Err(Error::DuplicateParameter {
                kind: ParamKind::Option,
                name: opt.long().to_string(),
            });
        }
        self.values.set(Some(&attr), opt.default(), false);
        self.options.insert(attr, opt);
        Ok(())
    }

    /// Register a positional argument. Only the last one may be variadic.
    pub(crate) fn add_arg(&mut self, arg: Arg) -> Result<()> {
        if self.has_variadic_arg {
            return Err(Error::VariadicArgPosition);
        }
        let attr = arg.attribute_name();
        if self.values.contains(&attr) {
            return Err(Error::DuplicateParameter {
                kind: ParamKind::Argument,
                name: arg.name().to_string(),
            });
        }
        if arg.is_variadic() {
            self.has_variadic_arg = true;
        }
        self.values.set(Some(&attr), arg.default(), false);
        self.arguments.insert(attr, arg);
        Ok(())
    }

    /// Install a built-in option, bypassing the duplicate check a fresh
    /// parser cannot fail.
    pub(crate) fn install_builtin(&mut self, opt: Opt, handler: Handler) {
        let attr = opt.attribute_name();
        self.events.insert(attr.clone(), handler);
        self.values.set(Some(&attr), opt.default(), false);
        self.options.insert(attr, opt);
    }

    pub(crate) fn add_event(&mut self, name: &str, handler: Handler) {
        self.events.insert(name.to_string(), handler);
    }

    pub(crate) fn last_option_key(&self) -> Option<String> {
        self.options.last().map(|(key, _)| key.clone())
    }

    pub(crate) fn set_allow_unknown(&mut self, allow: bool) {
        self.allow_unknown = allow;
    }

    pub(crate) fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Scan a raw argument vector. Element 0 is the program name and is
    /// dropped before normalization.
    pub fn parse(&mut self, argv: &[String]) -> Result<ParseOutcome> {
        let tokens = util::normalize_args(argv.get(1..).unwrap_or_default());
        tracing::debug!(tokens = tokens.len(), "scanning normalized tokens");

        let mut literal = false;
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i].as_str();
            if token == "--" {
                literal = true;
            } else if !token.starts_with('-') || literal {
                self.parse_argument(token);
            } else {
                let next = tokens.get(i + 1).map(String::as_str);
                match self.parse_options(token, next)? {
                    OptionFlow::Consumed => i += 1,
                    OptionFlow::Kept => {}
                    OptionFlow::Halt(outcome) => return Ok(outcome),
                }
            }
            i += 1;
        }

        self.validate()?;
        Ok(ParseOutcome::Complete)
    }

    /// Bind a positional token: to the absorbing variadic option if one is
    /// active, else to the first pending declared argument, else to the
    /// synthetic positional list.
    fn parse_argument(&mut self, token: &str) {
        if let Some(name) = self.last_variadic.clone() {
            self.values
                .set(Some(&name), Value::String(token.to_string()), true);
            return;
        }

        let Some((_, argument)) = self.arguments.get_index(0) else {
            self.values.set(None, Value::String(token.to_string()), false);
            return;
        };

        let attr = argument.attribute_name();
        let value = util::normalize_value(argument, Some(token));
        let variadic = argument.is_variadic();
        self.values.set(Some(&attr), value, variadic);

        // A variadic argument keeps matching; anything else would collect
        // the same argument again.
        if !variadic {
            self.arguments.shift_remove_index(0);
        }
    }

    /// Match an option token, fire its handler, bind the value. The
    /// lookahead is a candidate value only when it does not itself start
    /// with a dash.
    fn parse_options(&mut self, token: &str, next: Option<&str>) -> Result<OptionFlow> {
        let value = next.filter(|v| !v.starts_with('-'));

        let Some(matched) = self.options.values().find(|opt| opt.is(token)) else {
            return self.handle_unknown(token, value);
        };
        let attr = matched.attribute_name();
        let normalized = util::normalize_value(matched, value);
        let variadic = matched.is_variadic();

        self.last_variadic = variadic.then(|| attr.clone());

        if let Some(handler) = self.events.get_mut(&attr) {
            match handler {
                Handler::ShowHelp => return Ok(OptionFlow::Halt(ParseOutcome::Help)),
                Handler::ShowVersion => return Ok(OptionFlow::Halt(ParseOutcome::Version)),
                Handler::CountVerbosity => {
                    let count = self
                        .values
                        .get("verbosity")
                        .and_then(Value::as_u64)
                        .unwrap_or(0);
                    self.values
                        .set(Some("verbosity"), Value::from(count + 1), false);
                    return Ok(OptionFlow::Kept);
                }
                Handler::Custom(callback) => {
                    if callback(&mut self.values, value) == EventOutcome::Suppressed {
                        return Ok(OptionFlow::Kept);
                    }
                }
            }
        }

        Ok(if self.values.set(Some(&attr), normalized, variadic) {
            OptionFlow::Consumed
        } else {
            OptionFlow::Kept
        })
    }

    /// Unregistered option token. Capture it dynamically when allowed;
    /// otherwise a typo next to real input is an error, while a bare or
    /// input-free invocation reads as a help request.
    fn handle_unknown(&mut self, token: &str, value: Option<&str>) -> Result<OptionFlow> {
        if self.allow_unknown {
            let captured = match value {
                Some(v) => Value::String(v.to_string()),
                None => Value::Null,
            };
            let meaningful = self
                .values
                .set(Some(&util::to_camel_case(token)), captured, false);
            return Ok(if meaningful {
                OptionFlow::Consumed
            } else {
                OptionFlow::Kept
            });
        }

        if self.values.has_meaningful() {
            return Err(Error::UnknownOption(token.to_string()));
        }

        Ok(OptionFlow::Halt(ParseOutcome::Help))
    }

    /// Post-scan check: every required option, then argument, must hold a
    /// value that is neither null nor an empty sequence. Only the first
    /// violation is surfaced.
    fn validate(&self) -> Result<()> {
        for opt in self.options.values() {
            if opt.is_required() && is_missing(self.values.get(&opt.attribute_name())) {
                return Err(Error::MissingRequired {
                    kind: ParamKind::Option,
                    name: opt.long().to_string(),
                });
            }
        }
        for arg in self.arguments.values() {
            if arg.is_required() && is_missing(self.values.get(&arg.attribute_name())) {
                return Err(Error::MissingRequired {
                    kind: ParamKind::Argument,
                    name: arg.name().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn options(&self) -> impl Iterator<Item = &Opt> {
        self.options.values()
    }

    /// Declared arguments still pending. Non-variadic arguments leave the
    /// queue once filled.
    pub fn arguments(&self) -> impl Iterator<Item = &Arg> {
        self.arguments.values()
    }

    /// A bound value by camelCase attribute name. The synthetic `version`
    /// entry reflects the configured version string.
    pub fn value(&self, name: &str) -> Option<Value> {
        if name == "version" {
            return Some(Value::String(self.version.clone()));
        }
        self.values.get(name).cloned()
    }

    /// Every bound value plus the synthetic `version` entry.
    pub fn values(&self) -> IndexMap<String, Value> {
        let mut values = self.values.named().clone();
        values.insert("version".to_string(), Value::String(self.version.clone()));
        values
    }

    /// The bound values without the built-in `help`/`version`/`verbosity`
    /// entries.
    pub fn user_values(&self) -> IndexMap<String, Value> {
        let mut values = self.values.named().clone();
        for key in BUILTIN_KEYS {
            values.shift_remove(key);
        }
        values
    }

    /// Values that did not bind to a registered option: declared argument
    /// values and dynamically captured unknowns.
    pub fn args(&self) -> IndexMap<String, Value> {
        self.values
            .named()
            .iter()
            .filter(|(key, _)| !self.options.contains_key(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Positional tokens no declared argument claimed.
    pub fn rest(&self) -> &[Value] {
        self.values.rest()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Values {
        &mut self.values
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}
