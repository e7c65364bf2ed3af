//! A named, executable unit: identity plus an owned parser.
//!
//! A command is constructed once, registered into an application, parsed
//! once per invocation, then executed. The built-in `-h|--help`,
//! `-v|--version` and `-V|--verbosity` options are installed at
//! construction; `-V` is a repeatable counter.

use std::io::Write;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;
use crate::help;
use crate::io::Io;
use crate::param::{Arg, Opt};
use crate::parser::{EventOutcome, Handler, ParseOutcome, Parser};
use crate::values::Values;

/// The execute step. The returned integer becomes the process exit code.
pub type Action = Box<dyn FnMut(&Command, &mut Io) -> anyhow::Result<i32>>;

/// The interact step, run after a successful parse and before execute to
/// collect missing input through the IO seam.
pub type InteractFn = Box<dyn FnMut(&mut Values, &mut Io) -> anyhow::Result<()>>;

pub struct Command {
    name: String,
    description: String,
    usage: String,
    alias: String,
    parser: Parser,
    action: Option<Action>,
    interact: Option<InteractFn>,
}

impl Command {
    pub fn new(name: &str, description: &str) -> Self {
        let mut parser = Parser::new();
        parser.install_builtin(Opt::new("-h|--help", "Show help"), Handler::ShowHelp);
        parser.install_builtin(Opt::new("-v|--version", "Show version"), Handler::ShowVersion);
        parser.install_builtin(
            Opt::new("-V|--verbosity", "Verbosity level").default_value(Value::from(0)),
            Handler::CountVerbosity,
        );

        Self {
            name: name.to_string(),
            description: description.to_string(),
            usage: String::new(),
            alias: String::new(),
            parser,
            action: None,
            interact: None,
        }
    }

    pub fn version(mut self, version: &str) -> Self {
        self.parser.set_version(version);
        self
    }

    /// Free-form usage text appended to the generated help.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    /// Tolerate unregistered options, capturing them dynamically under
    /// their camelCase attribute name.
    pub fn allow_unknown(mut self, allow: bool) -> Self {
        self.parser.set_allow_unknown(allow);
        self
    }

    /// Add a plain option from its raw declaration.
    pub fn option(self, raw: &str, description: &str) -> Result<Self> {
        self.add_opt(Opt::new(raw, description))
    }

    pub fn add_opt(mut self, opt: Opt) -> Result<Self> {
        self.parser.add_opt(opt)?;
        Ok(self)
    }

    /// Add a plain positional argument from its raw declaration.
    pub fn argument(self, raw: &str, description: &str) -> Result<Self> {
        self.add_arg(Arg::new(raw, description))
    }

    pub fn add_arg(mut self, arg: Arg) -> Result<Self> {
        self.parser.add_arg(arg)?;
        Ok(self)
    }

    /// Attach a callback to the most recently added option. Returning
    /// `Suppressed` skips auto-binding for that occurrence.
    pub fn on<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut Values, Option<&str>) -> EventOutcome + 'static,
    {
        if let Some(key) = self.parser.last_option_key() {
            self.parser.add_event(&key, Handler::Custom(Box::new(callback)));
        }
        self
    }

    /// Attach a callback to a named option (camelCase attribute name).
    pub fn on_option<F>(mut self, name: &str, callback: F) -> Self
    where
        F: FnMut(&mut Values, Option<&str>) -> EventOutcome + 'static,
    {
        self.parser.add_event(name, Handler::Custom(Box::new(callback)));
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&Command, &mut Io) -> anyhow::Result<i32> + 'static,
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn interact<F>(mut self, interact: F) -> Self
    where
        F: FnMut(&mut Values, &mut Io) -> anyhow::Result<()> + 'static,
    {
        self.interact = Some(Box::new(interact));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn get_usage(&self) -> &str {
        &self.usage
    }

    pub fn get_alias(&self) -> &str {
        &self.alias
    }

    pub fn get_version(&self) -> &str {
        self.parser.version()
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Parse a raw argument vector; element 0 is the program name.
    pub fn parse(&mut self, argv: &[String]) -> Result<ParseOutcome> {
        self.parser.parse(argv)
    }

    /// A bound value by camelCase attribute name.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.parser.value(name)
    }

    pub fn values(&self) -> IndexMap<String, Value> {
        self.parser.values()
    }

    pub fn user_values(&self) -> IndexMap<String, Value> {
        self.parser.user_values()
    }

    pub fn args(&self) -> IndexMap<String, Value> {
        self.parser.args()
    }

    pub fn rest(&self) -> &[Value] {
        self.parser.rest()
    }

    pub fn show_help(&self, out: &mut dyn Write) -> std::io::Result<()> {
        help::command_help(out, self)
    }

    pub fn show_version(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}, {}", self.name, self.parser.version())
    }

    pub(crate) fn inherit_version(&mut self, version: &str) {
        if self.parser.version().is_empty() {
            self.parser.set_version(version);
        }
    }

    pub(crate) fn run_interact(&mut self, io: &mut Io) -> anyhow::Result<()> {
        let Some(mut interact) = self.interact.take() else {
            return Ok(());
        };
        let result = interact(self.parser.values_mut(), io);
        self.interact = Some(interact);
        result
    }

    pub(crate) fn execute(&mut self, io: &mut Io) -> anyhow::Result<i32> {
        let Some(mut action) = self.action.take() else {
            return Ok(0);
        };
        let result = action(&*self, io);
        self.action = Some(action);
        result
    }
}
