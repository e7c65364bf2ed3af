//! The application: command registry, alias resolution and dispatch.
//!
//! The registry is mutated only during setup and read-only within a
//! dispatch. The library never exits the process; `handle` returns the
//! exit code and the hosting binary decides what to do with it.

use indexmap::IndexMap;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::help;
use crate::io::Io;
use crate::parser::ParseOutcome;

/// Name of the synthetic fallback command selected when no argv token
/// matches a registered command or alias.
pub(crate) const DEFAULT_COMMAND: &str = "__default__";

pub struct Application {
    name: String,
    version: String,
    logo: String,
    commands: IndexMap<String, Command>,
    aliases: IndexMap<String, String>,
    default: String,
    io: Io,
}

impl Application {
    pub fn new(name: &str, version: &str) -> Self {
        let mut commands = IndexMap::new();
        commands.insert(
            DEFAULT_COMMAND.to_string(),
            Command::new(DEFAULT_COMMAND, "Default command")
                .allow_unknown(true)
                .version(version),
        );

        Self {
            name: name.to_string(),
            version: version.to_string(),
            logo: String::new(),
            commands,
            aliases: IndexMap::new(),
            default: DEFAULT_COMMAND.to_string(),
            io: Io::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// ASCII art shown at the top of the application help.
    pub fn set_logo(&mut self, logo: &str) {
        self.logo = logo.to_string();
    }

    pub fn set_io(&mut self, io: Io) {
        self.io = io;
    }

    pub fn io(&mut self) -> &mut Io {
        &mut self.io
    }

    /// Registered commands, the synthetic fallback excluded.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands
            .values()
            .filter(|command| command.name() != DEFAULT_COMMAND)
    }

    /// Register a command. Its name and alias must be unique across both
    /// the command-name space and the alias space.
    pub fn add(&mut self, command: Command) -> Result<()> {
        self.register(command, false)
    }

    /// Register a command and make it the fallback for unmatched argv.
    pub fn add_default(&mut self, command: Command) -> Result<()> {
        self.register(command, true)
    }

    fn register(&mut self, mut command: Command, default: bool) -> Result<()> {
        let name = command.name().to_string();
        let alias = command.get_alias().to_string();

        let collides = self.commands.contains_key(&name)
            || self.aliases.contains_key(&name)
            || (!alias.is_empty()
                && (self.commands.contains_key(&alias) || self.aliases.contains_key(&alias)));
        if collides {
            return Err(Error::DuplicateCommand(name));
        }

        if !alias.is_empty() {
            self.aliases.insert(alias, name.clone());
        }
        if default {
            self.default = name.clone();
        }

        command.inherit_version(&self.version);
        self.commands.insert(name, command);
        Ok(())
    }

    /// Name of the command that should handle the given argv: `argv[1]`
    /// matched against command names, then aliases, else the fallback.
    pub fn resolve(&self, argv: &[String]) -> &str {
        let selector = argv.get(1).map(String::as_str).unwrap_or_default();

        if let Some((name, _)) = self.commands.get_key_value(selector) {
            return name;
        }
        if let Some(target) = self.aliases.get(selector) {
            if let Some((name, _)) = self.commands.get_key_value(target.as_str()) {
                return name;
            }
        }
        &self.default
    }

    /// Run the full dispatch pipeline and return the process exit code.
    pub fn handle(&mut self, argv: &[String]) -> i32 {
        if argv.len() < 2 {
            let _ = self.show_help();
            return 0;
        }

        match self.dispatch(argv) {
            Ok(code) => code,
            Err(err) => {
                if let Some(domain) = err.downcast_ref::<Error>() {
                    let _ = self.io.error_line(&domain.to_string());
                } else {
                    let _ = self.io.error_line(&format!("{err:?}"));
                }
                255
            }
        }
    }

    fn dispatch(&mut self, argv: &[String]) -> anyhow::Result<i32> {
        let name = self.resolve(argv).to_string();
        tracing::debug!(command = %name, "dispatching");

        let selectors = self.selectors_for(&name);
        let stripped = strip_selector(argv, &selectors);

        let outcome = match self.commands.get_mut(&name) {
            Some(command) => command.parse(&stripped)?,
            None => anyhow::bail!("no command registered under \"{name}\""),
        };

        match outcome {
            ParseOutcome::Help => {
                if name == DEFAULT_COMMAND {
                    self.show_help()?;
                } else if let Some(command) = self.commands.get(&name) {
                    help::command_help(self.io.out_mut(), command)?;
                }
                Ok(0)
            }
            ParseOutcome::Version => {
                if name == DEFAULT_COMMAND {
                    let line = format!("{}, {}", self.name, self.version);
                    self.io.write_line(&line)?;
                } else if let Some(command) = self.commands.get(&name) {
                    command.show_version(self.io.out_mut())?;
                }
                Ok(0)
            }
            ParseOutcome::Complete => {
                if name == DEFAULT_COMMAND {
                    return self.command_not_found(argv);
                }
                match self.commands.get_mut(&name) {
                    Some(command) => {
                        command.run_interact(&mut self.io)?;
                        let code = command.execute(&mut self.io)?;
                        Ok(code)
                    }
                    None => anyhow::bail!("no command registered under \"{name}\""),
                }
            }
        }
    }

    /// Application-level help: identity header and the command list.
    pub fn show_help(&mut self) -> std::io::Result<()> {
        let commands = self
            .commands
            .values()
            .filter(|command| command.name() != DEFAULT_COMMAND);
        help::application_help(
            self.io.out_mut(),
            &self.name,
            &self.version,
            &self.logo,
            commands,
        )
    }

    fn command_not_found(&mut self, argv: &[String]) -> anyhow::Result<i32> {
        let attempted = argv.get(1).map(String::as_str).unwrap_or_default();
        let mut available: Vec<String> = self
            .commands
            .keys()
            .filter(|key| key.as_str() != DEFAULT_COMMAND)
            .cloned()
            .collect();
        available.extend(self.aliases.keys().cloned());

        help::command_not_found(self.io.err_mut(), attempted, &available)?;
        Ok(127)
    }

    /// Every selector string associated with a command: its own name plus
    /// both sides of any alias pair involving it.
    fn selectors_for(&self, name: &str) -> Vec<String> {
        let mut selectors = vec![name.to_string()];
        for (alias, target) in &self.aliases {
            if alias == name || target == name {
                selectors.push(alias.clone());
                selectors.push(target.clone());
            }
        }
        selectors
    }
}

/// Drop the first token equal to one of the selector strings, stopping the
/// scan at the first option token so selectors are never stripped out of
/// option values.
fn strip_selector(argv: &[String], selectors: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut scanning = true;

    for arg in argv {
        if scanning {
            if selectors.iter().any(|selector| selector == arg) {
                scanning = false;
                continue;
            }
            if arg.starts_with('-') {
                scanning = false;
            }
        }
        out.push(arg.clone());
    }

    out
}
