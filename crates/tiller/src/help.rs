//! Plain-text help rendering.
//!
//! Styling, color and table layout belong to the host application; every
//! renderer here writes unstyled lines to the given sink.

use std::io::{self, Write};

use crate::command::Command;
use crate::param::{Arg, Opt, Param};
use crate::util;

/// Per-command help: identity header, usage line and the aligned
/// Arguments/Options sections.
pub fn command_help(out: &mut dyn Write, command: &Command) -> io::Result<()> {
    writeln!(
        out,
        "Command {}, version {}",
        command.name(),
        command.get_version()
    )?;
    if !command.description().is_empty() {
        writeln!(out, "{}", command.description())?;
    }
    writeln!(out)?;
    writeln!(out, "Usage: {} [OPTIONS...] [ARGUMENTS...]", command.name())?;

    let arguments: Vec<(String, String)> = command
        .parser()
        .arguments()
        .map(|arg| (argument_label(arg), arg.description().to_string()))
        .collect();
    if !arguments.is_empty() {
        writeln!(out)?;
        writeln!(out, "Arguments:")?;
        write_rows(out, &arguments)?;
    }

    let options: Vec<(String, String)> = command
        .parser()
        .options()
        .map(|opt| (option_label(opt), opt.description().to_string()))
        .collect();
    if !options.is_empty() {
        writeln!(out)?;
        writeln!(out, "Options:")?;
        write_rows(out, &options)?;
        writeln!(out)?;
        writeln!(out, "Legend: <required> [optional] variadic...")?;
    }

    if !command.get_usage().is_empty() {
        writeln!(out)?;
        writeln!(out, "Usage Examples:")?;
        writeln!(out, "{}", command.get_usage().trim_end())?;
    }

    Ok(())
}

/// Application-level help: identity header (with the optional logo) and
/// the command list.
pub fn application_help<'a>(
    out: &mut dyn Write,
    name: &str,
    version: &str,
    logo: &str,
    commands: impl Iterator<Item = &'a Command>,
) -> io::Result<()> {
    if !logo.is_empty() {
        writeln!(out, "{logo}")?;
    }
    writeln!(out, "{name}, version {version}")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;

    let rows: Vec<(String, String)> = commands
        .map(|command| {
            let left = if command.get_alias().is_empty() {
                command.name().to_string()
            } else {
                format!("{} [{}]", command.name(), command.get_alias())
            };
            (left, command.description().to_string())
        })
        .collect();
    write_rows(out, &rows)?;

    writeln!(out)?;
    writeln!(out, "Run `<command> --help` for specific help")?;
    Ok(())
}

/// Error line for an unmatched command token, with a minimal edit-distance
/// suggestion over the available names and aliases.
pub fn command_not_found(
    out: &mut dyn Write,
    attempted: &str,
    available: &[String],
) -> io::Result<()> {
    writeln!(out, "Command \"{attempted}\" not found")?;

    let closest = available
        .iter()
        .map(|name| (util::levenshtein(attempted, name), name))
        .filter(|(distance, _)| *distance < 5)
        .min_by_key(|(distance, _)| *distance);
    if let Some((_, suggestion)) = closest {
        writeln!(out, "Did you mean {suggestion} ?")?;
    }

    Ok(())
}

fn argument_label(arg: &Arg) -> String {
    let mut name = arg.name().to_string();
    if arg.is_variadic() {
        name.push_str("...");
    }
    if arg.is_required() {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    }
}

fn option_label(opt: &Opt) -> String {
    let mut label = if opt.short() == opt.long() {
        opt.long().to_string()
    } else {
        format!("{}, {}", opt.short(), opt.long())
    };
    if opt.is_variadic() {
        label.push_str("...");
    }
    if opt.is_required() {
        format!("<{label}>")
    } else {
        format!("[{label}]")
    }
}

fn write_rows(out: &mut dyn Write, rows: &[(String, String)]) -> io::Result<()> {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            writeln!(out, "  {left}")?;
        } else {
            writeln!(out, "  {left:width$}  {help}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_command(command: &Command) -> String {
        let mut out = Vec::new();
        command_help(&mut out, command).unwrap();
        String::from_utf8_lossy(&out).to_string()
    }

    #[test]
    fn command_help_lists_sections() {
        let command = Command::new("serve", "Run the server")
            .version("1.0.0")
            .option("-p|--port", "Port to bind")
            .unwrap()
            .argument("root", "Document root")
            .unwrap();

        let text = render_command(&command);
        assert!(text.contains("Command serve, version 1.0.0"));
        assert!(text.contains("Usage: serve [OPTIONS...] [ARGUMENTS...]"));
        assert!(text.contains("Arguments:"));
        assert!(text.contains("[root]"));
        assert!(text.contains("Options:"));
        assert!(text.contains("-p, --port"));
        assert!(text.contains("--help"));
        assert!(text.contains("Legend: <required> [optional] variadic..."));
    }

    #[test]
    fn command_help_marks_required_and_variadic() {
        let command = Command::new("pack", "")
            .add_opt(crate::Opt::new("-i|--input", "Input file").required())
            .unwrap()
            .add_arg(crate::Arg::new("files", "Files to pack").variadic())
            .unwrap();

        let text = render_command(&command);
        assert!(text.contains("<-i, --input>"));
        assert!(text.contains("[files...]"));
    }

    #[test]
    fn command_help_appends_usage_examples() {
        let command = Command::new("serve", "").usage("serve ./public -p 8080");
        let text = render_command(&command);
        assert!(text.contains("Usage Examples:"));
        assert!(text.contains("serve ./public -p 8080"));
    }

    #[test]
    fn application_help_lists_commands_with_aliases() {
        let commands = vec![
            Command::new("serve", "Run the server").alias("s"),
            Command::new("build", "Build the site"),
        ];
        let mut out = Vec::new();
        application_help(&mut out, "site", "0.2.0", "", commands.iter()).unwrap();
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("site, version 0.2.0"));
        assert!(text.contains("serve [s]"));
        assert!(text.contains("build"));
        assert!(text.contains("Run `<command> --help` for specific help"));
    }

    #[test]
    fn application_help_prints_logo_first() {
        let mut out = Vec::new();
        application_help(&mut out, "site", "0.2.0", "S I T E", std::iter::empty::<&Command>()).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.starts_with("S I T E\n"));
    }

    #[test]
    fn not_found_suggests_the_closest_command() {
        let available = vec!["serve".to_string(), "build".to_string()];
        let mut out = Vec::new();
        command_not_found(&mut out, "serv", &available).unwrap();
        let text = String::from_utf8_lossy(&out);

        assert!(text.contains("Command \"serv\" not found"));
        assert!(text.contains("Did you mean serve ?"));
    }

    #[test]
    fn not_found_without_close_match_has_no_suggestion() {
        let available = vec!["serve".to_string()];
        let mut out = Vec::new();
        command_not_found(&mut out, "completely-unrelated", &available).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(!text.contains("Did you mean"));
    }
}
