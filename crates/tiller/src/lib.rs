//! Command-line argument parsing and command dispatch.
//!
//! `tiller` tokenizes raw process arguments, matches them against declared
//! options and positional arguments, applies defaults, filters and
//! validation, and routes the invocation to a matching command handler.
//!
//! Options are declared as `"-p|--port"` (with `-with-`/`-no-` declaring
//! presence-flips-default boolean flags), positional arguments as `"name"`
//! or `"name:default"`. Bound values are [`Value`]s keyed by the camelCase
//! attribute name derived from the declaration. Every command carries the
//! built-in `-h|--help`, `-v|--version` and repeatable `-V|--verbosity`
//! options.
//!
//! ```
//! use tiller::{Application, Command};
//!
//! let mut app = Application::new("demo", "1.0.0");
//! app.add(
//!     Command::new("greet", "Print a greeting")
//!         .alias("g")
//!         .argument("name:World", "Who to greet")?
//!         .action(|cmd, io| {
//!             let name = cmd
//!                 .value("name")
//!                 .and_then(|v| v.as_str().map(str::to_string))
//!                 .unwrap_or_default();
//!             io.write_line(&format!("Hello, {name}!"))?;
//!             Ok(0)
//!         }),
//! )?;
//!
//! let argv: Vec<String> = ["demo", "greet", "Ferris"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! assert_eq!(app.handle(&argv), 0);
//! # Ok::<(), tiller::Error>(())
//! ```

pub mod app;
pub mod command;
pub mod error;
pub mod help;
pub mod io;
pub mod param;
pub mod parser;
pub mod util;
pub mod values;

pub use app::Application;
pub use command::{Action, Command, InteractFn};
pub use error::{Error, ParamKind, Result};
pub use io::Io;
pub use param::{Arg, FilterFn, Opt, Param};
pub use parser::{EventOutcome, ParseOutcome, Parser};
pub use values::Values;

/// The untyped value domain for defaults and bound values.
pub use serde_json::Value;
pub use serde_json::json;
