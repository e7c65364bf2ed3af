use thiserror::Error;

/// Whether a parameter is a flag-style option or a positional argument.
///
/// Carried in errors so messages can name the right declaration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Option,
    Argument,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Option => f.write_str("option"),
            ParamKind::Argument => f.write_str("argument"),
        }
    }
}

/// Errors raised during registration, parsing and validation.
///
/// Registration errors (`DuplicateParameter`, `DuplicateCommand`,
/// `VariadicArgPosition`) fail the registration call immediately.
/// `MissingRequired` is raised only after the full token stream has been
/// scanned; `UnknownOption` only when unknown options are disallowed and
/// real values were already collected.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} \"{name}\" is already registered")]
    DuplicateParameter { kind: ParamKind, name: String },

    #[error("command \"{0}\" is already registered")]
    DuplicateCommand(String),

    #[error("only the last argument can be variadic")]
    VariadicArgPosition,

    #[error("{kind} \"{name}\" is required")]
    MissingRequired { kind: ParamKind, name: String },

    #[error("unknown option \"{0}\"")]
    UnknownOption(String),
}

pub type Result<T> = std::result::Result<T, Error>;
