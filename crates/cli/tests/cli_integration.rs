use std::process::{Command, Output};

fn tally() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tally"))
}

fn run(args: &[&str]) -> Output {
    tally().args(args).output().expect("failed to run tally")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

#[test]
fn bare_invocation_shows_application_help() {
    let out = run(&[]);
    assert!(
        out.status.success(),
        "bare tally failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        stderr(&out),
    );
    let text = stdout(&out);
    assert!(
        text.contains("tally, version") && text.contains("greet") && text.contains("sum"),
        "unexpected help output:\n{text}"
    );
}

#[test]
fn command_help_exits_zero() {
    let out = run(&["greet", "--help"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Command greet"), "unexpected output:\n{text}");
    assert!(text.contains("-t, --times"), "unexpected output:\n{text}");
    assert!(text.contains("[name]"), "unexpected output:\n{text}");
}

#[test]
fn unknown_command_exits_127_with_suggestion() {
    let out = run(&["gret"]);
    assert_eq!(out.status.code(), Some(127));
    let text = stderr(&out);
    assert!(text.contains("Command \"gret\" not found"), "stderr:\n{text}");
    assert!(text.contains("Did you mean greet ?"), "stderr:\n{text}");
}

#[test]
fn alias_runs_the_command() {
    let out = run(&["g", "Ferris"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Hello, Ferris!\n");
}

#[test]
fn argument_default_applies() {
    let out = run(&["greet"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Hello, World!\n");
}

#[test]
fn options_bind_and_boolean_flag_flips() {
    let out = run(&["greet", "Crab", "-t", "2", "--with-shout"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "HELLO, CRAB!\nHELLO, CRAB!\n");
}

#[test]
fn long_equals_form_binds_value() {
    let out = run(&["greet", "Crab", "--times=3"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Hello, Crab!\n".repeat(3));
}

#[test]
fn sum_accumulates_variadic_arguments() {
    let out = run(&["sum", "1", "2", "3.5"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "6.5\n");
}

#[test]
fn sum_without_values_exits_255() {
    let out = run(&["sum"]);
    assert_eq!(out.status.code(), Some(255));
    assert!(
        stderr(&out).contains("argument \"values\" is required"),
        "stderr:\n{}",
        stderr(&out)
    );
}

#[test]
fn unknown_option_after_real_input_exits_255() {
    let out = run(&["sum", "5", "--bogus"]);
    assert_eq!(out.status.code(), Some(255));
    assert!(
        stderr(&out).contains("unknown option \"--bogus\""),
        "stderr:\n{}",
        stderr(&out)
    );
}

#[test]
fn action_exit_code_passes_through() {
    let out = run(&["status", "3"]);
    assert_eq!(out.status.code(), Some(3));
    assert_eq!(stdout(&out), "exiting with 3\n");
}

#[test]
fn version_flag_reports_application_version() {
    let out = run(&["-v"]);
    assert!(out.status.success());
    assert!(
        stdout(&out).contains(&format!("tally, {}", env!("CARGO_PKG_VERSION"))),
        "unexpected output:\n{}",
        stdout(&out)
    );
}
