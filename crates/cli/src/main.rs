use std::process;

use anyhow::{Result, anyhow};
use serde_json::json;
use tiller::{Application, Arg, Command, Io, Opt, Value};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    init_tracing();

    let argv: Vec<String> = std::env::args().collect();
    match build_app() {
        Ok(mut app) => process::exit(app.handle(&argv)),
        Err(err) => {
            eprintln!("{err}");
            process::exit(255);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn build_app() -> tiller::Result<Application> {
    let mut app = Application::new("tally", env!("CARGO_PKG_VERSION"));

    app.add(
        Command::new("greet", "Print a greeting")
            .alias("g")
            .argument("name:World", "Who to greet")?
            .add_opt(
                Opt::new("-t|--times", "Repeat the greeting")
                    .default_value(json!(1))
                    .filter(|raw| json!(raw.parse::<u64>().unwrap_or(1))),
            )?
            .option("--with-shout", "Greet in uppercase")?
            .action(greet),
    )?;

    app.add(
        Command::new("sum", "Add up the given numbers")
            .add_arg(Arg::new("values", "Numbers to add").variadic().required())?
            .action(sum),
    )?;

    app.add(
        Command::new("status", "Exit with the given status code")
            .argument("code:0", "Status code to report")?
            .action(status),
    )?;

    Ok(app)
}

fn greet(cmd: &Command, io: &mut Io) -> Result<i32> {
    tracing::debug!("executing greet command");

    let name = cmd
        .value("name")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let times = cmd.value("times").and_then(|v| v.as_u64()).unwrap_or(1);
    let shout = cmd.value("shout").and_then(|v| v.as_bool()).unwrap_or(false);

    let mut line = format!("Hello, {name}!");
    if shout {
        line = line.to_uppercase();
    }
    for _ in 0..times {
        io.write_line(&line)?;
    }
    Ok(0)
}

fn sum(cmd: &Command, io: &mut Io) -> Result<i32> {
    let items = match cmd.value("values") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let mut total = 0f64;
    for item in &items {
        let raw = item.as_str().unwrap_or_default();
        let number: f64 = raw.parse().map_err(|_| anyhow!("not a number: {raw}"))?;
        total += number;
    }

    if total.fract() == 0.0 {
        io.write_line(&format!("{}", total as i64))?;
    } else {
        io.write_line(&format!("{total}"))?;
    }
    Ok(0)
}

fn status(cmd: &Command, io: &mut Io) -> Result<i32> {
    let raw = cmd
        .value("code")
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "0".to_string());
    let code: i32 = raw
        .parse()
        .map_err(|_| anyhow!("not a status code: {raw}"))?;

    io.write_line(&format!("exiting with {code}"))?;
    Ok(code)
}
