use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use picocalc::{Config, Context, Number};
use serde::Serialize;
use tracing::Level;

/// Evaluate arithmetic expressions with units, variables and functions.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Expressions to evaluate
    #[arg(required = true)]
    expressions: Vec<String>,
    /// JSON file with options (`max_arguments`, `max_depth`), `variables` and `units`
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Define a variable, e.g. `--var width=350`
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
    vars: Vec<(String, Number)>,
    /// Define a unit scale, e.g. `--unit px=2`
    #[arg(long = "unit", value_name = "NAME=SCALE", value_parser = parse_binding)]
    units: Vec<(String, Number)>,
    /// Maximum number of arguments per function call
    #[arg(long)]
    max_arguments: Option<usize>,
    /// Maximum nesting of parentheses, signs and call arguments
    #[arg(long)]
    max_depth: Option<usize>,
    /// Treat each expression as a comma-separated list
    #[arg(short, long)]
    multi: bool,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_binding(s: &str) -> Result<(String, Number), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let value: Number = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for `{name}`: {e}"))?;
    Ok((name.trim().to_string(), value))
}

#[derive(Serialize)]
struct Outcome<'a> {
    expression: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> Outcome<'a> {
    fn new(expression: &'a str, result: picocalc::Result<Number>) -> Self {
        match result {
            Ok(v) => Self { expression, value: Some(v), error: None },
            Err(e) => Self { expression, value: None, error: Some(e.to_string()) },
        }
    }

    fn line(&self) -> String {
        match (&self.value, &self.error) {
            (Some(v), _) => format!("Result: {v}"),
            (None, Some(e)) => e.clone(),
            (None, None) => String::new(),
        }
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments.
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Build the context.
    let mut ctx = match &args.config {
        Some(path) => match Config::from_path(path) {
            Ok(config) => config.into_context(),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        },
        None => Context::new(),
    };
    if let Some(n) = args.max_arguments {
        ctx.options_mut().max_arguments = n;
    }
    if let Some(n) = args.max_depth {
        ctx.options_mut().max_depth = n;
    }
    for (name, value) in &args.vars {
        ctx.set_variable(name.as_str(), *value);
    }
    for (name, scale) in &args.units {
        ctx.set_unit(name.as_str(), *scale);
    }

    // Evaluate.
    let mut outcomes = Vec::new();
    for expr in &args.expressions {
        if args.multi {
            outcomes.extend(
                ctx.eval_multi_expression(expr)
                    .map(|result| Outcome::new(expr, result)),
            );
        } else {
            outcomes.push(Outcome::new(expr, ctx.eval_expression(expr)));
        }
    }
    let failed = outcomes.iter().any(|o| o.error.is_some());

    // Output results.
    if args.json {
        match serde_json::to_string_pretty(&outcomes) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        }
    } else {
        println!("{}", outcomes.iter().map(Outcome::line).join("\n"));
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
