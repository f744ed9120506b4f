use theme_edit::{json, render_theme, JsonStyle};

use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut style = JsonStyle::Pretty;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--pretty" => style = JsonStyle::Pretty,
            "--compact" => style = JsonStyle::Compact,
            other => {
                eprintln!("unknown argument: {}", other);
                eprintln!("usage: theme-edit [--pretty | --compact] < theme.json");
                std::process::exit(2);
            }
        }
    }

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("ERROR: cannot read stdin: {}", err);
        std::process::exit(1);
    }

    let result = match render_theme(&input) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("ERROR [{}]: {}", err.code(), err);
            std::process::exit(1);
        }
    };

    for warning in &result.warnings {
        tracing::warn!(
            code = warning.code,
            path = %warning.path.join("."),
            "{}",
            warning.message
        );
    }

    match json::to_json(&result.theme, style) {
        Ok(out) => println!("{}", out),
        Err(err) => {
            eprintln!("ERROR [{}]: {}", err.code(), err);
            std::process::exit(1);
        }
    }
}
