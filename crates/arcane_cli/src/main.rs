use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use arcane_core::core_api::{AnalysisOptions, AnalysisReport, CoreError, DEFAULT_TOP_N, Engine};
use arcane_render::{
    JsonStyle, TextRenderOptions, render_error_json, render_error_text, render_html, render_json,
    render_text_with_options,
};
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

/// Rank the Arcane wands and rings in an exported IdleOn save.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Exported JSON file. Reads stdin when omitted or `-`.
    #[arg(value_name = "SNAPSHOT.json")]
    path: Option<PathBuf>,
    /// Character number as listed in game.
    #[arg(short, long, value_name = "1-10", allow_hyphen_values = true)]
    player: String,
    /// Rows per table.
    #[arg(
        short = 'n',
        long = "top",
        value_name = "N",
        default_value_t = DEFAULT_TOP_N,
        value_parser = parse_top_n
    )]
    top: usize,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Shorthand for `--format json`.
    #[arg(long, conflicts_with = "format")]
    json: bool,
    /// More log output on stderr; repeat for debug detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        cli.format
    };

    let text = read_snapshot(cli.path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", source_label(cli.path.as_deref()));
        process::exit(1);
    });

    let engine = Engine::with_options(AnalysisOptions { top_n: cli.top });
    match engine.analyze_text(&text, &cli.player) {
        Ok(report) => print_report(&report, format, cli.verbose > 0),
        Err(err) => {
            print_error(&err, format);
            process::exit(1);
        }
    }
}

fn print_report(report: &AnalysisReport, format: OutputFormat, verbose: bool) {
    match format {
        OutputFormat::Text => {
            print!("{}", render_text_with_options(report, TextRenderOptions { verbose }));
        }
        OutputFormat::Json => print_json(&render_json(report, JsonStyle::CanonicalV1)),
        OutputFormat::Html => println!("{}", render_html(report)),
    }
}

fn print_error(err: &CoreError, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&render_error_json(err)),
        OutputFormat::Text | OutputFormat::Html => eprint!("{}", render_error_text(err)),
    }
}

fn print_json(value: &JsonValue) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error serializing JSON output: {e}");
            process::exit(1);
        }
    }
}

fn read_snapshot(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn source_label(path: Option<&Path>) -> String {
    match path {
        Some(p) if p != Path::new("-") => p.display().to_string(),
        _ => "stdin".to_string(),
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,arcane_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_top_n(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("invalid row count '{value}', expected a whole number of at least 1")),
    }
}
