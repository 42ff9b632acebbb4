//! Rift Matching Rules CLI
//!
//! Decodes the matching rules in a contract fragment, reports anything the
//! decoder had to guess at, and optionally re-encodes them for another
//! specification version.
//!
//! Usage:
//!   rift-matching-rules <file> [--from 2] [--to 3] [--paths] [OPTIONS]

use anyhow::{bail, Context};
use clap::Parser;
use rift_matching_rules::{
    decode_document, fails_strict, total_warnings, GroupReport, ReportOptions, Severity,
    SpecVersion,
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Rift Matching Rules - decode and convert contract matching rules
#[derive(Parser, Debug)]
#[command(name = "rift-matching-rules")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file holding a rule group, or an object of path -> rule group with --paths
    #[arg(required = true)]
    path: PathBuf,

    /// Specification version the file was written with
    #[arg(short, long, default_value = "3", env = "RIFT_SPEC_VERSION")]
    from: SpecVersion,

    /// Re-encode the decoded rules for this specification version
    #[arg(short, long)]
    to: Option<SpecVersion>,

    /// Treat the top-level object as path -> rule group
    #[arg(long)]
    paths: bool,

    /// Output format: text (default), json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Strict mode - treat warnings as errors
    #[arg(short, long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let document = load_json_object(&args.path)?;
    info!(file = %args.path.display(), from = %args.from, "Decoding matching rules");

    let options = ReportOptions {
        from: args.from,
        to: args.to,
        paths: args.paths,
    };
    let reports = decode_document(&document, &options)
        .with_context(|| format!("Failed to process {}", args.path.display()))?;

    if args.output == "json" {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports, &args);
    }

    if fails_strict(&reports, args.strict) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_json_object(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn print_reports(reports: &[GroupReport], args: &Args) {
    println!("{BOLD}{CYAN}Rift Matching Rules{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{DIM}File:{RESET} {CYAN}{}{RESET}", args.path.display());
    println!("{DIM}From:{RESET} {BOLD}{}{RESET}\n", args.from);

    for report in reports {
        let label = report.label();
        let status = if report.diagnostics.has_warnings() {
            format!("{YELLOW}WARN{RESET}")
        } else {
            format!("{GREEN}OK{RESET}  ")
        };
        println!(
            "{status} {BOLD}{CYAN}{label}{RESET} {DIM}({} rule(s)){RESET}",
            report.rules
        );

        for diagnostic in &report.diagnostics {
            let color = match diagnostic.severity {
                Severity::Warning => YELLOW,
                Severity::Info => CYAN,
            };
            let location = diagnostic
                .location
                .as_ref()
                .map(|l| format!("{DIM}[{RESET}{CYAN}{l}{RESET}{DIM}]{RESET} "))
                .unwrap_or_default();
            println!(
                "  {color}|{RESET} {location}{BOLD}{color}{}{RESET}: {} {DIM}({}){RESET}",
                diagnostic.severity.label(),
                diagnostic.message,
                diagnostic.code
            );
        }

        if let Some(encoded) = &report.encoded {
            let rendered = serde_json::to_string_pretty(encoded).unwrap_or_default();
            for line in rendered.lines() {
                println!("  {DIM}>{RESET} {line}");
            }
        }
        println!();
    }

    let warnings = total_warnings(reports);
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    if warnings == 0 {
        println!("{GREEN}{BOLD}All rules decoded cleanly{RESET}");
    } else {
        println!("{YELLOW}{BOLD}Decoded with {warnings} warning(s){RESET}");
    }
}
