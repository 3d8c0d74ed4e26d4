use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use menudesc_core::normalizer;
use menudesc_core::{Error, Menu, MenuNode, ParseError, ParseOptions};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// menudesc — menu description language CLI
///
/// Validate, inspect, format, and fingerprint menu description files.
/// Reads standard input when no file (or `-`) is given.
#[derive(Parser)]
#[command(name = "menudesc", version, about, long_about = None)]
struct Cli {
    /// Suppress success output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Icon size in effect before the first `iconsize=` line
    #[arg(
        long,
        global = true,
        default_value_t = menudesc_core::options::DEFAULT_ICON_SIZE,
        value_parser = clap::value_parser!(u32).range(8..=256)
    )]
    icon_size: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a menu description for errors
    Validate {
        /// Path to the description file
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed menu tree
    Show {
        /// Path to the description file
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a description in canonical form
    Fmt {
        /// Path to the description file
        file: Option<PathBuf>,
        /// Overwrite the file instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Compute the SHA-256 of the canonical form
    Hash {
        /// Path to the description file
        file: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Exit codes: 0 success, 1 invalid description, 2 I/O or usage error
enum Failure {
    Invalid,
    Fatal,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let options = ParseOptions::default().with_default_icon_size(cli.icon_size);
    let result = match &cli.command {
        Commands::Validate { file, json } => validate(file.as_deref(), *json, cli.quiet, &options),
        Commands::Show { file, json } => show(file.as_deref(), *json, &options),
        Commands::Fmt { file, write } => reformat(file.as_deref(), *write, cli.quiet, &options),
        Commands::Hash { file } => hash(file.as_deref(), &options),
        Commands::Version => {
            println!("menudesc {} (menudesc-core {})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(Failure::Invalid) => 1,
        Err(Failure::Fatal) => 2,
    };
    process::exit(exit_code);
}

fn init_tracing(quiet: bool, verbose: u8) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn validate(file: Option<&Path>, json: bool, quiet: bool, options: &ParseOptions) -> Result<(), Failure> {
    match read_menu(file, options)? {
        Ok(menu) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": true,
                    "items": menu.item_count(),
                    "empty": menu.is_empty(),
                }))?;
            } else if !quiet {
                println!(
                    "{} {}: {} item(s)",
                    "valid".green().bold(),
                    display_name(file),
                    menu.item_count()
                );
            }
            Ok(())
        }
        Err(err) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "line": err.line_number,
                    "message": err.message(),
                    "raw_line": err.raw_line,
                }))?;
            } else {
                report_parse_error(file, &err);
            }
            Err(Failure::Invalid)
        }
    }
}

fn show(file: Option<&Path>, json: bool, options: &ParseOptions) -> Result<(), Failure> {
    let menu = parsed_or_report(file, options)?;

    if json {
        return print_json(&menu);
    }

    println!("icon size: {}", menu.directives().icon_size);
    if let Some(pos) = menu.directives().menu_position {
        println!("menu position: {}, {}", pos.x, pos.y);
    }
    for (depth, node) in menu.walk() {
        println!("{}{}", "  ".repeat(depth), describe(node));
    }
    if menu.is_empty() {
        println!("<no content to display>");
    }
    Ok(())
}

fn reformat(file: Option<&Path>, write: bool, quiet: bool, options: &ParseOptions) -> Result<(), Failure> {
    let menu = parsed_or_report(file, options)?;
    let canonical = normalizer::normalize(&menu, options);

    if !write {
        print!("{}", canonical);
        return Ok(());
    }

    let Some(path) = file.filter(|p| !is_stdin(p)) else {
        eprintln!("{}: --write needs a file path", "error".red().bold());
        return Err(Failure::Fatal);
    };
    std::fs::write(path, canonical).map_err(|e| {
        eprintln!("{}: cannot write {}: {}", "error".red().bold(), path.display(), e);
        Failure::Fatal
    })?;
    if !quiet {
        println!("formatted {}", path.display());
    }
    Ok(())
}

fn hash(file: Option<&Path>, options: &ParseOptions) -> Result<(), Failure> {
    let menu = parsed_or_report(file, options)?;
    println!("{}", normalizer::compute_hash(&menu, options));
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn display_name(file: Option<&Path>) -> String {
    match file {
        Some(path) if !is_stdin(path) => path.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}

/// Parse the input; the outer error is fatal, the inner one is a syntax error
fn read_menu(file: Option<&Path>, options: &ParseOptions) -> Result<Result<Menu, ParseError>, Failure> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) if !is_stdin(path) => {
            tracing::info!(file = %path.display(), "reading menu description");
            let handle = File::open(path).map_err(|e| {
                eprintln!("{}: cannot open {}: {}", "error".red().bold(), path.display(), e);
                Failure::Fatal
            })?;
            Box::new(BufReader::new(handle))
        }
        _ => {
            tracing::info!("reading menu description from stdin");
            Box::new(io::stdin().lock())
        }
    };

    match menudesc_core::parse_with_options(reader, options) {
        Ok(menu) => Ok(Ok(menu)),
        Err(Error::Parse(err)) => Ok(Err(err)),
        Err(Error::Io(err)) => {
            eprintln!("{}: cannot read {}: {}", "error".red().bold(), display_name(file), err);
            Err(Failure::Fatal)
        }
    }
}

fn parsed_or_report(file: Option<&Path>, options: &ParseOptions) -> Result<Menu, Failure> {
    read_menu(file, options)?.map_err(|err| {
        report_parse_error(file, &err);
        Failure::Invalid
    })
}

fn report_parse_error(file: Option<&Path>, err: &ParseError) {
    eprintln!(
        "{}: {}:{}: {}",
        "error".red().bold(),
        display_name(file),
        err.line_number,
        err.message()
    );
    eprintln!("{}: >>>>{}", err.line_number, err.raw_line);
}

fn describe(node: &MenuNode) -> String {
    match node {
        MenuNode::Item(item) => {
            format!("item \"{}\" => {}{}", item.label, item.command, describe_icon(item.icon.as_ref()))
        }
        MenuNode::Submenu(submenu) => {
            format!("submenu \"{}\"{}", submenu.label, describe_icon(submenu.icon.as_ref()))
        }
        MenuNode::Separator => "separator".to_string(),
    }
}

fn describe_icon(icon: Option<&menudesc_core::Icon>) -> String {
    icon.map(|icon| format!(" [{} @{}px]", icon.path, icon.size))
        .unwrap_or_default()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Failure> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        eprintln!("{}: cannot serialize output: {}", "error".red().bold(), e);
        Failure::Fatal
    })?;
    println!("{}", text);
    Ok(())
}
