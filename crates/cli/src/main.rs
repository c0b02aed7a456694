mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use foomatic_combo_core::{Listing, Session};
use foomatic_combo_db::{Database, DbError, Resolution, resolve_combo, resolve_overview};
use foomatic_combo_diagnostics::{self as diag, Diagnostic, codes};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::render::{Format, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "foomatic-combo-xml",
    version,
    about = "Compute printer/driver combination data from a Foomatic XML database",
    arg_required_else_help = true
)]
struct Cli {
    /// Foomatic ID of the printer.
    #[arg(short = 'p', short_alias = 'P', value_name = "PRINTER")]
    printer: Option<String>,

    /// Name of the driver to use.
    #[arg(short = 'd', value_name = "DRIVER")]
    driver: Option<String>,

    /// Default option setting for the generated file (`name=value`, `name`,
    /// or `noname`). Repeatable.
    #[arg(short = 'o', value_name = "SETTING")]
    options: Vec<String>,

    /// Generate the overview of every combination.
    #[arg(short = 'O', conflicts_with = "cups")]
    overview: bool,

    /// Generate the overview of combinations leading to a PPD file (for the
    /// CUPS PPD list).
    #[arg(short = 'C')]
    cups: bool,

    /// With `-C`: suppress combinations that point to a ready-made PPD file.
    #[arg(short = 'n', requires = "cups")]
    no_ready_made: bool,

    /// Directory where the Foomatic database is located.
    #[arg(short = 'l', value_name = "DIR")]
    libdir: Option<PathBuf>,

    /// Verbose (debug) mode; `-vv` for very verbose.
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Diagnostic output: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stderr is a TTY,
    /// "json" otherwise.
    #[arg(long, value_parser = ["pretty", "json"])]
    diagnostics: Option<String>,

    /// Explain a diagnostic ID (e.g. FCX2001) and exit.
    #[arg(long, value_name = "ID")]
    explain: Option<String>,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.diagnostics.as_deref());

    if let Some(id) = &cli.explain {
        cmd_explain(id, format)?;
        return Ok(());
    }

    let db = match &cli.libdir {
        Some(dir) => Database::default().with_root(dir),
        None => Database::default(),
    };
    let mut diagnostics = Vec::new();
    if !db.exists() {
        let root = db.root.display().to_string();
        diagnostics.push(
            Diagnostic::warn(
                codes::MISSING_DATABASE,
                format!("database directory {root} does not exist"),
                None,
            )
            .with("root", root),
        );
    }

    match run(&cli, &db) {
        Ok(mut resolution) => {
            diagnostics.append(&mut resolution.diagnostics);
            render_diagnostics(&diagnostics, format);
            io::stdout()
                .write_all(resolution.output.as_bytes())
                .context("failed to write output")?;
        }
        Err(err) => {
            diagnostics.push(err.to_diagnostic());
            render_diagnostics(&diagnostics, format);
            process::exit(1);
        }
    }
    Ok(())
}

/// Route the run to the overview or the single-combination resolver.
fn run(cli: &Cli, db: &Database) -> Result<Resolution, DbError> {
    let ids = db.load_id_table()?;
    debug!(root = %db.root.display(), translations = ids.len(), "database opened");

    if cli.overview || cli.cups {
        let listing = if cli.cups {
            Listing::Cups {
                ready_made: !cli.no_ready_made,
            }
        } else {
            Listing::All
        };
        let mut session = Session::overview(listing).with_ids(ids);
        return resolve_overview(db, &mut session);
    }

    let (Some(printer), Some(driver)) = (&cli.printer, &cli.driver) else {
        return Err(DbError::MissingRequest);
    };
    let mut session = Session::combo(printer.as_str(), driver.as_str())
        .with_defaults(cli.options.clone())
        .with_ids(ids);
    resolve_combo(db, &mut session)
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Log to stderr. `-v` selects debug, `-vv` trace; otherwise `RUST_LOG`
/// applies, defaulting to errors only.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}
