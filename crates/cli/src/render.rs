//! Diagnostic rendering using ariadne.
//!
//! Converts [`Diagnostic`]s into ariadne [`Report`]s annotated with the
//! database document they point into, or into a JSON array. Everything goes
//! to stderr; stdout carries the generated XML.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use foomatic_combo_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty for a terminal and JSON otherwise.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stderr().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref()?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics in pretty (ariadne) format to stderr.
///
/// A diagnostic with a span and a readable `file` context is shown against
/// that document; any other is printed as a standalone message.
pub(crate) fn render_diagnostics_pretty(diagnostics: &[Diagnostic]) {
    let config = Config::default().with_compact(false);
    // Each document is read at most once.
    let mut sources: BTreeMap<String, Option<String>> = BTreeMap::new();

    for diag in diagnostics {
        if let (Some(span), Some(file)) = (diag.span, diag.context_value("file")) {
            let source = sources
                .entry(file.to_string())
                .or_insert_with(|| fs::read_to_string(file).ok());
            if let Some(source) = source.as_deref() {
                // Clamp span to source length to avoid panics on truncated input.
                let start = span.start.min(source.len());
                let end = span.end.min(source.len()).max(start);

                let mut builder = Report::build(report_kind(&diag.severity), (file, start..end))
                    .with_code(diag.id.as_ref())
                    .with_message(&diag.message)
                    .with_config(config)
                    .with_label(
                        Label::new((file, start..end))
                            .with_message(diag.message.as_str())
                            .with_color(severity_color(&diag.severity)),
                    );
                if let Some(note) = context_note(diag) {
                    builder = builder.with_note(note);
                }
                if let Some(explanation) = diag.explain() {
                    builder = builder.with_help(explanation);
                }
                let mut cache = (file, Source::from(source));
                builder.finish().eprint(&mut cache).ok();
                continue;
            }
        }

        let kind_str = match diag.severity {
            Severity::Error => "error",
            Severity::Warn => "warning",
        };
        eprintln!("{kind_str}[{}]: {}", diag.id, diag.message);
        if let Some(note) = context_note(diag) {
            eprintln!("  = note: {note}");
        }
        if let Some(explanation) = diag.explain() {
            eprintln!("  = help: {explanation}");
        }
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render diagnostics as a JSON array to stderr.
pub(crate) fn render_diagnostics_json(diagnostics: &[Diagnostic]) {
    match serde_json::to_string_pretty(diagnostics) {
        Ok(json) => eprintln!("{json}"),
        Err(err) => eprintln!("error: could not serialize diagnostics: {err}"),
    }
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Render diagnostics in the given format. Nothing is written when there
/// are none.
pub(crate) fn render_diagnostics(diagnostics: &[Diagnostic], format: Format) {
    if diagnostics.is_empty() {
        return;
    }
    match format {
        Format::Pretty => {
            render_diagnostics_pretty(diagnostics);
            print_summary(diagnostics);
        }
        Format::Json => render_diagnostics_json(diagnostics),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error and warning counts.
///
/// Example: `1 error, 2 warnings`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    eprintln!("{}", parts.join(", "));
}
