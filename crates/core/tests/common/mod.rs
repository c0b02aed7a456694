//! Shared test helpers for `foomatic_combo_core` integration tests.

#![allow(unreachable_pub)]

use foomatic_combo_core::{
    Diagnostic, IdTable, Listing, Mode, OverviewWriter, ParseOutcome, Session, parse_document,
};

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

// ─── Document builders ───────────────────────────────────────────────────────

/// Device document with an embedded driver list and optional ready-made
/// PostScript PPD.
#[allow(dead_code)]
pub fn printer_doc(id: &str, make: &str, model: &str, drivers: &[&str], ppd: Option<&str>) -> String {
    let mut doc = format!(
        "{XML_HEADER}<printer id=\"printer/{id}\">\n  <make>{make}</make>\n  <model>{model}</model>\n  \
         <mechanism>\n    <laser />\n  </mechanism>\n  <functionality>A</functionality>\n  <drivers>\n"
    );
    for driver in drivers {
        doc.push_str(&format!("    <driver>\n      <id>{driver}</id>\n    </driver>\n"));
    }
    doc.push_str("  </drivers>\n");
    if let Some(ppd) = ppd {
        doc.push_str(&format!(
            "  <lang>\n    <postscript level=\"2\">\n      <ppd>{ppd}</ppd>\n    </postscript>\n  </lang>\n"
        ));
    }
    doc.push_str("</printer>\n");
    doc
}

/// Driver document with an optional command-line prototype and a list of
/// supported printers.
#[allow(dead_code)]
pub fn driver_doc(name: &str, prototype: Option<&str>, printers: &[&str]) -> String {
    let mut doc = format!("{XML_HEADER}<driver id=\"driver/{name}\">\n  <name>{name}</name>\n  <execution>\n    <ghostscript />\n");
    if let Some(prototype) = prototype {
        doc.push_str(&format!("    <prototype>{prototype}</prototype>\n"));
    }
    doc.push_str("  </execution>\n  <printers>\n");
    for printer in printers {
        doc.push_str(&format!(
            "    <printer>\n      <id>printer/{printer}</id>\n    </printer>\n"
        ));
    }
    doc.push_str("  </printers>\n</driver>\n");
    doc
}

/// One `<constraint>` element.
#[allow(dead_code)]
pub fn constraint(sense: bool, selectors: &[(&str, &str)]) -> String {
    let mut out = format!("      <constraint sense=\"{sense}\">\n");
    for (tag, value) in selectors {
        out.push_str(&format!("        <{tag}>{value}</{tag}>\n"));
    }
    out.push_str("      </constraint>\n");
    out
}

/// A `<constraints>` block at option level.
#[allow(dead_code)]
pub fn constraints(items: &[String]) -> String {
    format!("  <constraints>\n{}  </constraints>\n", items.concat())
}

/// One `<enum_val>`, optionally carrying its own constraints.
#[allow(dead_code)]
pub fn enum_val(id: &str, shortname: &str, constraints: &[String]) -> String {
    let mut out = format!(
        "    <enum_val id=\"{id}\">\n      <ev_longname>\n        <en>{shortname}</en>\n      </ev_longname>\n      \
         <ev_shortname>\n        <en>{shortname}</en>\n      </ev_shortname>\n"
    );
    if !constraints.is_empty() {
        out.push_str(&format!("      <constraints>\n{}      </constraints>\n", constraints.concat()));
    }
    out.push_str("    </enum_val>\n");
    out
}

/// Option document: `body` goes between the execution block and `</option>`.
#[allow(dead_code)]
pub fn option_doc(kind: &str, shortname: &str, body: &str) -> String {
    format!(
        "{XML_HEADER}<option type=\"{kind}\" id=\"opt/{shortname}\">\n  <arg_longname>\n    <en>{shortname}</en>\n  </arg_longname>\n  \
         <arg_shortname>\n    <en>{shortname}</en>\n  </arg_shortname>\n  <arg_execution>\n    <arg_order>100</arg_order>\n  \
         </arg_execution>\n{body}</option>\n"
    )
}

// ─── Session helpers ─────────────────────────────────────────────────────────

/// Session for `HP-LaserJet_4` with `ljet4`, device identity already read.
#[allow(dead_code)]
pub fn hp_session() -> Session {
    let mut session = Session::combo("HP-LaserJet_4", "ljet4");
    session.device.make = "HP".into();
    session.device.model = "LaserJet 4".into();
    session
}

#[allow(dead_code)]
pub fn parse(mode: Mode, doc: &str, session: &mut Session) -> ParseOutcome {
    parse_document(mode, doc, "test.xml", session)
        .unwrap_or_else(|e| panic!("unexpected parse error: {e}"))
}

/// Kept document text, panicking when it was discarded.
#[allow(dead_code)]
pub fn kept(outcome: &ParseOutcome) -> &str {
    outcome
        .document
        .as_deref()
        .unwrap_or_else(|| panic!("document was discarded"))
}

/// Run both catalog passes and render the overview.
#[allow(dead_code)]
pub fn run_catalog(listing: Listing, ids: IdTable, drivers: &[String], printers: &[String]) -> String {
    let mut session = Session::overview(listing).with_ids(ids);
    let mut writer = OverviewWriter::new();
    for doc in drivers {
        if let Some(kept) = parse(Mode::CatalogDriver, doc, &mut session).document {
            writer.push_driver(&kept);
        }
    }
    for doc in printers {
        let outcome = parse(Mode::CatalogPrinter, doc, &mut session);
        writer.push_printer(outcome.document.as_deref().unwrap_or_default());
    }
    writer.finish(&session.catalog)
}

/// Find the first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}
