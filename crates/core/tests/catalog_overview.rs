//! Both catalog passes and the assembled overview document.

mod common;

use common::{XML_HEADER, driver_doc, parse, printer_doc, run_catalog};
use foomatic_combo_core::{IdTable, Listing, Mode, Session};

const CUPS_READY_MADE: Listing = Listing::Cups { ready_made: true };
const CUPS_GENERATED: Listing = Listing::Cups { ready_made: false };

/// Device whose driver list carries a ready-made PPD for `Postscript`.
fn ppd_printer(id: &str) -> String {
    printer_doc(id, "HP", "LaserJet 4", &["Postscript", "ljet4"], None).replace(
        "<id>Postscript</id>\n",
        "<id>Postscript</id>\n      <ppd>PPD/HP/hp4.ppd</ppd>\n",
    )
}

#[test]
fn cups_overview_lists_only_drivers_with_prototypes() {
    let drivers = [
        driver_doc("A", Some("gs -q -sDEVICE=a"), &["X-1"]),
        driver_doc("B", Some(""), &["X-1"]),
    ];
    let printers = [printer_doc("X-1", "X", "1", &["A", "B"], None)];
    let out = run_catalog(CUPS_READY_MADE, IdTable::default(), &drivers, &printers);

    assert_eq!(
        out,
        "<overview>\n\
         <driver id=\"driver/A\">\n  <name>A</name>\n  <execution>\n    <ghostscript />\n  </execution>\n</driver>\n\n  \
         <printer>\n    <id>X-1</id>\n    <make>X</make>\n    <model>1</model>\n    <functionality>A</functionality>\n\n    \
         <drivers>\n      <driver>A</driver>\n    </drivers>\n  </printer>\n\
         </overview>\n"
    );
}

#[test]
fn driver_without_any_prototype_is_dropped_from_cups_listing() {
    let drivers = [driver_doc("C", None, &["X-1"])];
    let printers = [printer_doc("X-1", "X", "1", &["C"], None)];
    let out = run_catalog(CUPS_READY_MADE, IdTable::default(), &drivers, &printers);
    assert!(!out.contains("driver/C"));
    assert!(!out.contains("<driver>C</driver>"));
}

#[test]
fn full_listing_keeps_every_driver_and_cuts_blocks() {
    let drivers = [driver_doc("C", None, &["X-1"]), driver_doc("D", Some(""), &["X-1"])];
    let printers = [printer_doc("X-1", "X", "1", &["C", "D"], None)];
    let out = run_catalog(Listing::All, IdTable::default(), &drivers, &printers);

    assert!(out.contains("<driver id=\"driver/C\">"));
    assert!(out.contains("<driver id=\"driver/D\">"));
    assert!(!out.contains("<prototype>"));
    assert!(!out.contains("<printers>"));
    assert!(out.contains("    <drivers>\n      <driver>C</driver>\n      <driver>D</driver>\n    </drivers>\n"));
}

#[test]
fn driver_listed_device_without_file_becomes_a_leftover() {
    let drivers = [driver_doc("ljet4", None, &["hp-laserjet", "HP-LaserJet_4"])];
    let printers = [printer_doc("HP-LaserJet_4", "HP", "LaserJet 4", &["ljet4"], None)];
    let out = run_catalog(Listing::All, IdTable::default(), &drivers, &printers);

    assert!(out.ends_with(
        "  <printer>\n    <id>hp-laserjet</id>\n    <make>hp</make>\n    <model>laserjet</model>\n    <noxmlentry />\n    \
         <drivers>\n      <driver>ljet4</driver>\n    </drivers>\n  </printer>\n</overview>\n"
    ));
    // The device with a file is rendered once, from its own document.
    assert_eq!(out.matches("<id>HP-LaserJet_4</id>").count(), 1);
    assert_eq!(out.matches("<driver>ljet4</driver>").count(), 2);
}

#[test]
fn incomplete_device_document_leaves_its_entry_for_the_leftovers() {
    let drivers = [driver_doc("ljet4", None, &["Acme-Jet"])];
    let printers = [printer_doc("Acme-Jet", "Acme", "Jet", &["ljet4"], None)
        .replace("  <functionality>A</functionality>\n", "")];
    let out = run_catalog(Listing::All, IdTable::default(), &drivers, &printers);

    assert!(!out.contains("<functionality>"));
    assert!(out.contains("<id>Acme-Jet</id>\n    <make>Acme</make>\n    <model>Jet</model>\n    <noxmlentry />"));
}

#[test]
fn functionality_exceptions_are_reported_per_driver() {
    let drivers = [driver_doc("ljet4", None, &["X-1"]).replace(
        "<id>printer/X-1</id>\n",
        "<id>printer/X-1</id>\n      <functionality>B</functionality>\n",
    )];
    let printers = [printer_doc("X-1", "X", "1", &["ljet4"], None)];
    let out = run_catalog(Listing::All, IdTable::default(), &drivers, &printers);

    assert!(out.contains(
        "    <driverfunctionalityexceptions>\n      <driverfunctionalityexception>\n        <driver>ljet4</driver>\n\
         <functionality>B</functionality>\n      </driverfunctionalityexception>\n    </driverfunctionalityexceptions>\n"
    ));
    // The exception is not part of the printed driver document.
    assert!(!out.contains("<functionality>B</functionality>\n    </printer>"));
}

#[test]
fn ready_made_ppds_follow_the_listing() {
    let drivers = [
        driver_doc("Postscript", Some("cat"), &[]),
        driver_doc("ljet4", Some("gs -sDEVICE=ljet4"), &[]),
    ];
    let printers = [ppd_printer("HP-LaserJet_4")];

    let generated = run_catalog(CUPS_GENERATED, IdTable::default(), &drivers, &printers);
    assert!(generated.contains("    <drivers>\n      <driver>ljet4</driver>\n    </drivers>\n"));
    assert!(!generated.contains("<ppds>"));

    let ready_made = run_catalog(CUPS_READY_MADE, IdTable::default(), &drivers, &printers);
    assert!(ready_made.contains(
        "    <drivers>\n      <driver>Postscript</driver>\n      <driver>ljet4</driver>\n    </drivers>\n"
    ));
    assert!(ready_made.contains(
        "    <ppds>\n      <ppd>\n        <driver>Postscript</driver>\n        <ppdfile>PPD/HP/hp4.ppd</ppdfile>\n      </ppd>\n    </ppds>\n"
    ));

    let all = run_catalog(Listing::All, IdTable::default(), &[], &printers);
    assert!(all.contains("<driver>Postscript</driver>"));
    assert!(all.contains("<ppdfile>PPD/HP/hp4.ppd</ppdfile>"));
}

#[test]
fn obsolete_device_ids_are_merged() {
    let ids = IdTable::parse("HP-LJ4 HP-LaserJet_4\n");
    let drivers = [driver_doc("ljet4", None, &["HP-LJ4"])];
    let printers = [printer_doc("HP-LaserJet_4", "HP", "LaserJet 4", &[], None)];
    let out = run_catalog(Listing::All, ids, &drivers, &printers);

    assert!(!out.contains("HP-LJ4"));
    assert!(!out.contains("<noxmlentry />"));
    assert!(out.contains("<driver>ljet4</driver>\n    </drivers>"));
}

#[test]
fn summary_carries_recommended_driver_autodetect_and_unverified() {
    let doc = format!(
        "{XML_HEADER}<printer id=\"printer/X-1\">\n  <make>X</make>\n  <model>1</model>\n  <functionality>B</functionality>\n  \
         <unverified />\n  <driver>ljet4</driver>\n  <autodetect><general><make>XX</make></general></autodetect>\n</printer>\n"
    );
    let mut session = Session::overview(Listing::All);
    let outcome = parse(Mode::CatalogPrinter, &doc, &mut session);
    assert_eq!(
        outcome.document.as_deref(),
        Some(
            "  <printer>\n    <id>X-1</id>\n    <make>X</make>\n    <model>1</model>\n    <functionality>B</functionality>\n    \
             <unverified>B</unverified>\n    <driver>ljet4</driver>\n    \
             <autodetect><general><make>XX</make></general></autodetect>  </printer>\n"
        )
    );
}
