//! CLI tests for single-combination runs.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::cargo;

fn combo_cmd() -> Command {
    Command::new(cargo::cargo_bin!("foomatic-combo-xml"))
}

/// A database with one device, one driver, and two options.
fn sample_db() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("db/source");
    for sub in ["printer", "driver", "opt"] {
        fs::create_dir_all(src.join(sub)).expect("mkdir");
    }
    write(
        &src.join("printer/HP-LaserJet_4.xml"),
        "<?xml version=\"1.0\"?>\n<printer id=\"printer/HP-LaserJet_4\">\n  <make>HP</make>\n  \
         <model>LaserJet 4</model>\n  <drivers>\n    <driver>\n      <id>ljet4</id>\n    </driver>\n  \
         </drivers>\n</printer>\n",
    );
    write(
        &src.join("driver/ljet4.xml"),
        "<?xml version=\"1.0\"?>\n<driver id=\"driver/ljet4\">\n  <name>ljet4</name>\n  <execution>\n    \
         <prototype>gs -sDEVICE=ljet4</prototype>\n  </execution>\n  <printers>\n    <printer>\n      \
         <id>printer/HP-LaserJet_4</id>\n    </printer>\n    <printer>\n      <id>printer/Other-1</id>\n    \
         </printer>\n  </printers>\n</driver>\n",
    );
    write(
        &src.join("opt/Resolution.xml"),
        "<?xml version=\"1.0\"?>\n<option type=\"enum\" id=\"opt/Resolution\">\n  <arg_shortname>\n    \
         <en>Resolution</en>\n  </arg_shortname>\n  <constraints>\n    <constraint sense=\"true\">\n      \
         <driver>ljet4</driver>\n      <arg_defval>ev/600</arg_defval>\n    </constraint>\n  </constraints>\n  \
         <enum_vals>\n    <enum_val id=\"ev/300\">\n      <ev_shortname>\n        <en>300</en>\n      \
         </ev_shortname>\n    </enum_val>\n    <enum_val id=\"ev/600\">\n      <ev_shortname>\n        \
         <en>600</en>\n      </ev_shortname>\n    </enum_val>\n  </enum_vals>\n</option>\n",
    );
    write(
        &src.join("opt/Other.xml"),
        "<option type=\"bool\" id=\"opt/Other\">\n  <constraints>\n    <constraint sense=\"true\">\n      \
         <driver>pxlmono</driver>\n    </constraint>\n  </constraints>\n</option>\n",
    );
    dir
}

fn write(path: &Path, text: &str) {
    fs::write(path, text).expect("write fixture");
}

fn lib(dir: &tempfile::TempDir) -> String {
    dir.path().to_string_lossy().to_string()
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let output = combo_cmd().output().expect("run without arguments");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "unexpected stderr: {stderr}");
}

#[test]
fn combination_is_written_to_stdout() {
    let db = sample_db();
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "HP-LaserJet_4", "-d", "ljet4"])
        .output()
        .expect("run combo");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<foomatic>\n<printer id=\"printer/HP-LaserJet_4\">"));
    assert!(stdout.contains("<id>printer/HP-LaserJet_4</id>"));
    assert!(!stdout.contains("Other-1"));
    assert!(stdout.contains("id=\"opt/Resolution\""));
    assert!(stdout.contains("<arg_defval>ev/600</arg_defval>"));
    assert!(!stdout.contains("opt/Other"));
    assert!(stdout.ends_with("</options>\n</foomatic>\n"));
    assert!(output.stderr.is_empty());
}

#[test]
fn option_defaults_and_capital_p_alias() {
    let db = sample_db();
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-P", "HP-LaserJet_4", "-d", "ljet4", "-o", "Resolution=300"])
        .output()
        .expect("run combo");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<arg_defval>ev/300</arg_defval>"));
    assert!(!stdout.contains("<arg_defval>ev/600</arg_defval>"));
}

#[test]
fn unsupported_combination_fails_with_json_diagnostic() {
    let db = sample_db();
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "Epson-Stylus_C80", "-d", "ljet4", "--diagnostics", "json"])
        .output()
        .expect("run combo");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: serde_json::Value = serde_json::from_str(&stderr).expect("valid json");
    assert_eq!(json[0]["id"], "FCX3002");
    assert_eq!(json[0]["severity"], "error");
    assert_eq!(json[0]["context"]["printer"], "Epson-Stylus_C80");
}

#[test]
fn missing_driver_argument_fails() {
    let db = sample_db();
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "HP-LaserJet_4", "--diagnostics", "json"])
        .output()
        .expect("run combo");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: serde_json::Value = serde_json::from_str(&stderr).expect("valid json");
    assert_eq!(json[0]["id"], "FCX3003");
}

#[test]
fn markup_error_is_reported_with_file_and_line() {
    let db = sample_db();
    write(
        &db.path().join("db/source/opt/Broken.xml"),
        "<option type=\"bool\" id=\"opt/Broken\">\n  <arg<x>\n</option>\n",
    );
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "HP-LaserJet_4", "-d", "ljet4", "--diagnostics", "json"])
        .output()
        .expect("run combo");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: serde_json::Value = serde_json::from_str(&stderr).expect("valid json");
    assert_eq!(json[0]["id"], "FCX1001");
    assert_eq!(json[0]["context"]["line"], "2");
    assert!(
        json[0]["context"]["file"]
            .as_str()
            .is_some_and(|f| f.ends_with("Broken.xml"))
    );
}

#[test]
fn pretty_diagnostics_name_the_code() {
    let db = sample_db();
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "Epson-Stylus_C80", "-d", "ljet4", "--diagnostics", "pretty"])
        .output()
        .expect("run combo");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FCX3002"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("not supported by the driver ljet4"));
}

#[test]
fn constraint_warnings_do_not_fail_the_run() {
    let db = sample_db();
    write(
        &db.path().join("db/source/opt/Null.xml"),
        "<option type=\"bool\" id=\"opt/Null\">\n  <constraints>\n    <constraint sense=\"true\">\n    \
         </constraint>\n  </constraints>\n</option>\n",
    );
    let output = combo_cmd()
        .args(["-l", &lib(&db), "-p", "HP-LaserJet_4", "-d", "ljet4", "--diagnostics", "json"])
        .output()
        .expect("run combo");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: serde_json::Value = serde_json::from_str(&stderr).expect("valid json");
    assert_eq!(json[0]["id"], "FCX2001");
    assert_eq!(json[0]["severity"], "warn");
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("<foomatic>"));
}

#[test]
fn missing_database_root_is_reported_before_the_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("no-such-db");
    let output = combo_cmd()
        .args(["-l", &root.to_string_lossy(), "-p", "HP-LaserJet_4", "-d", "ljet4"])
        .args(["--diagnostics", "json"])
        .output()
        .expect("run combo");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let json: serde_json::Value = serde_json::from_str(&stderr).expect("valid json");
    assert_eq!(json[0]["id"], "FCX3004");
    assert_eq!(json[0]["severity"], "warn");
    assert_eq!(json[0]["context"]["root"], root.to_string_lossy().as_ref());
    assert_eq!(json[1]["severity"], "error");
}
