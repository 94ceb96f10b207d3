use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

mod common;

const HEADER: &str = "event,session,customer,store,total,recurring,method,form";

#[test]
fn test_single_option_skip_flow() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "render,s1,1,1,25.00,,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path())
        .arg("--skip-single-option")
        .arg("--providers")
        .arg("invoice");

    // Invoice is the only method and needs no explicit selection.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,render,true,true,invoice,,"));
}

#[test]
fn test_recurring_cart_narrows_to_supporting_method() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "render,s1,1,1,18.00,true,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path())
        .arg("--skip-single-option")
        .arg("--providers")
        .arg("cod,invoice");

    // Cash on delivery cannot charge recurring carts, so invoice is the
    // single remaining candidate.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s1,render,true,true,invoice,,"));
}

#[test]
fn test_quick_checkout_from_order_history() {
    let mut orders = NamedTempFile::new().unwrap();
    writeln!(orders, "id,customer,store,payment_method,placed_at,reference").unwrap();
    writeln!(orders, "1,3,1,invoice,1700000000,").unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "render,s3,3,1,30.00,,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path())
        .arg("--quick-checkout")
        .arg("--orders")
        .arg(orders.path());

    cmd.assert().success().stdout(predicate::str::contains(
        "s3,render,true,true,invoice,Payment by invoice,",
    ));
}

#[test]
fn test_quick_checkout_from_preferred_method() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "render,s4,4,1,12.00,,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path())
        .arg("--quick-checkout")
        .arg("--preferred")
        .arg("4=INVOICE");

    // Matched case-insensitively; adoption sets no summary.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s4,render,true,true,invoice,,"));
}

#[test]
fn test_invalid_submission_reports_field_errors() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "submit,s5,5,1,40.00,,card,number=123;holder=").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("s5,submit,false,false,card,"))
        .stdout(predicate::str::contains("number: Card number is too short"))
        .stdout(predicate::str::contains("holder: Card holder is required"));
}

#[test]
fn test_skip_decision_outlives_catalog_total_changes() {
    // The same session renders twice; the cart total changing in between
    // must not change the cached skip decision of the step instance.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "render,s6,6,1,0,,,").unwrap();
    writeln!(file, "render,s6,6,1,99.00,,,").unwrap();

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(file.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let skipped_rows = text
        .lines()
        .filter(|line| line.starts_with("s6,render,false,true"))
        .count();
    assert_eq!(skipped_rows, 2);
}

#[test]
fn test_generated_scenario_produces_one_row_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated.csv");
    common::generate_render_scenario(&path, 40).expect("Failed to generate scenario");

    let mut cmd = Command::new(cargo_bin!("paystep"));
    cmd.arg(&path);

    let output = cmd.output().expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    // Header plus one verdict per event.
    assert_eq!(stdout.lines().count(), 41);
    for line in stdout.lines().skip(1) {
        assert!(line.contains(",render,false,false,"));
    }
}
