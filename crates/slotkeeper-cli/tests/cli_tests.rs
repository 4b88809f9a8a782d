//! Integration tests for the `slotkeeper` binary, each against a fresh
//! SQLite file in a temp directory.

// `Command::cargo_bin` is deprecated in recent assert_cmd releases.
#![allow(deprecated)]

use std::process::{self, Stdio};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const PROVIDER: &str = "6f1c8a52-3d0e-4b8f-9a4e-1d2c3b4a5f60";
const CLIENT: &str = "0b7e2d94-5a61-4c3f-8e2d-7a9b1c0d2e3f";
const MONDAY: &str = "2024-01-15";

struct Harness {
    _dir: TempDir,
    url: String,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        Self { _dir: dir, url }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("slotkeeper").unwrap();
        cmd.env_remove("SLOTKEEPER_DATABASE_URL")
            .env("RUST_LOG", "off")
            .args(["--database-url", &self.url]);
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).assert().success().get_output().clone();
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Monday 09:00-17:00 plus a 30 minute service; returns the service id.
    fn monday_setup(&self) -> String {
        self.json(&[
            "add-rule", "--provider", PROVIDER, "--weekday", "1", "--start", "09:00", "--end",
            "17:00",
        ]);
        let service = self.json(&[
            "add-service", "--provider", PROVIDER, "--name", "Haircut", "--price-cents", "2500",
            "--duration", "30",
        ]);
        service["id"].as_str().unwrap().to_string()
    }

    fn book(&self, service: &str, start: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "book", "--client", CLIENT, "--provider", PROVIDER, "--service", service,
                "--date", MONDAY, "--start", start,
            ])
            .assert()
    }
}

#[test]
fn book_prints_pending_booking_with_derived_end() {
    let h = Harness::new();
    let service = h.monday_setup();

    let output = h.book(&service, "09:00").success().get_output().clone();
    let booking: Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["slot"]["start"], "09:00");
    assert_eq!(booking["slot"]["end"], "09:30");
}

#[test]
fn overlapping_booking_is_rejected() {
    let h = Harness::new();
    let service = h.monday_setup();

    h.book(&service, "09:00").success();
    h.book(&service, "09:15")
        .failure()
        .stderr(predicate::str::contains("overlaps an existing booking"));
    h.book(&service, "09:30").success();
}

#[test]
fn booking_past_closing_is_rejected() {
    let h = Harness::new();
    let service = h.monday_setup();

    h.book(&service, "16:45")
        .failure()
        .stderr(predicate::str::contains("outside the provider's availability"));
}

#[test]
fn malformed_start_time_is_rejected() {
    let h = Harness::new();
    let service = h.monday_setup();

    h.book(&service, "9am")
        .failure()
        .stderr(predicate::str::contains("invalid time format"));
}

#[test]
fn cancel_frees_the_slot_and_cannot_repeat() {
    let h = Harness::new();
    let service = h.monday_setup();

    let output = h.book(&service, "10:00").success().get_output().clone();
    let booking: Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = booking["id"].as_str().unwrap();

    let cancelled = h.json(&["cancel", id]);
    assert_eq!(cancelled["status"], "cancelled");

    h.book(&service, "10:00").success();

    h.cmd()
        .args(["cancel", id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("accepts no further transitions"));
}

#[test]
fn reschedule_moves_booking() {
    let h = Harness::new();
    let service = h.monday_setup();

    let output = h.book(&service, "10:00").success().get_output().clone();
    let booking: Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = booking["id"].as_str().unwrap();

    let moved = h.json(&["reschedule", id, "--date", MONDAY, "--start", "11:00"]);
    assert_eq!(moved["status"], "rescheduled");
    assert_eq!(moved["slot"]["end"], "11:30");

    let shown = h.json(&["show", id]);
    assert_eq!(shown["slot"]["start"], "11:00");
}

#[test]
fn slots_skip_booked_times() {
    let h = Harness::new();
    let service = h.monday_setup();
    h.book(&service, "09:00").success();

    let slots = h.json(&[
        "slots", "--provider", PROVIDER, "--service", &service, "--date", MONDAY, "--step", "30",
    ]);
    let slots = slots.as_array().unwrap();

    assert_eq!(slots.len(), 15);
    assert_eq!(slots[0]["start"], "09:30");
}

#[test]
fn is_open_reports_containment() {
    let h = Harness::new();
    h.monday_setup();

    let open = h.json(&[
        "is-open", "--provider", PROVIDER, "--date", MONDAY, "--start", "16:30", "--duration",
        "30",
    ]);
    assert_eq!(open["open"], true);

    let closed = h.json(&[
        "is-open", "--provider", PROVIDER, "--date", MONDAY, "--start", "16:45", "--duration",
        "30",
    ]);
    assert_eq!(closed["open"], false);
}

#[test]
fn list_filters_by_status() {
    let h = Harness::new();
    let service = h.monday_setup();

    let output = h.book(&service, "09:00").success().get_output().clone();
    let first: Value = serde_json::from_slice(&output.stdout).unwrap();
    h.book(&service, "10:00").success();
    h.json(&["confirm", first["id"].as_str().unwrap()]);

    let confirmed = h.json(&["list", "--provider", PROVIDER, "--status", "confirmed"]);
    assert_eq!(confirmed.as_array().unwrap().len(), 1);

    let all = h.json(&["list", "--client", CLIENT]);
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[test]
fn unknown_booking_is_reported() {
    let h = Harness::new();
    h.cmd()
        .args(["show", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("booking not found"));
}

#[test]
fn remove_rule_closes_the_day() {
    let h = Harness::new();
    let rule = h.json(&[
        "add-rule", "--provider", PROVIDER, "--weekday", "1", "--start", "09:00", "--end", "17:00",
    ]);
    let rule_id = rule["id"].as_str().unwrap();

    let removed = h.json(&["remove-rule", rule_id]);
    assert_eq!(removed["removed"], rule_id);

    let rules = h.json(&["list-rules", "--provider", PROVIDER]);
    assert!(rules.as_array().unwrap().is_empty());
}

#[test]
fn concurrent_processes_book_a_slot_once() {
    let h = Harness::new();
    let service = h.monday_setup();

    let children: Vec<process::Child> = (0..10)
        .map(|_| {
            process::Command::new(env!("CARGO_BIN_EXE_slotkeeper"))
                .env_remove("SLOTKEEPER_DATABASE_URL")
                .env("RUST_LOG", "off")
                .args(["--database-url", &h.url])
                .args([
                    "book", "--client", CLIENT, "--provider", PROVIDER, "--service", &service,
                    "--date", MONDAY, "--start", "10:00",
                ])
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .unwrap()
        })
        .collect();

    let mut booked = 0;
    for child in children {
        let output = child.wait_with_output().unwrap();
        if output.status.success() {
            booked += 1;
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(
                stderr.contains("overlaps an existing booking"),
                "unexpected failure: {stderr}"
            );
        }
    }
    assert_eq!(booked, 1);

    let stored = h.json(&["list", "--provider", PROVIDER]);
    assert_eq!(stored.as_array().unwrap().len(), 1);
}

#[test]
fn oversized_duration_is_rejected() {
    let h = Harness::new();
    h.cmd()
        .args([
            "add-service", "--provider", PROVIDER, "--name", "Forever", "--duration",
            "4294967295",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration runs past midnight"));

    h.cmd()
        .args([
            "is-open", "--provider", PROVIDER, "--date", MONDAY, "--start", "09:00", "--duration",
            "4294967295",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duration runs past midnight"));
}

#[test]
fn huge_slot_step_lists_first_start_only() {
    let h = Harness::new();
    let service = h.monday_setup();

    let slots = h.json(&[
        "slots", "--provider", PROVIDER, "--service", &service, "--date", MONDAY, "--step",
        "4294967295",
    ]);
    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["start"], "09:00");
}

#[test]
fn far_page_is_empty() {
    let h = Harness::new();
    let service = h.monday_setup();
    h.book(&service, "09:00").success();

    let page = h.json(&["list", "--provider", PROVIDER, "--page", "100000000"]);
    assert!(page.as_array().unwrap().is_empty());
}
