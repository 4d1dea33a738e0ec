#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use rekrut::builders::presets;
use rekrut::Formula;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CANDIDATE: &str = r#"
[matura.BIO]
extended = 80.0

[matura.HIS]
extended = 90.0

[matura.POL]
basic = 70.0
"#;

fn rekrut() -> Command {
    Command::cargo_bin("rekrut").expect("binary should compile")
}

fn write_formula(dir: &Path, name: &str, formula: &Formula) -> PathBuf {
    let path = dir.join(name);
    fs::write(
        &path,
        serde_json::to_string_pretty(formula).expect("formula should serialize"),
    )
    .expect("formula should write");
    path
}

fn write_candidate(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("candidate.toml");
    fs::write(&path, content).expect("candidate should write");
    path
}

#[test]
fn cli_version_flag() {
    rekrut()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rekrut"));
}

#[test]
fn evaluate_requires_scores() {
    rekrut()
        .arg("evaluate")
        .arg("formula.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--scores"));
}

#[test]
fn evaluate_prints_markdown_report_and_succeeds() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(
        dir.path(),
        "psychologia.json",
        &presets::psychology("uw", "uw-psychologia"),
    );
    let scores = write_candidate(dir.path(), CANDIDATE);

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(&formula)
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Total score: 81.00 / 100.00"))
        .stdout(predicate::str::contains("Requirements: met"))
        .stdout(predicate::str::contains("- progress: 92%"));
}

#[test]
fn evaluate_json_format_exposes_flat_breakdown() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(
        dir.path(),
        "psychologia.json",
        &presets::psychology("uw", "uw-psychologia"),
    );
    let scores = write_candidate(dir.path(), CANDIDATE);

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(&formula)
        .arg("--scores")
        .arg(&scores)
        .arg("--format")
        .arg("json")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"total_score\": 81.0"))
        .stdout(predicate::str::contains("\"main_bio\": 40.0"));
}

#[test]
fn evaluate_exits_with_warning_code_when_disqualified() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(
        dir.path(),
        "lekarski.json",
        &presets::medicine("wum", "wum-lekarski"),
    );
    let scores = write_candidate(dir.path(), "[matura.CHEM]\nextended = 80.0\n");

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(&formula)
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing required subject: BIO"));
}

#[test]
fn evaluate_honors_project_config_decimals() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(
        dir.path(),
        "psychologia.json",
        &presets::psychology("uw", "uw-psychologia"),
    );
    let scores = write_candidate(dir.path(), CANDIDATE);
    fs::write(dir.path().join("rekrut.toml"), "[report]\ndecimals = 1\n")
        .expect("config should write");

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(&formula)
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Total score: 81.0 / 100.0"));
}

#[test]
fn evaluate_rejects_out_of_range_scores() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(dir.path(), "prawo.json", &presets::law("uw", "uw-prawo"));
    let scores = write_candidate(dir.path(), "[matura.POL]\nextended = 120.0\n");

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(&formula)
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid candidate scores"));
}

#[test]
fn evaluate_missing_formula_is_runtime_failure() {
    let dir = TempDir::new().expect("temp dir should be created");
    let scores = write_candidate(dir.path(), CANDIDATE);

    rekrut()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg(dir.path().join("missing.json"))
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: path does not exist"));
}

#[test]
fn validate_reports_clean_formula() {
    let dir = TempDir::new().expect("temp dir should be created");
    let formula = write_formula(dir.path(), "it.json", &presets::it("pw", "pw-informatyka"));

    rekrut()
        .arg("validate")
        .arg(&formula)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("validate: no issues"));
}

#[test]
fn validate_lists_issues_with_blocking_code() {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = dir.path().join("broken.toml");
    fs::write(
        &path,
        r#"
university_id = "uw"
program_id = "uw-broken"
stages = []

[metadata]
max_possible_score = -5.0
"#,
    )
    .expect("formula should write");

    rekrut()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[INVALID] stages"))
        .stdout(predicate::str::contains("metadata.max_possible_score"));
}

#[test]
fn compare_ranks_formulas_and_skips_broken_files() {
    let dir = TempDir::new().expect("temp dir should be created");
    let catalog = dir.path().join("formulas");
    fs::create_dir_all(&catalog).expect("catalog dir should create");
    write_formula(&catalog, "prawo.json", &presets::law("uw", "uw-prawo"));
    write_formula(
        &catalog,
        "psychologia.json",
        &presets::psychology("uw", "uw-psychologia"),
    );
    fs::write(catalog.join("broken.json"), "{").expect("broken file should write");
    let scores = write_candidate(dir.path(), CANDIDATE);

    let assert = rekrut()
        .current_dir(dir.path())
        .arg("compare")
        .arg("--scores")
        .arg(&scores)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("warning: skipping"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let psychology = stdout
        .find("uw-psychologia")
        .expect("psychology row should be printed");
    let law = stdout.find("uw-prawo").expect("law row should be printed");
    assert!(psychology < law, "rows should be sorted by score: {stdout}");
}

#[test]
fn parse_prints_formula_json() {
    rekrut()
        .arg("parse")
        .arg("0,5 × matematyka (R) + 0,5 × fizyka (R)")
        .arg("--program")
        .arg("pw-mechanika")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"program_id\": \"pw-mechanika\""))
        .stdout(predicate::str::contains("\"subject\": \"FIZ\""));
}

#[test]
fn parse_reports_unknown_subject() {
    rekrut()
        .arg("parse")
        .arg("0.5 × alchemia R")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown subject"));
}

#[test]
fn preset_prints_known_formula_and_rejects_unknown() {
    rekrut()
        .arg("preset")
        .arg("architecture")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"practical_exam\""));

    rekrut()
        .arg("preset")
        .arg("dance")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown preset: dance"));
}

#[test]
fn convert_maps_grades_to_percentages() {
    rekrut()
        .args(["convert", "--system", "ib", "--grade", "6"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("85.71"));

    rekrut()
        .args(["convert", "--system", "eb", "--grade", "11"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("EB grade must be between"));
}
