use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::prelude::*;

fn fixture(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sim68k_{name}_{}.a68", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("sim68k").unwrap();
    cmd.assert().success();
}

#[test]
fn check_accepts_a_valid_program() {
    let path = fixture("valid", "move.l #1,d0\nend\n");
    let mut cmd = Command::cargo_bin("sim68k").unwrap();
    cmd.arg("check").arg(&path).assert().success();
    fs::remove_file(path).unwrap();
}

#[test]
fn check_rejects_a_program_without_end() {
    let path = fixture("no_end", "move.l #1,d0\n");
    let mut cmd = Command::cargo_bin("sim68k").unwrap();
    cmd.arg("check").arg(&path).assert().failure();
    fs::remove_file(path).unwrap();
}

#[test]
fn run_prints_final_register_state() {
    let path = fixture("run", "org $1000\nmove.l #10,d0\nadd.l #5,d0\nend\n");
    let mut cmd = Command::cargo_bin("sim68k").unwrap();
    let assert = cmd.arg("run").arg(&path).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("d0 0000000f"));
    fs::remove_file(path).unwrap();
}

#[test]
fn run_fails_on_divide_by_zero() {
    let path = fixture("div_zero", "move.l #7,d0\ndivu #0,d0\nend\n");
    let mut cmd = Command::cargo_bin("sim68k").unwrap();
    cmd.arg("run").arg(&path).assert().failure();
    fs::remove_file(path).unwrap();
}
