//! End-to-end tests for the `accel-sum` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use test_support::{KNOWN_ANSWERS, temp_file_with};

fn accel_sum() -> Command {
    let mut command = Command::cargo_bin("accel-sum").unwrap();
    command.env_remove("ACCEL_HASH_LOG");
    command
}

#[test]
fn help_lists_usage() {
    accel_sum()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("Usage:").and(predicate::str::contains("accel-sum")));
}

#[test]
fn stdin_is_hashed_when_no_files_given() {
    accel_sum()
        .args(["-a", "md5"])
        .write_stdin("abc")
        .assert()
        .success()
        .stdout("900150983cd24fb0d6963f7d28e17f72  -\n");
}

#[test]
fn known_answers_for_every_algorithm_and_engine() {
    for kat in test_support::short_known_answers().take(6) {
        let file = temp_file_with(&kat.message.to_vec());
        let name = file.path().to_str().unwrap().to_owned();
        for algorithm in ["md5", "sha1", "sha224", "sha256"] {
            for engine in ["software", "simulated"] {
                accel_sum()
                    .args(["-a", algorithm, "--engine", engine, &name])
                    .assert()
                    .success()
                    .stdout(format!(
                        "{}  {name}\n",
                        kat.expected(algorithm).unwrap()
                    ));
            }
        }
    }
}

#[test]
fn large_file_matches_table() {
    let kat = KNOWN_ANSWERS
        .iter()
        .find(|kat| kat.message.len() == 1_000_000)
        .unwrap();
    let file = temp_file_with(&kat.message.to_vec());
    accel_sum()
        .args(["-a", "sha1"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(kat.sha1));
}

#[test]
fn missing_file_exits_one_but_hashes_the_rest() {
    let present = temp_file_with(b"abc");
    let missing = present.path().with_extension("gone");
    accel_sum()
        .arg(&missing)
        .arg(present.path())
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad  ",
        ))
        .stderr(predicate::str::starts_with(format!(
            "accel-sum: {}: ",
            missing.display()
        )));
}

#[test]
fn usage_errors_exit_two() {
    accel_sum()
        .args(["-a", "crc32"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
    accel_sum()
        .args(["--busy-poll-limit", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("busy_poll_limit"));
}

#[test]
fn verbose_output_goes_to_stderr() {
    accel_sum()
        .args(["-v", "-a", "sha256"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855  -\n")
        .stderr(predicate::str::contains("session"));
}
