use std::fs;
use std::path::{Path, PathBuf};

use predicates::prelude::*;
use tempfile::tempdir;

fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).expect("write fixture");
    path
}

fn bytelens() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("bytelens")
}

/// `detect` should print the PNG label for a PNG header.
#[test]
fn detect_reports_png() {
    let dir = tempdir().expect("tempdir");
    let png = write_file(dir.path(), "tiny.png", &[0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]);

    bytelens()
        .arg("detect")
        .arg(&png)
        .assert()
        .success()
        .stdout(predicate::str::contains("PNG Image"));
}

/// `detect` on a missing path should exit non-zero with a not-found message.
#[test]
fn detect_fails_for_missing_file() {
    let dir = tempdir().expect("tempdir");
    bytelens()
        .arg("detect")
        .arg(dir.path().join("missing.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

/// `analyze --json` should emit machine-readable statistics.
#[test]
fn analyze_json_includes_counts() {
    let dir = tempdir().expect("tempdir");
    let png = write_file(dir.path(), "tiny.png", &[0x89, 0x50, 0x4E, 0x47, 0, 0, 0, 0]);

    let output = bytelens().args(["analyze", "--json"]).arg(&png).output().expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["unique_bytes"], 5);
    assert_eq!(value["null_bytes"], 4);
    assert_eq!(value["file_type"], "PNG Image");
}

/// `patterns` lists the mixed repeat and never the uniform one.
#[test]
fn patterns_lists_repeated_sequence() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "aaab.txt", b"AAAABAAAABAAAAB");

    bytelens()
        .arg("patterns")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("41414142 (length 4): 3 times at [0x1, 0x6, 0xB]"))
        .stdout(predicate::str::contains("41414141 ").not());
}

/// `dump` on a short file prints one padded line.
#[test]
fn dump_pads_short_file() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "four.bin", b"\x00\x01AB");

    bytelens()
        .args(["dump", "--lines", "1"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("00000000  00 01 41 42 "))
        .stdout(predicate::str::contains("|..AB|"));
}

/// `dump --offset` accepts a 0x-prefixed offset.
#[test]
fn dump_accepts_hex_offset() {
    let dir = tempdir().expect("tempdir");
    let data: Vec<u8> = (0..64u8).collect();
    let file = write_file(dir.path(), "seq.bin", &data);

    bytelens()
        .args(["dump", "--offset", "0x20", "--lines", "1"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("00000020  20 21"));
}

/// `pages` prints one header per page and no empty trailing page.
#[test]
fn pages_prints_headers() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "pages.bin", &[0x41; 48]);

    bytelens()
        .args(["pages", "--lines-per-page", "2"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Page 1 (offset 0x00000000) ---"))
        .stdout(predicate::str::contains("--- Page 2 (offset 0x00000020) ---"))
        .stdout(predicate::str::contains("--- Page 3").not());
}

/// `search --hex` marks the matching line and leaves context lines plain.
#[test]
fn search_highlights_match_line() {
    let dir = tempdir().expect("tempdir");
    let data: Vec<u8> = (0..64u8).collect();
    let file = write_file(dir.path(), "seq.bin", &data);

    bytelens()
        .args(["search", "--hex", "14 15 16", "--context", "1"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Match at offset 0x00000014:"))
        .stdout(predicate::str::contains(">>> 00000010"))
        .stdout(predicate::str::contains("    00000000"));
}

/// `search --text` searches for the literal bytes of the text.
#[test]
fn search_text_pattern() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "hello.txt", b"say hello world");

    bytelens()
        .args(["search", "--text", "hello"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 match(es) for 68656c6c6f"));
}

/// Malformed hex should fail before the file is even looked up.
#[test]
fn search_rejects_bad_hex_before_touching_file() {
    let dir = tempdir().expect("tempdir");
    bytelens()
        .args(["search", "--hex", "zz"])
        .arg(dir.path().join("missing.bin"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid hex pattern"))
        .stderr(predicate::str::contains("File not found").not());
}

/// `search` needs exactly one of `--hex` and `--text`.
#[test]
fn search_requires_exactly_one_pattern_kind() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "x.bin", b"abc");
    bytelens().arg("search").arg(&file).assert().failure();
    bytelens()
        .args(["search", "--hex", "61", "--text", "a"])
        .arg(&file)
        .assert()
        .failure();
}

/// `info --json` should include checksums and the signature bytes.
#[test]
fn info_json_has_checksums() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "abc.txt", b"abc");

    bytelens()
        .args(["info", "--json"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("900150983cd24fb0d6963f7d28e17f72"))
        .stdout(predicate::str::contains("\"signature\": \"61 62 63\""));
}

/// `info` text output should list the SHA-1 digest next to the others.
#[test]
fn info_text_lists_sha1() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "abc.txt", b"abc");

    bytelens()
        .arg("info")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("SHA-1: a9993e364706816aba3e25717850c26c9cd0d89d"));
}

/// `report --output` should write the report file.
#[test]
fn report_writes_output_file() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "aaab.txt", b"AAAABAAAABAAAAB");
    let out = dir.path().join("report.txt");

    bytelens().arg("report").arg(&file).arg("--output").arg(&out).assert().success();

    let body = fs::read_to_string(&out).expect("report");
    assert!(body.starts_with("=== Binary File Analysis ==="));
    assert!(body.contains("Entropy: 0.7219"));
    assert!(body.contains("=== Repeated Patterns ==="));
}

/// `report` on a missing file should succeed and print the error line.
#[test]
fn report_for_missing_file_succeeds_with_error_line() {
    let dir = tempdir().expect("tempdir");
    bytelens()
        .arg("report")
        .arg(dir.path().join("gone.bin"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: File not found"));
}

/// `compare` lists differing offsets and reports identical files.
#[test]
fn compare_lists_difference() {
    let dir = tempdir().expect("tempdir");
    let original = vec![0u8; 256];
    let mut changed = original.clone();
    changed[100] = 0xFF;
    let a = write_file(dir.path(), "a.bin", &original);
    let b = write_file(dir.path(), "b.bin", &changed);

    bytelens()
        .arg("compare")
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("Files differ: contents differ"))
        .stdout(predicate::str::contains("0x00000064: 00 != FF"));

    bytelens()
        .arg("compare")
        .arg(&a)
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::contains("Files are identical (256 bytes checked)"));
}

/// Running `xor` twice with the same key should restore the input.
#[test]
fn xor_twice_restores_input() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "plain.txt", b"secret message");
    let encoded = dir.path().join("enc.bin");
    let decoded = dir.path().join("dec.txt");

    bytelens()
        .args(["xor", "--key", "2a17"])
        .arg(&file)
        .arg("--output")
        .arg(&encoded)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 14 bytes"));
    assert_ne!(fs::read(&encoded).expect("enc"), b"secret message");

    bytelens()
        .args(["xor", "--key", "2a17"])
        .arg(&encoded)
        .arg("--output")
        .arg(&decoded)
        .assert()
        .success();
    assert_eq!(fs::read(&decoded).expect("dec"), b"secret message");
}

/// `xor` with an empty key should fail without creating output.
#[test]
fn xor_rejects_empty_key() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "plain.txt", b"abc");
    let out = dir.path().join("out.bin");

    bytelens()
        .args(["xor", "--key", ""])
        .arg(&file)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure();
    assert!(!out.exists());
}

/// `shift --amount -1` should wrap bytes downward.
#[test]
fn shift_accepts_negative_amount() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "bytes.bin", &[0x00, 0x41]);
    let out = dir.path().join("shifted.bin");

    bytelens()
        .args(["shift", "--amount", "-1"])
        .arg(&file)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read(&out).expect("out"), vec![0xFF, 0x40]);
}

/// `invert` on a missing file should fail and leave no output behind.
#[test]
fn invert_missing_file_creates_no_output() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("inv.bin");

    bytelens()
        .arg("invert")
        .arg(dir.path().join("gone.bin"))
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
    assert!(!out.exists());
}

/// A JSON config file should change the dump line width.
#[test]
fn config_file_changes_line_width() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "seq.bin", &(0..16u8).collect::<Vec<_>>());
    let config = write_file(dir.path(), "bytelens.json", br#"{ "bytes_per_line": 8 }"#);

    bytelens()
        .arg("--config")
        .arg(&config)
        .args(["dump", "--lines", "2"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("00000008  08 09"));
}

/// A zero line width is rejected before any command runs.
#[test]
fn zero_bytes_per_line_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let file = write_file(dir.path(), "x.bin", b"abc");

    bytelens().args(["--bytes-per-line", "0", "dump"]).arg(&file).assert().failure();
}
