use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn posgrep() -> Command {
    Command::cargo_bin("posgrep").unwrap()
}

fn file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn prints_matches_with_position_and_context() {
    let file = file_with("nothing here\nsay abbc now\n");
    posgrep()
        .arg("ab*c")
        .arg(file.path())
        .assert()
        .success()
        .stdout("2:5: say [abbc] now\n");
}

#[test]
fn reads_standard_input() {
    posgrep()
        .args(["-E", "a|b"])
        .write_stdin("xaxb")
        .assert()
        .success()
        .stdout("1:2: x[a]xb\n1:4: xax[b]\n");
}

#[test]
fn escapes_newlines_in_matched_text() {
    posgrep()
        .arg(r"c\nd")
        .write_stdin("abc\ndef")
        .assert()
        .success()
        .stdout("1:3: ab[c\\nd]ef\n");
}

#[test]
fn counts_matches() {
    posgrep()
        .args(["--count", "o"])
        .write_stdin("foo boo")
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn prefixes_names_with_several_files() {
    let one = file_with("abc");
    let two = file_with("xyz");
    posgrep()
        .args(["-c", "b"])
        .arg(one.path())
        .arg(two.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(":1\n").and(predicate::str::contains(":0\n")));
}

#[test]
fn no_match_exits_with_one() {
    posgrep()
        .arg("zzz")
        .write_stdin("abc")
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn bad_pattern_exits_with_two() {
    posgrep()
        .arg("(ab")
        .write_stdin("ab")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unbalanced parenthesis at (1, 1)"));
}

#[test]
fn missing_file_exits_with_two() {
    posgrep()
        .args(["a", "/definitely/not/here"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/definitely/not/here"));
}

#[test]
fn dumps_automaton_on_request() {
    posgrep()
        .args(["--dump-automaton", "ab*"])
        .write_stdin("ab")
        .assert()
        .success()
        .stderr(predicate::str::contains("first: {0}"));
}
