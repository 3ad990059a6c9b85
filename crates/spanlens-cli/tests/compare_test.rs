use anyhow::Result;
use predicates::prelude::*;
use serde_json::Value;
use spanlens_testing::{SessionFixture, SpanFixture, TestWorld, to_jsonl};

fn growing_session(number: u64, id: &str) -> Value {
    SessionFixture::new(number)
        .id(id)
        .span(
            SpanFixture::new("span-a")
                .name("litellm_request")
                .input_message("system", "You are a helpful assistant")
                .input_message("user", "hello"),
        )
        .span(
            SpanFixture::new("span-b")
                .name("litellm_request")
                .input_message("system", "You are a helpful assistant")
                .input_message("user", "hello")
                .input_message("user", "and a follow up"),
        )
        .to_value()
}

#[test]
fn test_compare_reports_full_containment_and_duplication() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("sessions.jsonl", &to_jsonl(&[growing_session(1, "alpha")]))?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSION 1: alpha"))
        .stdout(predicate::str::contains("Span 1 → Span 2: ✅ FULLY CONTAINED"))
        .stdout(predicate::str::contains("Found in Span 2: 2 (100.0%)"))
        .stdout(predicate::str::contains(
            "DUPLICATION DETECTED: 2 messages from previous span",
        ))
        .stdout(predicate::str::contains("and a follow up"))
        .stdout(predicate::str::contains("Message growth factor: 1.5x (from 2 to 3)"))
        .stdout(predicate::str::contains("Skipped 0 malformed record(s)"));

    Ok(())
}

#[test]
fn test_compare_selects_session_by_id() -> Result<()> {
    let world = TestWorld::new();
    let content = to_jsonl(&[growing_session(1, "alpha"), growing_session(2, "beta")]);
    let path = world.write_file("sessions.jsonl", &content)?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .arg("--session")
        .arg("beta")
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSION 2: beta"))
        .stdout(predicate::str::contains("SESSION 1: alpha").not());

    Ok(())
}

#[test]
fn test_compare_unknown_session_fails_without_report() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("sessions.jsonl", &to_jsonl(&[growing_session(1, "alpha")]))?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .arg("--session")
        .arg("99")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Session 99 not found"));

    Ok(())
}

#[test]
fn test_compare_single_span_session() -> Result<()> {
    let world = TestWorld::new();
    let session = SessionFixture::new(1)
        .id("solo")
        .span(SpanFixture::new("only").input_message("user", "hi"))
        .to_value();
    let path = world.write_file("sessions.jsonl", &to_jsonl(&[session]))?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No pairs to compare"));

    Ok(())
}

#[test]
fn test_compare_session_without_spans() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("sessions.jsonl", "{\"session_number\":1,\"spans\":[]}\n")?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSION 1: unknown"))
        .stdout(predicate::str::contains("Total spans: 0"))
        .stdout(predicate::str::contains("No pairs to compare"));

    Ok(())
}

#[test]
fn test_compare_skips_malformed_lines() -> Result<()> {
    let world = TestWorld::new();
    let content = format!(
        "{}not json at all\n",
        to_jsonl(&[growing_session(1, "alpha")])
    );
    let path = world.write_file("sessions.jsonl", &content)?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SESSION 1: alpha"))
        .stdout(predicate::str::contains("Skipped 1 malformed record(s)"));

    Ok(())
}

#[test]
fn test_compare_rejects_file_without_valid_records() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("sessions.jsonl", "garbage\n{broken\n")?;

    world
        .command()
        .arg("compare")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid records"));

    Ok(())
}

#[test]
fn test_compare_missing_file_names_path() -> Result<()> {
    let world = TestWorld::new();

    world
        .command()
        .arg("compare")
        .arg("does-not-exist.jsonl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.jsonl"));

    Ok(())
}

#[test]
fn test_compare_json_output() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("sessions.jsonl", &to_jsonl(&[growing_session(1, "alpha")]))?;

    let output = world
        .command()
        .arg("--format")
        .arg("json")
        .arg("compare")
        .arg(&path)
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    let session = &json["content"]["sessions"][0];
    assert_eq!(session["session_key"], "alpha");
    assert_eq!(session["pairs"][0]["classification"], "FULLY_CONTAINED");
    assert_eq!(session["pairs"][0]["contained_count"], 2);
    assert_eq!(session["pairs"][0]["message_comparison"]["new_count"], 1);
    assert_eq!(json["content"]["skipped_records"], 0);

    Ok(())
}
