use anyhow::Result;
use predicates::prelude::*;
use serde_json::Value;
use spanlens_testing::{SpanFixture, TestWorld, to_jsonl};

fn trace_rows() -> String {
    to_jsonl(&[
        SpanFixture::new("root-span")
            .name("agent_turn")
            .kind("CHAIN")
            .trace("trace-1")
            .times(1_000, 5_000)
            .session("abc")
            .to_flat(),
        SpanFixture::new("child-span")
            .name("litellm_request")
            .kind("LLM")
            .trace("trace-1")
            .parent("root-span")
            .times(2_000, 3_000)
            .session("abc")
            .input_message("user", "refactor the parser")
            .output_value("done")
            .to_flat(),
        SpanFixture::new("orphan")
            .name("health_check")
            .kind("UNKNOWN")
            .times(500, 600)
            .to_flat(),
    ])
}

#[test]
fn test_analyze_explicit_file() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("export/traces.jsonl", &trace_rows())?;

    world
        .command()
        .arg("analyze")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total records: 3"))
        .stdout(predicate::str::contains("Unique sessions: 1"))
        .stdout(predicate::str::contains("Records without session ID: 1"))
        .stdout(predicate::str::contains("Records with parent_id: 1"))
        .stdout(predicate::str::contains("ROOT: agent_turn (CHAIN)"))
        .stdout(predicate::str::contains("litellm_request (LLM) - child-sp"));

    Ok(())
}

#[test]
fn test_analyze_auto_detects_phoenix_export() -> Result<()> {
    let world = TestWorld::new();
    world.write_file("phoenix/phoenix_traces.jsonl", &trace_rows())?;

    world
        .command()
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("🔍 Auto-detected"))
        .stdout(predicate::str::contains("phoenix_traces.jsonl"));

    Ok(())
}

#[test]
fn test_analyze_without_trace_data() -> Result<()> {
    let world = TestWorld::new();

    world
        .command()
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No trace data found"));

    Ok(())
}

#[test]
fn test_configured_backend_is_preferred() -> Result<()> {
    let world = TestWorld::new();
    world.write_file("phoenix/phoenix_traces.jsonl", &trace_rows())?;
    world.write_file("arize/arize_traces.jsonl", &trace_rows())?;
    world.write_file("spanlens.toml", "backend = \"arize\"\n")?;

    let output = world
        .command()
        .arg("--format")
        .arg("json")
        .arg("analyze")
        .output()?;
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["content"]["backend"], "arize");
    assert_eq!(json["content"]["auto_detected"], true);
    assert_eq!(json["content"]["total_records"], 3);

    Ok(())
}

#[test]
fn test_analyze_merges_tools_export() -> Result<()> {
    let world = TestWorld::new();
    let path = world.write_file("phoenix/phoenix_traces.jsonl", &trace_rows())?;
    world.write_file(
        "phoenix/phoenix_traces_tools.jsonl",
        &to_jsonl(&[SpanFixture::new("tool-span")
            .name("Read")
            .kind("TOOL")
            .session("abc")
            .to_flat()]),
    )?;

    world
        .command()
        .arg("analyze")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged tools"))
        .stdout(predicate::str::contains("Total records: 4"));

    Ok(())
}
