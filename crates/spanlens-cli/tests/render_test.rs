use spanlens::config::DisplayConfig;
use spanlens::presentation::view_models::CompareViewModel;
use spanlens::presentation::{CommandResultViewModel, ConsoleRenderer, Palette};
use spanlens::types::OutputFormat;
use spanlens_engine::analyze_file;
use spanlens_testing::span_from_texts;
use spanlens_types::{Session, SessionSource};

#[test]
fn test_single_span_session_text() {
    let mut session = Session::new("abc", vec![span_from_texts("only", 0, &["hi"])]);
    session.session_number = Some(1);
    session.session_id = Some("abc".to_string());
    session.duration_seconds = Some(1.5);
    session.unique_traces = Some(1);

    let vm = CompareViewModel {
        source: "s.jsonl".to_string(),
        selected: None,
        report: analyze_file(&SessionSource {
            sessions: vec![session],
            skipped_records: 0,
        }),
        display: DisplayConfig::default(),
    };

    let text = ConsoleRenderer::new(OutputFormat::Plain)
        .with_palette(Palette::plain())
        .render_to_string(&CommandResultViewModel::new(vm))
        .expect("render");

    insta::assert_snapshot!(text, @r"
    Loaded 1 session(s) from s.jsonl

    ════════════════════════════════════════════════════════════════════════════════
    SESSION 1: abc
    ════════════════════════════════════════════════════════════════════════════════
    Total spans: 1
    Duration: 1.50s
    Unique traces: 1

    No pairs to compare

    Skipped 0 malformed record(s)
    ");
}
