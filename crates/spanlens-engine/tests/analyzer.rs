use spanlens_engine::{
    AnalyzerOptions, Containment, Haystack, analyze_file, analyze_session, analyze_session_with,
    extract_chunks,
};
use spanlens_testing::span_from_texts;
use spanlens_types::{Message, Session, SessionSource, Span};

fn session(spans: Vec<Span>) -> Session {
    Session::new("test", spans)
}

#[test]
fn growth_scenario_is_fully_contained_at_chunk_starts() {
    let later = span_from_texts("s1", 1, &["p", "x", "y", "q"]);
    let report = analyze_session(&session(vec![
        span_from_texts("s0", 0, &["x", "y"]),
        later.clone(),
    ]));

    let pair = report.pair(0, 1).expect("pair 0 -> 1");
    assert_eq!(pair.containment.classification, Containment::FullyContained);
    assert_eq!(pair.containment.contained_count, 2);
    assert_eq!(pair.containment.total_count, 2);
    assert_eq!(pair.containment.overlap_percentage, 100.0);

    let starts = Haystack::build(&extract_chunks(&later)).chunk_starts();
    let offsets: Vec<usize> = pair.containment.contained.iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![starts[1], starts[2]]);

    let found_in: Vec<&str> = pair
        .containment
        .contained
        .iter()
        .map(|m| m.found_in.as_str())
        .collect();
    assert_eq!(found_in, vec!["input_msg[1]", "input_msg[2]"]);
}

#[test]
fn partial_scenario_reports_missing_chunk() {
    let report = analyze_session(&session(vec![
        span_from_texts("a", 0, &["keep me", "drop me"]),
        span_from_texts("b", 1, &["prefix keep me suffix"]),
    ]));

    let pair = report.pair(0, 1).expect("pair");
    assert_eq!(pair.containment.classification, Containment::Partial);
    assert_eq!(pair.containment.overlap_percentage, 50.0);
    assert_eq!(pair.containment.missing_count(), 1);
    assert_eq!(pair.containment.missing[0].text, "drop me");
}

#[test]
fn no_match_scenario() {
    let report = analyze_session(&session(vec![
        span_from_texts("a", 0, &["alpha"]),
        span_from_texts("b", 1, &["beta"]),
    ]));

    let pair = report.pair(0, 1).expect("pair");
    assert_eq!(pair.containment.classification, Containment::NotContained);
    assert_eq!(pair.containment.contained_count, 0);
    assert_eq!(pair.containment.overlap_percentage, 0.0);
}

#[test]
fn empty_earlier_span_is_vacuous() {
    let report = analyze_session(&session(vec![
        span_from_texts("empty", 0, &[]),
        span_from_texts("b", 1, &["anything"]),
    ]));

    let pair = report.pair(0, 1).expect("pair");
    assert_eq!(pair.containment.classification, Containment::Vacuous);
    assert_eq!(pair.containment.total_count, 0);
    assert_eq!(pair.containment.overlap_percentage, 100.0);
}

#[test]
fn span_is_fully_contained_in_itself() {
    let mut span = span_from_texts("a", 0, &["first", "second"]);
    span.attributes.input_value = Some("the input value".into());
    span.attributes.output_value = Some("and the output".into());
    let mut copy = span.clone();
    copy.span_id = "b".into();
    copy.sequence_index = 1;

    let report = analyze_session(&session(vec![span, copy]));
    let pair = report.pair(0, 1).expect("pair");
    assert_eq!(pair.containment.classification, Containment::FullyContained);
    assert_eq!(pair.containment.overlap_percentage, 100.0);
    assert_eq!(pair.containment.total_count, 4);
}

#[test]
fn offsets_point_at_the_matched_text() {
    let earlier = span_from_texts("a", 0, &["naïve café", "x"]);
    let later = span_from_texts("b", 1, &["préambule", "le naïve café ici", "x"]);
    let report = analyze_session(&session(vec![earlier, later.clone()]));

    let haystack = Haystack::build(&extract_chunks(&later));
    let pair = report.pair(0, 1).expect("pair");
    for found in &pair.containment.contained {
        let len = found.chunk.char_len();
        assert_eq!(haystack.slice_chars(found.offset, len), found.chunk.text);
    }
}

#[test]
fn pairs_only_run_forward() {
    let spans = vec![
        span_from_texts("c", 2, &["c"]),
        span_from_texts("a", 0, &["a"]),
        span_from_texts("b", 1, &["b"]),
    ];
    let report = analyze_session(&session(spans));

    let order: Vec<(usize, usize)> = report
        .pairs
        .iter()
        .map(|p| (p.earlier.sequence_index, p.later.sequence_index))
        .collect();
    assert_eq!(order, vec![(0, 1), (0, 2), (1, 2)]);
    assert!(
        report
            .pairs
            .iter()
            .all(|p| p.earlier.sequence_index < p.later.sequence_index)
    );
}

#[test]
fn tied_indexes_are_never_paired() {
    let report = analyze_session(&session(vec![
        span_from_texts("a", 0, &["a"]),
        span_from_texts("b", 0, &["b"]),
    ]));
    assert!(report.pairs.is_empty());
}

#[test]
fn message_comparison_only_on_adjacent_pairs() {
    let first = span_from_texts("a", 0, &["system", "hello"]);
    let second = span_from_texts("b", 1, &["system", "hello", "next question"]);
    let third = span_from_texts("c", 2, &["system", "hello", "next question", "more"]);
    let report = analyze_session(&session(vec![first, second, third]));

    assert!(report.pair(0, 1).expect("0-1").message_comparison.is_some());
    assert!(report.pair(1, 2).expect("1-2").message_comparison.is_some());
    assert!(report.pair(0, 2).expect("0-2").message_comparison.is_none());

    let comparison = report.comparison_with_previous(1).expect("comparison");
    assert_eq!(comparison.previous_count, 2);
    assert_eq!(comparison.current_count, 3);
    assert_eq!(comparison.duplicated_count, 2);
    assert_eq!(comparison.new_count, 1);
    assert_eq!(comparison.new_messages[0].text, "next question");
}

#[test]
fn message_comparison_ignores_role() {
    let mut first = Span::new("a", 0);
    first.attributes.input_messages = Some(vec![Message::new("user", "same text")]);
    let mut second = Span::new("b", 1);
    second.attributes.input_messages = Some(vec![Message::new("assistant", "same text")]);

    let report = analyze_session(&session(vec![first, second]));
    let comparison = report.comparison_with_previous(1).expect("comparison");
    assert_eq!(comparison.duplicated_count, 1);
    assert_eq!(comparison.new_count, 0);
}

#[test]
fn single_span_session_has_no_pairs() {
    let report = analyze_session(&session(vec![span_from_texts("only", 0, &["x"])]));
    assert!(report.pairs.is_empty());
    assert_eq!(report.span_count, 1);
}

#[test]
fn empty_session_has_no_pairs() {
    let report = analyze_session(&session(vec![]));
    assert!(report.pairs.is_empty());
    assert!(report.spans.is_empty());
    assert_eq!(report.span_count, 0);
    assert!(report.summary.message_growth.is_none());
    assert_eq!(report.summary.average_messages_per_span, 0.0);
}

#[test]
fn analysis_is_deterministic() {
    let build = || {
        session(vec![
            span_from_texts("a", 0, &["one", "two"]),
            span_from_texts("b", 1, &["one", "two", "three"]),
            span_from_texts("c", 2, &["two", "four"]),
        ])
    };
    assert_eq!(analyze_session(&build()), analyze_session(&build()));
}

#[test]
fn context_radius_is_configurable() {
    let spans = vec![
        span_from_texts("a", 0, &["needle"]),
        span_from_texts("b", 1, &["0123456789needle0123456789"]),
    ];
    let options = AnalyzerOptions { context_chars: 3 };
    let report = analyze_session_with(&session(spans), &options);
    let found = &report.pair(0, 1).expect("pair").containment.contained[0];
    assert_eq!(found.context, "789needle012");
}

#[test]
fn unbounded_context_radius_keeps_whole_haystack() {
    let spans = vec![
        span_from_texts("a", 0, &["needle"]),
        span_from_texts("b", 1, &["0123456789needle0123456789"]),
    ];
    let options = AnalyzerOptions {
        context_chars: usize::MAX,
    };
    let report = analyze_session_with(&session(spans), &options);
    let found = &report.pair(0, 1).expect("pair").containment.contained[0];
    assert_eq!(found.context, "0123456789needle0123456789");
}

#[test]
fn file_report_keeps_sessions_independent() {
    let mut first = Session::new("one", vec![
        span_from_texts("a", 0, &["x"]),
        span_from_texts("b", 1, &["x"]),
    ]);
    first.session_number = Some(1);
    let second = Session::new("two", vec![span_from_texts("c", 0, &["x"])]);

    let report = analyze_file(&SessionSource {
        sessions: vec![first, second],
        skipped_records: 3,
    });

    assert_eq!(report.keys().collect::<Vec<_>>(), vec!["one", "two"]);
    assert_eq!(report.skipped_records, 3);
    assert_eq!(report.get("one").expect("one").pairs.len(), 1);
    assert!(report.get("two").expect("two").pairs.is_empty());
    assert!(report.get("three").is_none());
}

#[test]
fn pair_reference_snapshot() {
    let report = analyze_session(&session(vec![
        span_from_texts("s0", 0, &["x"]),
        span_from_texts("s1", 1, &["x"]),
    ]));
    let pair = report.pair(0, 1).expect("pair");
    insta::assert_json_snapshot!(pair.earlier, @r#"
    {
      "sequence_index": 0,
      "span_id": "s0"
    }
    "#);
    insta::assert_snapshot!(
        format!("{} {}/{}", pair.containment.classification, pair.containment.contained_count, pair.containment.total_count),
        @"FULLY_CONTAINED 1/1"
    );
}
