mod common;

use common::{handler, RecordingSink, ScriptedPresenter, Shown};
use newengine_assert::prompt::OkCancel;
use newengine_assert::{AssertHandler, AssertReport, Severity, Verdict};

#[test]
fn condition_precedes_message_on_its_own_line() {
    let r = AssertReport::new(Some("x>0"), Some("must be positive"), "f.cpp", 10);
    assert_eq!(r.compose_message(), "x>0\nmust be positive");
}

#[test]
fn single_field_is_verbatim() {
    assert_eq!(
        AssertReport::new(Some("ptr != null"), None, "f.cpp", 1).compose_message(),
        "ptr != null"
    );
    assert_eq!(
        AssertReport::new(None, Some("msg"), "f.cpp", 1).compose_message(),
        "msg"
    );
}

#[test]
fn log_line_layout() {
    let r = AssertReport::new(Some("a == b"), Some("mismatch"), "src/world.rs", 77);
    assert_eq!(
        r.log_line(),
        "ASSERTION FAILED:  a == b\nmismatch\n                      FILE: src/world.rs LINE: 77"
    );
}

#[test]
fn forced_report_logs_message_and_location() {
    let presenter = ScriptedPresenter::answering_two_way(OkCancel::Ok);
    let sink = RecordingSink::default();
    let h = handler(false, &presenter, &sink);

    let verdict = h.evaluate(&AssertReport::new(None, Some("msg"), "f.cpp", 42));
    assert_eq!(verdict, Verdict::Continue);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1, Severity::Assert);
    assert!(lines[0].0.starts_with("ASSERTION FAILED:  msg\n"));
    assert!(lines[0].0.contains("FILE: f.cpp LINE: 42"));

    assert_eq!(
        presenter.shown(),
        vec![Shown::OkCancel {
            title: "Assertion failed".to_string(),
            message: "msg".to_string(),
        }]
    );
}

#[test]
fn prompt_shows_diagnostic_without_location() {
    let presenter = ScriptedPresenter::answering_two_way(OkCancel::Ok);
    let sink = RecordingSink::default();
    let h = handler(false, &presenter, &sink);

    h.evaluate(&AssertReport::new(Some("x>0"), Some("must be positive"), "f.cpp", 10));

    match &presenter.shown()[0] {
        Shown::OkCancel { message, .. } => assert_eq!(message, "x>0\nmust be positive"),
        other => panic!("unexpected prompt {other:?}"),
    }
}
