//! Tests against the process-wide manager. They share one slot, so each test holds
//! `GLOBAL` for its whole body and leaves a non-interactive handler installed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;

use newengine_assert::{
    assert_condition, assert_forced, assert_message, AssertReport, AssertionManager, Verdict,
};

static GLOBAL: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    condition: Option<String>,
    message: Option<String>,
    file: String,
    line: u32,
}

fn recording(verdict: Verdict) -> Arc<Mutex<Vec<Seen>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let out = seen.clone();
    AssertionManager::instance().set_handler_fn(move |r: &AssertReport<'_>| {
        out.lock().push(Seen {
            condition: r.condition.map(str::to_string),
            message: r.message.map(str::to_string),
            file: r.file.to_string(),
            line: r.line,
        });
        verdict
    });
    seen
}

#[test]
fn same_instance_from_every_thread() {
    let _g = GLOBAL.lock();
    let barrier = Arc::new(Barrier::new(8));

    let addrs: Vec<usize> = (0..8)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                AssertionManager::instance() as *const AssertionManager as usize
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|t| t.join().unwrap())
        .collect();

    let here = AssertionManager::instance() as *const AssertionManager as usize;
    assert!(addrs.iter().all(|&a| a == here));
}

#[test]
fn custom_handler_verdict_is_returned_unchanged() {
    let _g = GLOBAL.lock();
    let m = AssertionManager::instance();

    let seen = recording(Verdict::Halt);
    assert_eq!(m.report(Some("x>0"), Some("must be positive"), "f.cpp", 10), Verdict::Halt);

    let seen_continue = recording(Verdict::Continue);
    assert_eq!(m.report(None, Some("msg"), "f.cpp", 42), Verdict::Continue);

    assert_eq!(
        seen.lock().as_slice(),
        &[Seen {
            condition: Some("x>0".to_string()),
            message: Some("must be positive".to_string()),
            file: "f.cpp".to_string(),
            line: 10,
        }]
    );
    assert_eq!(seen_continue.lock().len(), 1);
}

#[test]
fn handler_installed_on_one_thread_is_seen_on_another() {
    let _g = GLOBAL.lock();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = calls.clone();
    thread::spawn(move || {
        AssertionManager::instance().set_handler_fn(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Verdict::Continue
        });
    })
    .join()
    .unwrap();

    let verdict = thread::spawn(|| {
        AssertionManager::instance().report(Some("ready"), None, "boot.rs", 3)
    })
    .join()
    .unwrap();

    assert_eq!(verdict, Verdict::Continue);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn handler_getter_returns_installed_handler() {
    let _g = GLOBAL.lock();
    let m = AssertionManager::instance();

    m.set_handler_fn(|_| Verdict::Continue);
    let h = m.handler();
    assert_eq!(h.evaluate(&AssertReport::forced("m", "f.rs", 1)), Verdict::Continue);
}

#[cfg(not(feature = "disabled"))]
#[test]
fn macros_report_only_failed_checks() {
    let _g = GLOBAL.lock();
    let seen = recording(Verdict::Continue);

    let hp = -3;
    assert_condition!(hp < 0);
    assert_condition!(hp >= 0);
    assert_message!(hp >= 0, "hp underflow: {}", hp);
    assert_forced!("unreachable state {}", "Loading");

    let seen = seen.lock().clone();
    assert_eq!(seen.len(), 3);

    assert_eq!(seen[0].condition.as_deref(), Some("hp >= 0"));
    assert_eq!(seen[0].message, None);
    assert!(seen[0].file.ends_with("manager_global.rs"));

    assert_eq!(seen[1].condition.as_deref(), Some("hp >= 0"));
    assert_eq!(seen[1].message.as_deref(), Some("hp underflow: -3"));

    assert_eq!(seen[2].condition, None);
    assert_eq!(seen[2].message.as_deref(), Some("unreachable state Loading"));
    assert!(seen[2].line > seen[1].line);
}

#[test]
fn passing_check_does_not_evaluate_message() {
    let _g = GLOBAL.lock();
    let seen = recording(Verdict::Continue);
    let formatted = AtomicUsize::new(0);

    let count = || {
        formatted.fetch_add(1, Ordering::SeqCst);
        "detail"
    };
    assert_message!(1 + 1 == 2, "{}", count());

    assert_eq!(formatted.load(Ordering::SeqCst), 0);
    assert!(seen.lock().is_empty());
}

#[test]
fn reset_installs_a_fresh_default_handler() {
    let _g = GLOBAL.lock();
    let m = AssertionManager::instance();

    m.set_handler_fn(|_| Verdict::Continue);
    let custom = m.handler();
    m.reset_handler();
    assert!(!Arc::ptr_eq(&custom, &m.handler()));

    m.set_handler_fn(|_| Verdict::Continue);
}

#[cfg(not(feature = "disabled"))]
#[test]
fn asserts_are_compiled_in_by_default() {
    assert!(newengine_assert::asserts_enabled());
}

#[cfg(feature = "disabled")]
#[test]
fn disabled_macros_neither_evaluate_nor_report() {
    let _g = GLOBAL.lock();
    let seen = recording(Verdict::Halt);
    let evaluated = AtomicUsize::new(0);

    let failing = || {
        evaluated.fetch_add(1, Ordering::SeqCst);
        false
    };
    assert_condition!(failing());
    assert_message!(failing(), "{}", evaluated.fetch_add(1, Ordering::SeqCst));
    assert_forced!("{}", evaluated.fetch_add(1, Ordering::SeqCst));

    assert!(!newengine_assert::asserts_enabled());
    assert_eq!(evaluated.load(Ordering::SeqCst), 0);
    assert!(seen.lock().is_empty());

    AssertionManager::instance().set_handler_fn(|_| Verdict::Continue);
}
