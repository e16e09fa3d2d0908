//! Integration tests for guarded execution
//!
//! Covers the public surface end to end:
//! - Success and failure outcomes
//! - Nested guards
//! - Concurrent guards on independent threads
//! - Loading guard configuration from disk

use rstest::rstest;
use serde_json::{Map, Value, json};
use tempfile::TempDir;
use unwind_guard::{Error, Exception, ExceptionGuard, GuardConfig, Outcome, catch, run};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("unwind_guard=trace")
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Outcome Tests
// =============================================================================

#[test]
fn test_noop_work_succeeds() {
    init_tracing();
    assert_eq!(run(|| {}), Outcome::Success);
}

#[test]
fn test_invalid_argument_becomes_failure() {
    init_tracing();
    let outcome = run(|| Exception::new("InvalidArgument", "index out of bounds").raise());

    match outcome {
        Outcome::Failure(err) => {
            assert_eq!(err.domain, "InvalidArgument");
            assert_eq!(err.message, "index out of bounds");
            assert!(err.detail.is_empty());
        }
        Outcome::Success => panic!("Expected failure"),
    }
}

#[rstest]
#[case::empty(Map::new())]
#[case::flat(json!({"index": 4, "len": 2}).as_object().cloned().unwrap())]
#[case::nested(json!({"ctx": {"ids": [1, 2, 3], "ok": false}, "note": null}).as_object().cloned().unwrap())]
fn test_user_info_carried_into_detail(#[case] info: Map<String, Value>) {
    let outcome = run(|| {
        Exception::new("Custom", "with info")
            .with_user_info(info.clone())
            .raise()
    });

    let err = outcome.error().expect("expected failure");
    assert_eq!(err.detail, info);
}

#[rstest]
#[case::str_payload("static message")]
#[case::formatted("value 7 rejected")]
fn test_plain_panic_message(#[case] message: &str) {
    let owned = message.to_string();
    let err = catch::<_, ()>(move || panic!("{owned}")).unwrap_err();
    assert_eq!(err.domain, "RustPanic");
    assert_eq!(err.message, message);
}

#[test]
fn test_non_string_payload() {
    let err = catch::<_, ()>(|| std::panic::panic_any(404_u16)).unwrap_err();
    assert_eq!(err.domain, "RustPanic");
    assert_eq!(err.message, "unknown panic");
}

#[test]
fn test_code_carried_through() {
    let err = catch::<_, ()>(|| Exception::new("Http", "not found").with_code(404).raise())
        .unwrap_err();
    assert_eq!(err.code, Some(404));
}

#[test]
fn test_same_exception_classified_identically() {
    let work = || {
        Exception::new("Overflow", "counter wrapped")
            .with_info("max", u32::MAX)
            .raise()
    };

    let first = run(work).error().cloned().unwrap();
    let second = run(work).error().cloned().unwrap();

    assert_eq!(first.domain, second.domain);
    assert_eq!(first.code, second.code);
    assert_eq!(first.message, second.message);
    assert_eq!(first.detail, second.detail);
}

#[test]
fn test_catch_propagates_with_question_mark() {
    fn parse_guarded(input: &str) -> Result<u8, unwind_guard::GuardError> {
        let value = catch(|| {
            input
                .parse::<u8>()
                .unwrap_or_else(|_| Exception::new("ParseError", "not a u8").raise())
        })?;
        Ok(value)
    }

    assert_eq!(parse_guarded("12").unwrap(), 12);
    assert_eq!(parse_guarded("300").unwrap_err().domain, "ParseError");
}

// =============================================================================
// Nesting
// =============================================================================

#[test]
fn test_inner_failure_absorbed_by_outer_success() {
    let mut inner = None;
    let outer = run(|| {
        inner = Some(run(|| Exception::new("Inner", "failed inside").raise()));
    });

    assert_eq!(outer, Outcome::Success);
    let inner = inner.expect("inner guard should have run");
    assert_eq!(inner.error().map(|e| e.domain.as_str()), Some("Inner"));
}

#[test]
fn test_outer_failure_after_inner_success() {
    let outer = run(|| {
        assert!(run(|| {}).is_success());
        Exception::new("Outer", "failed after inner").raise();
    });

    assert_eq!(outer.error().map(|e| e.message.as_str()), Some("failed after inner"));
}

#[test]
fn test_mixed_guard_configs_nest() {
    let loud = ExceptionGuard::new(GuardConfig {
        quiet: false,
        panic_domain: "Loud".to_string(),
        ..GuardConfig::default()
    });

    let outer = run(|| {
        let err = loud.catch::<_, ()>(|| panic!("inner")).unwrap_err();
        assert_eq!(err.domain, "Loud");
        panic!("outer");
    });

    let err = outer.error().unwrap();
    assert_eq!(err.domain, "RustPanic");
    assert_eq!(err.message, "outer");
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_guards_do_not_cross_contaminate() {
    let guard = ExceptionGuard::default();

    let outcomes: Vec<(usize, Outcome)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let guard = &guard;
                s.spawn(move || {
                    let outcome = guard.run(|| {
                        if i % 2 == 1 {
                            Exception::new(format!("Thread{i}"), format!("reason {i}"))
                                .with_info("thread", i)
                                .raise();
                        }
                    });
                    (i, outcome)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.len(), 16);
    for (i, outcome) in outcomes {
        if i % 2 == 0 {
            assert!(outcome.is_success(), "thread {i} should succeed");
        } else {
            let err = outcome.error().unwrap();
            assert_eq!(err.domain, format!("Thread{i}"));
            assert_eq!(err.message, format!("reason {i}"));
            assert_eq!(err.detail["thread"], json!(i));
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_load_config_from_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("unwind-guard.yaml"),
        "panic_domain: AppPanic\ncapture_location: false\n",
    )
    .unwrap();

    let config = GuardConfig::load(dir.path()).unwrap();
    assert_eq!(config.panic_domain, "AppPanic");
    assert!(!config.capture_location);
    assert!(config.quiet);

    let err = ExceptionGuard::new(config)
        .catch::<_, ()>(|| panic!("configured"))
        .unwrap_err();
    assert_eq!(err.domain, "AppPanic");
    assert!(err.location.is_none());
}

#[test]
fn test_load_config_from_file_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(&path, "quiet: false\n").unwrap();

    let config = GuardConfig::load(&path).unwrap();
    assert!(!config.quiet);
    assert_eq!(config.panic_domain, "RustPanic");
}

#[test]
fn test_load_config_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = GuardConfig::load(dir.path());
    assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
}
