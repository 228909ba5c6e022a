// crates/xbe-harness/src/rejection_tests.rs
// ============================================================================
// Module: Rejection Classification Unit Tests
// Description: Unit coverage for substring classification and policies.
// Purpose: Ensure expected refusals never mask genuine failures.
// Dependencies: xbe-harness
// ============================================================================

use crate::rejection::Rejection;
use crate::rejection::RejectionPolicy;
use crate::rejection::Tolerance;
use crate::rejection::Verdict;
use crate::rejection::classify;

#[test]
fn classify_recognizes_each_kind() {
    assert_eq!(classify("Error: Not Authorized"), Some(Rejection::NotAuthorized));
    assert_eq!(classify("HTTP 403 forbidden"), Some(Rejection::NotAuthorized));
    assert_eq!(classify("422 Unprocessable Entity"), Some(Rejection::Unprocessable));
    assert_eq!(classify("Record Invalid: name can't be blank"), Some(Rejection::Unprocessable));
    assert_eq!(classify("status 409"), Some(Rejection::Conflict));
    assert_eq!(classify("resource not found"), Some(Rejection::NotFound));
}

#[test]
fn classify_prefers_earlier_kinds() {
    assert_eq!(classify("403 then 404"), Some(Rejection::NotAuthorized));
    assert_eq!(classify("409 Conflict: Record Invalid"), Some(Rejection::Unprocessable));
}

#[test]
fn classify_ignores_unrelated_text() {
    assert_eq!(classify("connection reset by peer"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn strict_policy_fails_every_rejection() {
    let policy = RejectionPolicy::strict();
    assert_eq!(policy.judge(true, ""), Verdict::Pass);
    assert_eq!(policy.judge(false, "Not Authorized"), Verdict::Fail);
    assert_eq!(policy.judge(false, "panic: nil pointer"), Verdict::Fail);
}

#[test]
fn skip_unavailable_skips_permission_and_validation() {
    let policy = RejectionPolicy::skip_unavailable();
    assert_eq!(policy.judge(false, "Not Authorized"), Verdict::Skip(Rejection::NotAuthorized));
    assert_eq!(policy.judge(false, "422"), Verdict::Skip(Rejection::Unprocessable));
    assert_eq!(policy.judge(false, "409 Conflict"), Verdict::Fail);
    assert_eq!(policy.judge(false, "segfault"), Verdict::Fail);
}

#[test]
fn tolerate_replaces_existing_rule() {
    let policy = RejectionPolicy::skip_unavailable()
        .tolerate(Rejection::Unprocessable, Tolerance::Pass)
        .tolerate(Rejection::Conflict, Tolerance::Pass);
    assert_eq!(
        policy.judge(false, "Record Invalid"),
        Verdict::PassTolerated(Rejection::Unprocessable)
    );
    assert_eq!(policy.judge(false, "409"), Verdict::PassTolerated(Rejection::Conflict));
    assert_eq!(policy.judge(false, "Forbidden"), Verdict::Skip(Rejection::NotAuthorized));
}

#[test]
fn success_wins_over_rejection_text() {
    let policy = RejectionPolicy::strict();
    assert_eq!(policy.judge(true, "404 Not Found"), Verdict::Pass);
}
