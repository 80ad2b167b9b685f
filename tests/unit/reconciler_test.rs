use proptest::prelude::*;

use smsbilling::transactions::services::{
    plan_transition, resolve_poll_status, resolve_webhook_status,
};
use smsbilling::transactions::TransactionStatus;

/// Tests for the reconciliation status mapping
///
/// Validates:
/// - Provider numeric codes take priority over string statuses
/// - The poll mapping treats unknown statuses as "no change"
/// - Terminal statuses are immutable under every possible event

#[test]
fn test_webhook_numeric_codes() {
    assert_eq!(
        resolve_webhook_status(Some(1000), None),
        Some(TransactionStatus::Completed)
    );
    assert_eq!(
        resolve_webhook_status(Some(1005), None),
        Some(TransactionStatus::Failed)
    );
    assert_eq!(
        resolve_webhook_status(Some(1001), None),
        Some(TransactionStatus::Pending)
    );
}

#[test]
fn test_unknown_numeric_code_means_no_change() {
    assert_eq!(resolve_webhook_status(Some(9999), Some("SUCCESS")), None);
    assert_eq!(resolve_webhook_status(Some(0), None), None);
}

#[test]
fn test_numeric_code_beats_contradicting_string() {
    // A 1000 code with a FAILED string resolves COMPLETED
    assert_eq!(
        resolve_webhook_status(Some(1000), Some("FAILED")),
        Some(TransactionStatus::Completed)
    );
    assert_eq!(
        resolve_webhook_status(Some(1005), Some("PAID")),
        Some(TransactionStatus::Failed)
    );
}

#[test]
fn test_webhook_string_statuses() {
    for s in ["SUCCESS", "PAID", "COMPLETED", "paid", "Success"] {
        assert_eq!(
            resolve_webhook_status(None, Some(s)),
            Some(TransactionStatus::Completed),
            "{} should complete",
            s
        );
    }
    assert_eq!(
        resolve_webhook_status(None, Some("FAILED")),
        Some(TransactionStatus::Failed)
    );
    // Unknown strings fall back to PENDING per provider contract
    assert_eq!(
        resolve_webhook_status(None, Some("IN_PROGRESS")),
        Some(TransactionStatus::Pending)
    );
    assert_eq!(
        resolve_webhook_status(None, None),
        Some(TransactionStatus::Pending)
    );
}

#[test]
fn test_poll_status_mapping() {
    for s in ["COMPLETED", "SUCCESS", "PAID"] {
        assert_eq!(resolve_poll_status(s), Some(TransactionStatus::Completed));
    }
    for s in ["FAILED", "CANCELLED", "EXPIRED"] {
        assert_eq!(resolve_poll_status(s), Some(TransactionStatus::Failed));
    }
    // Anything else leaves the local transaction alone
    assert_eq!(resolve_poll_status("PENDING"), None);
    assert_eq!(resolve_poll_status("REQUIRES_ACTION"), None);
    assert_eq!(resolve_poll_status(""), None);
}

#[test]
fn test_completed_survives_failed_webhook() {
    let resolved = resolve_webhook_status(None, Some("FAILED"));
    assert_eq!(plan_transition(TransactionStatus::Completed, resolved), None);
}

#[test]
fn test_pending_settles_once() {
    let resolved = resolve_webhook_status(Some(1000), None);
    assert_eq!(
        plan_transition(TransactionStatus::Pending, resolved),
        Some(TransactionStatus::Completed)
    );

    // Replaying the same webhook against the now-terminal state is a no-op
    assert_eq!(plan_transition(TransactionStatus::Completed, resolved), None);
}

fn any_status() -> impl Strategy<Value = Option<TransactionStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(TransactionStatus::Pending)),
        Just(Some(TransactionStatus::Completed)),
        Just(Some(TransactionStatus::Failed)),
        Just(Some(TransactionStatus::Cancelled)),
    ]
}

proptest! {
    #[test]
    fn test_terminal_states_never_transition(resolved in any_status()) {
        for terminal in [
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            prop_assert_eq!(plan_transition(terminal, resolved), None);
        }
    }

    #[test]
    fn test_pending_never_transitions_to_pending(resolved in any_status()) {
        let next = plan_transition(TransactionStatus::Pending, resolved);
        prop_assert_ne!(next, Some(TransactionStatus::Pending));
    }
}
