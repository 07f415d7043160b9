//! Single-step transition tests

use super::{failed, ladder, unverified, verified};
use crate::error::{ErrorKind, LadderError};
use crate::llm::fallback::{FallbackController, FallbackReason, FallbackState};
use crate::llm::provider_types::Capability;

#[test]
fn test_starts_at_preferred_index() {
    let mut config = ladder(&["pro", "flash", "lite"]);
    config.start_index = 1;
    let controller = FallbackController::new(&config);
    assert!(matches!(
        controller.state(),
        FallbackState::Trying {
            index: 1,
            escalations: 0
        }
    ));
    assert_eq!(controller.current_tier().unwrap().1.model, "flash");
}

#[test]
fn test_out_of_range_start_fails() {
    let controller = FallbackController::starting_at(&ladder(&["pro"]), 4);
    assert!(matches!(controller.state(), FallbackState::Failed(_)));
}

#[test]
fn test_rate_limit_moves_to_next_tier() {
    let mut controller = FallbackController::new(&ladder(&["flash", "pro"]));
    controller.on_outcome(failed(LadderError::rate_limited("quota"), 2));

    assert!(matches!(
        controller.state(),
        FallbackState::Trying { index: 1, .. }
    ));
    assert_eq!(controller.history().len(), 1);
    assert_eq!(controller.history()[0].reason, FallbackReason::RateLimited);
    assert_eq!(controller.total_attempts(), 2);
}

#[test]
fn test_rate_limit_on_last_tier_fails_with_rate_limited() {
    let mut controller = FallbackController::new(&ladder(&["flash"]));
    controller.on_outcome(failed(LadderError::rate_limited("quota"), 1));
    let err = controller.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RateLimited);
}

#[test]
fn test_unavailable_is_reported_distinctly() {
    let mut controller = FallbackController::new(&ladder(&["flash"]));
    controller.on_outcome(failed(LadderError::provider_unavailable("503"), 1));
    let err = controller.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
}

#[test]
fn test_fatal_error_fails_immediately() {
    let mut controller = FallbackController::new(&ladder(&["flash", "pro"]));
    controller.on_outcome(failed(LadderError::authentication("bad key"), 1));
    assert!(controller.state().is_terminal());
    assert!(controller.history().is_empty());
    assert_eq!(
        controller.into_result().unwrap_err().kind(),
        ErrorKind::Authentication
    );
}

#[test]
fn test_verified_success_is_done() {
    let mut controller = FallbackController::new(&ladder(&["flash"]));
    controller.on_outcome(verified("classified"));
    let (message, was_verified) = controller.into_result().unwrap();
    assert!(was_verified);
    assert!(message.has_tool_calls());
}

#[test]
fn test_unverified_escalates_to_earlier_tier() {
    let mut config = ladder(&["pro", "flash"]);
    config.start_index = 1;
    let mut controller = FallbackController::new(&config);

    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Escalated {
            from_index: 1,
            to_index: 0,
            steps: 1
        }
    ));

    controller.resume();
    assert!(matches!(
        controller.state(),
        FallbackState::Trying {
            index: 0,
            escalations: 1
        }
    ));
    assert_eq!(controller.history()[0].reason, FallbackReason::Unverified);
}

#[test]
fn test_unverified_without_earlier_tier_is_accepted_with_flag() {
    let mut controller = FallbackController::new(&ladder(&["pro", "flash"]));
    controller.on_outcome(unverified("no tool"));
    let (message, was_verified) = controller.into_result().unwrap();
    assert!(!was_verified);
    assert_eq!(message.text(), "no tool");
}

#[test]
fn test_unverified_accepted_when_verification_disabled() {
    let mut config = ladder(&["pro", "flash"]);
    config.start_index = 1;
    config.verify_tool_calls = false;
    let mut controller = FallbackController::new(&config);
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(controller.state(), FallbackState::Done { .. }));
}

#[test]
fn test_escalation_bound() {
    let mut config = ladder(&["pro", "flash"]);
    config.start_index = 1;
    config.max_escalations = 0;
    let mut controller = FallbackController::new(&config);
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Done {
            verified: false,
            ..
        }
    ));
}

#[test]
fn test_explicit_capability_picks_more_capable_tier() {
    let mut config = ladder(&["pro", "flash", "flash-8b"]);
    config.provider_models[0].capability = Some(Capability::High);
    config.provider_models[1].capability = Some(Capability::Low);
    config.provider_models[2].capability = Some(Capability::Low);
    config.start_index = 2;
    let mut controller = FallbackController::new(&config);

    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Escalated { to_index: 0, .. }
    ));
}

#[test]
fn test_explicit_capability_can_point_to_a_later_tier() {
    // least capable first
    let mut config = ladder(&["flash", "pro"]);
    config.provider_models[0].capability = Some(Capability::Low);
    config.provider_models[1].capability = Some(Capability::High);
    let mut controller = FallbackController::new(&config);

    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Escalated {
            from_index: 0,
            to_index: 1,
            steps: 1
        }
    ));

    controller.resume();
    controller.on_outcome(verified("classified"));
    let (_, was_verified) = controller.into_result().unwrap();
    assert!(was_verified);
}

#[test]
fn test_equal_capability_is_not_an_escalation_target() {
    let mut config = ladder(&["flash", "flash-2"]);
    config.provider_models[0].capability = Some(Capability::Medium);
    config.provider_models[1].capability = Some(Capability::Medium);
    config.start_index = 1;
    let mut controller = FallbackController::new(&config);

    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Done {
            verified: false,
            ..
        }
    ));
}

#[test]
fn test_nearest_more_capable_tier_wins() {
    let mut config = ladder(&["ultra", "lite", "flash", "pro"]);
    config.provider_models[0].capability = Some(Capability::High);
    config.provider_models[1].capability = Some(Capability::Low);
    config.provider_models[2].capability = Some(Capability::Medium);
    config.provider_models[3].capability = Some(Capability::High);
    config.start_index = 1;
    let mut controller = FallbackController::new(&config);

    // ultra and flash are both one step away; the earlier one wins
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Escalated { to_index: 0, .. }
    ));

    // from flash, pro is nearer than ultra
    config.start_index = 2;
    let mut controller = FallbackController::new(&config);
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Escalated { to_index: 3, .. }
    ));
}

#[test]
fn test_exhausted_tier_is_not_an_escalation_target() {
    let mut config = ladder(&["pro", "flash"]);
    let mut controller = FallbackController::new(&config);
    controller.on_outcome(failed(LadderError::rate_limited("quota"), 1));
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(
        controller.state(),
        FallbackState::Done {
            verified: false,
            ..
        }
    ));

    // a fresh turn may use the tier again
    config.start_index = 1;
    let mut controller = FallbackController::new(&config);
    controller.on_outcome(unverified("no tool"));
    assert!(matches!(controller.state(), FallbackState::Escalated { .. }));
}

#[test]
fn test_terminal_states_are_never_left() {
    let mut controller = FallbackController::new(&ladder(&["flash", "pro"]));
    controller.on_outcome(verified("ok"));
    controller.on_outcome(failed(LadderError::rate_limited("late"), 1));
    controller.resume();
    controller.cancel();
    assert!(matches!(controller.state(), FallbackState::Done { .. }));
}

#[test]
fn test_cancel_from_trying() {
    let mut controller = FallbackController::new(&ladder(&["flash"]));
    controller.cancel();
    assert_eq!(
        controller.into_result().unwrap_err().kind(),
        ErrorKind::Cancelled
    );
}
