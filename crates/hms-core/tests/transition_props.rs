use hms_core::{allowed_transitions, validate_transition, AppointmentStatus};
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = AppointmentStatus> {
    prop_oneof![
        Just(AppointmentStatus::Pending),
        Just(AppointmentStatus::Confirmed),
        Just(AppointmentStatus::Completed),
        Just(AppointmentStatus::Cancelled),
        Just(AppointmentStatus::Other("rescheduled".to_string())),
    ]
}

#[test]
fn test_confirmed_transitions() {
    use AppointmentStatus::*;
    assert!(validate_transition(&Confirmed, &Completed).is_ok());
    assert!(validate_transition(&Confirmed, &Cancelled).is_ok());

    // No way back to pending
    assert!(validate_transition(&Confirmed, &Pending).is_err());
}

#[test]
fn test_known_statuses_never_reach_unknown_ones() {
    for from in AppointmentStatus::KNOWN {
        let target = AppointmentStatus::Other("rescheduled".to_string());
        assert!(validate_transition(&from, &target).is_err());
    }
}

proptest! {
    #[test]
    fn prop_validation_agrees_with_allowed_set(from in any_status(), to in any_status()) {
        let res = validate_transition(&from, &to);
        let allowed = allowed_transitions(&from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_no_self_transitions(status in any_status()) {
        prop_assert!(validate_transition(&status, &status).is_err());
    }
}
