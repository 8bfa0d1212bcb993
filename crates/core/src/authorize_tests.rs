use super::*;
use yare::parameterized;

#[parameterized(
        forward = { Stage::StructuringPhase, Stage::ReadyToSendToBanker },
        backward = { Stage::ReadyToSendToBanker, Stage::StructuringPhase },
    )]
fn assistants_cannot_cross_the_handoff(from: Stage, to: Stage) {
    assert!(!is_transition_allowed(Role::Assistant, from, to));
}

#[parameterized(
        forward = { Stage::StructuringPhase, Stage::ReadyToSendToBanker },
        backward = { Stage::ReadyToSendToBanker, Stage::StructuringPhase },
    )]
fn admins_may_cross_the_handoff(from: Stage, to: Stage) {
    assert!(is_transition_allowed(Role::Admin, from, to));
}

#[parameterized(
        skip_ahead = { Stage::Lead, Stage::SentToBanker },
        step_back = { Stage::DocsReceived, Stage::ChecklistSent },
        into_structuring = { Stage::DocsReceived, Stage::StructuringPhase },
        out_of_ready = { Stage::ReadyToSendToBanker, Stage::SentToBanker },
        to_terminal = { Stage::MoreInfo, Stage::Declined },
    )]
fn unrestricted_pairs_are_open_to_assistants(from: Stage, to: Stage) {
    assert!(is_transition_allowed(Role::Assistant, from, to));
}

/// Exhaustive sweep: the restricted pair is the ONLY denial in the whole
/// (role, stage, stage) space.
#[test]
fn only_the_restricted_pair_is_ever_denied() {
    let (a, b) = RESTRICTED_PAIR;

    for role in [Role::Admin, Role::Assistant] {
        for &from in Stage::catalog() {
            for &to in Stage::catalog() {
                if from == to {
                    continue; // no-ops never reach the authorizer
                }
                let allowed = is_transition_allowed(role, from, to);
                let restricted = (from == a && to == b) || (from == b && to == a);
                let expected = role.is_admin() || !restricted;
                assert_eq!(
                    allowed, expected,
                    "role={role} from={from} to={to}"
                );
            }
        }
    }
}
