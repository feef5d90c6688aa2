//! Integration tests for menuloop-input.
//!
//! These drive the public API through scripted terminals, the same way an
//! interactive session would.

use menuloop_input::{
    env::ATTEMPTS_VAR, InputError, MockEnv, MockTerminal, ReaderConfig, Selector, ValidatedReader,
    ValidationKind,
};
use proptest::prelude::*;

fn reader(responses: Vec<String>) -> ValidatedReader<MockTerminal> {
    ValidatedReader::with_terminal(MockTerminal::with_responses(responses))
}

// ============================================================================
// Configuration flows into the retry loop
// ============================================================================

#[test]
fn env_configured_attempts_bound_reads() {
    let config = ReaderConfig::from_env(&MockEnv::new().with_var(ATTEMPTS_VAR, "2"));
    let r = ValidatedReader::with_terminal(MockTerminal::with_responses(["a", "b", "3"]))
        .config(config);

    let err = r.integer("Number").unwrap_err();
    assert!(matches!(
        err,
        InputError::ValidationExhausted {
            kind: ValidationKind::Integer
        }
    ));
    assert_eq!(r.terminal().reads(), 2);
    assert_eq!(r.terminal().remaining(), 1);
}

#[test]
fn registration_form() {
    let r = ValidatedReader::with_terminal(MockTerminal::with_responses([
        "ada",
        "ADA@Example.org",
        "07700900123",
        "1815",
    ]));

    assert_eq!(r.name("First name").unwrap(), "Ada");
    assert_eq!(r.email("Email").unwrap(), "ada@example.org");
    assert_eq!(r.digits_between("Phone", 10, 11).unwrap(), "07700900123");
    assert_eq!(r.integer_between("Year of birth", 2100, 1800).unwrap(), 1815);
    assert_eq!(r.terminal().stderr(), "");
}

#[test]
fn selection_after_failed_confirmation() {
    let r = reader(vec!["9".into(), "2".into(), "n".into(), "1".into(), "y".into()]);
    let picked = Selector::new(&r)
        .choose_one("Which file", vec!["a.txt", "b.txt"])
        .unwrap();
    assert_eq!(picked, "a.txt");
    assert!(r.terminal().stderr().contains("Integer out of range."));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// A successful bounded read always lies within the bounds, whichever
    /// order they were given in.
    #[test]
    fn integer_between_stays_in_bounds(
        lo in -1000i32..1000,
        hi in -1000i32..1000,
        inputs in prop::collection::vec(-1500i32..1500, 1..6),
    ) {
        let r = reader(inputs.iter().map(|n| n.to_string()).collect());
        let (min, max) = (lo.min(hi), lo.max(hi));
        match r.integer_between("n", lo, hi) {
            Ok(v) => prop_assert!(min <= v && v <= max),
            Err(InputError::ValidationExhausted { kind }) => {
                prop_assert_eq!(kind, ValidationKind::Integer);
                prop_assert_eq!(r.terminal().reads(), 3);
                prop_assert!(inputs.iter().take(3).all(|v| *v < min || *v > max));
            }
            // fewer than three scripted lines and all of them invalid
            Err(InputError::Closed) => prop_assert!(inputs.len() < 3),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// Multi-selection returns distinct candidates in pick order and never
    /// takes more picks than there are candidates.
    #[test]
    fn choose_many_is_a_distinct_subset(
        picks in prop::collection::vec(1i32..=3, 3),
        keep_going in prop::collection::vec(any::<bool>(), 2),
    ) {
        let candidates = vec!["A", "B", "C"];
        let mut script = Vec::new();
        let mut pool = candidates.len();
        let mut expected_picks = 0;
        for round in 0..3 {
            if pool > 1 {
                let choice = (picks[round] as usize - 1) % pool + 1;
                script.push(choice.to_string());
                script.push("y".to_string());
            }
            pool -= 1;
            expected_picks += 1;
            if pool == 0 {
                break;
            }
            if keep_going[round] {
                script.push("y".to_string());
            } else {
                script.push("n".to_string());
                break;
            }
        }

        let r = reader(script);
        let picked = Selector::new(&r).choose_many("Pick", candidates.clone()).unwrap();

        prop_assert_eq!(picked.len(), expected_picks);
        prop_assert!(picked.len() <= 3);
        for (i, item) in picked.iter().enumerate() {
            prop_assert!(candidates.contains(item));
            prop_assert!(!picked[..i].contains(item));
        }
        prop_assert_eq!(r.terminal().remaining(), 0);
    }
}
