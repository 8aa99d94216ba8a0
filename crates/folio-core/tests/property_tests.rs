//! Property-based tests for the typewriter state machine and form validation
//!
//! Uses proptest to check the invariants that must hold for any phrase list
//! and any field value.

use folio_core::form::{
    check_value, is_valid_email, EMAIL_MESSAGE, MESSAGE_LENGTH_MESSAGE, REQUIRED_MESSAGE,
};
use folio_core::{TypewriterConfig, TypewriterState};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

/// Phrases mixing ASCII and accented characters, possibly empty
fn phrase_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Zéãç ]{0,20}").expect("valid regex")
}

fn phrases_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(phrase_strategy(), 1..6)
}

/// Arbitrary field values including whitespace padding
fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \t]{0,3}[a-z0-9@. ]{0,30}[ \t]{0,3}").expect("valid regex")
}

/// Ticks needed to type and delete every phrase once
fn cycle_length(phrases: &[String]) -> usize {
    phrases
        .iter()
        .map(|p| 2 * p.chars().count().max(1))
        .sum()
}

// ============================================================================
// Typewriter Properties
// ============================================================================

proptest! {
    /// The shown text is always a prefix of the current phrase
    #[test]
    fn typewriter_char_index_in_bounds(phrases in phrases_strategy(), ticks in 0usize..300) {
        let timing = TypewriterConfig::default();
        let mut state = TypewriterState::new(phrases.clone()).unwrap();

        for _ in 0..ticks {
            let phrase = state.current_phrase().to_string();
            let frame = state.tick(&timing);
            let len = phrase.chars().count();
            prop_assert!(state.char_index() <= len);
            prop_assert!(phrase.starts_with(&frame.text));
        }
    }

    /// Deleting starts right after the full phrase was shown; typing resumes
    /// right after the text was emptied
    #[test]
    fn typewriter_mode_switches(phrases in phrases_strategy(), ticks in 1usize..300) {
        let timing = TypewriterConfig::default();
        let mut state = TypewriterState::new(phrases).unwrap();

        for _ in 0..ticks {
            let was_deleting = state.is_deleting();
            let phrase = state.current_phrase().to_string();
            let frame = state.tick(&timing);

            if !was_deleting && frame.text == phrase {
                prop_assert!(state.is_deleting());
                prop_assert_eq!(frame.delay.as_millis() as u64, timing.hold_full_ms);
            }
            if was_deleting && frame.text.is_empty() {
                prop_assert!(!state.is_deleting());
                prop_assert_eq!(frame.delay.as_millis() as u64, timing.hold_empty_ms);
            }
        }
    }

    /// One full pass over the list returns to the starting state
    #[test]
    fn typewriter_phrase_index_is_periodic(phrases in phrases_strategy()) {
        let timing = TypewriterConfig::default();
        let initial = TypewriterState::new(phrases.clone()).unwrap();
        let mut state = initial.clone();

        for _ in 0..cycle_length(&phrases) {
            state.tick(&timing);
        }
        prop_assert_eq!(state, initial);
    }
}

// ============================================================================
// Validation Properties
// ============================================================================

proptest! {
    /// A required field that trims to nothing always reports "required",
    /// whatever other rules apply
    #[test]
    fn required_blank_wins(
        padding in "[ \t\n]{0,8}",
        is_email in any::<bool>(),
        is_message in any::<bool>(),
    ) {
        let result = check_value(&padding, true, is_email, is_message);
        prop_assert!(!result.valid);
        prop_assert_eq!(result.message, Some(REQUIRED_MESSAGE));
    }

    /// Optional fields left blank are always valid
    #[test]
    fn optional_blank_is_valid(padding in "[ \t\n]{0,8}", is_email in any::<bool>(), is_message in any::<bool>()) {
        prop_assert!(check_value(&padding, false, is_email, is_message).valid);
    }

    /// Validity and message always agree
    #[test]
    fn message_present_iff_invalid(
        value in value_strategy(),
        required in any::<bool>(),
        is_email in any::<bool>(),
        is_message in any::<bool>(),
    ) {
        let result = check_value(&value, required, is_email, is_message);
        prop_assert_eq!(result.valid, result.message.is_none());
    }

    /// Surrounding whitespace never changes the outcome
    #[test]
    fn validation_ignores_padding(value in "[a-z0-9@.]{0,20}", is_email in any::<bool>(), is_message in any::<bool>()) {
        let padded = format!("  {value}\t");
        prop_assert_eq!(
            check_value(&value, true, is_email, is_message),
            check_value(&padded, true, is_email, is_message)
        );
    }

    /// Well-formed addresses pass the email rule
    #[test]
    fn generated_emails_are_valid(
        local in "[a-z0-9._+]{1,12}",
        domain in "[a-z0-9-]{1,12}",
        tld in "[a-z]{2,6}",
    ) {
        let address = format!("{local}@{domain}.{tld}");
        prop_assert!(is_valid_email(&address));
        prop_assert!(check_value(&address, true, true, false).valid);
    }

    /// Anything without an `@` fails the email rule
    #[test]
    fn emails_need_an_at_sign(value in "[a-z0-9.]{1,30}") {
        let result = check_value(&value, true, true, false);
        prop_assert_eq!(result.message, Some(EMAIL_MESSAGE));
    }

    /// Messages shorter than ten characters are rejected, longer ones accepted
    #[test]
    fn message_length_rule(value in "[a-zA-Z0-9]{1,20}") {
        let result = check_value(&value, true, false, true);
        if value.chars().count() < 10 {
            prop_assert_eq!(result.message, Some(MESSAGE_LENGTH_MESSAGE));
        } else {
            prop_assert!(result.valid);
        }
    }
}
