//! Draft validation rules
//!
//! Pure functions over the draft entry. Rules apply in a fixed
//! precedence within each field (first failing rule wins) and fields are
//! evaluated independently. Bio and the picture are never validated
//! here; the picture has its own attach-time contract.

use crate::types::{DraftEntry, Field, FieldErrors};

/// Evaluate all validation rules against a draft.
///
/// Returns an empty map iff every field passes.
pub fn validate(draft: &DraftEntry) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required.".to_string());
    }

    if draft.last_name.trim().is_empty() {
        errors.insert(Field::LastName, "Last name is required.".to_string());
    }

    if draft.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required.".to_string());
    } else if !has_email_shape(&draft.email) {
        errors.insert(Field::Email, "Email address is invalid.".to_string());
    }

    if draft.date_of_birth.is_empty() {
        errors.insert(Field::DateOfBirth, "Date of birth is required.".to_string());
    }

    if draft.major.is_empty() {
        errors.insert(Field::Major, "Major is required.".to_string());
    }

    errors
}

/// Minimal structural email check: the input must contain
/// `<non-space>+@<non-space>+.<non-space>+` somewhere. Deliberately not
/// RFC validation.
fn has_email_shape(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();

    for (at, &c) in chars.iter().enumerate() {
        if c != '@' {
            continue;
        }

        // At least one non-space character immediately before the '@'.
        if at == 0 || chars[at - 1].is_whitespace() {
            continue;
        }

        // Within the non-space run after the '@', a '.' that is neither
        // the first nor the last character of the run.
        let tail = &chars[at + 1..];
        let run_len = tail.iter().take_while(|c| !c.is_whitespace()).count();
        let run = &tail[..run_len];
        let has_inner_dot = run
            .iter()
            .enumerate()
            .any(|(i, &c)| c == '.' && i > 0 && i + 1 < run.len());

        if has_inner_dot {
            return true;
        }
    }

    false
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
