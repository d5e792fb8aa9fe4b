//! Form validation: pure, synchronous, no backend dependency.
//!
//! Every rule is evaluated independently and all violations are collected,
//! so the user sees everything wrong with the form at once.

use crate::state::{AuthMode, FormField, FormState};
use crate::state::form::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 4;

/// Checks `form` against the rules for `mode`. An empty result means the
/// form may be submitted.
pub fn validate(form: &FormState, mode: AuthMode) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if form.email.trim().is_empty() {
        errors.insert(FormField::Email, "Email is required.".to_string());
    }

    if mode != AuthMode::ResetPassword && form.password.len() < MIN_PASSWORD_LEN {
        errors.insert(
            FormField::Password,
            "Password must be at least 4 characters long.".to_string(),
        );
    }

    if mode == AuthMode::SignUp && form.password != form.confirm_password {
        errors.insert(
            FormField::ConfirmPassword,
            "Passwords do not match.".to_string(),
        );
    }

    errors
}
