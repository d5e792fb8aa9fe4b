use std::collections::BTreeMap;

/// Which backend operation the form dispatches and which fields it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
    ResetPassword,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Sign Up",
            AuthMode::ResetPassword => "Reset Password",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Sign Up",
            AuthMode::ResetPassword => "Send Password Reset Email",
        }
    }

    /// Footer link text, mirrored per mode.
    pub fn switch_link_label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Forgot Password?",
            AuthMode::SignUp => "Already have an account? Sign In",
            AuthMode::ResetPassword => "Remembered your password? Sign In",
        }
    }

    /// Where the footer link takes the user.
    pub fn switch_target(self) -> AuthMode {
        match self {
            AuthMode::SignIn => AuthMode::ResetPassword,
            AuthMode::SignUp => AuthMode::SignIn,
            AuthMode::ResetPassword => AuthMode::SignIn,
        }
    }

    pub fn visible_fields(self) -> &'static [FormField] {
        match self {
            AuthMode::ResetPassword => &[FormField::Email],
            AuthMode::SignIn => &[FormField::Email, FormField::Password],
            AuthMode::SignUp => &[
                FormField::Email,
                FormField::Pseudo,
                FormField::Password,
                FormField::ConfirmPassword,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Email,
    Pseudo,
    Password,
    ConfirmPassword,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Email => "Email",
            FormField::Pseudo => "Pseudo",
            FormField::Password => "Password",
            FormField::ConfirmPassword => "Confirm Password",
        }
    }

    /// Masked in the UI unless visibility is toggled on.
    pub fn is_secret(self) -> bool {
        matches!(self, FormField::Password | FormField::ConfirmPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(FormField),
    Submit,
    SwitchMode,
}

/// Validation errors keyed by field; an empty map means the form is valid.
pub type ValidationErrors = BTreeMap<FormField, String>;

/// Owned exclusively by the auth form; created empty when the form opens
/// and discarded when it closes.
pub struct FormState {
    pub mode: AuthMode,
    pub email: String,
    pub pseudo: String,
    pub password: String,
    pub confirm_password: String,
    pub errors: ValidationErrors,
    pub submitting: bool,
    pub password_visible: bool,
    pub focus: FormFocus,
    /// Ties in-flight submissions to this form instance; completions
    /// carrying another generation are ignored.
    pub generation: u64,
}

impl FormState {
    pub fn new(mode: AuthMode, generation: u64) -> Self {
        FormState {
            mode,
            email: String::new(),
            pseudo: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            errors: ValidationErrors::new(),
            submitting: false,
            password_visible: false,
            focus: FormFocus::Field(FormField::Email),
            generation,
        }
    }

    /// User-driven mode switch. Field values survive; errors for fields no
    /// longer shown are dropped, and focus falls back to the email field if
    /// it was on a now-hidden one.
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        let visible = mode.visible_fields();
        self.errors.retain(|field, _| visible.contains(field));
        if let FormFocus::Field(field) = self.focus {
            if !visible.contains(&field) {
                self.focus = FormFocus::Field(FormField::Email);
            }
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Pseudo => &self.pseudo,
            FormField::Password => &self.password,
            FormField::ConfirmPassword => &self.confirm_password,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Email => &mut self.email,
            FormField::Pseudo => &mut self.pseudo,
            FormField::Password => &mut self.password,
            FormField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let FormFocus::Field(field) = self.focus {
            self.field_mut(field).push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let FormFocus::Field(field) = self.focus {
            self.field_mut(field).pop();
        }
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visible = !self.password_visible;
    }

    fn focus_order(&self) -> Vec<FormFocus> {
        let mut order: Vec<FormFocus> = self
            .mode
            .visible_fields()
            .iter()
            .map(|f| FormFocus::Field(*f))
            .collect();
        order.push(FormFocus::Submit);
        order.push(FormFocus::SwitchMode);
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(current + order.len() - 1) % order.len()];
    }
}
