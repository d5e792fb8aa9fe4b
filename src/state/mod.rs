pub mod form;
pub mod notification;
pub mod profile;
pub mod ui;

pub use form::{AuthMode, FormField, FormFocus, FormState};
pub use notification::{NotificationKind, NotificationState};
pub use profile::ProfileState;
pub use ui::{AppMode, UiState};
