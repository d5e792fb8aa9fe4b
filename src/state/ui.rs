use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Home,
    AuthForm,
    Profile,
}

/// State for the shell: current screen, nav menu, quit confirmation.
pub struct UiState {
    pub mode: AppMode,
    pub should_quit: bool,
    pub tick_count: u64,
    pub menu_state: ListState,
    pub show_quit_confirm: bool,
    pub quit_confirm_selected: usize,
}

impl Default for UiState {
    fn default() -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(0));
        UiState {
            mode: AppMode::Home,
            should_quit: false,
            tick_count: 0,
            menu_state,
            show_quit_confirm: false,
            quit_confirm_selected: 0,
        }
    }
}

impl UiState {
    /// Nav entries, depending on whether an identity is present.
    pub fn menu_items(logged_in: bool) -> &'static [&'static str] {
        if logged_in {
            &["Profile", "Sign Out", "Quit"]
        } else {
            &["Sign In", "Sign Up", "Quit"]
        }
    }

    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn menu_up(&mut self, len: usize) {
        let selected = self.menu_state.selected().unwrap_or(0);
        self.menu_state
            .select(Some(if selected == 0 { len - 1 } else { selected - 1 }));
    }

    pub fn menu_down(&mut self, len: usize) {
        let selected = self.menu_state.selected().unwrap_or(0);
        self.menu_state.select(Some((selected + 1) % len));
    }
}
