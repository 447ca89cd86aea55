//! Sign-in and sign-up forms.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::tui::styles::{ClinicTheme, APP_NAME};

/// Which auth form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Create Account",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
}

/// Auth form state
#[derive(Debug)]
pub struct AuthFormState {
    pub username: String,
    pub password: String,
    pub focused: AuthField,
    pub show_password: bool,
}

impl Default for AuthFormState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focused: AuthField::Username,
            show_password: false,
        }
    }
}

impl Drop for AuthFormState {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

impl AuthFormState {
    pub fn next_field(&mut self) {
        self.focused = match self.focused {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }

    fn current_mut(&mut self) -> &mut String {
        match self.focused {
            AuthField::Username => &mut self.username,
            AuthField::Password => &mut self.password,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.current_mut().push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.current_mut().pop();
    }

    /// Flip masked/plain rendering of the password.
    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    /// Wipe both buffers once they have been submitted.
    pub fn clear_sensitive(&mut self) {
        self.password.zeroize();
        self.username.clear();
        self.focused = AuthField::Username;
    }

    /// Password as rendered: masked unless visibility is toggled on.
    #[must_use]
    pub fn password_display(&self) -> String {
        if self.show_password {
            self.password.clone()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }

    fn visibility_indicator(&self) -> &'static str {
        if self.show_password {
            "◉ shown"
        } else {
            "◌ hidden"
        }
    }
}

/// Render the sign-in or sign-up form
pub fn render_auth(f: &mut Frame, area: Rect, mode: AuthMode, state: &AuthFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Min(0),
            Constraint::Length(2), // Key hints
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled(APP_NAME, ClinicTheme::title()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        Span::styled(mode.title(), ClinicTheme::subtitle()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(header, chunks[0]);

    render_input(
        f,
        chunks[1],
        "Username",
        &state.username,
        state.focused == AuthField::Username,
        None,
    );
    render_input(
        f,
        chunks[2],
        "Password",
        &state.password_display(),
        state.focused == AuthField::Password,
        Some(state.visibility_indicator()),
    );

    let switch = match mode {
        AuthMode::SignIn => "Create account ",
        AuthMode::SignUp => "Back to sign in ",
    };
    let hints = Paragraph::new(Line::from(vec![
        Span::styled("[Tab] ", ClinicTheme::key_hint()),
        Span::styled("Next field ", ClinicTheme::key_desc()),
        Span::styled("[Enter] ", ClinicTheme::key_hint()),
        Span::styled("Submit ", ClinicTheme::key_desc()),
        Span::styled("[Ctrl+T] ", ClinicTheme::key_hint()),
        Span::styled("Show/hide password ", ClinicTheme::key_desc()),
        Span::styled("[Ctrl+N] ", ClinicTheme::key_hint()),
        Span::styled(switch, ClinicTheme::key_desc()),
        Span::styled("[Ctrl+Q] ", ClinicTheme::key_hint()),
        Span::styled("Quit", ClinicTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(hints, chunks[4]);
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool, indicator: Option<&str>) {
    let (border_style, title_style) = if focused {
        (ClinicTheme::border_focused(), ClinicTheme::focused())
    } else {
        (ClinicTheme::border(), ClinicTheme::text_secondary())
    };

    let mut block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(indicator) = indicator {
        block = block.title_top(Line::from(Span::styled(format!(" {indicator} "), ClinicTheme::text_muted())).right_aligned());
    }

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(value.to_string(), ClinicTheme::text()),
        if focused {
            Span::styled("▌", ClinicTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}
