//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (immediate and delayed)
//! - Input event handling
//! - Auth and dashboard service integration
//! - Backend requests via background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::{HttpTerminologyClient, SqliteSessionStore};
use crate::application::{
    AuthOutcome, AuthService, DashboardError, DashboardState, Job, JobKind, Navigation, Notifications, ReportStep,
    Route,
};
use crate::config::Config;
use crate::domain::DiagnosisChoice;
use crate::ports::TerminologyApi;

use super::ui::{
    auth::{render_auth, AuthFormState, AuthMode},
    dashboard::{render_dashboard, DashboardFormState, Focus},
    render_disclaimer,
    toast::render_toast,
};
use super::worker::{RequestProgress, RequestWorker, RequestWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    SignUp,
    Dashboard,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Terminology service shared with request workers
    api: Arc<dyn TerminologyApi>,

    /// Local account service
    auth: AuthService<SqliteSessionStore>,

    /// Sign-in / sign-up form state
    auth_form: AuthFormState,

    /// Dashboard flow state
    dashboard: DashboardState,

    /// Dashboard input buffers and cursors
    dashboard_form: DashboardFormState,

    toasts: Notifications,

    /// Navigation waiting for its delay to elapse
    pending_nav: Option<(Route, Instant)>,

    /// Pending backend request (if running)
    pending_worker: Option<RequestWorkerHandle>,

    /// Pending health check, kept apart so it never blocks user actions
    health_worker: Option<RequestWorkerHandle>,

    /// Current report generation step (for the header)
    report_step: Option<ReportStep>,
}

impl App {
    /// Create a new application instance from resolved configuration.
    ///
    /// # Errors
    /// Returns error if the session store or HTTP client cannot be initialized.
    pub fn new(config: &Config) -> Result<Self> {
        let store = Arc::new(SqliteSessionStore::new(config.db_path())?);
        let api = Arc::new(HttpTerminologyClient::new(config.base_url(), config.http_timeout())?);

        tracing::info!(base_url = %config.base_url(), db = %config.db_path().display(), "Adapters ready");
        Ok(Self::with_dependencies(api, store))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    pub fn with_dependencies(api: Arc<dyn TerminologyApi>, store: Arc<SqliteSessionStore>) -> Self {
        Self {
            screen: Screen::SignIn,
            should_quit: false,
            api,
            auth: AuthService::new(store),
            auth_form: AuthFormState::default(),
            dashboard: DashboardState::new(),
            dashboard_form: DashboardFormState::default(),
            toasts: Notifications::new(),
            pending_nav: None,
            pending_worker: None,
            health_worker: None,
            report_step: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // A stored session goes straight to the dashboard; the guard sends
        // everyone else to sign-in.
        self.navigate(Route::Dashboard);

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            self.tick(Instant::now());

            terminal.draw(|f| self.draw(f, Instant::now()))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame, now: Instant) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        match self.screen {
            Screen::SignIn => render_auth(f, chunks[0], AuthMode::SignIn, &self.auth_form),
            Screen::SignUp => render_auth(f, chunks[0], AuthMode::SignUp, &self.auth_form),
            Screen::Dashboard => render_dashboard(
                f,
                chunks[0],
                &self.dashboard,
                &self.dashboard_form,
                self.activity(),
            ),
        }

        render_disclaimer(f, chunks[1]);
        render_toast(f, area, &self.toasts, now);
    }

    /// Short description of the running request.
    fn activity(&self) -> Option<&'static str> {
        match self.report_step {
            Some(ReportStep::RecordingCondition) => Some("Recording condition"),
            Some(ReportStep::AssemblingBundle) => Some("Assembling bundle"),
            None => self
                .pending_worker
                .as_ref()
                .or(self.health_worker.as_ref())
                .map(|w| w.kind().label()),
        }
    }

    /// Expire toasts and perform a due delayed navigation.
    fn tick(&mut self, now: Instant) {
        self.toasts.tick(now);

        if let Some((route, due)) = self.pending_nav {
            if now >= due {
                self.pending_nav = None;
                self.navigate(route);
            }
        }
    }

    fn schedule(&mut self, navigation: Navigation) {
        self.pending_nav = Some((navigation.route, Instant::now() + navigation.delay));
    }

    fn navigate(&mut self, route: Route) {
        match route {
            Route::Landing => self.enter_auth(Screen::SignIn),
            Route::Dashboard => {
                if let Some(redirect) = self.auth.check_auth() {
                    tracing::info!("Dashboard requires sign-in");
                    self.navigate(redirect);
                    return;
                }
                self.leave_dashboard();
                self.screen = Screen::Dashboard;
                self.dispatch(JobKind::Health, |state| state.request_health());
            }
        }
    }

    fn enter_auth(&mut self, screen: Screen) {
        self.leave_dashboard();
        self.auth_form = AuthFormState::default();
        self.screen = screen;
    }

    /// Drop everything the dashboard held in memory.
    fn leave_dashboard(&mut self) {
        self.pending_worker = None;
        self.health_worker = None;
        self.report_step = None;
        self.dashboard = DashboardState::new();
        self.dashboard_form = DashboardFormState::default();
    }

    /// Poll the background workers for progress updates.
    fn poll_worker(&mut self) {
        self.poll_health();

        // NOTE: We must not hold an immutable borrow of `pending_worker` while mutating `self`.
        loop {
            let Some(progress) = self.pending_worker.as_ref().and_then(RequestWorkerHandle::try_recv) else {
                break;
            };

            match progress {
                RequestProgress::Step(step) => {
                    self.report_step = Some(step);
                }
                RequestProgress::Finished(result) => {
                    let Some(worker) = self.pending_worker.take() else {
                        break;
                    };
                    self.report_step = None;
                    let kind = worker.kind();

                    if let Some(message) = self.dashboard.complete(kind, result) {
                        self.toasts.notify(message);
                    }
                    self.after_completion(kind);
                    break;
                }
            }
        }
    }

    fn poll_health(&mut self) {
        let Some(RequestProgress::Finished(result)) = self.health_worker.as_ref().and_then(RequestWorkerHandle::try_recv)
        else {
            return;
        };
        self.health_worker = None;
        if let Some(message) = self.dashboard.complete(JobKind::Health, result) {
            self.toasts.notify(message);
        }
    }

    fn after_completion(&mut self, kind: JobKind) {
        match kind {
            JobKind::Search => {
                self.dashboard_form.reset_results();
                if !self.dashboard.results().is_empty() {
                    self.dashboard_form.focus = Focus::Results;
                }
            }
            JobKind::Preview if self.dashboard.preview().is_some() => {
                self.dashboard_form.preview_cursor = DiagnosisChoice::Traditional;
                self.dashboard_form.focus = Focus::Preview;
            }
            JobKind::Report => self.dashboard_form.report_scroll = 0,
            _ => {}
        }
    }

    /// Ask the dashboard state for a job and start it, or notify why not.
    fn dispatch<F>(&mut self, kind: JobKind, request: F)
    where
        F: FnOnce(&mut DashboardState) -> Result<Job, DashboardError>,
    {
        match request(&mut self.dashboard) {
            Ok(job) => {
                tracing::debug!(job = ?kind, "Dispatching request");
                let worker = Some(RequestWorker::spawn(self.api.clone(), job));
                if kind == JobKind::Health {
                    self.health_worker = worker;
                } else {
                    self.pending_worker = worker;
                }
            }
            Err(e) => {
                tracing::debug!(job = ?kind, "Request refused: {}", e);
                self.toasts.notify(e.user_message(kind));
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::SignIn | Screen::SignUp => self.handle_auth_key(key, modifiers),
            Screen::Dashboard => self.handle_dashboard_key(key, modifiers),
        }
    }

    fn handle_auth_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('t') => self.auth_form.toggle_password(),
                KeyCode::Char('n') => {
                    let other = match self.screen {
                        Screen::SignIn => Screen::SignUp,
                        _ => Screen::SignIn,
                    };
                    self.enter_auth(other);
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.auth_form.next_field(),
            KeyCode::Esc if self.screen == Screen::SignUp => self.enter_auth(Screen::SignIn),
            KeyCode::Char(c) => self.auth_form.input_char(c),
            KeyCode::Backspace => self.auth_form.delete_char(),
            KeyCode::Enter => self.submit_auth(),
            _ => {}
        }
    }

    fn submit_auth(&mut self) {
        let result = match self.screen {
            Screen::SignUp => self.auth.signup(&self.auth_form.username, &self.auth_form.password),
            _ => self.auth.signin(&self.auth_form.username, &self.auth_form.password),
        };

        match result {
            Ok(AuthOutcome { message, navigation }) => {
                self.auth_form.clear_sensitive();
                self.toasts.notify(message);
                self.schedule(navigation);
            }
            Err(e) => self.toasts.notify(e.user_message()),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Tab => self.dashboard_form.next_focus(),
            KeyCode::BackTab => self.dashboard_form.prev_focus(),
            KeyCode::Esc => self.dashboard_form.focus = Focus::Results,
            _ if self.dashboard_form.focus.is_text() => self.handle_text_key(key, modifiers),
            _ => self.handle_command_key(key),
        }
    }

    fn handle_text_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => self.dashboard_form.input_char(c),
            KeyCode::Backspace => self.dashboard_form.delete_char(),
            KeyCode::Enter if self.dashboard_form.focus == Focus::Query => {
                let query = self.dashboard_form.query.clone();
                self.dispatch(JobKind::Search, |state| state.request_search(&query));
            }
            KeyCode::Enter => {
                let form = &self.dashboard_form;
                let (name, gender, birth_date) = (form.name.clone(), form.gender.clone(), form.birth_date.clone());
                self.dispatch(JobKind::CreatePatient, |state| {
                    state.request_create_patient(&name, &gender, &birth_date)
                });
            }
            _ => {}
        }
    }

    fn handle_command_key(&mut self, key: KeyCode) {
        let focus = self.dashboard_form.focus;
        match key {
            KeyCode::Down if focus == Focus::Results => self.dashboard_form.cursor_down(&self.dashboard),
            KeyCode::Up if focus == Focus::Results => self.dashboard_form.cursor_up(&self.dashboard),
            KeyCode::Up | KeyCode::Down if focus == Focus::Preview => self.dashboard_form.toggle_preview_cursor(),
            KeyCode::Enter if focus == Focus::Results => self.select_result(self.dashboard_form.result_cursor),
            KeyCode::Enter if focus == Focus::Preview => self.choose(self.dashboard_form.preview_cursor),
            KeyCode::Char('1') => self.choose(DiagnosisChoice::Traditional),
            KeyCode::Char('2') => self.choose(DiagnosisChoice::Biomedical),
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.dispatch(JobKind::Report, DashboardState::request_report);
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.dispatch(JobKind::Upload, DashboardState::request_upload);
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.dispatch(JobKind::Health, DashboardState::request_health);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.logout(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::PageDown => {
                self.dashboard_form.report_scroll = self.dashboard_form.report_scroll.saturating_add(10);
            }
            KeyCode::PageUp => {
                self.dashboard_form.report_scroll = self.dashboard_form.report_scroll.saturating_sub(10);
            }
            _ => {}
        }
    }

    fn select_result(&mut self, index: usize) {
        match self.dashboard.select_result(index) {
            Ok(Some(job)) => {
                self.pending_worker = Some(RequestWorker::spawn(self.api.clone(), job));
            }
            Ok(None) => {}
            Err(e) => self.toasts.notify(e.user_message(JobKind::Preview)),
        }
    }

    fn choose(&mut self, choice: DiagnosisChoice) {
        if self.dashboard.choose_coding(choice).is_some() {
            self.dashboard_form.preview_cursor = choice;
        }
    }

    fn logout(&mut self) {
        match self.auth.logout() {
            Ok(AuthOutcome { message, navigation }) => {
                self.toasts.notify(message);
                self.schedule(navigation);
            }
            Err(e) => {
                tracing::error!("Logout failed: {}", e);
                self.toasts.notify(e.user_message());
            }
        }
    }
}
