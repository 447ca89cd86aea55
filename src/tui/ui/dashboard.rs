//! Dashboard view: patient, search, code preview and report output.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::application::{BackendStatus, DashboardState, JobKind};
use crate::domain::{Coding, DiagnosisChoice};
use crate::tui::styles::{ClinicTheme, APP_NAME};

/// Focusable dashboard element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Gender,
    BirthDate,
    Query,
    Results,
    Preview,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Name,
        Focus::Gender,
        Focus::BirthDate,
        Focus::Query,
        Focus::Results,
        Focus::Preview,
    ];

    /// Text inputs take printable keys; panels take commands.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Gender | Self::BirthDate | Self::Query)
    }

    #[must_use]
    pub fn is_patient_field(self) -> bool {
        matches!(self, Self::Name | Self::Gender | Self::BirthDate)
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Form buffers and cursors for the dashboard screen
#[derive(Debug)]
pub struct DashboardFormState {
    pub name: String,
    pub gender: String,
    pub birth_date: String,
    pub query: String,
    pub focus: Focus,
    /// Highlighted result (index into the full result list)
    pub result_cursor: usize,
    pub preview_cursor: DiagnosisChoice,
    /// Vertical scroll of the report output
    pub report_scroll: u16,
}

impl Default for DashboardFormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: String::new(),
            birth_date: String::new(),
            query: String::new(),
            focus: Focus::Name,
            result_cursor: 0,
            preview_cursor: DiagnosisChoice::Traditional,
            report_scroll: 0,
        }
    }
}

impl DashboardFormState {
    pub fn next_focus(&mut self) {
        let next = (self.focus.position() + 1) % Focus::ORDER.len();
        self.focus = Focus::ORDER[next];
    }

    pub fn prev_focus(&mut self) {
        let pos = self.focus.position();
        let prev = if pos == 0 { Focus::ORDER.len() - 1 } else { pos - 1 };
        self.focus = Focus::ORDER[prev];
    }

    fn current_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.name),
            Focus::Gender => Some(&mut self.gender),
            Focus::BirthDate => Some(&mut self.birth_date),
            Focus::Query => Some(&mut self.query),
            Focus::Results | Focus::Preview => None,
        }
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(field) = self.current_mut() {
            field.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.current_mut() {
            field.pop();
        }
    }

    /// Move the result cursor to the next visible entry.
    pub fn cursor_down(&mut self, state: &DashboardState) {
        let visible: Vec<usize> = state.results().visible().map(|(i, _)| i).collect();
        if !visible.contains(&self.result_cursor) {
            if let Some(first) = visible.first() {
                self.result_cursor = *first;
            }
            return;
        }
        if let Some(next) = visible.iter().find(|i| **i > self.result_cursor) {
            self.result_cursor = *next;
        }
    }

    pub fn cursor_up(&mut self, state: &DashboardState) {
        let visible: Vec<usize> = state.results().visible().map(|(i, _)| i).collect();
        if let Some(prev) = visible.iter().rev().find(|i| **i < self.result_cursor) {
            self.result_cursor = *prev;
        }
    }

    pub fn toggle_preview_cursor(&mut self) {
        self.preview_cursor = self.preview_cursor.other();
    }

    /// Forget the results cursor after a new search.
    pub fn reset_results(&mut self) {
        self.result_cursor = 0;
        self.preview_cursor = DiagnosisChoice::Traditional;
    }
}

/// Render the dashboard view.
pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    form: &DashboardFormState,
    activity: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(2), // Key hints
        ])
        .split(area);

    render_header(f, chunks[0], state, activity);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_left_column(f, columns[0], state, form);
    render_right_column(f, columns[1], state, form);
    render_key_hints(f, chunks[2], form.focus);
}

fn render_header(f: &mut Frame, area: Rect, state: &DashboardState, activity: Option<&str>) {
    let backend = match state.backend() {
        BackendStatus::Unknown => Span::styled("backend: checking", ClinicTheme::text_muted()),
        BackendStatus::Up(health) if health.is_running() => Span::styled(
            format!(
                "backend: running (ayurveda {}, siddha {}, unani {})",
                health.datasets_loaded.ayurveda, health.datasets_loaded.siddha, health.datasets_loaded.unani
            ),
            ClinicTheme::success(),
        ),
        BackendStatus::Up(health) => Span::styled(format!("backend: {}", health.status), ClinicTheme::warning()),
        BackendStatus::Down => Span::styled("backend: unreachable", ClinicTheme::danger()),
    };

    let mut spans = vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled(APP_NAME, ClinicTheme::title()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        Span::styled("NAMASTE → ICD-11 Coding", ClinicTheme::text_secondary()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        backend,
    ];
    if let Some(activity) = activity {
        spans.push(Span::styled(" │ ", ClinicTheme::text_muted()));
        spans.push(Span::styled(format!("{activity}…"), ClinicTheme::warning()));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(header, area);
}

fn render_left_column(f: &mut Frame, area: Rect, state: &DashboardState, form: &DashboardFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Gender
            Constraint::Length(3), // Birth date
            Constraint::Length(1), // Current patient
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Results
        ])
        .split(area);

    render_input(f, chunks[0], "Patient name", &form.name, "full name", form.focus == Focus::Name);
    render_input(f, chunks[1], "Gender", &form.gender, "female / male / other", form.focus == Focus::Gender);
    render_input(
        f,
        chunks[2],
        "Birth date",
        &form.birth_date,
        "YYYY-MM-DD",
        form.focus == Focus::BirthDate,
    );

    let patient_line = match state.patient() {
        Some(patient) => {
            let id = patient.id();
            let id = id.as_str().map_or_else(|| id.to_string(), str::to_string);
            Line::from(vec![
                Span::styled("  Patient: ", ClinicTheme::text_secondary()),
                Span::styled(patient.display_name().unwrap_or("(unnamed)").to_string(), ClinicTheme::text()),
                Span::styled(format!("  id {id}"), ClinicTheme::text_muted()),
            ])
        }
        None => Line::from(Span::styled("  No patient created", ClinicTheme::text_muted())),
    };
    f.render_widget(Paragraph::new(patient_line), chunks[3]);

    render_input(
        f,
        chunks[4],
        "Search disease",
        &form.query,
        "e.g. jwara",
        form.focus == Focus::Query,
    );
    render_results(f, chunks[5], state, form);
}

fn render_input(f: &mut Frame, area: Rect, label: &str, value: &str, hint: &str, focused: bool) {
    let (border_style, title_style) = if focused {
        (ClinicTheme::border_focused(), ClinicTheme::focused())
    } else {
        (ClinicTheme::border(), ClinicTheme::text_secondary())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value = if value.is_empty() {
        Span::styled(hint.to_string(), ClinicTheme::text_muted())
    } else {
        Span::styled(value.to_string(), ClinicTheme::text())
    };
    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value,
        if focused {
            Span::styled("▌", ClinicTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        ClinicTheme::border_focused()
    } else {
        ClinicTheme::border()
    };
    Block::default()
        .title(Span::styled(format!(" {title} "), ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_results(f: &mut Frame, area: Rect, state: &DashboardState, form: &DashboardFormState) {
    let focused = form.focus == Focus::Results;
    let results = state.results();

    let items: Vec<ListItem> = results
        .visible()
        .map(|(idx, entry)| {
            let style = if results.selected_index() == Some(idx) {
                ClinicTheme::selected()
            } else if focused && idx == form.result_cursor {
                ClinicTheme::focused()
            } else if entry.is_rule_based() {
                ClinicTheme::warning()
            } else {
                ClinicTheme::text()
            };
            let marker = if focused && idx == form.result_cursor { "▸ " } else { "  " };
            ListItem::new(Line::from(Span::styled(format!("{marker}{}", entry.label), style)))
        })
        .collect();

    let block = panel("Results", focused);
    if items.is_empty() {
        let empty = Paragraph::new(Span::styled("  No results", ClinicTheme::text_muted())).block(block);
        f.render_widget(empty, area);
    } else {
        f.render_widget(List::new(items).block(block), area);
    }
}

fn render_right_column(f: &mut Frame, area: Rect, state: &DashboardState, form: &DashboardFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(area);

    render_preview(f, chunks[0], state, form);

    let output = match state.report_output() {
        Some(text) => Paragraph::new(text.to_string())
            .style(ClinicTheme::text())
            .scroll((form.report_scroll, 0)),
        None => Paragraph::new(Span::styled(
            "  Select patient and diagnosis, then press [G]",
            ClinicTheme::text_muted(),
        )),
    };
    f.render_widget(output.block(panel("FHIR Bundle", false)), chunks[1]);
}

fn coding_line(label: &str, coding: &Coding, style: ratatui::style::Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), ClinicTheme::text_secondary()),
        Span::styled(
            format!("{} – {}", coding.code_or_blank(), coding.display_or_blank()),
            style,
        ),
    ])
}

fn render_preview(f: &mut Frame, area: Rect, state: &DashboardState, form: &DashboardFormState) {
    let focused = form.focus == Focus::Preview;
    let block = panel("Code Preview", focused);

    let Some(preview) = state.preview() else {
        let text = match state.selected_condition() {
            Some(selected) if state.in_flight() == Some(JobKind::Preview) => {
                format!("  Loading codes for {}", selected.term)
            }
            Some(_) => "  Select the entry again to retry".to_string(),
            None => "  Select a search result".to_string(),
        };
        let empty = Paragraph::new(Span::styled(text, ClinicTheme::text_muted())).block(block);
        f.render_widget(empty, area);
        return;
    };

    let codings = preview.codings();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  AYUSH (NAMASTE): ", ClinicTheme::text_secondary()),
            Span::styled(codings.source.display_or_blank().to_string(), ClinicTheme::text()),
        ]),
        Line::from(""),
    ];

    for (n, choice) in [DiagnosisChoice::Traditional, DiagnosisChoice::Biomedical]
        .into_iter()
        .enumerate()
    {
        if !preview.is_visible(choice) {
            continue;
        }
        let style = if preview.choice() == Some(choice) {
            ClinicTheme::selected()
        } else if focused && form.preview_cursor == choice {
            ClinicTheme::focused()
        } else {
            ClinicTheme::text()
        };
        let marker = if focused && form.preview_cursor == choice { "▸" } else { " " };
        lines.push(coding_line(
            &format!(" {marker}[{}] {}", n + 1, choice.label()),
            codings.get(choice),
            style,
        ));
    }

    if let Some(chosen) = preview.choice() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Final coding: {}", chosen.label()),
            ClinicTheme::success(),
        )));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_key_hints(f: &mut Frame, area: Rect, focus: Focus) {
    let mut spans = vec![
        Span::styled("[Tab] ", ClinicTheme::key_hint()),
        Span::styled("Focus ", ClinicTheme::key_desc()),
    ];
    let pairs: &[(&str, &str)] = if focus.is_patient_field() {
        &[("[Enter] ", "Create patient "), ("[Esc] ", "Commands ")]
    } else if focus == Focus::Query {
        &[("[Enter] ", "Search "), ("[Esc] ", "Commands ")]
    } else {
        &[
            ("[↑↓] ", "Move "),
            ("[Enter] ", "Select "),
            ("[1/2] ", "Choose coding "),
            ("[G] ", "Generate "),
            ("[U] ", "Upload "),
            ("[H] ", "Health "),
            ("[L] ", "Logout "),
            ("[PgUp/PgDn] ", "Scroll "),
        ]
    };
    for (key, desc) in pairs {
        spans.push(Span::styled(*key, ClinicTheme::key_hint()));
        spans.push(Span::styled(*desc, ClinicTheme::key_desc()));
    }
    spans.push(Span::styled("[Ctrl+Q] ", ClinicTheme::key_hint()));
    spans.push(Span::styled("Quit", ClinicTheme::key_desc()));

    let hints = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(hints, area);
}
