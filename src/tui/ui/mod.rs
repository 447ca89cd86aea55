//! UI module: View components for the TUI.

pub mod auth;
pub mod dashboard;
pub mod toast;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Codes are suggestions from the terminology service and must be reviewed by a clinician.",
            ClinicTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Rule-based entries are heuristic matches, not NAMASTE codes.",
            ClinicTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
