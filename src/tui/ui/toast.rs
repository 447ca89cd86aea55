//! Toast overlay in the bottom-right corner.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::application::Notifications;
use crate::tui::styles::ClinicTheme;

/// Draw the most recent live toast over `area`.
pub fn render_toast(f: &mut Frame, area: Rect, toasts: &Notifications, now: Instant) {
    let Some((toast, phase)) = toasts.latest(now) else {
        return;
    };

    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + area.height.saturating_sub(height + 3),
        width,
        height,
    };

    let style = ClinicTheme::toast(phase);
    let body = Paragraph::new(Line::from(Span::styled(format!(" {}", toast.message), style)))
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));

    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}
