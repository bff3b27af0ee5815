//! UI module: View components for the TUI.

pub mod auth;
pub mod exercise;
pub mod home;
pub mod model;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Route, TextField, UserRecord};
use crate::tui::styles::ClinicalTheme;

/// Top bar: product name, current location and who is signed in.
pub fn render_header(f: &mut Frame, area: Rect, route: Option<Route>, user: Option<&UserRecord>) {
    let location = match route {
        Some(Route::Uninitialized) | Some(Route::Home) => "Home",
        Some(Route::SignIn) => "Sign In",
        Some(Route::Predictive) => "Predictive Treatment Response",
        Some(Route::Emotion) => "Emotion Recognition",
        Some(Route::Cognitive) => "Cognitive Monitoring",
        Some(Route::Exercise) => "Exercises",
        None => "Redirecting...",
    };

    let who = match user {
        Some(user) => Span::styled(user.display_name(), ClinicalTheme::success()),
        None => Span::styled("Not signed in", ClinicalTheme::text_muted()),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" NeuroAI ", ClinicalTheme::header()),
        Span::styled(format!(" {location}"), ClinicalTheme::title()),
        Span::styled(" │ ", ClinicalTheme::border()),
        who,
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Bottom bar: key hints for the active view plus the clinical disclaimer.
pub fn render_footer(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2 + 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!("[{key}] "), ClinicalTheme::key_hint()));
        spans.push(Span::styled(format!("{desc}  "), ClinicalTheme::key_desc()));
    }
    spans.push(Span::styled("[Ctrl+Q] ", ClinicalTheme::key_hint()));
    spans.push(Span::styled("Quit", ClinicalTheme::key_desc()));

    let text = vec![
        Line::from(spans),
        Line::from(Span::styled(
            "NeuroAI supports clinical judgment; it does not replace professional medical evaluation.",
            ClinicalTheme::text_muted(),
        )),
    ];

    let footer = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(ClinicalTheme::border()),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}

/// A `percent_x` by `percent_y` rectangle centered in `area`.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Bordered single-line input with an optional error under the title.
pub fn render_text_field(
    f: &mut Frame,
    area: Rect,
    field: &TextField,
    focused: bool,
    error: Option<&str>,
) {
    let border_style = if error.is_some() {
        ClinicalTheme::danger()
    } else if focused {
        ClinicalTheme::border_focused()
    } else {
        ClinicalTheme::border()
    };
    let title_style = if focused {
        ClinicalTheme::focused()
    } else {
        ClinicalTheme::text_secondary()
    };

    let mut block = Block::default()
        .title(Span::styled(format!(" {} ", field.label), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = error {
        block = block.title_bottom(Span::styled(format!(" {error} "), ClinicalTheme::danger()));
    }

    let value = if field.value.is_empty() {
        Span::styled(field.hint, ClinicalTheme::text_muted())
    } else {
        Span::styled(field.display(), ClinicalTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value,
        if focused {
            Span::styled("▌", ClinicalTheme::cursor())
        } else {
            Span::raw("")
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

/// One-line general error or status message.
pub fn render_message(f: &mut Frame, area: Rect, message: Option<&str>, is_error: bool) {
    let Some(message) = message else {
        return;
    };
    let style = if is_error {
        ClinicalTheme::danger()
    } else {
        ClinicalTheme::success()
    };
    let prefix = if is_error { "! " } else { "✓ " };
    let p = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message.to_string(), style),
    ]))
    .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
