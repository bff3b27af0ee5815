//! Landing page: hero, analysis modules and how it works.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::AnalysisModel;
use crate::tui::styles::{ClinicalTheme, LOGO};

const HOW_IT_WORKS: [(&str, &str); 4] = [
    ("1. EEG Input", "Collect non-invasive EEG signals from supported devices."),
    ("2. Processing", "Clean and transform signals into features in real-time."),
    ("3. Inference", "Run deep models to infer emotion and cognitive state."),
    ("4. Guidance", "Recommend relaxation, focus games or mindfulness."),
];

pub fn render_home(f: &mut Frame, area: Rect, authenticated: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Hero
            Constraint::Min(8),     // Modules
            Constraint::Length(7),  // How it works
        ])
        .split(area);

    render_hero(f, chunks[0], authenticated);
    render_modules(f, chunks[1]);
    render_how_it_works(f, chunks[2]);
}

fn render_hero(f: &mut Frame, area: Rect, authenticated: bool) {
    let mut lines: Vec<Line> = LOGO
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| Line::from(Span::styled(l.to_string(), ClinicalTheme::subtitle())))
        .collect();

    lines.push(Line::from(Span::styled(
        "Empowering healthcare with emotion-aware intelligence.",
        ClinicalTheme::text(),
    )));

    let call_to_action = if authenticated {
        Line::from(vec![
            Span::styled("[1-3] ", ClinicalTheme::key_hint()),
            Span::styled("Open a module   ", ClinicalTheme::key_desc()),
            Span::styled("[O] ", ClinicalTheme::key_hint()),
            Span::styled("Sign out", ClinicalTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[L] ", ClinicalTheme::key_hint()),
            Span::styled("Sign in   ", ClinicalTheme::key_desc()),
            Span::styled("[S] ", ClinicalTheme::key_hint()),
            Span::styled("Create account", ClinicalTheme::key_desc()),
        ])
    };
    lines.push(call_to_action);

    let hero = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(hero, area);
}

fn render_modules(f: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (i, model) in AnalysisModel::ALL.iter().enumerate() {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(model.label(), ClinicalTheme::accent())),
            Line::from(""),
            Line::from(Span::styled(model.description(), ClinicalTheme::text_secondary())),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), ClinicalTheme::key_hint()),
                Span::styled("Open", ClinicalTheme::key_desc()),
            ]),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ClinicalTheme::border()),
        );
        f.render_widget(card, columns[i]);
    }
}

fn render_how_it_works(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = HOW_IT_WORKS
        .iter()
        .map(|(title, text)| {
            Line::from(vec![
                Span::styled(format!("{title:<15}"), ClinicalTheme::focused()),
                Span::styled(*text, ClinicalTheme::text_secondary()),
            ])
        })
        .collect();

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" How It Works ", ClinicalTheme::title()))
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(p, area);
}
