//! Exercise page: guided sections and their launchable games.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::render_message;
use crate::domain::{ExerciseSection, GameLaunch};
use crate::tui::styles::ClinicalTheme;

/// Selection and launch status on the exercise page.
#[derive(Debug, Clone, Default)]
pub struct ExerciseState {
    section: usize,
    game: usize,
    /// At most one launch in flight.
    pub launching: bool,
    pub message: Option<(String, bool)>,
}

impl ExerciseState {
    #[must_use]
    pub fn section(&self) -> ExerciseSection {
        ExerciseSection::ALL[self.section]
    }

    #[must_use]
    pub fn game(&self) -> usize {
        self.game
    }

    pub fn next_section(&mut self) {
        self.section = (self.section + 1) % ExerciseSection::ALL.len();
        self.game = 0;
    }

    pub fn prev_section(&mut self) {
        let len = ExerciseSection::ALL.len();
        self.section = (self.section + len - 1) % len;
        self.game = 0;
    }

    pub fn toggle_game(&mut self) {
        self.game = (self.game + 1) % 2;
    }

    /// Launch request for the highlighted game, unless one is already starting.
    pub fn begin_launch(&mut self) -> Option<GameLaunch> {
        if self.launching {
            return None;
        }
        self.launching = true;
        self.message = None;
        Some(GameLaunch::new(self.section(), self.game))
    }

    pub fn finish_launch(&mut self, result: Result<(), String>) {
        self.launching = false;
        self.message = Some(match result {
            Ok(()) => (
                format!(
                    "{} started. Complete it in the game window.",
                    self.section().games()[self.game]
                ),
                false,
            ),
            Err(message) => (message, true),
        });
    }
}

pub fn render_exercise(f: &mut Frame, area: Rect, state: &ExerciseState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Intro
            Constraint::Min(6),    // Sections
            Constraint::Length(2), // Status
        ])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled("Guided Exercises", ClinicalTheme::title())),
        Line::from(Span::styled(
            "Pick how you feel, then launch a game to relax, focus or release stress.",
            ClinicalTheme::text_secondary(),
        )),
    ]);
    f.render_widget(intro, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[1]);

    for (i, section) in ExerciseSection::ALL.iter().enumerate() {
        let active = *section == state.section();
        let mut lines = vec![
            Line::from(Span::styled(section.description(), ClinicalTheme::text_secondary())),
            Line::from(""),
        ];
        for (g, game) in section.games().iter().enumerate() {
            let style = if active && g == state.game() {
                ClinicalTheme::selected()
            } else {
                ClinicalTheme::text()
            };
            lines.push(Line::from(Span::styled(format!(" ▸ {game} "), style)));
        }

        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", section.title()),
                    if active {
                        ClinicalTheme::focused()
                    } else {
                        ClinicalTheme::text_secondary()
                    },
                ))
                .borders(Borders::ALL)
                .border_style(if active {
                    ClinicalTheme::border_focused()
                } else {
                    ClinicalTheme::border()
                }),
        );
        f.render_widget(card, columns[i]);
    }

    if state.launching {
        render_message(f, rows[2], Some("Starting game..."), false);
    } else if let Some((message, is_error)) = &state.message {
        render_message(f, rows[2], Some(message), *is_error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_launch_in_flight() {
        let mut state = ExerciseState::default();
        state.next_section();
        state.toggle_game();

        let launch = state.begin_launch().expect("Should launch");
        assert_eq!(launch, GameLaunch::new(ExerciseSection::Focus, 1));
        assert!(state.begin_launch().is_none());

        state.finish_launch(Err("A game is already running. Please complete it first.".into()));
        assert!(!state.launching);
        assert!(state.begin_launch().is_some());
    }

    #[test]
    fn test_section_wraps_and_resets_game() {
        let mut state = ExerciseState::default();
        state.toggle_game();
        state.prev_section();
        assert_eq!(state.section(), ExerciseSection::Stressed);
        assert_eq!(state.game(), 0);
    }
}
