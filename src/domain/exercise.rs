//! Guided exercise sections and their launchable games.

use serde::Serialize;

/// An exercise section on the exercise page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseSection {
    Relax,
    Focus,
    Stressed,
}

impl ExerciseSection {
    pub const ALL: [ExerciseSection; 3] = [Self::Relax, Self::Focus, Self::Stressed];

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Relax => "Relax",
            Self::Focus => "Focus",
            Self::Stressed => "Stressed",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Relax => {
                "Unwind your mind with gentle activities designed to reduce anxiety and promote calmness."
            }
            Self::Focus => {
                "Enhance attention and concentration with engaging focus games that support cognitive development."
            }
            Self::Stressed => {
                "Release tension and manage stress through interactive activities that support emotional well-being."
            }
        }
    }

    /// State token understood by the game launcher (`stressed` is sent as `stress`).
    #[must_use]
    pub fn state_token(&self) -> &'static str {
        match self {
            Self::Relax => "relax",
            Self::Focus => "focus",
            Self::Stressed => "stress",
        }
    }

    #[must_use]
    pub fn games(&self) -> [&'static str; 2] {
        match self {
            Self::Relax => ["Drawing Canvas", "Zen Box"],
            Self::Focus => ["Target Practice", "Typing Speed Test"],
            Self::Stressed => ["Zen Box", "Drawing Canvas"],
        }
    }
}

/// Request body for the game launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameLaunch {
    pub state: &'static str,
    pub index: usize,
}

impl GameLaunch {
    #[must_use]
    pub fn new(section: ExerciseSection, index: usize) -> Self {
        Self {
            state: section.state_token(),
            index,
        }
    }
}
