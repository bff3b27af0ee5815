//! NeuroAI color palette and styles.
//!
//! Indigo and violet brand colors on a dark slate background, with
//! high-contrast semantic colors for validation and backend status.

use ratatui::style::{Color, Modifier, Style};

/// Clinical dashboard theme.
pub struct ClinicalTheme;

impl ClinicalTheme {
    /// Indigo - brand primary
    pub const PRIMARY: Color = Color::Rgb(99, 102, 241); // #6366F1
    pub const PRIMARY_LIGHT: Color = Color::Rgb(165, 180, 252); // #A5B4FC
    pub const PRIMARY_DARK: Color = Color::Rgb(67, 56, 202); // #4338CA

    /// Violet accent (model cards)
    pub const ACCENT: Color = Color::Rgb(167, 139, 250); // #A78BFA

    pub const BORDER: Color = Color::Rgb(100, 116, 139); // #64748B

    pub const SUCCESS: Color = Color::Rgb(34, 197, 94); // #22C55E
    pub const WARNING: Color = Color::Rgb(245, 158, 11); // #F59E0B
    pub const DANGER: Color = Color::Rgb(239, 68, 68); // #EF4444

    pub const BG_DARK: Color = Color::Rgb(17, 24, 39); // #111827
    pub const BG_OVERLAY: Color = Color::Rgb(31, 41, 55); // #1F2937

    pub const TEXT_PRIMARY: Color = Color::Rgb(243, 244, 246); // #F3F4F6
    pub const TEXT_SECONDARY: Color = Color::Rgb(156, 163, 175); // #9CA3AF
    pub const TEXT_MUTED: Color = Color::Rgb(107, 114, 128); // #6B7280

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn accent() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Selected list entry (model switcher, game list).
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Overlay panels drawn above a view.
    #[must_use]
    pub fn overlay() -> Style {
        Style::default().bg(Self::BG_OVERLAY)
    }

    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Confidence styling for a model finding.
    #[must_use]
    pub fn confidence(confidence: f64) -> Style {
        if confidence >= 0.7 {
            Self::success()
        } else if confidence >= 0.4 {
            Self::warning()
        } else {
            Self::danger()
        }
    }
}

/// Landing page banner.
pub const LOGO: &str = r"
 _   _                        _    ___
| \ | | ___ _   _ _ __ ___   / \  |_ _|
|  \| |/ _ \ | | | '__/ _ \ / _ \  | |
| |\  |  __/ |_| | | | (_) / ___ \ | |
|_| \_|\___|\__,_|_|  \___/_/   \_\___|
";
