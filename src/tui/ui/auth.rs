//! Account overlays: sign-in, registration and existing-account forms.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, render_message, render_text_field};
use crate::application::{
    CredentialsForm, ModalCoordinator, SignUpForm, SIGN_UP_ATTESTED_SLOT,
    SIGN_UP_SPECIALIZATION_SLOT,
};
use crate::domain::forms::{FIELD_ATTESTED, FIELD_SPECIALIZATION};
use crate::domain::ModalState;
use crate::tui::styles::ClinicalTheme;

/// Backdrop of the sign-in page; the registration form opens over it.
pub fn render_sign_in_page(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Neurologist Access", ClinicalTheme::title())),
        Line::from(""),
        Line::from(Span::styled(
            "The analysis modules are restricted to registered neurologists.",
            ClinicalTheme::text_secondary(),
        )),
        Line::from(Span::styled(
            "Create an account or sign in with an existing one to continue.",
            ClinicalTheme::text_secondary(),
        )),
    ];
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

/// Banner shown after a protected view bounced an anonymous visitor.
pub fn render_sign_in_required(f: &mut Frame, area: Rect) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" Sign in required ", ClinicalTheme::header()),
        Span::styled(
            " Please sign in to access this feature. ",
            ClinicalTheme::warning(),
        ),
        Span::styled("[Ctrl+X] ", ClinicalTheme::key_hint()),
        Span::styled("Dismiss", ClinicalTheme::key_desc()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

/// Draw whichever overlay is open, if any.
pub fn render_modal(f: &mut Frame, area: Rect, modals: &ModalCoordinator) {
    match modals.state() {
        ModalState::Closed => {}
        ModalState::SignIn => render_credentials(
            f,
            area,
            " Neurologist Sign In ",
            modals.sign_in_form(),
            "[Enter] Sign in  [F2] Create account  [Esc] Close",
        ),
        ModalState::SignUp => render_sign_up(f, area, modals.sign_up_form()),
        ModalState::SignUpExistingAccount => render_credentials(
            f,
            area,
            " Sign In With Existing Account ",
            modals.existing_form(),
            "[Enter] Sign in  [F3] Back to registration  [Esc] Close",
        ),
    }
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(title, ClinicalTheme::title()))
        .borders(Borders::ALL)
        .border_style(ClinicalTheme::border_focused())
        .style(ClinicalTheme::overlay())
}

fn render_credentials(
    f: &mut Frame,
    area: Rect,
    title: &str,
    form: &CredentialsForm,
    hints: &str,
) {
    let popup = centered_rect(50, 50, area);
    f.render_widget(Clear, popup);
    let block = overlay_block(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(2), // General error
            Constraint::Min(1),    // Hints
        ])
        .split(inner);

    for (i, field) in [&form.email, &form.password].into_iter().enumerate() {
        render_text_field(
            f,
            chunks[i],
            field,
            form.focus() == i,
            form.errors.field(field.key),
        );
    }
    render_message(f, chunks[2], form.errors.general_message(), true);

    let hint = Paragraph::new(Span::styled(hints, ClinicalTheme::text_muted()))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[3]);
}

fn render_sign_up(f: &mut Frame, area: Rect, form: &SignUpForm) {
    let popup = centered_rect(70, 90, area);
    f.render_widget(Clear, popup);
    let block = overlay_block(" Create Neurologist Account ");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Names
            Constraint::Length(3), // Email
            Constraint::Length(3), // Passwords
            Constraint::Length(3), // License
            Constraint::Length(3), // Specialization
            Constraint::Length(2), // Attestation
            Constraint::Length(2), // General error
            Constraint::Min(1),    // Hints
        ])
        .split(inner);

    let halves = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row)
    };
    let names = halves(rows[0]);
    let passwords = halves(rows[2]);
    let slots = [
        names[0],
        names[1],
        rows[1],
        passwords[0],
        passwords[1],
        rows[3],
    ];

    for (i, (field, slot)) in form.text_fields().into_iter().zip(slots).enumerate() {
        render_text_field(f, slot, field, form.focus() == i, form.errors.field(field.key));
    }

    render_specialization(f, rows[4], form);
    render_attestation(f, rows[5], form);
    render_message(f, rows[6], form.errors.general_message(), true);

    let hints = Paragraph::new(Span::styled(
        "[Tab] Next  [←/→] Specialization  [Space] Toggle  [Enter] Create  [F2] Sign in  [F3] Existing account  [Esc] Close",
        ClinicalTheme::text_muted(),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(hints, rows[7]);
}

fn render_specialization(f: &mut Frame, area: Rect, form: &SignUpForm) {
    let focused = form.focus() == SIGN_UP_SPECIALIZATION_SLOT;
    let error = form.errors.field(FIELD_SPECIALIZATION);

    let mut block = Block::default()
        .title(Span::styled(
            " Specialization ",
            if focused {
                ClinicalTheme::focused()
            } else {
                ClinicalTheme::text_secondary()
            },
        ))
        .borders(Borders::ALL)
        .border_style(match (error, focused) {
            (Some(_), _) => ClinicalTheme::danger(),
            (None, true) => ClinicalTheme::border_focused(),
            (None, false) => ClinicalTheme::border(),
        });
    if let Some(error) = error {
        block = block.title_bottom(Span::styled(format!(" {error} "), ClinicalTheme::danger()));
    }

    let value = match form.specialization {
        Some(s) => Span::styled(format!(" ◀ {} ▶", s.label()), ClinicalTheme::text()),
        None => Span::styled(" Select your specialization", ClinicalTheme::text_muted()),
    };
    f.render_widget(Paragraph::new(Line::from(value)).block(block), area);
}

fn render_attestation(f: &mut Frame, area: Rect, form: &SignUpForm) {
    let focused = form.focus() == SIGN_UP_ATTESTED_SLOT;
    let mark = if form.attested { "[x]" } else { "[ ]" };
    let style = if focused {
        ClinicalTheme::focused()
    } else {
        ClinicalTheme::text()
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {mark} "), style),
        Span::styled("I confirm that I am a licensed neurologist", style),
    ])];
    if let Some(error) = form.errors.field(FIELD_ATTESTED) {
        lines.push(Line::from(Span::styled(
            format!("     {error}"),
            ClinicalTheme::danger(),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}
