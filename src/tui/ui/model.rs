//! Model workspace: clinician sidebar, patient form and analysis results.

use std::path::PathBuf;

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use super::{render_message, render_text_field};
use crate::domain::{
    check_eeg_image, date_of_birth_from_age, AnalysisModel, FormErrors, Gender, PatientSubmission,
    PredictionReport, TextField, UserRecord,
};
use crate::tui::styles::ClinicalTheme;

pub const FIELD_NAME: &str = "name";
pub const FIELD_AGE: &str = "age";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_DATE_OF_BIRTH: &str = "dateOfBirth";
pub const FIELD_PAST_REPORTS: &str = "pastMedicalReports";
pub const FIELD_EEG_IMAGE: &str = "eegImage";

const MAX_AGE: u16 = 150;
const DATE_FORMAT: &str = "%Y-%m-%d";

const SLOT_NAME: usize = 0;
const SLOT_AGE: usize = 1;
const SLOT_GENDER: usize = 2;
const SLOT_DATE_OF_BIRTH: usize = 3;
const SLOT_PAST_REPORTS: usize = 4;
const SLOT_EEG_IMAGE: usize = 5;
const SLOTS: usize = 6;

/// Patient form state
#[derive(Debug, Clone)]
pub struct PatientFormState {
    pub name: TextField,
    pub age: TextField,
    pub gender: Option<Gender>,
    pub date_of_birth: TextField,
    pub past_reports: TextField,
    pub eeg_image: TextField,
    pub selected_models: Vec<AnalysisModel>,
    pub errors: FormErrors,
    page_model: AnalysisModel,
    focus: usize,
}

impl PatientFormState {
    /// Empty form with the page's own model preselected.
    #[must_use]
    pub fn new(page_model: AnalysisModel) -> Self {
        Self {
            name: TextField::new(FIELD_NAME, "Patient Name", "Full name"),
            age: TextField::new(FIELD_AGE, "Age", "0-150"),
            gender: None,
            date_of_birth: TextField::new(FIELD_DATE_OF_BIRTH, "Date of Birth", "YYYY-MM-DD"),
            past_reports: TextField::new(
                FIELD_PAST_REPORTS,
                "Past Medical Reports",
                "Relevant history (optional)",
            ),
            eeg_image: TextField::new(FIELD_EEG_IMAGE, "EEG Image", "/path/to/eeg.png"),
            selected_models: vec![page_model],
            errors: FormErrors::default(),
            page_model,
            focus: 0,
        }
    }

    #[must_use]
    pub fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn gender_focused(&self) -> bool {
        self.focus == SLOT_GENDER
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % SLOTS;
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + SLOTS - 1) % SLOTS;
    }

    fn text_field_mut(&mut self, slot: usize) -> Option<&mut TextField> {
        match slot {
            SLOT_NAME => Some(&mut self.name),
            SLOT_AGE => Some(&mut self.age),
            SLOT_DATE_OF_BIRTH => Some(&mut self.date_of_birth),
            SLOT_PAST_REPORTS => Some(&mut self.past_reports),
            SLOT_EEG_IMAGE => Some(&mut self.eeg_image),
            _ => None,
        }
    }

    /// Type into the focused field, deriving the date of birth from today's date.
    pub fn input_char(&mut self, c: char) {
        self.input_char_on(c, chrono::Local::now().date_naive());
    }

    /// Type into the focused field. Editing the age rewrites the date of birth.
    pub fn input_char_on(&mut self, c: char, today: NaiveDate) {
        match self.focus {
            SLOT_GENDER => {
                if c == ' ' {
                    self.cycle_gender(true);
                }
            }
            SLOT_AGE => {
                if c.is_ascii_digit() && self.age.value.len() < 3 {
                    self.age.push(c);
                    self.errors.clear_field(FIELD_AGE);
                    self.derive_date_of_birth(today);
                }
            }
            slot => {
                if let Some(field) = self.text_field_mut(slot) {
                    field.push(c);
                    let key = field.key;
                    self.errors.clear_field(key);
                }
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.text_field_mut(self.focus) {
            field.pop();
            let key = field.key;
            self.errors.clear_field(key);
        }
    }

    fn derive_date_of_birth(&mut self, today: NaiveDate) {
        let Ok(age) = self.age.value.parse::<u8>() else {
            return;
        };
        if u16::from(age) > MAX_AGE {
            return;
        }
        if let Some(dob) = date_of_birth_from_age(age, today) {
            self.date_of_birth.value = dob.format(DATE_FORMAT).to_string();
            self.errors.clear_field(FIELD_DATE_OF_BIRTH);
        }
    }

    /// Step through the gender options (wrapping).
    pub fn cycle_gender(&mut self, forward: bool) {
        let all = Gender::ALL;
        let next = match self.gender {
            None if forward => 0,
            None => all.len() - 1,
            Some(current) => {
                let idx = all.iter().position(|g| *g == current).unwrap_or(0);
                if forward {
                    (idx + 1) % all.len()
                } else {
                    (idx + all.len() - 1) % all.len()
                }
            }
        };
        self.gender = Some(all[next]);
        self.errors.clear_field(FIELD_GENDER);
    }

    pub fn toggle_model(&mut self, model: AnalysisModel) {
        if let Some(pos) = self.selected_models.iter().position(|m| *m == model) {
            self.selected_models.remove(pos);
        } else {
            self.selected_models.push(model);
        }
    }

    #[must_use]
    pub fn is_selected(&self, model: AnalysisModel) -> bool {
        self.selected_models.contains(&model)
    }

    /// EEG image path, if one has been typed.
    #[must_use]
    pub fn eeg_image_path(&self) -> Option<PathBuf> {
        let raw = self.eeg_image.value.trim();
        (!raw.is_empty()).then(|| PathBuf::from(raw))
    }

    /// Validate the form and build a submission.
    ///
    /// With no model ticked, the page's own model is sent.
    ///
    /// # Errors
    /// Returns the field-scoped errors when any check fails.
    pub fn to_submission(&self) -> Result<PatientSubmission, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.value.trim();
        if name.is_empty() {
            errors.insert(FIELD_NAME, "Patient name is required");
        }

        let age = if self.age.value.is_empty() {
            errors.insert(FIELD_AGE, "Age is required");
            None
        } else {
            match self.age.value.parse::<u8>() {
                Ok(age) if u16::from(age) <= MAX_AGE => Some(age),
                _ => {
                    errors.insert(FIELD_AGE, "Age must be between 0 and 150");
                    None
                }
            }
        };

        if self.gender.is_none() {
            errors.insert(FIELD_GENDER, "Gender is required");
        }

        let date_of_birth = if self.date_of_birth.value.trim().is_empty() {
            errors.insert(FIELD_DATE_OF_BIRTH, "Date of birth is required");
            None
        } else {
            match NaiveDate::parse_from_str(self.date_of_birth.value.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(FIELD_DATE_OF_BIRTH, "Please enter a date as YYYY-MM-DD");
                    None
                }
            }
        };

        let eeg_image = self.eeg_image_path();
        match &eeg_image {
            None => errors.insert(FIELD_EEG_IMAGE, "EEG image is required"),
            Some(path) => {
                if let Err(message) = check_eeg_image(path) {
                    errors.insert(FIELD_EEG_IMAGE, message);
                }
            }
        }

        match (age, self.gender, date_of_birth, eeg_image) {
            (Some(age), Some(gender), Some(date_of_birth), Some(eeg_image)) if errors.is_empty() => {
                let selected_models = if self.selected_models.is_empty() {
                    vec![self.page_model]
                } else {
                    self.selected_models.clone()
                };
                Ok(PatientSubmission {
                    name: name.to_string(),
                    age,
                    gender,
                    date_of_birth,
                    past_medical_reports: self.past_reports.value.clone(),
                    eeg_image,
                    selected_models,
                })
            }
            _ => Err(errors),
        }
    }

    /// Wipe all field buffers from memory and reset the form.
    ///
    /// Called once a submission succeeds so patient details do not linger in
    /// UI state.
    pub fn clear_sensitive(&mut self) {
        for field in [
            &mut self.name,
            &mut self.age,
            &mut self.date_of_birth,
            &mut self.past_reports,
            &mut self.eeg_image,
        ] {
            field.value.zeroize();
        }
        self.gender = None;
        self.selected_models = vec![self.page_model];
        self.errors.clear();
        self.focus = 0;
    }
}

/// Everything shown on one model page.
#[derive(Debug, Clone)]
pub struct ModelWorkspaceState {
    pub model: AnalysisModel,
    pub form: PatientFormState,
    pub report: Option<PredictionReport>,
    pub heatmap_url: Option<String>,
    /// Status line; the flag marks errors.
    pub message: Option<(String, bool)>,
    pub busy: bool,
}

impl ModelWorkspaceState {
    #[must_use]
    pub fn new(model: AnalysisModel) -> Self {
        Self {
            model,
            form: PatientFormState::new(model),
            report: None,
            heatmap_url: None,
            message: None,
            busy: false,
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), true));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), false));
    }
}

/// Render the workspace for the signed-in clinician.
pub fn render_model_workspace(
    f: &mut Frame,
    area: Rect,
    state: &ModelWorkspaceState,
    user: Option<&UserRecord>,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    render_sidebar(f, columns[0], state.model, user);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Title
            Constraint::Length(15), // Form
            Constraint::Length(2),  // Status
            Constraint::Min(4),     // Results
        ])
        .split(columns[1]);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(state.model.label(), ClinicalTheme::title())),
        Line::from(Span::styled(
            state.model.description(),
            ClinicalTheme::text_secondary(),
        )),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(title, rows[0]);

    render_patient_form(f, rows[1], &state.form);

    if state.busy {
        render_message(f, rows[2], Some("Sending to the analysis service..."), false);
    } else if let Some((message, is_error)) = &state.message {
        render_message(f, rows[2], Some(message), *is_error);
    }

    render_results(f, rows[3], state);
}

fn render_sidebar(f: &mut Frame, area: Rect, current: AnalysisModel, user: Option<&UserRecord>) {
    let mut lines = Vec::new();

    if let Some(user) = user {
        lines.push(Line::from(Span::styled(
            user.display_name(),
            ClinicalTheme::title(),
        )));
        lines.push(Line::from(Span::styled(
            user.email.clone(),
            ClinicalTheme::text_secondary(),
        )));
        lines.push(Line::from(vec![
            Span::styled("Role: ", ClinicalTheme::text_muted()),
            Span::styled(user.role.as_str(), ClinicalTheme::text()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Specialization: ", ClinicalTheme::text_muted()),
            Span::styled(user.specialization.label(), ClinicalTheme::text()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Models", ClinicalTheme::subtitle())));
    for (i, model) in AnalysisModel::ALL.iter().enumerate() {
        let style = if *model == current {
            ClinicalTheme::selected()
        } else {
            ClinicalTheme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[F{}] ", i + 1), ClinicalTheme::key_hint()),
            Span::styled(model.label(), style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[F4] ", ClinicalTheme::key_hint()),
        Span::styled("Sign out", ClinicalTheme::key_desc()),
    ]));

    let sidebar = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(sidebar, area);
}

fn render_patient_form(f: &mut Frame, area: Rect, form: &PatientFormState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name / age
            Constraint::Length(3), // Gender / date of birth
            Constraint::Length(3), // Past reports
            Constraint::Length(3), // EEG image
            Constraint::Length(3), // Model selection
        ])
        .split(area);

    let halves = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(row)
    };
    let top = halves(rows[0]);
    let middle = halves(rows[1]);

    for (area, field, slot) in [
        (top[0], &form.name, SLOT_NAME),
        (top[1], &form.age, SLOT_AGE),
        (middle[1], &form.date_of_birth, SLOT_DATE_OF_BIRTH),
        (rows[2], &form.past_reports, SLOT_PAST_REPORTS),
        (rows[3], &form.eeg_image, SLOT_EEG_IMAGE),
    ] {
        render_text_field(f, area, field, form.focus() == slot, form.errors.field(field.key));
    }
    render_gender(f, middle[0], form);

    let mut spans = Vec::new();
    for (i, model) in AnalysisModel::ALL.iter().enumerate() {
        let mark = if form.is_selected(*model) { "[x]" } else { "[ ]" };
        spans.push(Span::styled(format!("[F{}]", i + 6), ClinicalTheme::key_hint()));
        spans.push(Span::styled(
            format!(" {mark} {}   ", model.label()),
            ClinicalTheme::text(),
        ));
    }
    let models = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(" Models to run ", ClinicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(models, rows[4]);
}

fn render_gender(f: &mut Frame, area: Rect, form: &PatientFormState) {
    let focused = form.gender_focused();
    let error = form.errors.field(FIELD_GENDER);

    let mut block = Block::default()
        .title(Span::styled(
            " Gender ",
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

    let value = match form.gender {
        Some(g) => Span::styled(format!(" ◀ {} ▶", g.label()), ClinicalTheme::text()),
        None => Span::styled(" Select gender", ClinicalTheme::text_muted()),
    };
    f.render_widget(Paragraph::new(Line::from(value)).block(block), area);
}

fn render_results(f: &mut Frame, area: Rect, state: &ModelWorkspaceState) {
    let mut lines = Vec::new();

    match &state.report {
        Some(report) => {
            lines.push(Line::from(Span::styled(
                "Prediction completed successfully!",
                ClinicalTheme::success(),
            )));
            for finding in &report.findings {
                lines.push(Line::from(Span::styled(
                    format!("  {}", finding.summary()),
                    ClinicalTheme::confidence(finding.confidence),
                )));
            }
            if let Some(url) = &report.pdf_report {
                lines.push(Line::from(vec![
                    Span::styled("PDF report: ", ClinicalTheme::text_muted()),
                    Span::styled(url.clone(), ClinicalTheme::accent()),
                ]));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No analysis yet. Fill in the patient details and press Enter.",
            ClinicalTheme::text_muted(),
        ))),
    }

    if let Some(url) = &state.heatmap_url {
        lines.push(Line::from(vec![
            Span::styled("Heatmap: ", ClinicalTheme::text_muted()),
            Span::styled(url.clone(), ClinicalTheme::accent()),
        ]));
    }

    let results = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(" Results ", ClinicalTheme::title()))
            .borders(Borders::TOP)
            .border_style(ClinicalTheme::border()),
    );
    f.render_widget(results, area);
}
