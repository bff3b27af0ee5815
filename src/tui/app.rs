//! Main TUI application state machine.
//!
//! Handles:
//! - Key input, routed to the open overlay or the rendered view
//! - Keeping per-view state in step with the shell's rendered route
//! - Backend calls via background worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::application::{CredentialsForm, Shell};
use crate::domain::{AnalysisModel, ModalState, Route};
use crate::ports::{AnalysisBackend, KeyValueStore};
use crate::NeuroAiError;

use super::ui::{
    auth::{render_modal, render_sign_in_page, render_sign_in_required},
    exercise::{render_exercise, ExerciseState},
    home::render_home,
    model::{render_model_workspace, ModelWorkspaceState},
    render_footer, render_header,
};
use super::worker::{BackendJob, BackendOutcome, BackendProgress, BackendWorker, BackendWorkerHandle};

/// Which view started the job in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Predict(AnalysisModel),
    Heatmap(AnalysisModel),
    Game,
}

/// Main application state
pub struct App<S: KeyValueStore, B> {
    shell: Shell<S>,
    backend: Arc<B>,

    /// Whether the app should quit
    should_quit: bool,

    /// Present while a model page is rendered
    workspace: Option<ModelWorkspaceState>,

    exercise: ExerciseState,

    /// Pending backend worker (if running)
    pending: Option<(PendingKind, BackendWorkerHandle)>,
}

impl<S, B> App<S, B>
where
    S: KeyValueStore,
    B: AnalysisBackend + 'static,
    B::Error: Into<NeuroAiError>,
{
    /// Create the application over `storage`, mounted at `start_route`.
    ///
    /// The persisted session is restored and the initial route gated
    /// before the first frame is drawn.
    pub fn new(storage: Arc<S>, backend: Arc<B>, start_route: &str) -> Self {
        let mut shell = Shell::new(storage, start_route);
        shell.mount();

        let mut app = Self {
            shell,
            backend,
            should_quit: false,
            workspace: None,
            exercise: ExerciseState::default(),
            pending: None,
        };
        app.sync_views();
        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| self.draw(f))?;

            // Short poll keeps worker updates flowing.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let banner = u16::from(self.shell.prompt() == ModalState::SignIn);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),      // Header
                Constraint::Length(banner), // Sign-in notice
                Constraint::Min(0),         // View
                Constraint::Length(3),      // Footer
            ])
            .split(f.area());

        let rendered = self.shell.rendered();
        render_header(f, chunks[0], rendered, self.shell.current_user());
        if banner > 0 {
            render_sign_in_required(f, chunks[1]);
        }

        let content = chunks[2];
        match rendered {
            Some(Route::Uninitialized | Route::Home) => {
                render_home(f, content, self.shell.is_authenticated());
            }
            Some(Route::SignIn) => render_sign_in_page(f, content),
            Some(Route::Predictive | Route::Emotion | Route::Cognitive) => {
                if let Some(workspace) = &self.workspace {
                    render_model_workspace(f, content, workspace, self.shell.current_user());
                }
            }
            Some(Route::Exercise) => render_exercise(f, content, &self.exercise),
            None => {}
        }

        render_modal(f, content, self.shell.modals());
        render_footer(f, chunks[3], &self.key_hints());
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        if self.shell.modal_state().is_open() {
            return vec![("Tab", "Next field"), ("Enter", "Submit"), ("Esc", "Close")];
        }
        match self.shell.rendered() {
            Some(Route::Uninitialized | Route::Home) => vec![
                ("L", "Sign in"),
                ("1-3", "Models"),
                ("E", "Exercises"),
                ("S", "Sign-in page"),
            ],
            Some(Route::Predictive | Route::Emotion | Route::Cognitive) => vec![
                ("Tab", "Next field"),
                ("Enter", "Analyze"),
                ("F5", "Heatmap"),
                ("F4", "Sign out"),
                ("Esc", "Home"),
            ],
            Some(Route::Exercise) => vec![
                ("←/→", "Section"),
                ("↑/↓", "Game"),
                ("Enter", "Start"),
                ("Esc", "Home"),
            ],
            Some(Route::SignIn) | None => vec![("Esc", "Home")],
        }
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        while let Some(progress) = self
            .pending
            .as_ref()
            .and_then(|(_, worker)| worker.try_recv())
        {
            match progress {
                BackendProgress::Sending => {}
                BackendProgress::Complete(outcome) => {
                    if let Some((kind, _)) = self.pending.take() {
                        self.apply_outcome(kind, Ok(outcome));
                    }
                    break;
                }
                BackendProgress::Error(message) => {
                    if let Some((kind, _)) = self.pending.take() {
                        self.apply_outcome(kind, Err(message));
                    }
                    break;
                }
            }
        }
    }

    fn apply_outcome(&mut self, kind: PendingKind, result: std::result::Result<BackendOutcome, String>) {
        match kind {
            PendingKind::Game => {
                self.exercise.finish_launch(result.map(|_| ()));
            }
            PendingKind::Predict(model) | PendingKind::Heatmap(model) => {
                let Some(workspace) = self.workspace.as_mut().filter(|w| w.model == model) else {
                    tracing::debug!("Dropping backend result for a page that is no longer shown");
                    return;
                };
                workspace.busy = false;
                match result {
                    Ok(BackendOutcome::Prediction(report)) => {
                        let status = if report.pdf_report.is_some() {
                            "Prediction completed successfully! PDF report is being generated..."
                        } else {
                            "Prediction completed successfully!"
                        };
                        workspace.report = Some(report);
                        workspace.set_status(status);
                        workspace.form.clear_sensitive();
                    }
                    Ok(BackendOutcome::Heatmap(url)) => {
                        workspace.heatmap_url = Some(url);
                        workspace.set_status("Heatmap ready.");
                    }
                    Ok(BackendOutcome::GameStarted) => {}
                    Err(message) => workspace.set_error(message),
                }
            }
        }
    }

    fn spawn(&mut self, kind: PendingKind, job: BackendJob) {
        let handle = BackendWorker::spawn(Arc::clone(&self.backend), job);
        self.pending = Some((kind, handle));
    }

    /// Bring per-view state in line with whatever the shell now renders.
    fn sync_views(&mut self) {
        let model = self.shell.rendered().and_then(AnalysisModel::from_route);
        match (model, self.workspace.as_mut()) {
            (Some(model), Some(workspace)) if workspace.model == model => {}
            (Some(model), previous) => {
                if let Some(previous) = previous {
                    previous.form.clear_sensitive();
                }
                self.workspace = Some(ModelWorkspaceState::new(model));
            }
            (None, Some(previous)) => {
                previous.form.clear_sensitive();
                self.workspace = None;
            }
            (None, None) => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('x') => self.shell.dismiss_prompt(),
                _ => {}
            }
            return;
        }

        if self.shell.modal_state().is_open() {
            self.handle_modal_key(key);
        } else {
            match self.shell.rendered() {
                Some(Route::Uninitialized | Route::Home) => self.handle_landing_key(key),
                Some(Route::Predictive | Route::Emotion | Route::Cognitive) => {
                    self.handle_workspace_key(key);
                }
                Some(Route::Exercise) => self.handle_exercise_key(key),
                Some(Route::SignIn) => {
                    if key == KeyCode::Esc {
                        self.shell.navigate(Route::Uninitialized);
                    }
                }
                None => {}
            }
        }

        self.sync_views();
    }

    fn credentials_form(&mut self) -> Option<&mut CredentialsForm> {
        match self.shell.modal_state() {
            ModalState::SignIn => Some(self.shell.modals_mut().sign_in_form_mut()),
            ModalState::SignUpExistingAccount => Some(self.shell.modals_mut().existing_form_mut()),
            ModalState::SignUp | ModalState::Closed => None,
        }
    }

    fn handle_modal_key(&mut self, key: KeyCode) {
        let state = self.shell.modal_state();
        match key {
            KeyCode::Esc => self.shell.close_modal(),
            KeyCode::Enter => {
                let ok = match state {
                    ModalState::SignIn => self.shell.submit_sign_in(),
                    ModalState::SignUp => self.shell.submit_sign_up(),
                    ModalState::SignUpExistingAccount => self.shell.submit_existing_account(),
                    ModalState::Closed => false,
                };
                tracing::debug!("Overlay submit from {:?}: {}", state, ok);
            }
            KeyCode::F(2) => match state {
                ModalState::SignIn => self.shell.modals_mut().switch_to_sign_up(),
                ModalState::SignUp | ModalState::SignUpExistingAccount => {
                    self.shell.modals_mut().switch_to_sign_in();
                }
                ModalState::Closed => {}
            },
            KeyCode::F(3) => self.shell.modals_mut().toggle_existing_account(),
            _ if state == ModalState::SignUp => {
                let form = self.shell.modals_mut().sign_up_form_mut();
                match key {
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                    KeyCode::Left => form.cycle_specialization(false),
                    KeyCode::Right => form.cycle_specialization(true),
                    KeyCode::Char(c) => form.input_char(c),
                    KeyCode::Backspace => form.delete_char(),
                    _ => {}
                }
            }
            _ => {
                if let Some(form) = self.credentials_form() {
                    match key {
                        KeyCode::Tab | KeyCode::Down => form.next_field(),
                        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                        KeyCode::Char(c) => form.input_char(c),
                        KeyCode::Backspace => form.delete_char(),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_landing_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('l') | KeyCode::Char('L') => self.shell.open_sign_in(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.shell.navigate(Route::SignIn),
            KeyCode::Char('e') | KeyCode::Char('E') => self.shell.navigate(Route::Exercise),
            KeyCode::Char('h') | KeyCode::Char('H') => self.shell.navigate(Route::Home),
            KeyCode::Char('o') | KeyCode::Char('O') if self.shell.is_authenticated() => {
                self.shell.sign_out();
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = c as usize - '1' as usize;
                self.shell.navigate(AnalysisModel::ALL[idx].route());
            }
            _ => {}
        }
    }

    fn handle_workspace_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F(n @ 1..=3) => {
                self.shell
                    .navigate(AnalysisModel::ALL[usize::from(n - 1)].route());
                return;
            }
            KeyCode::F(4) => {
                self.shell.sign_out();
                return;
            }
            KeyCode::Esc => {
                self.shell.navigate(Route::Home);
                return;
            }
            KeyCode::F(5) => {
                self.request_heatmap();
                return;
            }
            KeyCode::Enter => {
                self.submit_patient_form();
                return;
            }
            _ => {}
        }

        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };
        let form = &mut workspace.form;
        match key {
            KeyCode::F(n @ 6..=8) => form.toggle_model(AnalysisModel::ALL[usize::from(n - 6)]),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left if form.gender_focused() => form.cycle_gender(false),
            KeyCode::Right if form.gender_focused() => form.cycle_gender(true),
            KeyCode::Char(c) => form.input_char(c),
            KeyCode::Backspace => form.delete_char(),
            _ => {}
        }
    }

    fn submit_patient_form(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };

        match workspace.form.to_submission() {
            Ok(submission) => {
                workspace.form.errors.clear();
                workspace.message = None;
                workspace.report = None;
                workspace.busy = true;
                let kind = PendingKind::Predict(workspace.model);
                tracing::info!(
                    "Submitting patient data to {} model(s)",
                    submission.selected_models.len()
                );
                self.spawn(kind, BackendJob::Predict(submission));
            }
            Err(errors) => {
                workspace.form.errors = errors;
            }
        }
    }

    fn request_heatmap(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let Some(workspace) = self.workspace.as_mut() else {
            return;
        };

        let Some(image) = workspace.form.eeg_image_path() else {
            workspace.set_error("Please select an EEG image first.");
            return;
        };
        if let Err(message) = crate::domain::check_eeg_image(&image) {
            workspace.set_error(message);
            return;
        }

        workspace.busy = true;
        workspace.heatmap_url = None;
        let kind = PendingKind::Heatmap(workspace.model);
        self.spawn(kind, BackendJob::Heatmap(image));
    }

    fn handle_exercise_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.shell.navigate(Route::Home),
            KeyCode::Right | KeyCode::Tab => self.exercise.next_section(),
            KeyCode::Left | KeyCode::BackTab => self.exercise.prev_section(),
            KeyCode::Up | KeyCode::Down => self.exercise.toggle_game(),
            KeyCode::Enter => {
                if self.pending.is_some() {
                    return;
                }
                if let Some(launch) = self.exercise.begin_launch() {
                    tracing::info!("Launching game {} for {}", launch.index, launch.state);
                    self.spawn(PendingKind::Game, BackendJob::StartGame(launch));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BackendError, MemoryStore};
    use crate::domain::{GameLaunch, PatientSubmission, PredictionReport};
    use std::path::Path;
    use std::time::Instant;

    struct OfflineBackend;

    impl AnalysisBackend for OfflineBackend {
        type Error = BackendError;

        fn predict(&self, _: &PatientSubmission) -> std::result::Result<PredictionReport, Self::Error> {
            Err(BackendError::Rejected("offline".to_string()))
        }

        fn convert_heatmap(&self, _: &Path) -> std::result::Result<String, Self::Error> {
            Err(BackendError::Rejected("offline".to_string()))
        }

        fn start_game(&self, _: GameLaunch) -> std::result::Result<(), Self::Error> {
            Ok(())
        }
    }

    fn app_at(hash: &str) -> App<MemoryStore, OfflineBackend> {
        App::new(Arc::new(MemoryStore::new()), Arc::new(OfflineBackend), hash)
    }

    fn press(app: &mut App<MemoryStore, OfflineBackend>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App<MemoryStore, OfflineBackend>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn register(app: &mut App<MemoryStore, OfflineBackend>) {
        for (i, value) in ["Jane", "Doe", "jane@x.com", "longenough1", "longenough1", "LIC1"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                press(app, KeyCode::Tab);
            }
            type_text(app, value);
        }
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        press(app, KeyCode::Char(' '));
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_landing_opens_sign_in_overlay() {
        let mut app = app_at("");
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.shell.modal_state(), ModalState::SignIn);

        type_text(&mut app, "nobody@x.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.shell.modals().sign_in_form().errors.general_message(),
            Some("No account found. Please sign up first.")
        );

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.shell.modal_state(), ModalState::Closed);
    }

    #[test]
    fn test_model_key_bounces_anonymous_to_sign_up() {
        let mut app = app_at("");
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.shell.rendered(), Some(Route::SignIn));
        assert_eq!(app.shell.modal_state(), ModalState::SignUp);
        assert!(app.workspace.is_none());
    }

    #[test]
    fn test_registration_lands_on_workspace() {
        let mut app = app_at("#/signin");
        register(&mut app);

        assert!(app.shell.is_authenticated());
        assert_eq!(app.shell.rendered(), Some(Route::Predictive));
        let workspace = app.workspace.as_ref().expect("workspace should exist");
        assert_eq!(workspace.model, AnalysisModel::PredictiveTreatment);

        press(&mut app, KeyCode::F(3));
        assert_eq!(app.shell.rendered(), Some(Route::Cognitive));
        assert_eq!(
            app.workspace.as_ref().map(|w| w.model),
            Some(AnalysisModel::CognitiveMonitoring)
        );

        press(&mut app, KeyCode::F(4));
        assert!(!app.shell.is_authenticated());
        assert_eq!(app.shell.rendered(), Some(Route::SignIn));
        assert!(app.workspace.is_none());
    }

    #[test]
    fn test_invalid_patient_form_spawns_nothing() {
        let mut app = app_at("#/signin");
        register(&mut app);

        press(&mut app, KeyCode::Enter);
        assert!(app.pending.is_none());
        let workspace = app.workspace.as_ref().expect("workspace should exist");
        assert!(workspace.form.errors.has_field_errors());
    }

    #[test]
    fn test_game_launch_reports_back() {
        let mut app = app_at("#/exercise");
        assert_eq!(app.shell.rendered(), Some(Route::Exercise));

        press(&mut app, KeyCode::Enter);
        assert!(app.exercise.launching);

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending.is_some() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(10));
        }

        assert!(!app.exercise.launching);
        let (message, is_error) = app.exercise.message.clone().expect("status should be set");
        assert!(!is_error);
        assert!(message.starts_with("Drawing Canvas"));
    }

    struct CrashingBackend;

    impl AnalysisBackend for CrashingBackend {
        type Error = BackendError;

        fn predict(&self, _: &PatientSubmission) -> std::result::Result<PredictionReport, Self::Error> {
            panic!("predict crashed");
        }

        fn convert_heatmap(&self, _: &Path) -> std::result::Result<String, Self::Error> {
            panic!("heatmap crashed");
        }

        fn start_game(&self, _: GameLaunch) -> std::result::Result<(), Self::Error> {
            panic!("game crashed");
        }
    }

    #[test]
    fn test_crashed_game_launch_frees_the_page() {
        let mut app = App::new(
            Arc::new(MemoryStore::new()),
            Arc::new(CrashingBackend),
            "#/exercise",
        );

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.pending.is_some());

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending.is_some() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(10));
        }

        assert!(app.pending.is_none());
        assert!(!app.exercise.launching);
        let (_, is_error) = app.exercise.message.clone().expect("status should be set");
        assert!(is_error);

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.exercise.launching);
        assert!(app.pending.is_some());
    }
}
