// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};
use sitewalk_app::datefmt::{self, format_date, format_date_time, format_time, same_day};
use sitewalk_app::{
    AppCommand, AppState, Inspection, InspectionDraft, InspectionFilter, InspectionId,
    InspectionResult, IssueSeverity, PhotoDraft, PhotoDraftId, Property, PropertyIndex,
    ReviewReport, ScreenKind, SortKey, SortState, compare_by_date, filter_inspections,
    sort_inspections,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{Date, OffsetDateTime};

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const CURSOR_MARK: &str = "▸";

/// Opaque device integrations: the runtime decides what launching a URI
/// means (or whether it means anything at all).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalLink {
    Phone(String),
    Map(String),
}

impl ExternalLink {
    pub fn uri(&self) -> String {
        match self {
            Self::Phone(number) => format!(
                "tel:{}",
                number
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect::<String>()
            ),
            Self::Map(address) => {
                format!("https://maps.google.com/?q={}", address.replace(' ', "+"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    SubmitFinished { request_id: u64 },
}

/// Seam between the UI and whatever supplies the session data. The
/// shipped implementation is all in-memory; a backend would slot in
/// here without the screens noticing.
pub trait AppRuntime {
    fn load_properties(&mut self) -> Result<Vec<Property>>;
    fn load_inspections(&mut self) -> Result<Vec<Inspection>>;
    fn capture_photo(&mut self) -> Result<PhotoDraft>;
    fn submit_report(&mut self, report: &ReviewReport) -> Result<()>;
    fn open_external(&mut self, link: &ExternalLink) -> Result<()>;

    fn submit_delay(&self) -> Duration {
        Duration::from_millis(1500)
    }

    /// Simulated network submit: record the report, then report
    /// completion after a fixed delay. No cancellation, no timeout, no
    /// retry; once started it always succeeds.
    fn spawn_submit_report(
        &mut self,
        request_id: u64,
        report: &ReviewReport,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        self.submit_report(report)?;
        let delay = self.submit_delay();
        thread::spawn(move || {
            thread::sleep(delay);
            let _ = tx.send(InternalEvent::SubmitFinished { request_id });
        });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduleUiState {
    today: Date,
    selected_day: Date,
    cursor: usize,
}

impl ScheduleUiState {
    fn new(today: Date) -> Self {
        Self {
            today,
            selected_day: today,
            cursor: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    inspection_id: InspectionId,
    draft: InspectionDraft,
    issue_cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct HistoryUiState {
    filter: InspectionFilter,
    sort: SortState,
    cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    FormNotes,
    IssueDescription,
    PhotoCaption(PhotoDraftId),
    HistoryQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TextEntryUiState {
    target: TextTarget,
    title: &'static str,
    buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    SubmitReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfirmUiState {
    action: ConfirmAction,
    title: String,
    body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubmitInFlight {
    request_id: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    properties: Vec<Property>,
    inspections: Vec<Inspection>,
    schedule: ScheduleUiState,
    property_cursor: usize,
    form: Option<FormUiState>,
    photo_cursor: usize,
    history: HistoryUiState,
    report: Option<ReviewReport>,
    submit_in_flight: Option<SubmitInFlight>,
    next_request_id: u64,
    confirm: Option<ConfirmUiState>,
    text_entry: Option<TextEntryUiState>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(today: Date) -> Self {
        Self {
            properties: Vec::new(),
            inspections: Vec::new(),
            schedule: ScheduleUiState::new(today),
            property_cursor: 0,
            form: None,
            photo_cursor: 0,
            history: HistoryUiState::default(),
            report: None,
            submit_in_flight: None,
            next_request_id: 0,
            confirm: None,
            text_entry: None,
            help_visible: false,
            status_token: 0,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(OffsetDateTime::now_utc().date());
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = load_session_data(runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn load_session_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    view_data.properties = runtime.load_properties()?;
    view_data.inspections = runtime.load_inspections()?;
    Ok(())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::SubmitFinished { request_id } => {
                handle_submit_finished(state, view_data, tx, request_id);
            }
        }
    }
}

fn handle_submit_finished(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
) {
    let Some(in_flight) = view_data.submit_in_flight else {
        return;
    };
    if in_flight.request_id != request_id {
        return;
    }
    view_data.submit_in_flight = None;
    view_data.form = None;
    state.go_to(ScreenKind::ReportReview, None, None);
    emit_status(state, view_data, tx, "report submitted");
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.text_entry.is_some() {
        handle_text_entry_key(state, view_data, internal_tx, key);
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.confirm.is_some() {
        handle_confirm_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), KeyModifiers::NONE) => {
            view_data.help_visible = true;
            return false;
        }
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
            dispatch_status(state, view_data, internal_tx, AppCommand::ToggleDarkMode);
            return false;
        }
        _ => {}
    }

    match state.screen {
        ScreenKind::Schedule => handle_schedule_key(state, view_data, internal_tx, key),
        ScreenKind::PropertyDetail => {
            handle_property_key(state, runtime, view_data, internal_tx, key)
        }
        ScreenKind::InspectionDetail => handle_detail_key(state, view_data, internal_tx, key),
        ScreenKind::InspectionForm => handle_form_key(state, view_data, internal_tx, key),
        ScreenKind::PhotoManager => handle_photos_key(state, runtime, view_data, internal_tx, key),
        ScreenKind::History => handle_history_key(state, view_data, internal_tx, key),
        ScreenKind::ReportReview => handle_report_key(state, view_data, key),
    }
    false
}

fn dispatch_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if state.status_line.is_some() && !events.is_empty() {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn handle_text_entry_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.text_entry = None;
        }
        KeyCode::Backspace => {
            if let Some(entry) = view_data.text_entry.as_mut() {
                entry.buffer.pop();
            }
        }
        KeyCode::Enter => {
            if let Some(entry) = view_data.text_entry.take() {
                commit_text_entry(state, view_data, internal_tx, entry);
            }
        }
        KeyCode::Char(c) => {
            if let Some(entry) = view_data.text_entry.as_mut() {
                entry.buffer.push(c);
            }
        }
        _ => {}
    }
}

fn commit_text_entry(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    entry: TextEntryUiState,
) {
    match entry.target {
        TextTarget::FormNotes => {
            if let Some(form) = view_data.form.as_mut() {
                form.draft.notes = entry.buffer;
            }
        }
        TextTarget::IssueDescription => {
            if entry.buffer.trim().is_empty() {
                emit_status(state, view_data, internal_tx, "issue description is empty");
                return;
            }
            let location = current_property(state, view_data)
                .map(|property| property.address.clone())
                .unwrap_or_default();
            if let Some(form) = view_data.form.as_mut() {
                form.draft.add_issue(
                    entry.buffer,
                    IssueSeverity::Medium,
                    location,
                    OffsetDateTime::now_utc(),
                );
                form.issue_cursor = form.draft.issues.len().saturating_sub(1);
                emit_status(state, view_data, internal_tx, "issue added");
            }
        }
        TextTarget::PhotoCaption(photo_id) => {
            if let Some(form) = view_data.form.as_mut() {
                form.draft.set_photo_caption(photo_id, entry.buffer);
            }
        }
        TextTarget::HistoryQuery => {
            view_data.history.filter.query = entry.buffer;
            view_data.history.cursor = 0;
        }
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(confirm) = view_data.confirm.clone() else {
        return;
    };
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            view_data.confirm = None;
            match confirm.action {
                ConfirmAction::SubmitReport => {
                    start_submit(state, runtime, view_data, internal_tx);
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            view_data.confirm = None;
        }
        _ => {}
    }
}

fn start_submit<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.as_ref() else {
        return;
    };
    let report = match form.draft.to_report(form.inspection_id) {
        Ok(report) => report,
        Err(error) => {
            emit_status(state, view_data, internal_tx, error.to_string());
            return;
        }
    };

    view_data.next_request_id = view_data.next_request_id.wrapping_add(1);
    let request_id = view_data.next_request_id;
    match runtime.spawn_submit_report(request_id, &report, internal_tx.clone()) {
        Ok(()) => {
            view_data.report = Some(report);
            view_data.submit_in_flight = Some(SubmitInFlight { request_id });
            emit_status(state, view_data, internal_tx, "submitting report...");
        }
        Err(error) => {
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("submit failed: {error}"),
            );
        }
    }
}

fn handle_schedule_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let rows = schedule_rows(view_data);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(&mut view_data.schedule.cursor, 1, rows.len());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(&mut view_data.schedule.cursor, -1, rows.len());
        }
        KeyCode::Left => shift_schedule_day(state, view_data, internal_tx, -1),
        KeyCode::Right => shift_schedule_day(state, view_data, internal_tx, 1),
        KeyCode::Char('<') => shift_schedule_day(state, view_data, internal_tx, -7),
        KeyCode::Char('>') => shift_schedule_day(state, view_data, internal_tx, 7),
        KeyCode::Char('g') => {
            view_data.schedule.selected_day = view_data.schedule.today;
            view_data.schedule.cursor = 0;
            emit_status(state, view_data, internal_tx, "back to today");
        }
        KeyCode::Char('h') => {
            state.go_to(ScreenKind::History, None, None);
        }
        KeyCode::Enter => {
            if let Some(inspection) = rows.get(view_data.schedule.cursor) {
                view_data.property_cursor = 0;
                state.go_to(
                    ScreenKind::InspectionDetail,
                    Some(inspection.property_id),
                    Some(inspection.id),
                );
            }
        }
        _ => {}
    }
}

fn shift_schedule_day(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    days: i64,
) {
    match datefmt::shift_date_by_days(view_data.schedule.selected_day, days) {
        Some(day) => {
            view_data.schedule.selected_day = day;
            view_data.schedule.cursor = 0;
        }
        None => emit_status(state, view_data, internal_tx, "date out of range"),
    }
}

fn handle_property_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let rows = property_rows(state, view_data);
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::Back);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(&mut view_data.property_cursor, 1, rows.len());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(&mut view_data.property_cursor, -1, rows.len());
        }
        KeyCode::Enter => {
            if let Some(inspection) = rows.get(view_data.property_cursor) {
                state.go_to(ScreenKind::InspectionDetail, None, Some(inspection.id));
            }
        }
        KeyCode::Char('c') => {
            if let Some(property) = current_property(state, view_data) {
                let link = ExternalLink::Phone(property.site_contact.phone.clone());
                launch_external(state, runtime, view_data, internal_tx, link);
            }
        }
        KeyCode::Char('m') => {
            if let Some(property) = current_property(state, view_data) {
                let link = ExternalLink::Map(property.address.clone());
                launch_external(state, runtime, view_data, internal_tx, link);
            }
        }
        _ => {}
    }
}

fn launch_external<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    link: ExternalLink,
) {
    let status = match runtime.open_external(&link) {
        Ok(()) => format!("opened {}", link.uri()),
        Err(error) => format!("launch failed: {error}"),
    };
    emit_status(state, view_data, internal_tx, status);
}

fn handle_detail_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::Back);
        }
        KeyCode::Char('s') => {
            let Some(inspection) = current_inspection(state, view_data).cloned() else {
                return;
            };
            if inspection.status.is_settled() {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    "inspection already settled; see history",
                );
                return;
            }
            open_form(view_data, inspection.id);
            state.go_to(ScreenKind::InspectionForm, None, None);
        }
        _ => {}
    }
}

fn open_form(view_data: &mut ViewData, inspection_id: InspectionId) {
    // Reuse the draft when coming back to the same form session;
    // another inspection starts fresh.
    let stale = view_data
        .form
        .as_ref()
        .is_none_or(|form| form.inspection_id != inspection_id);
    if stale {
        view_data.form = Some(FormUiState {
            inspection_id,
            draft: InspectionDraft::default(),
            issue_cursor: 0,
        });
    }
    view_data.photo_cursor = 0;
}

fn handle_form_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('d') => {
            // Both paths keep the draft in the session; "save" is a
            // terminal UI action, nothing persists.
            dispatch_status(
                state,
                view_data,
                internal_tx,
                AppCommand::SetStatus("draft saved".to_owned()),
            );
            state.dispatch(AppCommand::Back);
        }
        KeyCode::Char('n') => {
            let buffer = view_data
                .form
                .as_ref()
                .map(|form| form.draft.notes.clone())
                .unwrap_or_default();
            view_data.text_entry = Some(TextEntryUiState {
                target: TextTarget::FormNotes,
                title: "notes",
                buffer,
            });
        }
        KeyCode::Char('r') => {
            if let Some(form) = view_data.form.as_mut() {
                form.draft.result = match form.draft.result {
                    InspectionResult::Pending => InspectionResult::Pass,
                    InspectionResult::Pass => InspectionResult::Fail,
                    InspectionResult::Fail => InspectionResult::Pending,
                };
            }
        }
        KeyCode::Char('a') => {
            view_data.text_entry = Some(TextEntryUiState {
                target: TextTarget::IssueDescription,
                title: "new issue",
                buffer: String::new(),
            });
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(form) = view_data.form.as_mut() {
                let len = form.draft.issues.len();
                move_cursor(&mut form.issue_cursor, 1, len);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(form) = view_data.form.as_mut() {
                let len = form.draft.issues.len();
                move_cursor(&mut form.issue_cursor, -1, len);
            }
        }
        KeyCode::Char('v') => {
            if let Some(form) = view_data.form.as_mut()
                && let Some(issue) = form.draft.issues.get_mut(form.issue_cursor)
            {
                issue.severity = issue.severity.cycle();
            }
        }
        KeyCode::Char('x') => {
            if let Some(form) = view_data.form.as_mut()
                && let Some(issue) = form.draft.issues.get(form.issue_cursor).cloned()
            {
                form.draft.remove_issue(issue.id);
                let len = form.draft.issues.len();
                form.issue_cursor = form.issue_cursor.min(len.saturating_sub(1));
            }
        }
        KeyCode::Char('p') => {
            state.go_to(ScreenKind::PhotoManager, None, None);
        }
        KeyCode::Char('s') => {
            let Some(form) = view_data.form.as_ref() else {
                return;
            };
            // Blocking alert analog: refuse before the confirm dialog
            // when no pass/fail decision exists yet.
            if let Err(error) = form.draft.validate_for_submit() {
                emit_status(state, view_data, internal_tx, error.to_string());
                return;
            }
            let address = current_property(state, view_data)
                .map(|property| property.address.clone())
                .unwrap_or_else(|| "this property".to_owned());
            view_data.confirm = Some(ConfirmUiState {
                action: ConfirmAction::SubmitReport,
                title: "submit report".to_owned(),
                body: format!("Submit the review report for {address}? [y/n]"),
            });
        }
        _ => {}
    }
}

fn handle_photos_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let photo_count = view_data
        .form
        .as_ref()
        .map(|form| form.draft.photos.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::Back);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(&mut view_data.photo_cursor, 1, photo_count);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(&mut view_data.photo_cursor, -1, photo_count);
        }
        KeyCode::Char('a') => match runtime.capture_photo() {
            Ok(photo) => {
                if let Some(form) = view_data.form.as_mut() {
                    form.draft.add_photo(photo);
                    view_data.photo_cursor = view_data
                        .form
                        .as_ref()
                        .map(|form| form.draft.photos.len().saturating_sub(1))
                        .unwrap_or(0);
                    emit_status(state, view_data, internal_tx, "photo added");
                }
            }
            Err(error) => {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("capture failed: {error}"),
                );
            }
        },
        KeyCode::Char('c') => {
            if let Some(photo) = selected_photo(view_data) {
                view_data.text_entry = Some(TextEntryUiState {
                    target: TextTarget::PhotoCaption(photo.id),
                    title: "caption",
                    buffer: photo.caption.clone(),
                });
            }
        }
        KeyCode::Char('b') => {
            if let Some(photo) = selected_photo(view_data).map(|photo| photo.id)
                && let Some(form) = view_data.form.as_mut()
            {
                form.draft.toggle_photo_tag(photo);
            }
        }
        KeyCode::Char('x') => {
            if let Some(photo) = selected_photo(view_data).map(|photo| photo.id)
                && let Some(form) = view_data.form.as_mut()
            {
                form.draft.remove_photo(photo);
                let len = form.draft.photos.len();
                view_data.photo_cursor = view_data.photo_cursor.min(len.saturating_sub(1));
                emit_status(state, view_data, internal_tx, "photo removed");
            }
        }
        _ => {}
    }
}

fn selected_photo(view_data: &ViewData) -> Option<&PhotoDraft> {
    view_data
        .form
        .as_ref()
        .and_then(|form| form.draft.photos.get(view_data.photo_cursor))
}

fn handle_history_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let rows = history_rows(view_data);
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::Back);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            move_cursor(&mut view_data.history.cursor, 1, rows.len());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            move_cursor(&mut view_data.history.cursor, -1, rows.len());
        }
        KeyCode::Char('/') => {
            view_data.text_entry = Some(TextEntryUiState {
                target: TextTarget::HistoryQuery,
                title: "search",
                buffer: view_data.history.filter.query.clone(),
            });
        }
        KeyCode::Char('s') => {
            view_data.history.filter.status = view_data.history.filter.status.cycle();
            view_data.history.cursor = 0;
        }
        KeyCode::Char('y') => {
            view_data.history.filter.kind = view_data.history.filter.kind.cycle();
            view_data.history.cursor = 0;
        }
        KeyCode::Char('1') => select_sort(state, view_data, internal_tx, SortKey::Date),
        KeyCode::Char('2') => select_sort(state, view_data, internal_tx, SortKey::Status),
        KeyCode::Char('3') => select_sort(state, view_data, internal_tx, SortKey::Address),
        KeyCode::Char('c') => {
            view_data.history.filter = InspectionFilter::default();
            view_data.history.cursor = 0;
            emit_status(state, view_data, internal_tx, "filters cleared");
        }
        KeyCode::Enter => {
            if let Some(inspection) = rows.get(view_data.history.cursor) {
                view_data.property_cursor = 0;
                state.go_to(
                    ScreenKind::InspectionDetail,
                    Some(inspection.property_id),
                    Some(inspection.id),
                );
            }
        }
        _ => {}
    }
}

fn select_sort(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: SortKey,
) {
    view_data.history.sort.select(key);
    let sort = view_data.history.sort;
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("sort: {} {}", sort.key.label(), sort.direction.marker()),
    );
}

fn handle_report_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            view_data.report = None;
            state.dispatch(AppCommand::Back);
        }
        _ => {}
    }
}

fn move_cursor(cursor: &mut usize, delta: isize, len: usize) {
    if len == 0 {
        *cursor = 0;
        return;
    }
    let current = (*cursor).min(len - 1) as isize;
    *cursor = (current + delta).clamp(0, len as isize - 1) as usize;
}

fn current_property<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Property> {
    let id = state.selected_property?;
    view_data
        .properties
        .iter()
        .find(|property| property.id == id)
}

fn current_inspection<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Inspection> {
    let id = state.selected_inspection?;
    view_data
        .inspections
        .iter()
        .find(|inspection| inspection.id == id)
}

/// Inspections in the selected day bucket, earliest first. Rows whose
/// property is missing are skipped silently.
fn schedule_rows(view_data: &ViewData) -> Vec<Inspection> {
    let index = PropertyIndex::new(&view_data.properties);
    let mut rows: Vec<Inspection> = view_data
        .inspections
        .iter()
        .filter(|inspection| same_day(&inspection.scheduled_date, view_data.schedule.selected_day))
        .filter(|inspection| index.resolve(inspection.property_id).is_some())
        .cloned()
        .collect();
    rows.sort_by(compare_by_date);
    rows
}

fn property_rows(state: &AppState, view_data: &ViewData) -> Vec<Inspection> {
    let Some(property) = current_property(state, view_data) else {
        return Vec::new();
    };
    let mut rows: Vec<Inspection> = view_data
        .inspections
        .iter()
        .filter(|inspection| inspection.property_id == property.id)
        .cloned()
        .collect();
    rows.sort_by(compare_by_date);
    rows
}

fn history_rows(view_data: &ViewData) -> Vec<Inspection> {
    let index = PropertyIndex::new(&view_data.properties);
    let filtered = filter_inspections(&view_data.inspections, &index, &view_data.history.filter);
    let sorted = sort_inspections(
        filtered,
        &index,
        view_data.history.sort.key,
        view_data.history.sort.direction,
    );
    sorted
        .into_iter()
        .filter(|inspection| index.resolve(inspection.property_id).is_some())
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Palette {
    fg: Color,
    accent: Color,
    dim: Color,
}

const fn palette(dark_mode: bool) -> Palette {
    if dark_mode {
        Palette {
            fg: Color::White,
            accent: Color::Cyan,
            dim: Color::DarkGray,
        }
    } else {
        Palette {
            fg: Color::Black,
            accent: Color::Blue,
            dim: Color::Gray,
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let colors = palette(state.dark_mode);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data))
        .style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .block(Block::default().title("sitewalk").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    match state.screen {
        ScreenKind::InspectionForm => render_form(frame, layout[1], state, view_data, colors),
        _ => {
            let body = Paragraph::new(body_text(state, view_data))
                .style(Style::default().fg(colors.fg))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(state.screen.label()),
                );
            frame.render_widget(body, layout[1]);
        }
    }

    let status_color = if state.status_line.is_some() {
        Color::Yellow
    } else {
        colors.dim
    };
    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(status_color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(confirm) = &view_data.confirm {
        let area = centered_rect(56, 28, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(confirm.body.clone()).block(
            Block::default()
                .title(confirm.title.clone())
                .borders(Borders::ALL)
                .style(Style::default().fg(colors.accent)),
        );
        frame.render_widget(dialog, area);
    }

    if let Some(entry) = &view_data.text_entry {
        let area = centered_rect(60, 24, frame.area());
        frame.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}█", entry.buffer)).block(
            Block::default()
                .title(entry.title)
                .borders(Borders::ALL)
                .style(Style::default().fg(colors.accent)),
        );
        frame.render_widget(input, area);
    }

    if view_data.help_visible {
        let area = centered_rect(78, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .style(Style::default().fg(colors.fg))
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_form(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    colors: Palette,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let percent = view_data
        .form
        .as_ref()
        .map(|form| form.draft.completion_percent())
        .unwrap_or(0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("progress"))
        .gauge_style(Style::default().fg(colors.accent))
        .percent(u16::from(percent));
    frame.render_widget(gauge, layout[0]);

    let body = Paragraph::new(render_form_text(state, view_data))
        .style(Style::default().fg(colors.fg))
        .block(Block::default().borders(Borders::ALL).title("form"));
    frame.render_widget(body, layout[1]);
}

fn header_text(state: &AppState, view_data: &ViewData) -> String {
    let mut crumbs = vec!["schedule"];
    if state.screen != ScreenKind::Schedule {
        crumbs.push(state.screen.label());
    }
    let submitting = if view_data.submit_in_flight.is_some() {
        "  [submitting]"
    } else {
        ""
    };
    format!("{}{submitting}", crumbs.join(" > "))
}

fn body_text(state: &AppState, view_data: &ViewData) -> String {
    match state.screen {
        ScreenKind::Schedule => render_schedule_text(view_data),
        ScreenKind::PropertyDetail => render_property_text(state, view_data),
        ScreenKind::InspectionDetail => render_detail_text(state, view_data),
        ScreenKind::InspectionForm => render_form_text(state, view_data),
        ScreenKind::PhotoManager => render_photos_text(view_data),
        ScreenKind::History => render_history_text(view_data),
        ScreenKind::ReportReview => render_report_text(state, view_data),
    }
}

fn render_schedule_text(view_data: &ViewData) -> String {
    let schedule = &view_data.schedule;
    let day_label = if schedule.selected_day == schedule.today {
        format!("today  {}", datefmt::day_key(schedule.selected_day))
    } else {
        datefmt::day_key(schedule.selected_day)
    };

    let rows = schedule_rows(view_data);
    let index = PropertyIndex::new(&view_data.properties);
    let mut lines = vec![format!("◀ {day_label} ▶"), String::new()];
    if rows.is_empty() {
        lines.push("no inspections scheduled".to_owned());
    }
    for (position, inspection) in rows.iter().enumerate() {
        let Some(property) = index.resolve(inspection.property_id) else {
            continue;
        };
        let marker = if position == schedule.cursor {
            CURSOR_MARK
        } else {
            " "
        };
        lines.push(format!(
            "{marker} {}  {}  {} ({})  [{}]",
            format_time(&inspection.scheduled_date),
            inspection.kind.label(),
            property.address,
            property.community,
            inspection.status.as_str(),
        ));
    }
    lines.join("\n")
}

fn render_property_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(property) = current_property(state, view_data) else {
        return "no property selected".to_owned();
    };

    let mut lines = vec![
        format!("{} ({})", property.address, property.community),
        format!("{}  status: {}", property.plan_number, property.status.as_str()),
        format!(
            "contact: {} {}",
            property.site_contact.name, property.site_contact.phone
        ),
    ];
    if let Some(closing) = &property.closing_date {
        lines.push(format!("closing: {closing}"));
    }
    if !property.notes.is_empty() {
        lines.push(format!("notes: {}", property.notes));
    }
    lines.push(String::new());
    lines.push("inspections:".to_owned());

    let rows = property_rows(state, view_data);
    if rows.is_empty() {
        lines.push("  none scheduled".to_owned());
    }
    for (position, inspection) in rows.iter().enumerate() {
        let marker = if position == view_data.property_cursor {
            CURSOR_MARK
        } else {
            " "
        };
        lines.push(format!(
            "{marker} {}  {}  [{}]",
            format_date_time(&inspection.scheduled_date),
            inspection.kind.label(),
            inspection.status.as_str(),
        ));
    }
    lines.join("\n")
}

fn render_detail_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(inspection) = current_inspection(state, view_data) else {
        return "no inspection selected".to_owned();
    };
    let index = PropertyIndex::new(&view_data.properties);
    let address = index
        .resolve(inspection.property_id)
        .map(|property| property.address.clone())
        .unwrap_or_else(|| "unknown property".to_owned());

    let mut lines = vec![
        format!("{}  {}", inspection.kind.label(), address),
        format!(
            "{}  at {}",
            format_date(&inspection.scheduled_date),
            format_time(&inspection.scheduled_date)
        ),
        format!("status: {}", inspection.status.as_str()),
        format!("inspector: {}", inspection.inspector.name),
    ];
    if !inspection.notes.is_empty() {
        lines.push(format!("notes: {}", inspection.notes));
    }
    if !inspection.photos.is_empty() {
        lines.push(format!("photos on record: {}", inspection.photos.len()));
    }
    if let Some(report_url) = &inspection.report_url {
        lines.push(format!("report: {report_url}"));
    }
    lines.join("\n")
}

fn render_form_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(form) = view_data.form.as_ref() else {
        return "no form in progress".to_owned();
    };
    let address = current_property(state, view_data)
        .map(|property| property.address.clone())
        .unwrap_or_default();

    let notes_line = if form.draft.notes.is_empty() {
        "notes: (empty)".to_owned()
    } else {
        format!("notes: {}", form.draft.notes)
    };

    let mut lines = vec![
        format!("inspection form  {address}"),
        String::new(),
        notes_line,
        format!("result: {}", form.draft.result.as_str()),
        format!("photos: {}", form.draft.photos.len()),
        String::new(),
        format!("issues ({}):", form.draft.issues.len()),
    ];
    if form.draft.issues.is_empty() {
        lines.push("  none recorded".to_owned());
    }
    for (position, issue) in form.draft.issues.iter().enumerate() {
        let marker = if position == form.issue_cursor {
            CURSOR_MARK
        } else {
            " "
        };
        lines.push(format!(
            "{marker} [{}] {} @ {}",
            issue.severity.as_str(),
            issue.description,
            issue.location,
        ));
    }
    lines.join("\n")
}

fn render_photos_text(view_data: &ViewData) -> String {
    let Some(form) = view_data.form.as_ref() else {
        return "no form in progress".to_owned();
    };

    let mut lines = vec![format!("photos ({})", form.draft.photos.len()), String::new()];
    if form.draft.photos.is_empty() {
        lines.push("no photos yet; press a to add".to_owned());
    }
    for (position, photo) in form.draft.photos.iter().enumerate() {
        let marker = if position == view_data.photo_cursor {
            CURSOR_MARK
        } else {
            " "
        };
        let tag = if photo.before_photo { "before" } else { "after" };
        let caption = if photo.caption.is_empty() {
            "(no caption)"
        } else {
            photo.caption.as_str()
        };
        lines.push(format!("{marker} [{tag}] {caption}"));
    }
    lines.join("\n")
}

fn render_history_text(view_data: &ViewData) -> String {
    let history = &view_data.history;
    let query = if history.filter.query.trim().is_empty() {
        "(none)".to_owned()
    } else {
        format!("\"{}\"", history.filter.query)
    };

    let mut lines = vec![
        format!(
            "status: {}  type: {}  search: {query}",
            history.filter.status.label(),
            history.filter.kind.label(),
        ),
        format!(
            "sort: {} {}",
            history.sort.key.label(),
            history.sort.direction.marker()
        ),
        String::new(),
    ];

    let rows = history_rows(view_data);
    let index = PropertyIndex::new(&view_data.properties);
    if rows.is_empty() {
        lines.push("no inspections match".to_owned());
    }
    for (position, inspection) in rows.iter().enumerate() {
        let Some(property) = index.resolve(inspection.property_id) else {
            continue;
        };
        let marker = if position == history.cursor {
            CURSOR_MARK
        } else {
            " "
        };
        lines.push(format!(
            "{marker} {}  {}  {}  [{}]",
            format_date(&inspection.scheduled_date),
            inspection.kind.label(),
            property.address,
            inspection.status.as_str(),
        ));
    }
    lines.join("\n")
}

fn render_report_text(state: &AppState, view_data: &ViewData) -> String {
    let Some(report) = view_data.report.as_ref() else {
        return "no report to review".to_owned();
    };
    let address = current_property(state, view_data)
        .map(|property| property.address.clone())
        .unwrap_or_default();

    let mut lines = vec![
        format!("review report  {address}"),
        format!("result: {}", report.result.as_str()),
        format!("photos: {}", report.photo_urls.len()),
        format!("issues: {}", report.issues.len()),
    ];
    if !report.notes.is_empty() {
        lines.push(format!("notes: {}", report.notes));
    }
    for issue in &report.issues {
        lines.push(format!(
            "  [{}] {} @ {}",
            issue.severity.as_str(),
            issue.description,
            issue.location,
        ));
    }
    lines.push(String::new());
    lines.push("esc/enter: back to history".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    hint_for_screen(state.screen, view_data).to_owned()
}

fn hint_for_screen(screen: ScreenKind, view_data: &ViewData) -> &'static str {
    if view_data.text_entry.is_some() {
        return "enter: apply  esc: cancel";
    }
    match screen {
        ScreenKind::Schedule => "enter: open  ←/→: day  </>: week  g: today  h: history  ?: help",
        ScreenKind::PropertyDetail => "enter: open  c: call  m: map  esc: back",
        ScreenKind::InspectionDetail => "s: start form  esc: back",
        ScreenKind::InspectionForm => {
            "n: notes  r: result  a: issue  v: severity  x: remove  p: photos  s: submit  d: save"
        }
        ScreenKind::PhotoManager => "a: add  c: caption  b: before/after  x: delete  esc: back",
        ScreenKind::History => "/: search  s: status  y: type  1/2/3: sort  c: clear  esc: back",
        ScreenKind::ReportReview => "esc: back to history",
    }
}

fn help_overlay_text() -> &'static str {
    "sitewalk\n\
     \n\
     global\n\
       ctrl-q     quit\n\
       ctrl-t     toggle dark mode\n\
       ?          toggle help\n\
       esc        back (per-screen)\n\
     \n\
     schedule\n\
       ←/→        previous/next day\n\
       </>        previous/next week\n\
       g          jump to today\n\
       h          history\n\
       enter      open inspection\n\
     \n\
     form\n\
       n          edit notes\n\
       r          cycle pass/fail/pending\n\
       a          add issue   v cycle severity   x remove\n\
       p          photo manager\n\
       s          submit report   d save draft\n\
     \n\
     history\n\
       /          free-text search\n\
       s          cycle status filter\n\
       y          cycle type filter\n\
       1/2/3      sort by date/status/address (again flips)\n\
       c          clear filters"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
