//! Application state and core logic
//!
//! `App` is the terminal host of the form: it turns key and mouse events
//! into `FormEvent`s, carries out the `Command`s the controller returns and
//! owns everything that only exists on screen (modals, scrolling, the
//! loading overlay, the progress animation).

use crate::config::FormConfig;
use crate::controller::{Command, FormController, FormEvent, Modal};
use crate::platform;
use crate::signature::{Point, PointerEvent};
use crate::state::schema::FormSchema;
use crate::state::{FieldKind, Form, ProgressAnimation};
use crate::submission::{HttpTransport, SubmissionEvent, SubmissionPipeline, SubmissionTransport};
use crate::ui::layout::{self, slot_height, FormLayout, FIELD_HEIGHT};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Rows moved per scroll wheel notch
const SCROLL_STEP: i32 = 3;

/// Main application struct
pub struct App {
    pub controller: FormController,
    pipeline: SubmissionPipeline,
    events_tx: UnboundedSender<SubmissionEvent>,
    events_rx: UnboundedReceiver<SubmissionEvent>,
    /// Success/error acknowledgement
    pub modal: Option<Modal>,
    /// Submit check that failed
    pub alert: Option<String>,
    loading_since: Option<Instant>,
    reset_at: Option<Instant>,
    pub progress: ProgressAnimation,
    /// Rows of the section scrolled out of view
    pub scroll_offset: u16,
    /// Terminal size for hit-testing (height, width)
    pub terminal_size: Option<(u16, u16)>,
    pub status_message: Option<String>,
    /// Left button went down inside the signature pad
    signing: bool,
    quit: bool,
}

impl App {
    /// Create a new App talking to the configured endpoints
    pub fn new(config: &FormConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &FormConfig, transport: Arc<dyn SubmissionTransport>) -> Self {
        let controller = FormController::new(
            FormSchema::anamnesis(),
            (config.signature_width, config.signature_height),
            config.reset_delay(),
        );
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let progress = ProgressAnimation::new(controller.form().progress_percent());

        Self {
            controller,
            pipeline: SubmissionPipeline::new(transport, config.success_delay()),
            events_tx,
            events_rx,
            modal: None,
            alert: None,
            loading_since: None,
            reset_at: None,
            progress,
            scroll_offset: 0,
            terminal_size: None,
            status_message: None,
            signing: false,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// A submission is in flight
    pub fn is_busy(&self) -> bool {
        self.loading_since.is_some()
    }

    pub fn loading_elapsed(&self) -> Option<Duration> {
        self.loading_since.map(|since| since.elapsed())
    }

    /// Something on screen moves without input
    pub fn is_animating(&self) -> bool {
        self.is_busy() || !self.progress.is_complete()
    }

    fn layout(&self) -> FormLayout {
        let (height, width) = self.terminal_size.unwrap_or((24, 80));
        layout::compute(
            Rect::new(0, 0, width, height),
            &self.controller,
            self.scroll_offset,
        )
    }

    fn dispatch(&mut self, event: FormEvent) {
        let commands = self.controller.handle(event);
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ScrollIntoView { section } => {
                    tracing::debug!(%section, "Scrolling section into view");
                    self.scroll_offset = 0;
                }
                Command::ShowAlert(message) => self.alert = Some(message),
                Command::ShowModal(modal) => self.modal = Some(modal),
                Command::SetLoading(on) => self.loading_since = on.then(Instant::now),
                Command::Dispatch(payload) => {
                    // Detached; the outcome comes back over the channel
                    self.pipeline.spawn(payload, self.events_tx.clone());
                }
                Command::ScheduleReset(delay) => self.reset_at = Some(Instant::now() + delay),
                // The terminal has no touch scrolling to suppress
                Command::SuppressDefault => {}
            }
        }
    }

    /// Drain background events and fire due timers; call once per loop
    pub fn tick(&mut self) {
        // Timers first, so a modal stays up for at least one frame
        if self.reset_at.is_some_and(|at| Instant::now() >= at) {
            self.reset_at = None;
            self.modal = None;
            self.dispatch(FormEvent::ResetDue);
        }

        while let Ok(event) = self.events_rx.try_recv() {
            let event = match event {
                SubmissionEvent::Phase(phase) => FormEvent::SubmissionProgress(phase),
                SubmissionEvent::Finished(outcome) => FormEvent::SubmissionFinished(outcome),
            };
            self.dispatch(event);
        }

        self.progress
            .retarget(self.controller.form().progress_percent());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Dialogs are modal
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return Ok(());
        }
        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.modal = None;
            }
            return Ok(());
        }
        if self.is_busy() {
            return Ok(());
        }

        self.status_message = None;

        if platform::is_action(key.modifiers) {
            match key.code {
                KeyCode::Char('n') => self.dispatch(FormEvent::Next),
                KeyCode::Char('p') => self.dispatch(FormEvent::Previous),
                KeyCode::Char('s') => self.dispatch(FormEvent::Submit),
                KeyCode::Char('l') => {
                    self.dispatch(FormEvent::ClearSignature);
                    self.status_message = Some("Assinatura apagada".to_string());
                }
                _ => {}
            }
            self.ensure_focus_visible();
            return Ok(());
        }

        let multiline = self
            .controller
            .focused_field()
            .is_some_and(|f| f.is_multiline());

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.dispatch(FormEvent::FocusNext),
            KeyCode::BackTab | KeyCode::Up => self.dispatch(FormEvent::FocusPrev),
            KeyCode::PageDown => self.scroll_by(i32::from(FIELD_HEIGHT) * 3),
            KeyCode::PageUp => self.scroll_by(-i32::from(FIELD_HEIGHT) * 3),
            KeyCode::Enter if multiline => self.dispatch(FormEvent::InputChar('\n')),
            KeyCode::Enter => self.dispatch(FormEvent::FocusNext),
            KeyCode::Backspace => self.dispatch(FormEvent::Backspace),
            KeyCode::Char(c) => self.dispatch(FormEvent::InputChar(c)),
            _ => {}
        }

        if !matches!(key.code, KeyCode::PageDown | KeyCode::PageUp) {
            self.ensure_focus_visible();
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if self.alert.is_some() || self.modal.is_some() || self.is_busy() {
            return Ok(());
        }

        let layout = self.layout();
        let (column, row) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.in_signature(column, row) {
                    if let Some(index) = layout.field_at(column, row) {
                        self.dispatch(FormEvent::FocusField(index));
                    }
                    let point = self.signature_point(&layout, column, row);
                    self.signing = true;
                    self.dispatch(FormEvent::Pointer(PointerEvent::Down(point)));
                } else if hit(layout.previous, column, row) {
                    self.dispatch(FormEvent::Previous);
                } else if hit(layout.next, column, row) {
                    self.dispatch(FormEvent::Next);
                } else if hit(layout.submit, column, row) {
                    self.dispatch(FormEvent::Submit);
                } else if let Some(index) = layout.field_at(column, row) {
                    self.dispatch(FormEvent::FocusField(index));
                    // A click on a checkbox ticks it
                    if self
                        .controller
                        .focused_field()
                        .is_some_and(|f| f.kind == FieldKind::Checkbox)
                    {
                        self.dispatch(FormEvent::InputChar(' '));
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.signing => {
                if layout.in_signature(column, row) {
                    let point = self.signature_point(&layout, column, row);
                    self.dispatch(FormEvent::Pointer(PointerEvent::Move(point)));
                } else {
                    self.signing = false;
                    self.dispatch(FormEvent::Pointer(PointerEvent::Leave));
                }
            }
            MouseEventKind::Up(MouseButton::Left) if self.signing => {
                self.signing = false;
                self.dispatch(FormEvent::Pointer(PointerEvent::Up));
            }
            MouseEventKind::ScrollUp => self.scroll_by(-SCROLL_STEP),
            MouseEventKind::ScrollDown => self.scroll_by(SCROLL_STEP),
            _ => {}
        }
        Ok(())
    }

    fn signature_point(&self, layout: &FormLayout, column: u16, row: u16) -> Point {
        let area = layout.signature.unwrap_or_default();
        self.controller.signature().map_cell(
            column.saturating_sub(area.x),
            row.saturating_sub(area.y),
            area.width,
            area.height,
        )
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = i32::from(self.layout().max_scroll());
        let next = (i32::from(self.scroll_offset) + delta).clamp(0, max);
        self.scroll_offset = u16::try_from(next).unwrap_or(0);
    }

    /// Scroll just enough to show the focused field whole
    fn ensure_focus_visible(&mut self) {
        let viewport = self.layout().body.height.saturating_sub(2);
        let fields = self.controller.visible_fields();
        let focused = self.controller.active_field();
        let top: u16 = fields.iter().take(focused).map(|f| slot_height(f)).sum();
        let height = fields.get(focused).map(|f| slot_height(f)).unwrap_or(0);

        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if top + height > self.scroll_offset + viewport {
            self.scroll_offset = (top + height).saturating_sub(viewport);
        }
    }
}

fn hit(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|a| a.contains(ratatui::layout::Position::new(column, row)))
}
