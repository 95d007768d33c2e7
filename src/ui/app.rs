//! Main TUI application state and logic

use super::panes::{self, ValuePrompt};
use crate::config::LabConfig;
use crate::errors::LabError;
use crate::host::{EventTarget, Host, KeyInput};
use crate::lab::{LabInstance, LabSnapshot, SimulationModel};
use crate::render::SceneBuffer;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The main application state
pub struct App {
    /// Host services the lab is mounted on
    pub host: Host,

    /// Latest scene presented by the lab's render loop
    pub scenes: SceneBuffer,

    /// The mounted lab (None once unmounted)
    pub lab: Option<LabInstance>,

    pub config: LabConfig,

    /// Open value prompt, if the user is typing a value
    pub prompt: Option<ValuePrompt>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Control rows from the last draw, for mouse selection
    control_hits: Vec<(Rect, String)>,

    /// When the last host frame ran
    last_frame: Instant,
}

impl App {
    /// Mount `model` on a fresh host
    pub fn new(model: Box<dyn SimulationModel>, config: LabConfig) -> Result<Self, LabError> {
        let host = Host::new();
        let scenes = SceneBuffer::new();
        let lab = LabInstance::mount(model, &host, Box::new(scenes.clone()), &config)?;

        Ok(App {
            host,
            scenes,
            lab: Some(lab),
            config,
            prompt: None,
            should_quit: false,
            status_message: String::from("Ready!"),
            control_hits: Vec::new(),
            last_frame: Instant::now(),
        })
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let interval = self.config.frame_interval();
        self.last_frame = Instant::now();

        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Wait for input, but never past the next frame
            let deadline = self.last_frame + interval;
            let timeout = deadline.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_event(event);
            }

            let now = Instant::now();
            if now >= deadline {
                let dt = self.config.clamp_dt(now.duration_since(self.last_frame));
                self.last_frame = now;
                self.tick(dt);
            }
        }

        self.unmount();
        Ok(())
    }

    /// Run one host frame. Returns how many frame tasks ran.
    pub fn tick(&mut self, dt: Duration) -> usize {
        self.host.frames.run_frame(dt)
    }

    pub fn snapshot(&self) -> Option<LabSnapshot> {
        self.lab.as_ref().map(LabInstance::snapshot)
    }

    /// Tear down the lab: its key listener and frame task go with it
    pub fn unmount(&mut self) {
        if let Some(lab) = self.lab.take() {
            lab.unmount();
            self.scenes.detach();
            info!(
                listeners = self.host.keyboard.listener_count(),
                tasks = self.host.frames.pending(),
                "host released"
            );
        }
    }

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            // The host still sees the key, tagged as text entry
            self.host
                .keyboard
                .dispatch(&KeyInput::from_event(key, EventTarget::TextEntry));
            if key.kind != KeyEventKind::Release {
                self.handle_prompt_key(key);
            }
            return;
        }

        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char(':') | KeyCode::Enter => {
                    self.open_prompt();
                    return;
                }
                _ => {}
            }
        }

        self.host
            .keyboard
            .dispatch(&KeyInput::from_event(key, EventTarget::Surface));
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.post("Cancelled".to_string());
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit_prompt(prompt);
                }
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Char(c) => {
                prompt.push(c);
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self) {
        let Some(snapshot) = self.snapshot() else {
            return;
        };
        let Some(active) = snapshot.controls.iter().find(|c| c.active) else {
            return;
        };
        if !active.enabled {
            self.post(format!("{} is disabled", active.label));
            return;
        }
        self.prompt = Some(ValuePrompt::new(active.id.clone(), active.label.clone()));
    }

    fn submit_prompt(&mut self, prompt: ValuePrompt) {
        let Some(value) = prompt.parse() else {
            self.post(format!("Not a number: '{}'", prompt.buffer));
            return;
        };
        let Some(lab) = self.lab.as_ref() else {
            return;
        };
        self.status_message = match lab.set(&prompt.control_id, value) {
            Ok(stored) => {
                debug!(id = %prompt.control_id, requested = value, stored, "value typed");
                let display = lab
                    .snapshot()
                    .controls
                    .into_iter()
                    .find(|c| c.id == prompt.control_id)
                    .map(|c| c.display)
                    .unwrap_or_else(|| stored.to_string());
                format!("{} set to {}", prompt.label, display)
            }
            Err(err) => err.to_string(),
        };
    }

    /// Show a message, replacing any older lab warning
    fn post(&mut self, message: String) {
        if let Some(lab) = self.lab.as_ref() {
            lab.dismiss_warning();
        }
        self.status_message = message;
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let at = Position::new(mouse.column, mouse.row);
        let Some(id) = self
            .control_hits
            .iter()
            .find(|(rect, _)| rect.contains(at))
            .map(|(_, id)| id.clone())
        else {
            return;
        };
        if let Some(lab) = self.lab.as_ref() {
            if let Err(err) = lab.select_by_id(&id) {
                self.status_message = err.to_string();
            }
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let Some(snapshot) = self.snapshot() else {
            self.control_hits.clear();
            return;
        };

        // Canvas on the left, controls and readout on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(snapshot.controls.len() as u16 + 2),
                Constraint::Min(0),
            ])
            .split(columns[1]);

        self.scenes.with_latest(|scene| {
            panes::render_canvas_pane(frame, columns[0], snapshot.title, scene);
        });

        panes::render_controls_pane(frame, right_rows[0], &snapshot.controls);
        self.control_hits = panes::control_rows(right_rows[0], snapshot.controls.len())
            .into_iter()
            .zip(snapshot.controls.iter().map(|c| c.id.clone()))
            .collect();

        panes::render_readout_pane(frame, right_rows[1], &snapshot.readout);

        match &self.prompt {
            Some(prompt) => panes::render_prompt(frame, main_chunks[1], prompt),
            None => {
                let message = snapshot
                    .last_warning
                    .as_deref()
                    .or(snapshot.stats.last_failure.as_deref())
                    .unwrap_or(&self.status_message);
                panes::render_status_bar(frame, main_chunks[1], message, &snapshot);
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}
