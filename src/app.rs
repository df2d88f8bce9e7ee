use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::{rngs::StdRng, Rng};

use crate::clock::{Clock, SystemClock};
use crate::runtime::TypistEvent;
use crate::session::{Controller, Submit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
}

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Redraw,
    Idle,
    Quit,
}

/// Terminal front-end state: the controller plus the text field feeding it
#[derive(Debug)]
pub struct App<C: Clock = SystemClock, R: Rng = StdRng> {
    pub controller: Controller<C, R>,
    field: String,
}

impl<C: Clock, R: Rng> App<C, R> {
    pub fn new(controller: Controller<C, R>) -> Self {
        Self {
            controller,
            field: String::new(),
        }
    }

    pub fn state(&self) -> AppState {
        if self.controller.is_completed() {
            AppState::Results
        } else {
            AppState::Typing
        }
    }

    /// Current content of the input field
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn restart(&mut self) {
        self.field.clear();
        self.controller.restart();
    }

    pub fn handle_event(&mut self, event: TypistEvent) -> Flow {
        match event {
            TypistEvent::Key(key) => self.on_key(key),
            TypistEvent::Paste(text) => self.edit(|field| field.push_str(&text)),
            TypistEvent::Resize => Flow::Redraw,
            TypistEvent::Tick => {
                // only the live timer changes between keystrokes
                let timing = self.controller.session().started_at().is_some();
                if self.state() == AppState::Typing && timing {
                    Flow::Redraw
                } else {
                    Flow::Idle
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Flow::Quit,
                _ => Flow::Idle,
            };
        }
        // alt chords are shortcuts, not text
        if key.modifiers.contains(KeyModifiers::ALT) {
            return Flow::Idle;
        }

        match (self.state(), key.code) {
            (_, KeyCode::Esc) => Flow::Quit,
            (_, KeyCode::Tab) => {
                self.restart();
                Flow::Redraw
            }
            (AppState::Typing, KeyCode::Backspace) => self.edit(|field| {
                field.pop();
            }),
            (AppState::Typing, KeyCode::Char(c)) => self.edit(|field| field.push(c)),
            (AppState::Results, KeyCode::Char('r') | KeyCode::Enter) => {
                self.restart();
                Flow::Redraw
            }
            _ => Flow::Idle,
        }
    }

    /// Apply an edit to the field and hand the whole value to the controller
    fn edit(&mut self, f: impl FnOnce(&mut String)) -> Flow {
        if self.controller.is_completed() {
            return Flow::Idle;
        }

        f(&mut self.field);
        match self.controller.submit_input(&self.field) {
            Submit::Ignored => Flow::Idle,
            Submit::Updated | Submit::Completed => Flow::Redraw,
        }
    }
}
