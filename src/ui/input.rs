/// Input collection and translation.
///
/// `InputState` drains whatever crossterm has queued this frame (keys and
/// mouse). `Controls` turns that into view actions using the current layout:
///   - pointer entering "No" counts as a hover, as does keyboard focus on it
///   - left press on a button, or Enter/Space on the focused one, activates it
///   - `y` / `n` / `m` are shortcuts for Yes / No / music

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::sim::view::Screen;
use crate::ui::layout::Layout;

pub struct InputState {
    /// Key presses (and repeats) collected during the last drain.
    pub keys: Vec<KeyEvent>,
    pub mouse: Vec<MouseEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            keys: Vec::with_capacity(8),
            mouse: Vec::with_capacity(16),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.keys.clear();
        self.mouse.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.push(ev),
                Err(_) => break,
            }
        }
    }

    pub fn push(&mut self, ev: Event) {
        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.keys.push(key),
            Event::Mouse(m) => self.mouse.push(m),
            _ => {}
        }
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.keys.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Yes,
    No,
    Music,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Accept,
    HoverNo,
    ClickNo,
    ToggleMusic,
    Quit,
}

pub struct Controls {
    focus: Option<Focus>,
    pointer_in_no: bool,
}

impl Controls {
    pub fn new() -> Self {
        Controls { focus: None, pointer_in_no: false }
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    /// Translate this frame's input into actions, in arrival order
    /// (mouse first, then keys).
    pub fn translate(&mut self, input: &InputState, layout: &Layout, screen: Screen) -> Vec<Action> {
        let landing = screen == Screen::Landing;
        if !landing && matches!(self.focus, Some(Focus::Yes | Focus::No)) {
            self.focus = None;
        }

        let mut actions = Vec::new();
        // Once "No" has moved, the rest of this batch was aimed at its old spot.
        let mut no_moved = false;

        for m in &input.mouse {
            let (col, row) = (m.column as usize, m.row as usize);
            match m.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    let inside = landing && !no_moved && layout.no.contains(col, row);
                    if inside && !self.pointer_in_no {
                        actions.push(Action::HoverNo);
                        no_moved = true;
                    }
                    self.pointer_in_no = inside;
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    // "No" is drawn over "Yes", so it wins where they overlap.
                    if landing && !no_moved && layout.no.contains(col, row) {
                        actions.push(Action::ClickNo);
                        no_moved = true;
                    } else if landing && layout.yes.contains(col, row) {
                        actions.push(Action::Accept);
                    } else if layout.music.contains(col, row) {
                        actions.push(Action::ToggleMusic);
                    }
                }
                _ => {}
            }
        }

        for key in &input.keys {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => actions.push(Action::Quit),
                KeyCode::Char('m') | KeyCode::Char('M') => actions.push(Action::ToggleMusic),
                KeyCode::Char('y') | KeyCode::Char('Y') if landing => actions.push(Action::Accept),
                KeyCode::Char('n') | KeyCode::Char('N') if landing => actions.push(Action::ClickNo),
                KeyCode::Tab => self.cycle(landing, true, &mut actions),
                KeyCode::BackTab => self.cycle(landing, false, &mut actions),
                KeyCode::Enter | KeyCode::Char(' ') => match self.focus {
                    Some(Focus::Yes) => actions.push(Action::Accept),
                    Some(Focus::No) => actions.push(Action::ClickNo),
                    Some(Focus::Music) => actions.push(Action::ToggleMusic),
                    None => {}
                },
                _ => {}
            }
        }

        actions
    }

    fn cycle(&mut self, landing: bool, forward: bool, actions: &mut Vec<Action>) {
        let ring: &[Focus] = if landing {
            &[Focus::Yes, Focus::No, Focus::Music]
        } else {
            &[Focus::Music]
        };
        let next = match self.focus.and_then(|f| ring.iter().position(|&r| r == f)) {
            Some(i) if forward => ring[(i + 1) % ring.len()],
            Some(i) => ring[(i + ring.len() - 1) % ring.len()],
            None if forward => ring[0],
            None => ring[ring.len() - 1],
        };
        self.focus = Some(next);
        if next == Focus::No {
            actions.push(Action::HoverNo);
        }
    }
}
