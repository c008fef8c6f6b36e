// src/input.rs

//! Per-frame keyboard and mouse state, built from driver events.
//!
//! Keys are queried by name (`"a"`, `"space"`, `"left"`, ...). The list of
//! valid names is available through [`all_keys`].

use crate::display::DisplayEvent;
use crate::error::{FootError, Result};
use crate::geometry::Point;
use crate::keys::{KeySymbol, Modifiers, MouseButton, MouseButtons};
use log::{debug, trace};
use once_cell::sync::Lazy;
use std::collections::HashSet;

static KEY_NAMES: Lazy<Vec<(String, KeySymbol)>> = Lazy::new(|| {
    let mut names: Vec<(String, KeySymbol)> = Vec::new();
    for c in 'a'..='z' {
        names.push((c.to_string(), KeySymbol::Char(c)));
    }
    for c in '0'..='9' {
        names.push((c.to_string(), KeySymbol::Char(c)));
    }
    let named = [
        ("space", KeySymbol::Char(' ')),
        ("up", KeySymbol::Up),
        ("down", KeySymbol::Down),
        ("left", KeySymbol::Left),
        ("right", KeySymbol::Right),
        ("enter", KeySymbol::Enter),
        ("return", KeySymbol::Enter),
        ("escape", KeySymbol::Escape),
        ("tab", KeySymbol::Tab),
        ("backspace", KeySymbol::Backspace),
        ("delete", KeySymbol::Delete),
        ("shift", KeySymbol::Shift),
        ("ctrl", KeySymbol::Control),
        ("alt", KeySymbol::Alt),
    ];
    names.extend(named.iter().map(|(n, s)| (n.to_string(), *s)));
    for n in 1..=12 {
        if let Some(sym) = KeySymbol::function(n) {
            names.push((format!("f{}", n), sym));
        }
    }
    names
});

/// Every key name `Input::is_key_down` accepts.
pub fn all_keys() -> Vec<&'static str> {
    KEY_NAMES.iter().map(|(name, _)| name.as_str()).collect()
}

/// Looks a key name up (case-insensitive).
pub fn key_from_name(name: &str) -> Result<KeySymbol> {
    let lower = name.to_ascii_lowercase();
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == lower)
        .map(|(_, sym)| *sym)
        .ok_or_else(|| FootError::UnknownKey(name.to_string()))
}

/// Mouse state for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseInfo {
    pub pos: Point,
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

#[derive(Debug, Default)]
pub struct Input {
    held: HashSet<KeySymbol>,
    modifiers: Modifiers,
    mouse_pos: Point,
    buttons: MouseButtons,
    events: Vec<DisplayEvent>,
    quit: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds this frame's events into the held state. Events from the previous
    /// frame are discarded.
    pub fn apply(&mut self, events: &[DisplayEvent]) {
        self.events.clear();
        self.quit = false;
        for event in events {
            trace!("Input: {:?}", event);
            match event {
                DisplayEvent::Key {
                    symbol, modifiers, ..
                } => {
                    self.held.insert(*symbol);
                    self.modifiers = *modifiers;
                    if let Some(flag) = symbol.modifier_flag() {
                        self.modifiers |= flag;
                    }
                }
                DisplayEvent::KeyRelease { symbol, modifiers } => {
                    self.held.remove(symbol);
                    self.modifiers = *modifiers;
                    if let Some(flag) = symbol.modifier_flag() {
                        self.modifiers.remove(flag);
                    }
                }
                DisplayEvent::MouseButtonPress { button, x, y, .. } => {
                    self.mouse_pos = Point::new(*x, *y);
                    if let Some(b) = MouseButton::from_index(*button) {
                        self.buttons |= b.flag();
                    }
                }
                DisplayEvent::MouseButtonRelease { button, x, y, .. } => {
                    self.mouse_pos = Point::new(*x, *y);
                    if let Some(b) = MouseButton::from_index(*button) {
                        self.buttons.remove(b.flag());
                    }
                }
                DisplayEvent::MouseMove { x, y, .. } => {
                    self.mouse_pos = Point::new(*x, *y);
                }
                DisplayEvent::CloseRequested => {
                    debug!("Input: close requested");
                    self.quit = true;
                }
            }
        }
        self.events.extend_from_slice(events);
    }

    /// Whether the named key is held. Fails for names not in [`all_keys`].
    pub fn is_key_down(&self, name: &str) -> Result<bool> {
        let symbol = key_from_name(name)?;
        Ok(self.is_symbol_down(symbol))
    }

    pub fn is_symbol_down(&self, symbol: KeySymbol) -> bool {
        if self.held.contains(&symbol) {
            return true;
        }
        symbol
            .modifier_flag()
            .is_some_and(|flag| self.modifiers.contains(flag))
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    pub fn mouse_buttons(&self) -> MouseButtons {
        self.buttons
    }

    pub fn mouse_info(&self) -> MouseInfo {
        MouseInfo {
            pos: self.mouse_pos,
            left: self.buttons.contains(MouseButtons::LEFT),
            right: self.buttons.contains(MouseButtons::RIGHT),
            middle: self.buttons.contains(MouseButtons::MIDDLE),
        }
    }

    /// True if `button` is down, or any button when `None`.
    pub fn is_pressed(&self, button: Option<MouseButton>) -> bool {
        match button {
            Some(b) => self.buttons.contains(b.flag()),
            None => !self.buttons.is_empty(),
        }
    }

    /// Raw events of the current frame.
    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn key(symbol: KeySymbol) -> DisplayEvent {
        DisplayEvent::Key {
            symbol,
            modifiers: Modifiers::empty(),
            text: None,
        }
    }

    #[test]
    fn it_should_reject_unknown_key_names() {
        let input = Input::new();
        match input.is_key_down("hyper") {
            Err(FootError::UnknownKey(name)) => assert_eq!(name, "hyper"),
            other => panic!("expected UnknownKey, got {:?}", other),
        }
    }

    #[test]
    fn it_should_list_letters_digits_and_named_keys() {
        let keys = all_keys();
        for name in ["a", "z", "0", "9", "space", "up", "escape", "f12", "shift"] {
            assert!(keys.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn it_should_track_keys_until_released() -> Result<()> {
        let mut input = Input::new();
        input.apply(&[key(KeySymbol::Char('a'))]);
        assert!(input.is_key_down("A")?);
        input.apply(&[]);
        assert!(input.is_key_down("a")?, "held keys survive empty frames");
        input.apply(&[DisplayEvent::KeyRelease {
            symbol: KeySymbol::Char('a'),
            modifiers: Modifiers::empty(),
        }]);
        assert!(!input.is_key_down("a")?);
        Ok(())
    }

    #[test]
    fn it_should_report_modifiers_as_keys() -> Result<()> {
        let mut input = Input::new();
        input.apply(&[DisplayEvent::MouseMove {
            x: 0,
            y: 0,
            modifiers: Modifiers::SHIFT,
        }]);
        input.apply(&[DisplayEvent::Key {
            symbol: KeySymbol::Char('x'),
            modifiers: Modifiers::SHIFT,
            text: Some("X".into()),
        }]);
        assert!(input.is_key_down("shift")?);
        assert!(!input.is_key_down("ctrl")?);
        Ok(())
    }

    #[test]
    fn it_should_track_mouse_buttons_and_position() {
        let mut input = Input::new();
        input.apply(&[DisplayEvent::MouseButtonPress {
            button: 2,
            x: 5,
            y: 6,
            modifiers: Modifiers::empty(),
        }]);
        let info = input.mouse_info();
        assert_eq!(info.pos, Point::new(5, 6));
        assert!(info.right && !info.left && !info.middle);
        assert!(input.is_pressed(None));
        assert!(!input.is_pressed(Some(MouseButton::Left)));

        input.apply(&[DisplayEvent::MouseButtonRelease {
            button: 2,
            x: 7,
            y: 6,
            modifiers: Modifiers::empty(),
        }]);
        assert!(!input.is_pressed(None));
        assert_eq!(input.mouse_pos(), Point::new(7, 6));
    }

    #[test]
    fn it_should_only_flag_quit_for_the_frame_it_arrived_in() {
        let mut input = Input::new();
        input.apply(&[DisplayEvent::CloseRequested]);
        assert!(input.quit_requested());
        assert_eq!(input.events().len(), 1);
        input.apply(&[]);
        assert!(!input.quit_requested());
        assert!(input.events().is_empty());
    }
}
