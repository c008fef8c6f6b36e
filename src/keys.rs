// src/keys.rs

use crate::error::FootError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Also known as Option on macOS
        const SUPER = 1 << 3; // Also known as Windows key or Command key
    }
}

bitflags! {
    /// Mouse buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MouseButtons: u8 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

/// A single mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps a zero-based platform button index (0 left, 1 middle, 2 right).
    /// Wheel and extra buttons have no mapping.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    pub fn flag(self) -> MouseButtons {
        match self {
            MouseButton::Left => MouseButtons::LEFT,
            MouseButton::Middle => MouseButtons::MIDDLE,
            MouseButton::Right => MouseButtons::RIGHT,
        }
    }
}

impl FromStr for MouseButton {
    type Err = FootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            _ => Err(FootError::UnknownButton(s.to_string())),
        }
    }
}

/// Represents a key symbol.
///
/// Printable keys are reported as lower-case `Char`s regardless of shift
/// state; the shift itself shows up as a modifier and as `Shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    Shift,
    Control,
    Alt,
    Super,

    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,

    Enter,
    Backspace,
    Tab,
    Escape,

    #[default]
    Unknown,
}

impl KeySymbol {
    /// Returns true if the key symbol represents a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeySymbol::Shift | KeySymbol::Control | KeySymbol::Alt | KeySymbol::Super
        )
    }

    /// Function key `n`, counting from 1.
    pub fn function(n: u32) -> Option<KeySymbol> {
        const KEYS: [KeySymbol; 12] = [
            KeySymbol::F1,
            KeySymbol::F2,
            KeySymbol::F3,
            KeySymbol::F4,
            KeySymbol::F5,
            KeySymbol::F6,
            KeySymbol::F7,
            KeySymbol::F8,
            KeySymbol::F9,
            KeySymbol::F10,
            KeySymbol::F11,
            KeySymbol::F12,
        ];
        let index = usize::try_from(n.checked_sub(1)?).ok()?;
        KEYS.get(index).copied()
    }

    /// The modifier bit a modifier key sets, if any.
    pub fn modifier_flag(&self) -> Option<Modifiers> {
        match self {
            KeySymbol::Shift => Some(Modifiers::SHIFT),
            KeySymbol::Control => Some(Modifiers::CONTROL),
            KeySymbol::Alt => Some(Modifiers::ALT),
            KeySymbol::Super => Some(Modifiers::SUPER),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_number_function_keys_from_one() {
        assert_eq!(KeySymbol::function(1), Some(KeySymbol::F1));
        assert_eq!(KeySymbol::function(12), Some(KeySymbol::F12));
        assert_eq!(KeySymbol::function(0), None);
        assert_eq!(KeySymbol::function(13), None);
    }

    #[test]
    fn it_should_parse_button_names() {
        assert_eq!("Left".parse::<MouseButton>().unwrap(), MouseButton::Left);
        assert_eq!("right".parse::<MouseButton>().unwrap(), MouseButton::Right);
        assert!(matches!(
            "wheel".parse::<MouseButton>(),
            Err(FootError::UnknownButton(name)) if name == "wheel"
        ));
    }

    #[test]
    fn it_should_map_platform_button_indices() {
        assert_eq!(MouseButton::from_index(1), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_index(3), None);
        assert_eq!(MouseButton::Right.flag(), MouseButtons::RIGHT);
    }

    #[test]
    fn it_should_flag_modifier_keys() {
        assert!(KeySymbol::Control.is_modifier());
        assert_eq!(KeySymbol::Shift.modifier_flag(), Some(Modifiers::SHIFT));
        assert_eq!(KeySymbol::Char('a').modifier_flag(), None);
    }
}
