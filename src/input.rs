//! Keyboard, d-pad and pointer input mapping.

use winit::keyboard::{Key, NamedKey};

use crate::character::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    CloseModal,
}

impl Command {
    /// Maps a key name as reported by browsers (`"w"`, `"ArrowUp"`,
    /// `"Escape"`, ...) regardless of case.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Command::Move(Direction::Up)),
            "s" | "arrowdown" => Some(Command::Move(Direction::Down)),
            "a" | "arrowleft" => Some(Command::Move(Direction::Left)),
            "d" | "arrowright" => Some(Command::Move(Direction::Right)),
            "escape" => Some(Command::CloseModal),
            _ => None,
        }
    }

    pub fn from_winit_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(c) => Self::from_key_name(c.as_str()),
            Key::Named(NamedKey::ArrowUp) => Self::from_key_name("arrowup"),
            Key::Named(NamedKey::ArrowDown) => Self::from_key_name("arrowdown"),
            Key::Named(NamedKey::ArrowLeft) => Self::from_key_name("arrowleft"),
            Key::Named(NamedKey::ArrowRight) => Self::from_key_name("arrowright"),
            Key::Named(NamedKey::Escape) => Self::from_key_name("escape"),
            _ => None,
        }
    }
}

impl Direction {
    /// Parses the `data-direction` attribute of an on-screen d-pad button.
    pub fn from_dpad(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Window coordinates to normalised device coordinates (+Y up).
pub fn pointer_to_ndc(x: f64, y: f64, width: u32, height: u32) -> cgmath::Vector2<f32> {
    let width = f64::from(width.max(1));
    let height = f64::from(height.max(1));
    cgmath::Vector2::new(
        (x / width * 2.0 - 1.0) as f32,
        (-(y / height) * 2.0 + 1.0) as f32,
    )
}
