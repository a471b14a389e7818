//! Control maps and translation from terminal events to host input events.

use std::fmt;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::{KeyDown, PointerEvent, PointerKind};
use crate::types::Input;

/// One code or several codes bound to an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    One(String),
    Many(Vec<String>),
}

impl KeyBinding {
    pub fn contains(&self, code: &str) -> bool {
        match self {
            KeyBinding::One(c) => c == code,
            KeyBinding::Many(codes) => codes.iter().any(|c| c == code),
        }
    }
}

impl From<&str> for KeyBinding {
    fn from(code: &str) -> Self {
        KeyBinding::One(code.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for KeyBinding {
    fn from(codes: [&str; N]) -> Self {
        KeyBinding::Many(codes.iter().map(|c| c.to_string()).collect())
    }
}

/// Ordered mapping from inputs to key codes.
///
/// Lookup scans entries in order and the first binding containing the code
/// wins, so a code bound twice resolves to the earlier input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlMap {
    entries: Vec<(Input, KeyBinding)>,
}

impl ControlMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, input: Input, binding: impl Into<KeyBinding>) -> Self {
        self.entries.push((input, binding.into()));
        self
    }

    pub fn lookup(&self, code: &str) -> Option<Input> {
        self.entries
            .iter()
            .find(|(_, binding)| binding.contains(code))
            .map(|(input, _)| *input)
    }

    pub fn entries(&self) -> &[(Input, KeyBinding)] {
        &self.entries
    }

    /// Arrow keys and WASD for movement, Space and Enter for the action.
    pub fn standard() -> Self {
        Self::new()
            .bind(Input::Left, ["ArrowLeft", "KeyA"])
            .bind(Input::Up, ["ArrowUp", "KeyW"])
            .bind(Input::Right, ["ArrowRight", "KeyD"])
            .bind(Input::Down, ["ArrowDown", "KeyS"])
            .bind(Input::Action, ["Space", "Enter"])
    }
}

impl Serialize for ControlMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (input, binding) in &self.entries {
            map.serialize_entry(input, binding)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ControlMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A visitor keeps document order, which decides lookup priority.
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = ControlMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map from input names to key codes")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((input, binding)) = map.next_entry::<Input, KeyBinding>()? {
                    entries.push((input, binding));
                }
                Ok(ControlMap { entries })
            }
        }
        deserializer.deserialize_map(V)
    }
}

/// DOM-style code name for a terminal key.
pub fn key_code_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        KeyCode::Char(c) if c.is_ascii_digit() => format!("Digit{c}"),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };
    Some(name)
}

/// Terminals without event-type reporting deliver auto-repeat as plain
/// presses. Two presses of one code closer than this are taken as a repeat.
pub const DEFAULT_REPEAT_GAP_MS: u64 = 100;

/// Turns crossterm key events into [`KeyDown`]s.
#[derive(Debug, Clone)]
pub struct KeyTranslator {
    reports_repeats: bool,
    repeat_gap_ms: u64,
    last_press: Option<(KeyCode, u64)>,
}

impl KeyTranslator {
    /// `reports_repeats` is true when the terminal distinguishes
    /// press/repeat/release (keyboard enhancement enabled).
    pub fn new(reports_repeats: bool) -> Self {
        Self {
            reports_repeats,
            repeat_gap_ms: DEFAULT_REPEAT_GAP_MS,
            last_press: None,
        }
    }

    pub fn with_repeat_gap_ms(mut self, gap_ms: u64) -> Self {
        self.repeat_gap_ms = gap_ms;
        self
    }

    pub fn translate(&mut self, key: KeyEvent, timestamp_ms: u64) -> Option<KeyDown> {
        let repeat = match key.kind {
            KeyEventKind::Release => return None,
            KeyEventKind::Repeat => true,
            KeyEventKind::Press if self.reports_repeats => false,
            KeyEventKind::Press => {
                let inferred = matches!(
                    self.last_press,
                    Some((code, at)) if code == key.code
                        && timestamp_ms.saturating_sub(at) < self.repeat_gap_ms
                );
                self.last_press = Some((key.code, timestamp_ms));
                inferred
            }
        };
        let code = key_code_name(key.code)?;
        Some(KeyDown {
            code,
            repeat,
            timestamp_ms,
        })
    }
}

/// Map a terminal mouse event to a pointer event.
///
/// Coordinates are converted to dot units: the centre of column `c`, row `r`
/// is `(c + 0.5, 2r + 1)`, matching a viewport measured as
/// `columns x (rows * 2)`.
pub fn pointer_from_mouse(mouse: MouseEvent, timestamp_ms: u64) -> Option<PointerEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => PointerKind::Move,
        _ => return None,
    };
    let x = f64::from(mouse.column) + 0.5;
    let y = f64::from(mouse.row) * 2.0 + 1.0;
    Some(PointerEvent::new(kind, x, y, timestamp_ms))
}

/// Check if key should quit the runtime.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
