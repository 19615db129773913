use facts_schema::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(u8),
    Backspace,
    Delete,
    Enter,
    /// Exit button on the HUD or Escape on a keyboard.
    Escape,
    Char(char),
}

impl Key {
    pub fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => Key::Digit(c as u8 - b'0'),
            '\n' | '\r' => Key::Enter,
            '\u{8}' => Key::Backspace,
            '\u{7f}' => Key::Delete,
            '\u{1b}' => Key::Escape,
            other => Key::Char(other),
        }
    }

    /// Maps the label printed on an on-screen key.
    pub fn from_keypad_label(label: &str) -> Option<Self> {
        match label.trim() {
            "⌫" => Some(Key::Backspace),
            "Enter" => Some(Key::Enter),
            "✕" => Some(Key::Escape),
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c @ '0'..='9'), None) => Some(Key::from_char(c)),
                    _ => None,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keypad,
    Keyboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// When the key was pressed, on the clock the host passes to the game
    /// as `now`.
    pub timestamp: Millis,
    pub source: InputSource,
    pub key: Key,
    /// Ctrl, Alt or Meta held (keyboard only).
    pub modified: bool,
}

impl InputEvent {
    pub fn keypad(timestamp: Millis, key: Key) -> Self {
        Self {
            timestamp,
            source: InputSource::Keypad,
            key,
            modified: false,
        }
    }

    pub fn keyboard(timestamp: Millis, key: Key) -> Self {
        Self {
            timestamp,
            source: InputSource::Keyboard,
            key,
            modified: false,
        }
    }

    pub fn with_modifier(mut self) -> Self {
        self.modified = true;
        self
    }
}
