use super::buffer::AnswerBuffer;
use super::events::{InputEvent, InputSource, Key};

/// What a key press means to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// The answer buffer changed.
    Edited,
    Submit(u32),
    /// Exit was requested; the next key answers the confirmation.
    ExitPrompt,
    ExitConfirmed,
    ExitCancelled,
}

/// Folds keypad and keyboard presses into one answer buffer.
#[derive(Debug, Default)]
pub struct InputAdapter {
    buffer: AnswerBuffer,
    confirming_exit: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &AnswerBuffer {
        &self.buffer
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    pub fn is_confirming_exit(&self) -> bool {
        self.confirming_exit
    }

    pub fn handle(&mut self, event: &InputEvent) -> Action {
        if self.confirming_exit {
            self.confirming_exit = false;
            return match event.key {
                Key::Char('y') | Key::Char('Y') => Action::ExitConfirmed,
                _ => Action::ExitCancelled,
            };
        }
        if event.modified && event.source == InputSource::Keyboard {
            return Action::None;
        }

        match event.key {
            Key::Digit(d) => {
                if self.buffer.push_digit(d) {
                    Action::Edited
                } else {
                    Action::None
                }
            }
            Key::Backspace | Key::Delete => {
                if self.buffer.backspace() {
                    Action::Edited
                } else {
                    Action::None
                }
            }
            Key::Enter => self.buffer.value().map_or(Action::None, Action::Submit),
            Key::Escape => {
                self.confirming_exit = true;
                Action::ExitPrompt
            }
            Key::Char(_) => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key) -> InputEvent {
        InputEvent::keyboard(0, k)
    }

    #[test]
    fn digits_then_enter_submit_the_value() {
        let mut adapter = InputAdapter::new();
        assert_eq!(adapter.handle(&key(Key::Digit(5))), Action::Edited);
        assert_eq!(adapter.handle(&InputEvent::keypad(0, Key::Digit(6))), Action::Edited);
        assert_eq!(adapter.handle(&key(Key::Enter)), Action::Submit(56));
        // Buffer survives a submit until the game presents a new problem.
        assert_eq!(adapter.buffer().as_str(), "56");
    }

    #[test]
    fn empty_submit_and_letters_are_ignored() {
        let mut adapter = InputAdapter::new();
        assert_eq!(adapter.handle(&key(Key::Enter)), Action::None);
        assert_eq!(adapter.handle(&key(Key::Char('a'))), Action::None);
        assert!(adapter.buffer().is_empty());
    }

    #[test]
    fn modified_keyboard_presses_are_ignored() {
        let mut adapter = InputAdapter::new();
        assert_eq!(adapter.handle(&key(Key::Digit(1)).with_modifier()), Action::None);
        assert!(adapter.buffer().is_empty());
    }

    #[test]
    fn exit_requires_confirmation() {
        let mut adapter = InputAdapter::new();
        adapter.handle(&key(Key::Digit(3)));
        assert_eq!(adapter.handle(&key(Key::Escape)), Action::ExitPrompt);
        assert_eq!(adapter.handle(&key(Key::Char('n'))), Action::ExitCancelled);
        assert_eq!(adapter.buffer().as_str(), "3");

        adapter.handle(&key(Key::Escape));
        assert_eq!(adapter.handle(&key(Key::Char('y'))), Action::ExitConfirmed);
    }

    #[test]
    fn keypad_labels_map_to_keys() {
        assert_eq!(Key::from_keypad_label("7"), Some(Key::Digit(7)));
        assert_eq!(Key::from_keypad_label("⌫"), Some(Key::Backspace));
        assert_eq!(Key::from_keypad_label("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_keypad_label("77"), None);
    }
}
