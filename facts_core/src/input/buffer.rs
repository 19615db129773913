/// Longest answer the keypad accepts.
pub const MAX_ANSWER_DIGITS: usize = 3;

/// The digits typed for the current problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerBuffer {
    digits: String,
}

impl AnswerBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `digit` unless the buffer is full or it is not 0..=9.
    pub fn push_digit(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= MAX_ANSWER_DIGITS {
            return false;
        }
        self.digits.push(char::from(b'0' + digit));
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Numeric value, or `None` when nothing has been typed.
    pub fn value(&self) -> Option<u32> {
        self.digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_at_three_digits() {
        let mut buf = AnswerBuffer::new();
        assert!(buf.push_digit(1));
        assert!(buf.push_digit(4));
        assert!(buf.push_digit(4));
        assert!(!buf.push_digit(9));
        assert_eq!(buf.as_str(), "144");
        assert_eq!(buf.value(), Some(144));
    }

    #[test]
    fn rejects_non_digits_and_reads_empty_as_none() {
        let mut buf = AnswerBuffer::new();
        assert!(!buf.push_digit(10));
        assert_eq!(buf.value(), None);
        assert!(!buf.backspace());

        buf.push_digit(0);
        buf.push_digit(7);
        assert_eq!(buf.value(), Some(7));
        assert!(buf.backspace());
        assert_eq!(buf.as_str(), "0");
    }
}
