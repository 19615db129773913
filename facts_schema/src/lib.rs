use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Millis = u64;

/// Smallest operand a fact can draw from a table.
pub const MIN_OPERAND: u8 = 1;
/// Largest operand a fact can draw from a table.
pub const MAX_OPERAND: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '−',
            Operation::Multiply => '×',
            Operation::Divide => '÷',
        }
    }

    /// Evaluates `a op b`. Returns `None` when the result would be negative
    /// or fractional, neither of which a fact can have.
    pub fn apply(self, a: u32, b: u32) -> Option<u32> {
        match self {
            Operation::Add => a.checked_add(b),
            Operation::Subtract => a.checked_sub(b),
            Operation::Multiply => a.checked_mul(b),
            Operation::Divide => {
                if b == 0 || a % b != 0 {
                    None
                } else {
                    Some(a / b)
                }
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One finished timed run.
///
/// Field names on the wire follow the records the browser games wrote, so an
/// exported board can be loaded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicScore {
    pub score: u32,
    pub total: u32,
    pub accuracy: u8,
    #[serde(rename = "time")]
    pub duration_secs: u32,
    #[serde(rename = "tables")]
    pub tables_label: String,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
}

impl ClassicScore {
    pub fn is_consistent(&self) -> bool {
        self.score <= self.total && self.accuracy <= 100 && self.duration_secs > 0
    }
}

/// One finished times-table sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintScore {
    pub factor: u8,
    #[serde(rename = "time")]
    pub elapsed_secs: f64,
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,
}

impl SprintScore {
    pub fn is_consistent(&self) -> bool {
        (MIN_OPERAND..=MAX_OPERAND).contains(&self.factor)
            && self.elapsed_secs.is_finite()
            && self.elapsed_secs >= 0.0
    }
}

/// Rounds a millisecond duration to seconds at 0.1s resolution.
pub fn tenths_of_second(ms: Millis) -> f64 {
    ((ms + 50) / 100) as f64 / 10.0
}
