pub mod generator;

use facts_schema::{Operation, MAX_OPERAND, MIN_OPERAND};

/// One arithmetic fact as shown to the player: `a op b = expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Problem {
    pub a: u32,
    pub b: u32,
    pub operation: Operation,
    pub expected: u32,
}

impl Problem {
    pub fn new(a: u32, b: u32, operation: Operation, expected: u32) -> Self {
        Self {
            a,
            b,
            operation,
            expected,
        }
    }

    /// Identity used to keep the same fact from appearing twice in a row.
    pub fn key(&self) -> String {
        format!("{}{}{}", self.a, self.operation.symbol(), self.b)
    }

    pub fn question(&self) -> String {
        format!("{} {} {} = ?", self.a, self.operation.symbol(), self.b)
    }

    pub fn is_answer(&self, value: u32) -> bool {
        value == self.expected
    }
}

/// A sprint row. All twelve exist from the start of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintProblem {
    pub problem: Problem,
    pub completed: bool,
    /// Milliseconds from run start until this row was solved.
    pub completion_ms: Option<u64>,
}

/// What happened to the set on a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Removing would have emptied the set, so the table stays selected.
    KeptLast,
}

/// Subset of the tables 1..=12, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSet {
    bits: u16,
}

const ALL_BITS: u16 = 0b1_1111_1111_1110;

impl OperandSet {
    pub fn all() -> Self {
        Self { bits: ALL_BITS }
    }

    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Builds a set from `values`, ignoring anything outside 1..=12.
    pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
        let mut set = Self::empty();
        for v in values {
            set.insert(v);
        }
        set
    }

    pub fn contains(&self, n: u8) -> bool {
        in_range(n) && self.bits & (1 << n) != 0
    }

    pub fn insert(&mut self, n: u8) -> bool {
        if !in_range(n) || self.contains(n) {
            return false;
        }
        self.bits |= 1 << n;
        true
    }

    pub fn remove(&mut self, n: u8) -> bool {
        if !self.contains(n) {
            return false;
        }
        self.bits &= !(1 << n);
        true
    }

    /// Flips `n`, refusing to leave the set empty.
    pub fn toggle(&mut self, n: u8) -> Toggle {
        if self.contains(n) {
            self.remove(n);
            if self.is_empty() {
                self.insert(n);
                return Toggle::KeptLast;
            }
            Toggle::Removed
        } else {
            self.insert(n);
            Toggle::Added
        }
    }

    pub fn set_all(&mut self, on: bool) {
        self.bits = if on { ALL_BITS } else { 0 };
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn is_full(&self) -> bool {
        self.bits == ALL_BITS
    }

    /// Ascending members.
    pub fn values(&self) -> Vec<u8> {
        (MIN_OPERAND..=MAX_OPERAND).filter(|n| self.contains(*n)).collect()
    }

    /// `"All 1–12"` for the full set, otherwise e.g. `"3×, 4×"`.
    pub fn label(&self, operation: Operation) -> String {
        if self.is_full() {
            return format!("All {MIN_OPERAND}–{MAX_OPERAND}");
        }
        self.values()
            .iter()
            .map(|n| format!("{n}{}", operation.symbol()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for OperandSet {
    fn default() -> Self {
        Self::all()
    }
}

fn in_range(n: u8) -> bool {
    (MIN_OPERAND..=MAX_OPERAND).contains(&n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_never_empties_the_set() {
        let mut set = OperandSet::from_values([4]);
        assert_eq!(set.toggle(4), Toggle::KeptLast);
        assert_eq!(set.values(), vec![4]);

        assert_eq!(set.toggle(9), Toggle::Added);
        assert_eq!(set.toggle(4), Toggle::Removed);
        assert_eq!(set.values(), vec![9]);
    }

    #[test]
    fn out_of_range_values_are_ignored() {
        let set = OperandSet::from_values([0, 3, 13, 200]);
        assert_eq!(set.values(), vec![3]);
        assert!(!set.contains(0));
    }

    #[test]
    fn labels_follow_the_selection() {
        assert_eq!(OperandSet::all().label(Operation::Multiply), "All 1–12");
        let set = OperandSet::from_values([4, 3]);
        assert_eq!(set.label(Operation::Multiply), "3×, 4×");
        assert_eq!(set.label(Operation::Add), "3+, 4+");
    }

    #[test]
    fn problem_key_and_question() {
        let p = Problem::new(14, 6, Operation::Subtract, 8);
        assert_eq!(p.key(), "14−6");
        assert_eq!(p.question(), "14 − 6 = ?");
        assert!(p.is_answer(8));
        assert!(!p.is_answer(20));
    }
}
