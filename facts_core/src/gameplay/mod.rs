pub mod classic;
pub mod sprint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Choosing tables, time or factor.
    #[default]
    Idle,
    Running,
    /// Summary is up and the score has been handed to the leaderboard.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No run in progress.
    Ignored,
    Correct,
    Wrong,
    /// Correct, and it was the last problem of the run.
    Completed,
}

/// `round(100 * score / total)`, half rounding up. `None` before any attempt.
pub fn accuracy(score: u32, total: u32) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    Some(((200 * score + total) / (2 * total)) as u8)
}

#[cfg(test)]
mod tests {
    use super::accuracy;

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy(0, 0), None);
        assert_eq!(accuracy(5, 7), Some(71));
        assert_eq!(accuracy(1, 8), Some(13)); // 12.5
        assert_eq!(accuracy(2, 3), Some(67));
        assert_eq!(accuracy(4, 4), Some(100));
    }
}
