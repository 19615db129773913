use chrono::Utc;
use facts_schema::{tenths_of_second, Millis, SprintScore, MAX_OPERAND, MIN_OPERAND};
use tracing::{debug, info};

use super::{Phase, SubmitOutcome};
use crate::error::SessionError;
use crate::problem::generator::sprint_set;
use crate::problem::{Problem, SprintProblem};
use crate::time::ticker::TickSlot;
use crate::time::SPRINT_TICK_MS;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintOptions {
    pub factor: Option<u8>,
}

/// Stopwatch game: clear all twelve rows of one times table.
#[derive(Debug, Default)]
pub struct SprintSession {
    options: SprintOptions,
    phase: Phase,
    problems: Vec<SprintProblem>,
    current_index: usize,
    started_at: Millis,
    elapsed_ms: Millis,
    ticks: TickSlot,
    last_result: Option<SprintScore>,
}

impl SprintSession {
    pub fn new(options: SprintOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn factor(&self) -> Option<u8> {
        self.options.factor
    }

    pub fn problems(&self) -> &[SprintProblem] {
        &self.problems
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Problem> {
        if self.phase != Phase::Running {
            return None;
        }
        self.problems.get(self.current_index).map(|p| &p.problem)
    }

    pub fn completed(&self) -> usize {
        self.problems.iter().filter(|p| p.completed).count()
    }

    pub fn elapsed_ms(&self) -> Millis {
        self.elapsed_ms
    }

    /// Stopwatch text at 0.1s resolution, e.g. `"12.3"`.
    pub fn elapsed_display(&self) -> String {
        format!("{:.1}", tenths_of_second(self.elapsed_ms))
    }

    pub fn last_result(&self) -> Option<&SprintScore> {
        self.last_result.as_ref()
    }

    pub fn next_tick_due(&self) -> Option<Millis> {
        self.ticks.next_due()
    }

    pub fn select_factor(&mut self, factor: u8) -> Result<(), SessionError> {
        if !(MIN_OPERAND..=MAX_OPERAND).contains(&factor) {
            return Err(SessionError::FactorOutOfRange(factor));
        }
        self.options.factor = Some(factor);
        Ok(())
    }

    pub fn start(&mut self, now: Millis) -> Result<(), SessionError> {
        let factor = self.options.factor.ok_or(SessionError::NoFactorSelected)?;

        self.ticks.cancel();
        self.problems = sprint_set(factor);
        self.current_index = 0;
        self.started_at = now;
        self.elapsed_ms = 0;
        self.ticks.arm(now, SPRINT_TICK_MS);
        self.phase = Phase::Running;
        debug!(factor, "sprint started");
        Ok(())
    }

    pub fn submit(&mut self, value: u32, now: Millis) -> SubmitOutcome {
        if self.phase != Phase::Running {
            return SubmitOutcome::Ignored;
        }
        let started_at = self.started_at;
        let Some(row) = self.problems.get_mut(self.current_index) else {
            return SubmitOutcome::Ignored;
        };
        if !row.problem.is_answer(value) {
            return SubmitOutcome::Wrong;
        }

        row.completed = true;
        row.completion_ms = Some(now.saturating_sub(started_at));

        if self.current_index + 1 < self.problems.len() {
            self.current_index += 1;
            SubmitOutcome::Correct
        } else {
            self.finish(now);
            SubmitOutcome::Completed
        }
    }

    /// Refreshes the stopwatch. Returns whether the display changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        if self.phase != Phase::Running || self.ticks.poll(now) == 0 {
            return false;
        }
        self.elapsed_ms = now.saturating_sub(self.started_at);
        true
    }

    fn finish(&mut self, now: Millis) {
        // Read the clock before stopping the ticker so the last partial
        // interval is not lost.
        self.elapsed_ms = now.saturating_sub(self.started_at);
        self.ticks.cancel();
        self.phase = Phase::Ended;

        let Some(factor) = self.options.factor else {
            return;
        };
        let result = SprintScore {
            factor,
            elapsed_secs: tenths_of_second(self.elapsed_ms),
            recorded_at: Utc::now(),
        };
        info!(factor, elapsed = result.elapsed_secs, "sprint finished");
        self.last_result = Some(result);
    }

    /// Back to factor selection; a new factor must be picked.
    pub fn play_again(&mut self) {
        self.ticks.cancel();
        self.phase = Phase::Idle;
        self.options.factor = None;
        self.problems.clear();
        self.current_index = 0;
        self.elapsed_ms = 0;
    }

    pub fn cleanup(&mut self) {
        if self.ticks.cancel() {
            debug!("sprint ticker cancelled");
        }
        if self.phase == Phase::Running {
            self.phase = Phase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(factor: u8) -> SprintSession {
        let mut s = SprintSession::new(SprintOptions { factor: Some(factor) });
        s.start(1_000).unwrap();
        s
    }

    #[test]
    fn requires_a_factor() {
        let mut s = SprintSession::new(SprintOptions::default());
        assert_eq!(s.start(0), Err(SessionError::NoFactorSelected));
        assert_eq!(s.select_factor(0), Err(SessionError::FactorOutOfRange(0)));
        assert_eq!(s.select_factor(13), Err(SessionError::FactorOutOfRange(13)));
    }

    #[test]
    fn wrong_answer_does_not_advance() {
        let mut s = running(4);
        assert_eq!(s.submit(5, 1_200), SubmitOutcome::Wrong);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.submit(4, 1_400), SubmitOutcome::Correct);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.problems()[0].completion_ms, Some(400));
    }

    #[test]
    fn final_time_is_taken_at_the_last_answer() {
        let mut s = running(3);
        for a in 1..12u32 {
            assert_eq!(s.submit(a * 3, 1_000 + u64::from(a) * 1_000), SubmitOutcome::Correct);
        }
        assert!(s.tick(12_050));
        assert_eq!(s.elapsed_display(), "11.1");

        // Finished between display ticks: 11.96s, not the last shown 11.1s.
        assert_eq!(s.submit(36, 12_960), SubmitOutcome::Completed);
        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(s.last_result().unwrap().elapsed_secs, 12.0);
        assert_eq!(s.next_tick_due(), None);
        assert!(!s.tick(20_000));
    }

    #[test]
    fn play_again_returns_to_selection() {
        let mut s = running(2);
        for a in 1..=12u32 {
            s.submit(a * 2, 2_000);
        }
        s.play_again();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.factor(), None);
        assert_eq!(s.start(3_000), Err(SessionError::NoFactorSelected));
    }

    #[test]
    fn cleanup_twice_is_harmless() {
        let mut s = running(6);
        s.cleanup();
        s.cleanup();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(!s.tick(5_000));
        assert_eq!(s.next_tick_due(), None);
    }
}
