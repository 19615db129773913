use std::ops::RangeInclusive;

use chrono::Utc;
use facts_schema::{ClassicScore, Millis};
use rand::Rng;
use tracing::{debug, info};

use super::{accuracy, Phase, SubmitOutcome};
use crate::error::SessionError;
use crate::problem::generator::{GenerationPolicy, QuestionGenerator};
use crate::problem::{OperandSet, Problem, Toggle};
use crate::time::ticker::TickSlot;
use crate::time::CLASSIC_TICK_MS;

pub const PRESET_DURATIONS: [u32; 4] = [30, 60, 90, 120];
pub const CUSTOM_DURATION_SECS: RangeInclusive<u32> = 10..=600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicOptions {
    pub duration_secs: u32,
    pub tables: OperandSet,
}

impl Default for ClassicOptions {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            tables: OperandSet::all(),
        }
    }
}

/// Everything that belongs to one run. Built whole at start, never patched
/// across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicRun {
    pub score: u32,
    pub total: u32,
    pub correct_on_first_try: bool,
    pub remaining_secs: u32,
    pub duration_secs: u32,
    pub tables: OperandSet,
    pub current: Problem,
}

/// Countdown game: as many facts as possible before time runs out.
pub struct ClassicSession<R> {
    generator: QuestionGenerator<R>,
    options: ClassicOptions,
    phase: Phase,
    run: Option<ClassicRun>,
    ticks: TickSlot,
    last_result: Option<ClassicScore>,
}

impl<R: Rng> ClassicSession<R> {
    pub fn new(policy: GenerationPolicy, rng: R, options: ClassicOptions) -> Self {
        Self {
            generator: QuestionGenerator::new(policy, rng),
            options,
            phase: Phase::Idle,
            run: None,
            ticks: TickSlot::new(),
            last_result: None,
        }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.generator.policy()
    }

    pub fn options(&self) -> &ClassicOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> Option<&ClassicRun> {
        self.run.as_ref()
    }

    pub fn current(&self) -> Option<&Problem> {
        self.run.as_ref().map(|r| &r.current)
    }

    pub fn last_result(&self) -> Option<&ClassicScore> {
        self.last_result.as_ref()
    }

    pub fn next_tick_due(&self) -> Option<Millis> {
        self.ticks.next_due()
    }

    pub fn toggle_table(&mut self, n: u8) -> Result<Toggle, SessionError> {
        if !(1..=12).contains(&n) {
            return Err(SessionError::OperandOutOfRange(n));
        }
        Ok(self.options.tables.toggle(n))
    }

    pub fn set_all_tables(&mut self, on: bool) {
        self.options.tables.set_all(on);
    }

    /// One of the preset buttons.
    pub fn select_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        if !PRESET_DURATIONS.contains(&secs) {
            return Err(SessionError::InvalidDuration(secs));
        }
        self.options.duration_secs = secs;
        Ok(())
    }

    /// Any whole number of seconds in 10..=600.
    pub fn select_custom_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        if !CUSTOM_DURATION_SECS.contains(&secs) {
            return Err(SessionError::InvalidDuration(secs));
        }
        self.options.duration_secs = secs;
        Ok(())
    }

    pub fn tables_label(&self) -> String {
        self.options.tables.label(self.policy().operation())
    }

    /// Idle/Ended -> Running. Restarts a run already in progress.
    pub fn start(&mut self, now: Millis) -> Result<(), SessionError> {
        let tables = self.options.tables;
        if tables.is_empty() {
            return Err(SessionError::NoOperandsSelected);
        }

        self.ticks.cancel();
        self.generator.reset();
        let current = self
            .generator
            .next(&tables)
            .ok_or(SessionError::NoOperandsSelected)?;

        self.run = Some(ClassicRun {
            score: 0,
            total: 0,
            correct_on_first_try: true,
            remaining_secs: self.options.duration_secs,
            duration_secs: self.options.duration_secs,
            tables,
            current,
        });
        self.ticks.arm(now, CLASSIC_TICK_MS);
        self.phase = Phase::Running;
        debug!(duration = self.options.duration_secs, first = %current.key(), "classic run started");
        Ok(())
    }

    /// Every submission counts toward `total`; only a first-try hit scores.
    pub fn submit(&mut self, value: u32) -> SubmitOutcome {
        if self.phase != Phase::Running {
            return SubmitOutcome::Ignored;
        }
        let Some(run) = self.run.as_mut() else {
            return SubmitOutcome::Ignored;
        };

        run.total += 1;
        if !run.current.is_answer(value) {
            run.correct_on_first_try = false;
            return SubmitOutcome::Wrong;
        }

        if run.correct_on_first_try {
            run.score += 1;
        }
        if let Some(next) = self.generator.next(&run.tables) {
            run.current = next;
        }
        run.correct_on_first_try = true;
        SubmitOutcome::Correct
    }

    /// Advances the countdown. Returns the finished score on the tick that
    /// ends the run.
    pub fn tick(&mut self, now: Millis) -> Option<ClassicScore> {
        if self.phase != Phase::Running {
            return None;
        }
        let fired = self.ticks.poll(now);
        if fired == 0 {
            return None;
        }
        let run = self.run.as_mut()?;
        run.remaining_secs = run.remaining_secs.saturating_sub(fired);
        if run.remaining_secs == 0 {
            return self.finish();
        }
        None
    }

    fn finish(&mut self) -> Option<ClassicScore> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Ended;
        self.ticks.cancel();

        let run = self.run.as_ref()?;
        let result = ClassicScore {
            score: run.score,
            total: run.total,
            accuracy: accuracy(run.score, run.total).unwrap_or(0),
            duration_secs: run.duration_secs,
            tables_label: run.tables.label(self.generator.policy().operation()),
            recorded_at: Utc::now(),
        };
        info!(
            score = result.score,
            total = result.total,
            accuracy = result.accuracy,
            "classic run ended"
        );
        self.last_result = Some(result.clone());
        Some(result)
    }

    /// Stops the countdown and abandons an unfinished run. Safe to repeat.
    pub fn cleanup(&mut self) {
        if self.ticks.cancel() {
            debug!("classic ticker cancelled");
        }
        if self.phase == Phase::Running {
            self.phase = Phase::Idle;
            self.run = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts_schema::Operation;
    use rand::{rngs::StdRng, SeedableRng};

    fn session(options: ClassicOptions) -> ClassicSession<StdRng> {
        ClassicSession::new(
            GenerationPolicy::Standard(Operation::Multiply),
            StdRng::seed_from_u64(11),
            options,
        )
    }

    fn answer(s: &ClassicSession<StdRng>) -> u32 {
        s.current().unwrap().expected
    }

    #[test]
    fn first_try_scores_and_retry_does_not() {
        let mut s = session(ClassicOptions::default());
        s.start(0).unwrap();

        let right = answer(&s);
        assert_eq!(s.submit(right), SubmitOutcome::Correct);
        assert_eq!((s.run().unwrap().score, s.run().unwrap().total), (1, 1));

        let right = answer(&s);
        assert_eq!(s.submit(right + 1), SubmitOutcome::Wrong);
        assert_eq!(s.submit(right), SubmitOutcome::Correct);
        assert_eq!((s.run().unwrap().score, s.run().unwrap().total), (1, 3));
        assert!(s.run().unwrap().correct_on_first_try);
    }

    #[test]
    fn start_requires_a_table() {
        let mut s = session(ClassicOptions::default());
        s.set_all_tables(false);
        assert_eq!(s.start(0), Err(SessionError::NoOperandsSelected));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.next_tick_due(), None);
    }

    #[test]
    fn countdown_ends_the_run_once() {
        let mut s = session(ClassicOptions {
            duration_secs: 10,
            tables: OperandSet::from_values([2]),
        });
        s.start(500).unwrap();
        assert_eq!(s.next_tick_due(), Some(1500));

        assert!(s.tick(1499).is_none());
        assert!(s.tick(9_600).is_none());
        assert_eq!(s.run().unwrap().remaining_secs, 1);

        let result = s.tick(10_500).expect("run should end");
        assert_eq!(s.phase(), Phase::Ended);
        assert_eq!(result.total, 0);
        assert_eq!(result.accuracy, 0);
        assert_eq!(result.duration_secs, 10);
        assert_eq!(result.tables_label, "2×");

        assert!(s.tick(20_000).is_none());
        assert_eq!(s.next_tick_due(), None);
        assert_eq!(s.submit(4), SubmitOutcome::Ignored);
    }

    #[test]
    fn custom_duration_bounds() {
        let mut s = session(ClassicOptions::default());
        assert!(s.select_duration(90).is_ok());
        assert_eq!(s.select_duration(45), Err(SessionError::InvalidDuration(45)));
        assert!(s.select_custom_duration(45).is_ok());
        assert!(s.select_custom_duration(600).is_ok());
        assert_eq!(s.select_custom_duration(9), Err(SessionError::InvalidDuration(9)));
        assert_eq!(s.select_custom_duration(601), Err(SessionError::InvalidDuration(601)));
        assert_eq!(s.options().duration_secs, 600);
    }

    #[test]
    fn restart_builds_a_fresh_run() {
        let mut s = session(ClassicOptions::default());
        s.start(0).unwrap();
        let right = answer(&s);
        s.submit(right);
        s.tick(3_000);

        s.start(5_000).unwrap();
        let run = s.run().unwrap();
        assert_eq!((run.score, run.total, run.remaining_secs), (0, 0, 60));
        assert_eq!(s.next_tick_due(), Some(6_000));
    }

    #[test]
    fn cleanup_is_idempotent() {
        let mut s = session(ClassicOptions::default());
        s.start(0).unwrap();
        s.cleanup();
        s.cleanup();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.tick(120_000).is_none());
        assert!(s.last_result().is_none());
    }
}
