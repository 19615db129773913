use std::{fmt, str::FromStr};

use crossbeam_channel::Sender;
use facts_leaderboard::{Leaderboard, Storage};
use facts_schema::{ClassicScore, Millis, Operation, SprintScore};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{SessionError, UnknownGame};
use crate::gameplay::classic::{ClassicOptions, ClassicSession};
use crate::gameplay::sprint::{SprintOptions, SprintSession};
use crate::gameplay::{accuracy, Phase, SubmitOutcome};
use crate::input::adapter::{Action, InputAdapter};
use crate::input::events::InputEvent;
use crate::input::InputQueue;
use crate::problem::generator::GenerationPolicy;
use crate::problem::Toggle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Multiplication,
    Addition,
    Subtraction,
    Division,
    TimesTableSprint,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Multiplication,
        GameKind::Addition,
        GameKind::Subtraction,
        GameKind::Division,
        GameKind::TimesTableSprint,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GameKind::Multiplication => "multiplication",
            GameKind::Addition => "addition",
            GameKind::Subtraction => "subtraction",
            GameKind::Division => "division",
            GameKind::TimesTableSprint => "times-table-sprint",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Multiplication => "Multiplication Dash",
            GameKind::Addition => "Addition Sprint",
            GameKind::Subtraction => "Subtraction Challenge",
            GameKind::Division => "Division Masters",
            GameKind::TimesTableSprint => "Times Table Sprint",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::Multiplication => "Master your times tables",
            GameKind::Addition => "Master your addition facts",
            GameKind::Subtraction => "Master your subtraction facts",
            GameKind::Division => "Master your division facts",
            GameKind::TimesTableSprint => "Race through one full times table",
        }
    }

    pub fn symbol(self) -> char {
        self.policy().operation().symbol()
    }

    pub fn policy(self) -> GenerationPolicy {
        match self {
            GameKind::Multiplication => GenerationPolicy::Standard(Operation::Multiply),
            GameKind::Addition => GenerationPolicy::Standard(Operation::Add),
            GameKind::Subtraction => GenerationPolicy::InvertedSubtraction,
            GameKind::Division => GenerationPolicy::InvertedDivision,
            GameKind::TimesTableSprint => GenerationPolicy::ExhaustiveSprint,
        }
    }

    pub fn is_sprint(self) -> bool {
        self.policy() == GenerationPolicy::ExhaustiveSprint
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunSummary {
    Classic(ClassicScore),
    Sprint(SprintScore),
}

/// What the presentation layer should react to after an input or tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameSignal {
    Nothing,
    AnswerEdited,
    Correct,
    Wrong,
    /// The clock display moved.
    Tick,
    RunEnded { summary: RunSummary, saved: bool },
    ExitPrompt,
    ExitCancelled,
    ExitConfirmed,
}

/// Snapshot for drawing the in-game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub question: Option<String>,
    pub answer: String,
    pub score: u32,
    /// Percent; 100 before the first attempt.
    pub accuracy: u8,
    /// Seconds left (classic) or stopwatch with tenths (sprint).
    pub timer: String,
    /// Solved rows out of twelve, sprint only.
    pub progress: Option<(usize, usize)>,
    /// The sprint's problem grid; empty for timed games.
    pub grid: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub question: String,
    pub completed: bool,
    pub current: bool,
}

/// What every game offers its presentation layer.
pub trait FactsGame {
    fn kind(&self) -> GameKind;

    fn phase(&self) -> Phase;

    fn start_run(&mut self, now: Millis) -> Result<(), SessionError>;

    /// Ended -> next run. Classic games reuse their settings; the sprint
    /// goes back to factor selection.
    fn play_again(&mut self, now: Millis) -> Result<(), SessionError>;

    fn submit_value(&mut self, value: u32, now: Millis) -> GameSignal;

    fn tick(&mut self, now: Millis) -> GameSignal;

    fn next_tick_due(&self) -> Option<Millis>;

    fn hud(&self) -> Hud;

    fn adapter(&self) -> &InputAdapter;

    fn adapter_mut(&mut self) -> &mut InputAdapter;

    fn input_queue(&self) -> &InputQueue;

    fn clear_leaderboard(&self) -> bool;

    /// Stops timers and detaches input sources. Safe to call repeatedly.
    fn cleanup(&mut self);

    /// Stops the run in progress without recording it.
    fn abandon(&mut self);

    fn input_sender(&self) -> Sender<InputEvent> {
        self.input_queue().sender()
    }

    fn handle_input(&mut self, event: InputEvent, now: Millis) -> GameSignal {
        if self.phase() != Phase::Running {
            return GameSignal::Nothing;
        }
        match self.adapter_mut().handle(&event) {
            Action::None => GameSignal::Nothing,
            Action::Edited => GameSignal::AnswerEdited,
            Action::Submit(value) => self.submit_value(value, now),
            Action::ExitPrompt => GameSignal::ExitPrompt,
            Action::ExitCancelled => GameSignal::ExitCancelled,
            Action::ExitConfirmed => {
                self.abandon();
                GameSignal::ExitConfirmed
            }
        }
    }

    /// Submits whatever is in the answer buffer. Empty buffers are ignored.
    fn submit_answer(&mut self, now: Millis) -> GameSignal {
        match self.adapter().buffer().value() {
            Some(value) => self.submit_value(value, now),
            None => GameSignal::Nothing,
        }
    }

    /// Applies every queued input event in arrival order.
    fn pump_input(&mut self, now: Millis) -> Vec<GameSignal> {
        let mut signals = Vec::new();
        while let Some(event) = self.input_queue().pop() {
            signals.push(self.handle_input(event, now));
        }
        signals
    }
}

/// Timed game over the selected tables (multiplication, addition,
/// subtraction, division).
pub struct ClassicGame<S, R> {
    kind: GameKind,
    session: ClassicSession<R>,
    leaderboard: Leaderboard<ClassicScore, S>,
    adapter: InputAdapter,
    input: InputQueue,
}

impl<S: Storage, R: Rng> ClassicGame<S, R> {
    pub fn new(
        kind: GameKind,
        storage: S,
        rng: R,
        options: ClassicOptions,
    ) -> Result<Self, SessionError> {
        if kind.is_sprint() {
            return Err(SessionError::NotTimedGame(kind.id()));
        }
        Ok(Self {
            kind,
            session: ClassicSession::new(kind.policy(), rng, options),
            leaderboard: Leaderboard::open(kind.id(), storage),
            adapter: InputAdapter::new(),
            input: InputQueue::new(),
        })
    }

    pub fn session(&self) -> &ClassicSession<R> {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard<ClassicScore, S> {
        &self.leaderboard
    }

    /// `Ok(Toggle::KeptLast)` means the table was re-selected so at least
    /// one stays on; show [`SessionError::NoOperandsSelected`] as advice.
    pub fn toggle_table(&mut self, n: u8) -> Result<Toggle, SessionError> {
        let toggle = self.session.toggle_table(n)?;
        if toggle == Toggle::KeptLast {
            warn!(game = %self.kind, table = n, "kept last selected table");
        }
        Ok(toggle)
    }

    pub fn set_all_tables(&mut self, on: bool) {
        self.session.set_all_tables(on);
    }

    pub fn select_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        self.session.select_duration(secs).inspect_err(|e| {
            warn!(game = %self.kind, secs, error = %e, "duration rejected");
        })
    }

    pub fn select_custom_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        self.session.select_custom_duration(secs).inspect_err(|e| {
            warn!(game = %self.kind, secs, error = %e, "custom duration rejected");
        })
    }

    pub fn tables_label(&self) -> String {
        self.session.tables_label()
    }

    fn record(&self, score: ClassicScore) -> GameSignal {
        let saved = self.leaderboard.save_score(score.clone());
        GameSignal::RunEnded {
            summary: RunSummary::Classic(score),
            saved,
        }
    }
}

impl<S: Storage, R: Rng> FactsGame for ClassicGame<S, R> {
    fn kind(&self) -> GameKind {
        self.kind
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }

    fn start_run(&mut self, now: Millis) -> Result<(), SessionError> {
        self.session.start(now).inspect_err(|e| {
            warn!(game = %self.kind, error = %e, "run not started");
        })?;
        self.adapter.clear_buffer();
        Ok(())
    }

    fn play_again(&mut self, now: Millis) -> Result<(), SessionError> {
        self.start_run(now)
    }

    fn submit_value(&mut self, value: u32, now: Millis) -> GameSignal {
        // Answers that arrive after the countdown ran out do not count.
        if let ended @ GameSignal::RunEnded { .. } = self.tick(now) {
            return ended;
        }
        match self.session.submit(value) {
            SubmitOutcome::Ignored => GameSignal::Nothing,
            SubmitOutcome::Wrong => GameSignal::Wrong,
            SubmitOutcome::Correct | SubmitOutcome::Completed => {
                self.adapter.clear_buffer();
                if let Some(p) = self.session.current() {
                    debug!(game = %self.kind, problem = %p.key(), "next problem");
                }
                GameSignal::Correct
            }
        }
    }

    fn tick(&mut self, now: Millis) -> GameSignal {
        let before = self.session.run().map(|r| r.remaining_secs);
        if let Some(score) = self.session.tick(now) {
            return self.record(score);
        }
        let after = self.session.run().map(|r| r.remaining_secs);
        if before != after {
            GameSignal::Tick
        } else {
            GameSignal::Nothing
        }
    }

    fn next_tick_due(&self) -> Option<Millis> {
        self.session.next_tick_due()
    }

    fn hud(&self) -> Hud {
        let run = self.session.run();
        let running = self.session.phase() == Phase::Running;
        Hud {
            question: self
                .session
                .current()
                .filter(|_| running)
                .map(|p| p.question()),
            answer: self.adapter.buffer().as_str().to_string(),
            score: run.map_or(0, |r| r.score),
            accuracy: run.and_then(|r| accuracy(r.score, r.total)).unwrap_or(100),
            timer: run
                .map_or(self.session.options().duration_secs, |r| r.remaining_secs)
                .to_string(),
            progress: None,
            grid: Vec::new(),
        }
    }

    fn adapter(&self) -> &InputAdapter {
        &self.adapter
    }

    fn adapter_mut(&mut self) -> &mut InputAdapter {
        &mut self.adapter
    }

    fn input_queue(&self) -> &InputQueue {
        &self.input
    }

    fn clear_leaderboard(&self) -> bool {
        self.leaderboard.clear()
    }

    fn cleanup(&mut self) {
        self.session.cleanup();
        self.adapter = InputAdapter::new();
        // Dropping the old queue disconnects every sender handed out for it.
        self.input = InputQueue::new();
        debug!(game = %self.kind, "cleaned up");
    }

    fn abandon(&mut self) {
        self.session.cleanup();
        self.adapter.clear_buffer();
    }
}

/// Times-table sprint: solve `1 × n` through `12 × n` against the clock.
pub struct SprintGame<S> {
    session: SprintSession,
    leaderboard: Leaderboard<SprintScore, S>,
    adapter: InputAdapter,
    input: InputQueue,
}

impl<S: Storage> SprintGame<S> {
    pub fn new(storage: S, options: SprintOptions) -> Self {
        Self {
            session: SprintSession::new(options),
            leaderboard: Leaderboard::open(GameKind::TimesTableSprint.id(), storage),
            adapter: InputAdapter::new(),
            input: InputQueue::new(),
        }
    }

    pub fn session(&self) -> &SprintSession {
        &self.session
    }

    pub fn leaderboard(&self) -> &Leaderboard<SprintScore, S> {
        &self.leaderboard
    }

    pub fn select_factor(&mut self, factor: u8) -> Result<(), SessionError> {
        self.session.select_factor(factor)
    }
}

impl<S: Storage> FactsGame for SprintGame<S> {
    fn kind(&self) -> GameKind {
        GameKind::TimesTableSprint
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }

    fn start_run(&mut self, now: Millis) -> Result<(), SessionError> {
        self.session.start(now).inspect_err(|e| {
            warn!(game = %GameKind::TimesTableSprint, error = %e, "sprint not started");
        })?;
        self.adapter.clear_buffer();
        Ok(())
    }

    fn play_again(&mut self, _now: Millis) -> Result<(), SessionError> {
        self.session.play_again();
        self.adapter.clear_buffer();
        Ok(())
    }

    fn submit_value(&mut self, value: u32, now: Millis) -> GameSignal {
        match self.session.submit(value, now) {
            SubmitOutcome::Ignored => GameSignal::Nothing,
            SubmitOutcome::Wrong => GameSignal::Wrong,
            SubmitOutcome::Correct => {
                self.adapter.clear_buffer();
                GameSignal::Correct
            }
            SubmitOutcome::Completed => {
                self.adapter.clear_buffer();
                match self.session.last_result().cloned() {
                    Some(score) => {
                        let saved = self.leaderboard.save_score(score.clone());
                        GameSignal::RunEnded {
                            summary: RunSummary::Sprint(score),
                            saved,
                        }
                    }
                    None => GameSignal::Correct,
                }
            }
        }
    }

    fn tick(&mut self, now: Millis) -> GameSignal {
        if self.session.tick(now) {
            GameSignal::Tick
        } else {
            GameSignal::Nothing
        }
    }

    fn next_tick_due(&self) -> Option<Millis> {
        self.session.next_tick_due()
    }

    fn hud(&self) -> Hud {
        let completed = self.session.completed();
        let running = self.session.phase() == Phase::Running;
        Hud {
            question: self.session.current().map(|p| p.question()),
            answer: self.adapter.buffer().as_str().to_string(),
            score: completed as u32,
            accuracy: 100,
            timer: self.session.elapsed_display(),
            progress: Some((completed, self.session.problems().len().max(12))),
            grid: self
                .session
                .problems()
                .iter()
                .enumerate()
                .map(|(i, row)| GridRow {
                    question: row.problem.question(),
                    completed: row.completed,
                    current: running && i == self.session.current_index(),
                })
                .collect(),
        }
    }

    fn adapter(&self) -> &InputAdapter {
        &self.adapter
    }

    fn adapter_mut(&mut self) -> &mut InputAdapter {
        &mut self.adapter
    }

    fn input_queue(&self) -> &InputQueue {
        &self.input
    }

    fn clear_leaderboard(&self) -> bool {
        self.leaderboard.clear()
    }

    fn cleanup(&mut self) {
        self.session.cleanup();
        self.adapter = InputAdapter::new();
        self.input = InputQueue::new();
        debug!(game = %GameKind::TimesTableSprint, "cleaned up");
    }

    fn abandon(&mut self) {
        self.session.cleanup();
        self.adapter.clear_buffer();
    }
}
