use std::{
    io::{self, BufRead, Write},
    thread,
    time::{Duration, Instant},
};

use anyhow::Context;
use facts_core::input::buffer::MAX_ANSWER_DIGITS;
use facts_core::input::events::{InputEvent, Key};
use facts_core::{FactsGame, GameSignal, Hud, Phase, RunSummary};
use facts_schema::Millis;

/// How long to wait for input when no tick is pending.
const IDLE_WAIT_MS: Millis = 250;

/// Plays one run in line mode: each stdin line is typed then Enter is
/// pressed. `q` asks to exit, and the next line answers the prompt.
pub fn run<G: FactsGame>(game: &mut G, out: &mut impl Write) -> anyhow::Result<()> {
    let clock = Instant::now();
    let now = || clock.elapsed().as_millis() as Millis;

    game.start_run(now()).context("could not start")?;
    writeln!(out, "{}: answer each line, q to quit", game.kind().title())?;
    print_hud(out, &game.hud())?;

    let reader = spawn_reader(game, clock);

    loop {
        let wait = game
            .next_tick_due()
            .map_or(IDLE_WAIT_MS, |due| due.saturating_sub(now()));
        let event = game.input_queue().pop_timeout(Duration::from_millis(wait));

        // Settle the clock first so an answer typed after time ran out is not scored.
        let signal = game.tick(now());
        if report(out, game, &signal)? {
            break;
        }

        match event {
            Some(event) => {
                let signal = game.handle_input(event, now());
                if report(out, game, &signal)? {
                    break;
                }
            }
            None if reader.is_finished() => {
                // The last lines may have landed after the timeout.
                let mut ended = false;
                for signal in game.pump_input(now()) {
                    if report(out, game, &signal)? {
                        ended = true;
                        break;
                    }
                }
                if !ended && game.phase() == Phase::Running {
                    tracing::info!("input closed, abandoning run");
                    writeln!(out, "Input closed")?;
                    game.abandon();
                }
                break;
            }
            None => {}
        }
    }

    game.cleanup();
    Ok(())
}

/// Returns `true` once the run is over.
fn report<G: FactsGame>(out: &mut impl Write, game: &G, signal: &GameSignal) -> io::Result<bool> {
    match signal {
        GameSignal::Nothing | GameSignal::AnswerEdited | GameSignal::Tick => Ok(false),
        GameSignal::Correct | GameSignal::Wrong => {
            let mark = if *signal == GameSignal::Correct { "✓" } else { "✗" };
            writeln!(out, "{mark}")?;
            print_hud(out, &game.hud())?;
            Ok(false)
        }
        GameSignal::ExitPrompt => {
            writeln!(out, "Exit? Progress will be lost. (y/N)")?;
            Ok(false)
        }
        GameSignal::ExitCancelled => {
            print_hud(out, &game.hud())?;
            Ok(false)
        }
        GameSignal::ExitConfirmed => {
            writeln!(out, "Run abandoned")?;
            Ok(true)
        }
        GameSignal::RunEnded { summary, saved } => {
            match summary {
                RunSummary::Classic(s) => writeln!(
                    out,
                    "Time! {} correct out of {} ({}%)",
                    s.score, s.total, s.accuracy
                )?,
                RunSummary::Sprint(s) => writeln!(
                    out,
                    "Finished the {}× table in {:.1}s",
                    s.factor, s.elapsed_secs
                )?,
            }
            if !saved {
                writeln!(out, "(score could not be saved)")?;
            }
            Ok(true)
        }
    }
}

fn print_hud(out: &mut impl Write, hud: &Hud) -> io::Result<()> {
    let Some(question) = &hud.question else {
        return Ok(());
    };
    match hud.progress {
        Some((done, of)) => writeln!(out, "[{done} / {of} | {}s] {question}", hud.timer),
        None => writeln!(
            out,
            "[{} pts | {}% | {}s] {question}",
            hud.score, hud.accuracy, hud.timer
        ),
    }
}

/// Feeds stdin into the game's input queue until EOF or until the game
/// drops the queue. Events are stamped on the game loop's `clock`.
fn spawn_reader<G: FactsGame>(game: &G, clock: Instant) -> thread::JoinHandle<()> {
    let sender = game.input_sender();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let at = clock.elapsed().as_millis() as Millis;
            let keys: Vec<Key> = match line.trim() {
                "q" | "Q" => vec![Key::Escape],
                // Answers the exit prompt.
                "y" | "Y" | "n" | "N" => line.trim().chars().map(Key::from_char).collect(),
                // Each line replaces whatever a wrong answer left behind.
                text => std::iter::repeat_n(Key::Backspace, MAX_ANSWER_DIGITS)
                    .chain(text.chars().filter(|c| !c.is_whitespace()).map(Key::from_char))
                    .chain([Key::Enter])
                    .collect(),
            };
            for key in keys {
                if sender.send(InputEvent::keyboard(at, key)).is_err() {
                    return;
                }
            }
        }
    })
}
