use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use facts_core::GameKind;
use facts_schema::{ClassicScore, SprintScore};

/// Rows shown after a run and by `facts leaderboard`.
const SHOWN: usize = 10;

pub fn print_game(out: &mut impl Write, kind: GameKind) -> io::Result<()> {
    writeln!(
        out,
        "{:<20} {} {} ({})",
        kind.id(),
        kind.symbol(),
        kind.title(),
        kind.description()
    )
}

pub fn print_cleared(out: &mut impl Write, kind: GameKind) -> io::Result<()> {
    writeln!(out, "Cleared leaderboard for {}", kind.title())
}

pub fn print_classic(out: &mut impl Write, entries: &[ClassicScore]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No scores yet");
    }
    writeln!(out, " #  Score  Acc   Time  Tables        Date")?;
    for (i, e) in entries.iter().take(SHOWN).enumerate() {
        writeln!(
            out,
            "{:>2}  {:>5}  {:>3}%  {:>4}s  {:<12}  {}",
            i + 1,
            e.score,
            e.accuracy,
            e.duration_secs,
            e.tables_label,
            format_date(&e.recorded_at)
        )?;
    }
    Ok(())
}

pub fn print_sprint(out: &mut impl Write, entries: &[SprintScore]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "No scores yet");
    }
    writeln!(out, " #  Table   Time  Date")?;
    for (i, e) in entries.iter().take(SHOWN).enumerate() {
        writeln!(
            out,
            "{:>2}  {:>4}×  {:>5.1}s  {}",
            i + 1,
            e.factor,
            e.elapsed_secs,
            format_date(&e.recorded_at)
        )?;
    }
    Ok(())
}

/// `Mon DD, YYYY` in local time.
fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_boards_say_so() {
        assert_eq!(render(|o| print_classic(o, &[])), "No scores yet\n");
        assert_eq!(render(|o| print_sprint(o, &[])), "No scores yet\n");
    }

    #[test]
    fn classic_rows_are_ranked() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let entries = vec![
            ClassicScore {
                score: 12,
                total: 13,
                accuracy: 92,
                duration_secs: 60,
                tables_label: "All 1–12".into(),
                recorded_at: at,
            },
            ClassicScore {
                score: 9,
                total: 9,
                accuracy: 100,
                duration_secs: 30,
                tables_label: "3×, 4×".into(),
                recorded_at: at,
            },
        ];
        let text = render(|o| print_classic(o, &entries));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(" 1     12"));
        assert!(lines[2].contains("3×, 4×"));
        assert!(lines[1].contains("2024"));
    }

    #[test]
    fn sprint_time_has_tenths() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let text = render(|o| {
            print_sprint(
                o,
                &[SprintScore {
                    factor: 7,
                    elapsed_secs: 12.0,
                    recorded_at: at,
                }],
            )
        });
        assert!(text.contains("7×   12.0s"));
    }
}
