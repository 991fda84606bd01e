//! The `vt report` command: print stored daily totals.

use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;

use vt_core::DailyTotal;
use vt_db::Database;

pub fn run(db: &Database, day: NaiveDate, json: bool) -> Result<()> {
    let totals = db.daily_totals_for_day(day)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!("{}", render(day, &totals));
    }
    Ok(())
}

/// Renders the human-readable report, longest presence first.
fn render(day: NaiveDate, totals: &[DailyTotal]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Voice attendance for {day}");
    let _ = writeln!(out);

    if totals.is_empty() {
        let _ = writeln!(out, "  (no attendance recorded)");
        return out;
    }

    let width = totals.iter().map(|t| t.username.len()).max().unwrap_or(0);
    for total in totals {
        let _ = writeln!(
            out,
            "  {:width$}  {}h {:02}m {:02}s",
            total.username, total.hours, total.minutes, total.seconds,
        );
    }
    out
}
