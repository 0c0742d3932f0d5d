//! Text output for sim-runner: per-day report blocks and the results table.

use epidemic_core::{DaySnapshot, SimObserver};
use std::io::{self, Write};

pub const RESULTS_HEADER: &str = "day\tsick\tdead\thealthy\tasymptomatic\tmild\tsevere";

/// One tab-separated results row.
pub fn results_row(s: &DaySnapshot) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        s.day,
        s.sick(),
        s.dead,
        s.healthy(),
        s.asymptomatic(),
        s.mild(),
        s.severe()
    )
}

/// Header line plus one row per snapshot.
pub fn write_results<W: Write>(out: &mut W, days: &[DaySnapshot]) -> io::Result<()> {
    writeln!(out, "{RESULTS_HEADER}")?;
    for s in days {
        writeln!(out, "{}", results_row(s))?;
    }
    Ok(())
}

/// Human-readable block for one day.
pub fn day_report(s: &DaySnapshot) -> String {
    let mut block = String::new();
    block.push_str(&format!("========= REPORT ON DAY {} =========\n", s.day));
    block.push_str(&format!("Total population: {}\n", s.total_population));
    block.push_str(&format!(" - infected:      {}\n", s.sick()));
    block.push_str(&format!(" - dead:          {}\n", s.dead));
    block.push_str(&format!("Healthy:          {}\n", s.healthy()));
    block.push_str(&format!(" - At home:       {}\n", s.healthy_at_home));
    block.push_str(&format!(" - In public:     {}\n", s.healthy_in_public));
    block.push_str(&format!("Asymptomatic:     {}\n", s.asymptomatic()));
    block.push_str(&format!(" - At home:       {}\n", s.asymptomatic_at_home));
    block.push_str(&format!(" - In public:     {}\n", s.asymptomatic_in_public));
    block.push_str(&format!("Mild symptoms:    {}\n", s.mild()));
    block.push_str(&format!(" - At home:       {}\n", s.mild_at_home));
    block.push_str(&format!(" - In public:     {}\n", s.mild_in_public));
    block.push_str(&format!("Severe symptoms:               {}\n", s.severe()));
    block.push_str(&format!(" - Waiting for a hospital bed: {}\n", s.severe_waiting_for_bed));
    block.push_str(&format!(" - In a hospital bed:          {}\n", s.severe_in_bed));
    block.push_str("========== END OF REPORT ==========\n");
    block
}

/// Prints a report block after every archived day.
pub struct ReportPrinter<W: Write> {
    out:    W,
    failed: Option<io::Error>,
}

impl<W: Write> ReportPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: None }
    }

    /// First write error seen during the run, if any.
    pub fn finish(self) -> io::Result<()> {
        match self.failed {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: Write> SimObserver for ReportPrinter<W> {
    fn on_day_end(&mut self, snapshot: &DaySnapshot) {
        if self.failed.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(day_report(snapshot).as_bytes()) {
            log::warn!("report output failed on day {}: {e}", snapshot.day);
            self.failed = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epidemic_core::{population::PopulationState, SimConfig};

    fn snapshot() -> DaySnapshot {
        let config = SimConfig::default_test();
        let mut state = PopulationState::new(&config.population);
        state.day = 3;
        state.healthy_in_public -= 7;
        state.mild_at_home = 4;
        state.dead = 3;
        state.snapshot()
    }

    #[test]
    fn results_row_follows_the_header_columns() {
        let s = snapshot();
        let row = results_row(&s);
        let cols: Vec<&str> = row.split('\t').collect();

        assert_eq!(cols.len(), RESULTS_HEADER.split('\t').count());
        assert_eq!(cols[0], "3");
        assert_eq!(cols[1], (20 + 4).to_string(), "sick = asymptomatic + mild + severe");
        assert_eq!(cols[2], "3");
        assert_eq!(cols[3], (2000 - 20 - 7).to_string());
    }

    #[test]
    fn results_file_has_one_row_per_day() {
        let mut out = Vec::new();
        write_results(&mut out, &[snapshot(), snapshot()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], RESULTS_HEADER);
    }

    #[test]
    fn report_block_is_framed_and_split() {
        let report = day_report(&snapshot());

        assert!(report.starts_with("========= REPORT ON DAY 3 ========="));
        assert!(report.ends_with("========== END OF REPORT ==========\n"));
        assert!(report.contains("Mild symptoms:    4\n - At home:       4\n"));
        assert!(report.contains(" - dead:          3\n"));
    }

    #[test]
    fn printer_writes_one_block_per_day() {
        let mut printer = ReportPrinter::new(Vec::new());
        printer.on_day_end(&snapshot());
        printer.on_day_end(&snapshot());

        let text = String::from_utf8(printer.out).unwrap();
        assert_eq!(text.matches("REPORT ON DAY").count(), 2);
    }
}
