//! Interactive session loop.
//!
//! A session asks for a mode once and then runs one of two loops:
//!
//! - Manual: read distances until a negative value (or end of input). Input
//!   is scanned token by token like `scanf("%f")`; the first non-numeric
//!   token is rejected along with the rest of its line.
//! - Automatic: generate a distance, process it, sleep, repeat until Ctrl+C
//!   or until `automatic.max_readings` is reached.
//!
//! Every accepted distance goes through the same pipeline: classify, print
//! the summary line, print the gauge, append to the log store.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Result, bail};

use super::clock::Clock;
use super::gauge::render_bar;
use super::generator::DistanceGenerator;
use super::interrupt;
use super::reading::Reading;
use super::reading_log::ReadingLog;
use crate::config::{AutomaticConfig, Config};

const BANNER: &str = concat!(
    "\n",
    "========================================\n",
    "   ||  PARKING ASSISTANCE SIMULATOR  ||\n",
    "========================================\n",
);

/// Input source chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Distances typed by the operator.
    Manual,
    /// Distances produced by the seeded generator.
    Automatic,
}

impl FromStr for SessionMode {
    type Err = anyhow::Error;

    /// Parses the mode selector: `1` is manual, `2` is automatic.
    fn from_str(s: &str) -> Result<Self> {
        let Ok(choice) = s.trim().parse::<i64>() else {
            bail!("Invalid input. Exiting.");
        };
        match choice {
            1 => Ok(SessionMode::Manual),
            2 => Ok(SessionMode::Automatic),
            _ => bail!("Invalid choice. Exiting."),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Manual => f.write_str("manual"),
            SessionMode::Automatic => f.write_str("automatic"),
        }
    }
}

/// Counts reported when a session ends normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub mode: SessionMode,
    /// Readings classified and printed.
    pub readings: u64,
    /// Readings that reached the log store.
    pub persisted: u64,
}

/// One item scanned from a manual input line.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ManualInput {
    Distance(f64),
    /// Negative value; ends manual mode.
    Exit,
    /// Non-numeric token; the rest of the line is dropped.
    NotANumber,
}

/// Splits the longest finite number off the front of `token`.
///
/// `"12cm"` yields `(12.0, "cm")`. `nan` and `inf` are not accepted.
fn leading_number(token: &str) -> Option<(f64, &str)> {
    token
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| {
            token[..end]
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .map(|d| (d, &token[end..]))
        })
}

/// Scans a line into distances, stopping after an exit or a rejected token.
fn scan_line(line: &str) -> Vec<ManualInput> {
    let mut items = Vec::new();
    for token in line.split_whitespace() {
        let mut rest = token;
        while !rest.is_empty() {
            match leading_number(rest) {
                Some((d, _)) if d < 0.0 => {
                    items.push(ManualInput::Exit);
                    return items;
                }
                Some((d, tail)) => {
                    items.push(ManualInput::Distance(d));
                    rest = tail;
                }
                None => {
                    items.push(ManualInput::NotANumber);
                    return items;
                }
            }
        }
    }
    items
}

/// Drives one simulator run.
///
/// `out` receives everything the operator sees; the log store warning goes
/// to stderr (see [`ReadingLog::record`]).
pub struct Session<C, W> {
    log: ReadingLog,
    automatic: AutomaticConfig,
    clock: C,
    out: W,
    readings: u64,
    persisted: u64,
}

impl<C: Clock, W: Write> Session<C, W> {
    pub fn new(config: &Config, log: ReadingLog, clock: C, out: W) -> Self {
        Self {
            log,
            automatic: config.automatic.clone(),
            clock,
            out,
            readings: 0,
            persisted: 0,
        }
    }

    /// Asks for the mode, then runs the chosen loop.
    ///
    /// # Errors
    /// Returns an error if the mode selection is missing or invalid, or if
    /// writing to `out` fails. Log store failures are never fatal.
    pub fn run<R: BufRead>(&mut self, input: &mut R) -> Result<SessionSummary> {
        let mode = self.prompt_mode(input)?;
        self.run_mode(mode, input)
    }

    /// Prepares the log store, prints the banner and reads the mode selector.
    ///
    /// # Errors
    /// Returns an error if the selector is missing or is not `1` or `2`.
    pub fn prompt_mode<R: BufRead>(&mut self, input: &mut R) -> Result<SessionMode> {
        if let Err(e) = self.log.ensure_header() {
            tracing::warn!(error = %format!("{e:#}"), "could not initialize log store");
        }

        writeln!(self.out, "{BANNER}")?;
        writeln!(self.out, "Choose mode:\n 1) Manual input\n 2) Automatic simulation")?;
        write!(self.out, "Enter choice (1 or 2): ")?;
        self.out.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;
        let mode: SessionMode = line.parse()?;
        tracing::info!(%mode, log_file = %self.log.path().display(), "session started");
        Ok(mode)
    }

    /// Runs the loop for an already selected mode and prints the closing line.
    ///
    /// # Errors
    /// Returns an error if reading input or writing to `out` fails.
    pub fn run_mode<R: BufRead>(
        &mut self,
        mode: SessionMode,
        input: &mut R,
    ) -> Result<SessionSummary> {
        match mode {
            SessionMode::Manual => self.run_manual(input)?,
            SessionMode::Automatic => self.run_automatic()?,
        }

        writeln!(
            self.out,
            "Simulation ended. Log file: {}",
            self.log.path().display()
        )?;
        self.out.flush()?;
        tracing::info!(
            readings = self.readings,
            persisted = self.persisted,
            "session ended"
        );
        Ok(SessionSummary {
            mode,
            readings: self.readings,
            persisted: self.persisted,
        })
    }

    fn run_manual<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        writeln!(
            self.out,
            "Manual mode selected. Enter distance in cm (negative to exit)."
        )?;

        let mut line = String::new();
        loop {
            write!(self.out, "Enter distance (cm): ")?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                // stdin closed: nothing more can arrive
                writeln!(self.out)?;
                tracing::debug!("manual input reached end of stream");
                return Ok(());
            }

            for item in scan_line(&line) {
                match item {
                    ManualInput::Distance(distance) => self.process(distance)?,
                    ManualInput::Exit => {
                        writeln!(self.out, "Exiting manual mode.")?;
                        return Ok(());
                    }
                    ManualInput::NotANumber => {
                        tracing::debug!(input = line.trim(), "rejected manual input");
                        writeln!(self.out, "Please enter a number.")?;
                    }
                }
            }
        }
    }

    fn run_automatic(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Automatic simulation mode. Press Ctrl+C to stop."
        )?;
        self.out.flush()?;

        let seed = self.clock.seed();
        tracing::info!(seed, "automatic mode seeded");
        let mut generator = DistanceGenerator::from_seed(seed, &self.automatic);
        let interval = self.automatic.interval();
        let limit = self.automatic.max_readings;
        let mut generated: u64 = 0;

        loop {
            if limit.is_some_and(|max| generated >= max) {
                break;
            }
            if interrupt::is_interrupted() {
                writeln!(self.out, "Interrupted.")?;
                break;
            }

            let distance = generator.next_distance();
            self.process(distance)?;
            generated += 1;

            if limit.is_some_and(|max| generated >= max) {
                break;
            }
            self.clock.sleep(interval);
        }
        Ok(())
    }

    /// Classifies, prints and persists one distance.
    fn process(&mut self, distance_cm: f64) -> Result<()> {
        let reading = Reading::new(&self.clock.now(), distance_cm);

        writeln!(self.out, "{}", reading.summary_line())?;
        writeln!(self.out, "{}", render_bar(distance_cm))?;
        self.out.flush()?;

        self.readings += 1;
        if self.log.record(&reading) {
            self.persisted += 1;
        }
        tracing::debug!(
            distance_cm,
            status = %reading.status(),
            "processed reading"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::time::Duration;

    use tempfile::{TempDir, tempdir};

    use super::*;
    use crate::core::clock::testing::FakeClock;

    fn setup() -> (TempDir, ReadingLog, FakeClock) {
        let dir = tempdir().unwrap();
        let log = ReadingLog::new(dir.path().join("parking_log.csv"));
        let clock = FakeClock::at(2025, 1, 2, 3, 4, 5);
        (dir, log, clock)
    }

    fn auto_config(max_readings: u64) -> Config {
        Config {
            automatic: AutomaticConfig {
                max_readings: Some(max_readings),
                ..AutomaticConfig::default()
            },
            ..Config::default()
        }
    }

    fn log_lines(log: &ReadingLog) -> Vec<String> {
        fs::read_to_string(log.path())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_mode_selection_parsing() {
        assert_eq!("1".parse::<SessionMode>().unwrap(), SessionMode::Manual);
        assert_eq!(" 2 \n".parse::<SessionMode>().unwrap(), SessionMode::Automatic);

        let err = "3".parse::<SessionMode>().unwrap_err();
        assert!(err.to_string().contains("Invalid choice"));
        let err = "abc".parse::<SessionMode>().unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
        assert!("".parse::<SessionMode>().is_err());
    }

    #[test]
    fn test_scan_line_tokens() {
        use ManualInput::{Distance, Exit, NotANumber};

        assert_eq!(scan_line("30\n"), vec![Distance(30.0)]);
        assert_eq!(scan_line(" 0 "), vec![Distance(0.0)]);
        assert_eq!(scan_line("-0"), vec![Distance(-0.0)]);
        assert_eq!(scan_line("-1"), vec![Exit]);
        assert!(scan_line("\n").is_empty());
        assert_eq!(scan_line("abc"), vec![NotANumber]);
        assert_eq!(scan_line("NaN"), vec![NotANumber]);
        assert_eq!(scan_line("inf"), vec![NotANumber]);
    }

    #[test]
    fn test_scan_line_several_values_and_trailing_garbage() {
        use ManualInput::{Distance, Exit, NotANumber};

        assert_eq!(scan_line("30 40"), vec![Distance(30.0), Distance(40.0)]);
        assert_eq!(scan_line("12 cm 50"), vec![Distance(12.0), NotANumber]);
        assert_eq!(scan_line("12cm"), vec![Distance(12.0), NotANumber]);
        assert_eq!(scan_line("30-1 80"), vec![Distance(30.0), Exit]);
        assert_eq!(scan_line("1.5e2\t7.25"), vec![Distance(150.0), Distance(7.25)]);
    }

    #[test]
    fn test_manual_multiple_values_per_line() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();
        let mut input = Cursor::new("1\n30 40\n12cm 99\n-1\n");

        let summary = Session::new(&Config::default(), log.clone(), &clock, &mut out)
            .run(&mut input)
            .unwrap();

        assert_eq!(summary.readings, 3);
        let lines = log_lines(&log);
        assert_eq!(lines.len(), 4);
        assert!(lines[1].ends_with(",30.00"));
        assert!(lines[2].ends_with(",40.00"));
        assert!(lines[3].ends_with(",12.00"));

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Please enter a number.").count(), 1);
        assert!(!printed.contains("99.00"));
    }

    #[test]
    fn test_banner_keeps_indentation() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();

        Session::new(&Config::default(), log, &clock, &mut out)
            .run(&mut Cursor::new("1\n-1\n"))
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\n   ||  PARKING ASSISTANCE SIMULATOR  ||\n"));
    }

    #[test]
    fn test_manual_scenario_logs_one_reading() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();
        let mut input = Cursor::new("1\nabc\n30\n-1\n");

        let summary = Session::new(&Config::default(), log.clone(), &clock, &mut out)
            .run(&mut input)
            .unwrap();

        assert_eq!(summary.mode, SessionMode::Manual);
        assert_eq!(summary.readings, 1);
        assert_eq!(summary.persisted, 1);

        let lines = log_lines(&log);
        assert_eq!(lines, vec!["timestamp,distance_cm", "2025-01-02 03:04:05,30.00"]);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Please enter a number."));
        assert!(printed.contains("[2025-01-02 03:04:05] Distance: 30.00 cm -> STOP"));
        assert!(printed.contains(&format!("[{}{}]", "#".repeat(6), " ".repeat(34))));
        assert!(printed.contains("Exiting manual mode."));
        assert!(printed.contains("Simulation ended. Log file:"));
    }

    #[test]
    fn test_manual_end_of_input_ends_normally() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();
        let mut input = Cursor::new("1\n75\n150");

        let summary = Session::new(&Config::default(), log.clone(), &clock, &mut out)
            .run(&mut input)
            .unwrap();

        assert_eq!(summary.readings, 2);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("75.00 cm -> CAUTION"));
        assert!(printed.contains("150.00 cm -> SAFE"));
        assert_eq!(log_lines(&log).len(), 3);
    }

    #[test]
    fn test_invalid_choice_writes_nothing_to_log() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();

        let err = Session::new(&Config::default(), log.clone(), &clock, &mut out)
            .run(&mut Cursor::new("7\n30\n"))
            .unwrap_err();

        assert!(err.to_string().contains("Invalid choice"));
        // Header is still created before the prompt.
        assert_eq!(log_lines(&log), vec!["timestamp,distance_cm"]);
    }

    #[test]
    fn test_missing_choice_is_invalid_input() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();

        let err = Session::new(&Config::default(), log, &clock, &mut out)
            .run(&mut Cursor::new(""))
            .unwrap_err();

        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_unwritable_log_does_not_abort_session() {
        let dir = tempdir().unwrap();
        let log = ReadingLog::new(dir.path().join("missing-dir").join("log.csv"));
        let clock = FakeClock::at(2025, 1, 2, 3, 4, 5);
        let mut out = Vec::new();

        let summary = Session::new(&Config::default(), log, &clock, &mut out)
            .run(&mut Cursor::new("1\n30\n40\n-5\n"))
            .unwrap();

        assert_eq!(summary.readings, 2);
        assert_eq!(summary.persisted, 0);
    }

    #[test]
    fn test_automatic_runs_until_limit_and_paces_readings() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();

        let summary = Session::new(&auto_config(5), log.clone(), &clock, &mut out)
            .run(&mut Cursor::new("2\n"))
            .unwrap();

        assert_eq!(summary.mode, SessionMode::Automatic);
        assert_eq!(summary.readings, 5);
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(800); 4]);

        let lines = log_lines(&log);
        assert_eq!(lines.len(), 6);
        // Timestamps advance with each sleep.
        assert!(lines[1].starts_with("2025-01-02 03:04:05,"));
        assert!(lines[2].starts_with("2025-01-02 03:04:05,"));
        assert!(lines[3].starts_with("2025-01-02 03:04:06,"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Automatic simulation mode. Press Ctrl+C to stop."));
        assert_eq!(printed.matches(" cm -> ").count(), 5);
    }

    #[test]
    fn test_automatic_same_second_same_sequence() {
        let distances = |out: Vec<u8>| -> Vec<String> {
            String::from_utf8(out)
                .unwrap()
                .lines()
                .filter_map(|l| l.split("Distance: ").nth(1).map(str::to_string))
                .collect()
        };

        let (_dir_a, log_a, clock_a) = setup();
        let mut out_a = Vec::new();
        Session::new(&auto_config(20), log_a, &clock_a, &mut out_a)
            .run_mode(SessionMode::Automatic, &mut Cursor::new(""))
            .unwrap();

        let (_dir_b, log_b, clock_b) = setup();
        let mut out_b = Vec::new();
        Session::new(&auto_config(20), log_b, &clock_b, &mut out_b)
            .run_mode(SessionMode::Automatic, &mut Cursor::new(""))
            .unwrap();

        let a = distances(out_a);
        assert_eq!(a.len(), 20);
        assert_eq!(a, distances(out_b));
    }

    #[test]
    fn test_automatic_stops_when_interrupted() {
        let (_dir, log, clock) = setup();
        let mut out = Vec::new();

        interrupt::set_test_override(Some(true));
        let summary = Session::new(&Config::default(), log, &clock, &mut out)
            .run(&mut Cursor::new("2\n"))
            .unwrap();
        interrupt::reset();

        assert_eq!(summary.readings, 0);
        assert!(clock.sleeps().is_empty());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Interrupted."));
        assert!(printed.contains("Simulation ended."));
    }
}
