//! Interactive simulator command.

use std::io;

use anyhow::Result;
use parksim_core::config::Config;
use parksim_core::core::clock::SystemClock;
use parksim_core::core::interrupt;
use parksim_core::core::reading_log::ReadingLog;
use parksim_core::core::session::{Session, SessionMode};

pub fn run(config: &Config) -> Result<()> {
    let log = ReadingLog::new(&config.log_file);
    let stdout = io::stdout();
    let mut session = Session::new(config, log, SystemClock, stdout.lock());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mode = session.prompt_mode(&mut input)?;

    // Only the automatic loop polls the flag; elsewhere Ctrl+C keeps its
    // default behaviour and ends the process immediately.
    if mode == SessionMode::Automatic {
        if let Err(e) = interrupt::init() {
            tracing::warn!(error = %format!("{e:#}"), "interrupt handler unavailable");
        }
    }

    session.run_mode(mode, &mut input)?;
    Ok(())
}
