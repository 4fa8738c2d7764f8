use core::fmt;
use serde::{Deserialize, Serialize};

/// Advisory per-round timer, advanced by the embedding once per second.
///
/// It never influences reveal logic, only the score of a won round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    elapsed_seconds: u32,
    running: bool,
}

impl RoundTimer {
    pub fn start(&mut self) {
        self.elapsed_seconds = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances by one second; ignored while stopped.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }
}

/// Formats seconds as `m:ss`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerDisplay(pub u32);

impl fmt::Display for TimerDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn ticks_only_while_running() {
        let mut timer = RoundTimer::default();
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 0);

        timer.start();
        timer.tick();
        timer.tick();
        timer.stop();
        timer.tick();

        assert_eq!(timer.elapsed_seconds(), 2);
        assert!(!timer.is_running());
    }

    #[test]
    fn restart_resets_elapsed() {
        let mut timer = RoundTimer::default();
        timer.start();
        timer.tick();
        timer.start();

        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn displays_minutes_and_seconds() {
        assert_eq!(TimerDisplay(0).to_string(), "0:00");
        assert_eq!(TimerDisplay(65).to_string(), "1:05");
        assert_eq!(TimerDisplay(600).to_string(), "10:00");
    }
}
