//! Timer host
//!
//! Runs the joystick and game-check ticks serially on the calling thread until
//! the shutdown flag drops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::focus_detector::WindowSystem;
use crate::input_simulator::Pointer;
use crate::joystick::Joystick;
use crate::supervisor::ControlSupervisor;

/// A periodic timer polled by the host loop
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// First fire one period after `start`
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Whether the timer fires at `now`. Missed periods collapse into one fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

/// Owns the backends and the supervisor, and delivers both ticks
pub struct Host<J, P, W> {
    joystick: J,
    pointer: P,
    windows: W,
    supervisor: ControlSupervisor,
    joystick_timer: Ticker,
    game_check_timer: Ticker,
}

impl<J, P, W> Host<J, P, W>
where
    J: Joystick,
    P: Pointer,
    W: WindowSystem,
{
    /// Capture the desktop anchors and arm both timers
    pub fn new(config: &Config, joystick: J, pointer: P, windows: W) -> Self {
        let supervisor = ControlSupervisor::new(windows.desktop_anchors());
        let now = Instant::now();

        Self {
            joystick,
            pointer,
            windows,
            supervisor,
            joystick_timer: Ticker::new(config.joystick_period, now),
            game_check_timer: Ticker::new(config.game_check_period, now),
        }
    }

    pub fn supervisor(&self) -> &ControlSupervisor {
        &self.supervisor
    }

    /// Fire whichever timers are due at `now`
    pub fn dispatch(&mut self, now: Instant) {
        if self.game_check_timer.poll(now) {
            self.supervisor
                .game_check_tick(&self.windows, &mut self.pointer);
        }
        if self.joystick_timer.poll(now) {
            self.supervisor
                .joystick_tick(&mut self.joystick, &mut self.pointer);
        }
    }

    /// Run until `running` is cleared, then release held buttons
    pub fn run(mut self, running: &AtomicBool) {
        info!("Control loop running");

        while running.load(Ordering::SeqCst) {
            self.dispatch(Instant::now());

            let next = self
                .joystick_timer
                .next_due()
                .min(self.game_check_timer.next_due());
            thread::sleep(next.saturating_duration_since(Instant::now()));
        }

        info!("Control loop stopped");
        self.supervisor.shutdown(&mut self.pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_waits_one_period() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(500), start);
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(499)));
        assert!(ticker.poll(start + Duration::from_millis(500)));
        assert!(!ticker.poll(start + Duration::from_millis(501)));
        assert_eq!(ticker.next_due(), start + Duration::from_millis(1000));
    }

    #[test]
    fn test_ticker_coalesces_missed_periods() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(16), start);
        let late = start + Duration::from_millis(200);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.next_due(), late + Duration::from_millis(16));
    }
}
