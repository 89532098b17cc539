use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Chip8Error, Result};

/// A request to stop the machine, shareable with other threads (a signal
/// handler, a UI thread, ...). The machine notices it at the next tick.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        StopHandle(Arc::new(AtomicBool::new(false)))
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Ready,
    Stopped,
}

/// # Clock
/// Paces the machine at a fixed frequency. Each tick gates exactly one
/// instruction.
///
/// Deadlines are kept on the monotonic clock. If the machine falls behind
/// (a blocking key wait, a slow render) the next deadline is re-anchored to now
/// rather than letting a backlog of ticks fire back to back.
#[derive(Debug)]
pub struct Clock {
    period: Duration,
    next_tick: Option<Instant>,
    stop: StopHandle,
}

impl Clock {
    /// A clock ticking `frequency` times per second.
    pub fn new(frequency: u32) -> Result<Self> {
        if frequency == 0 {
            return Err(Chip8Error::InvalidClockSpeed(frequency));
        }
        Ok(Clock {
            period: Duration::from_secs(1) / frequency,
            next_tick: None,
            stop: StopHandle::new(),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Blocks until the next tick. The first tick fires immediately.
    ///
    /// A stop request is checked before and after sleeping, and a sleep never
    /// lasts longer than one period, so a request is honoured within a tick.
    pub fn wait_tick(&mut self) -> Tick {
        if self.stop.is_stopped() {
            return Tick::Stopped;
        }

        let now = Instant::now();
        let deadline = match self.next_tick {
            Some(deadline) if deadline > now => deadline,
            _ => now,
        };
        if deadline > now {
            thread::sleep(deadline - now);
        }
        self.next_tick = Some(deadline + self.period);

        if self.stop.is_stopped() {
            Tick::Stopped
        } else {
            Tick::Ready
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_frequency() {
        assert!(matches!(
            Clock::new(0),
            Err(Chip8Error::InvalidClockSpeed(0))
        ));
    }

    #[test]
    fn test_period() {
        let clock = Clock::new(500).unwrap();
        assert_eq!(clock.period(), Duration::from_millis(2));
    }

    #[test]
    fn test_ticks_are_paced() {
        let mut clock = Clock::new(100).unwrap();
        let start = Instant::now();
        for _ in 0..4 {
            assert_eq!(clock.wait_tick(), Tick::Ready);
        }
        // first tick is immediate, the following three wait 10ms each
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_falling_behind_does_not_burst() {
        let mut clock = Clock::new(100).unwrap();
        assert_eq!(clock.wait_tick(), Tick::Ready);
        // miss several deadlines
        thread::sleep(Duration::from_millis(50));

        let mark = Instant::now();
        assert_eq!(clock.wait_tick(), Tick::Ready);
        assert_eq!(clock.wait_tick(), Tick::Ready);
        assert!(mark.elapsed() >= clock.period());
    }

    #[test]
    fn test_stop_observed_at_next_tick() {
        let mut clock = Clock::new(1_000).unwrap();
        assert_eq!(clock.wait_tick(), Tick::Ready);
        clock.stop_handle().stop();
        assert_eq!(clock.wait_tick(), Tick::Stopped);
    }

    #[test]
    fn test_stop_from_another_thread() {
        let mut clock = Clock::new(1_000).unwrap();
        let handle = clock.stop_handle();
        thread::spawn(move || handle.stop()).join().unwrap();
        assert_eq!(clock.wait_tick(), Tick::Stopped);
    }
}
