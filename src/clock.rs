use std::time::{Duration, Instant};

/// # Clock
/// A free running tick source.
///
/// Each tick's deadline is one period after the poll that observed the
/// previous one, so a late poller loses ticks instead of bursting through a
/// backlog of them.
#[derive(Debug, Clone)]
pub struct Clock {
    frequency: u32,
    tick_count: u64,
    next_tick: Option<Instant>,
}

impl Clock {
    /// # Arguments
    /// * `frequency` ticks per second; must be non-zero
    pub fn new(frequency: u32) -> Self {
        Clock {
            frequency,
            tick_count: 0,
            next_tick: None,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn period(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frequency.max(1)))
    }

    /// Arms the clock; the first tick is due one period from now
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.next_tick = Some(now + self.period());
    }

    /// Returns true at most once per elapsed deadline
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if now >= deadline => {
                self.tick_count += 1;
                self.next_tick = Some(now + self.period());
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick; zero if it is already due or the clock
    /// was never started
    pub fn remaining(&self) -> Duration {
        match self.next_tick {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(0),
        }
    }
}
