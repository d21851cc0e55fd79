use std::time::{Duration, Instant};

/// Quiet period before typed filter text is committed.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Input buffer that commits its value after a quiet period.
///
/// Every edit restarts the timer; `poll` hands out the buffer once the
/// timer has run out. Time is passed in so the caller owns the clock.
#[derive(Debug, Clone)]
pub struct Debouncer {
    buffer: String,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            buffer: String::new(),
            delay,
            deadline: None,
        }
    }

    /// Start from an already committed value without scheduling a commit.
    pub fn with_value(delay: Duration, value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            delay,
            deadline: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.buffer.push(c);
        self.touch(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.buffer.pop().is_some() {
            self.touch(now);
        }
    }

    pub fn set(&mut self, value: &str, now: Instant) {
        self.buffer = value.to_string();
        self.touch(now);
    }

    pub fn clear(&mut self, now: Instant) {
        if !self.buffer.is_empty() {
            self.buffer.clear();
            self.touch(now);
        }
    }

    fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Commit the buffer if the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(self.buffer.clone())
            }
            _ => None,
        }
    }

    /// Commit a pending value now, without waiting.
    pub fn flush(&mut self) -> Option<String> {
        self.deadline.take().map(|_| self.buffer.clone())
    }

    /// Time left until the pending commit, if any.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}
