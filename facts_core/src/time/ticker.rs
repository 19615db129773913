use facts_schema::Millis;

/// Fixed-interval schedule. Ticks are counted against deadlines, not
/// against how often the host happens to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    interval_ms: Millis,
    next_due: Millis,
}

impl Ticker {
    pub fn start(now: Millis, interval_ms: Millis) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            next_due: now + interval_ms,
        }
    }

    pub fn interval_ms(&self) -> Millis {
        self.interval_ms
    }

    pub fn next_due(&self) -> Millis {
        self.next_due
    }

    /// Number of deadlines passed since the last poll.
    pub fn poll(&mut self, now: Millis) -> u32 {
        if now < self.next_due {
            return 0;
        }
        let fired = (now - self.next_due) / self.interval_ms + 1;
        self.next_due += fired * self.interval_ms;
        u32::try_from(fired).unwrap_or(u32::MAX)
    }
}

/// The single live tick handle a session may own.
#[derive(Debug, Default)]
pub struct TickSlot {
    handle: Option<Ticker>,
}

impl TickSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh schedule, cancelling whatever was live.
    pub fn arm(&mut self, now: Millis, interval_ms: Millis) {
        self.cancel();
        self.handle = Some(Ticker::start(now, interval_ms));
    }

    /// Returns `true` only for the call that actually stopped a live handle.
    pub fn cancel(&mut self) -> bool {
        self.handle.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.handle.as_ref().map(Ticker::next_due)
    }

    pub fn poll(&mut self, now: Millis) -> u32 {
        self.handle.as_mut().map_or(0, |t| t.poll(now))
    }
}
