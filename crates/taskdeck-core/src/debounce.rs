use tracing::trace;

/// Handle for one scheduled settle. Only the most recent ticket is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// Coalesces rapid edits so only the last value inside the quiet window
/// propagates.
///
/// The caller owns the timer: every [`push`](Self::push) returns a ticket,
/// the caller arms a timer for `quiet_ms`, and hands the ticket back to
/// [`settle`](Self::settle) when it fires. Tickets superseded by a later
/// push settle to `None`, so intermediate values are dropped rather than
/// queued.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet_ms: u32,
    latest: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_ms: u32) -> Self {
        Self {
            quiet_ms,
            latest: 0,
            pending: None,
        }
    }

    pub fn quiet_ms(&self) -> u32 {
        self.quiet_ms
    }

    pub fn push(&mut self, value: T) -> DebounceTicket {
        self.latest += 1;
        self.pending = Some(value);
        trace!(ticket = self.latest, "debounce armed");
        DebounceTicket(self.latest)
    }

    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 != self.latest {
            trace!(ticket = ticket.0, latest = self.latest, "debounce superseded");
            return None;
        }
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.latest += 1;
        self.pending = None;
    }
}
