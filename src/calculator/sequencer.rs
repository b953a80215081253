use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket identifying one recalculation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Last-write-wins guard for debounced recalculation
///
/// Each request takes a ticket with [`RecalcSequencer::next`]; when its result
/// comes back, the caller keeps it only if [`RecalcSequencer::is_current`]
/// still holds. The calculator itself has no notion of cancellation.
#[derive(Debug, Default)]
pub struct RecalcSequencer {
    latest: AtomicU64,
}

impl RecalcSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn current(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    pub fn is_current(&self, ticket: Generation) -> bool {
        self.current() == ticket
    }

    /// Run `f` only if `ticket` has not been superseded
    pub fn accept<T>(&self, ticket: Generation, value: T, f: impl FnOnce(T)) -> bool {
        if self.is_current(ticket) {
            f(value);
            true
        } else {
            false
        }
    }
}
