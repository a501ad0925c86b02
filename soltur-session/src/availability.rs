use soltur_core::DateRange;
use tracing::debug;

/// Generation captured when a fetch is issued. A response is applied only if
/// its ticket still matches the state's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Reconciled availability plus the staleness guard for in-flight fetches.
///
/// Every refresh bumps the generation; responses arriving for an older
/// generation are discarded, which stays correct even when requests complete
/// out of order.
#[derive(Debug, Default)]
pub struct AvailabilityState {
    ranges: Vec<DateRange>,
    generation: u64,
}

impl AvailabilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a new fetch, invalidating all earlier tickets.
    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Install fetched ranges if the ticket is still current. Returns whether
    /// the response was applied.
    pub fn apply(&mut self, ticket: FetchTicket, ranges: Vec<DateRange>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale availability response"
            );
            return false;
        }
        self.ranges = ranges;
        true
    }

    pub fn ranges(&self) -> &[DateRange] {
        &self.ranges
    }
}
