use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stamp handed out when a request starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Orders overlapping requests so only the newest response is applied.
///
/// Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct RequestGeneration(Arc<AtomicU64>);

impl RequestGeneration {
	/// Starts a new generation, superseding every earlier ticket.
	pub fn begin(&self) -> Ticket {
		Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.0.load(Ordering::SeqCst) == ticket.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn later_requests_supersede_earlier_ones() {
		let generation = RequestGeneration::default();
		let first = generation.begin();
		assert!(generation.is_current(first));
		let second = generation.clone().begin();
		assert!(!generation.is_current(first));
		assert!(generation.is_current(second));
	}
}
