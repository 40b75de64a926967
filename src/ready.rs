//! Waiting on an external readiness signal with a bounded retry budget.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use crate::config::RetryPolicy;

/// The probe never succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotReady {
	pub attempts: u32,
}

/// Probe until it yields a value, sleeping between attempts per `policy`.
///
/// The probe runs once after `policy.initial_delay` and then at most
/// `policy.max_retries` more times, waiting `policy.delay_for(n)` before retry `n`.
/// `sleep` is injected so the same routine drives browser timers and tests.
pub async fn await_ready<T, P, S, F>(
	mut probe: P,
	policy: &RetryPolicy,
	mut sleep: S,
) -> Result<T, NotReady>
where
	P: FnMut() -> Option<T>,
	S: FnMut(Duration) -> F,
	F: Future<Output = ()>,
{
	if !policy.initial_delay.is_zero() {
		sleep(policy.initial_delay).await;
	}
	if let Some(found) = probe() {
		return Ok(found);
	}
	for attempt in 1..=policy.max_retries {
		let wait = policy.delay_for(attempt);
		debug!(
			"Attempt {} of {}: waiting {}ms",
			attempt,
			policy.max_retries,
			wait.as_millis()
		);
		sleep(wait).await;
		if let Some(found) = probe() {
			return Ok(found);
		}
	}
	let attempts = policy.max_retries + 1;
	warn!("Gave up after {} attempts", attempts);
	Err(NotReady { attempts })
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use futures::executor::block_on;

	use super::*;

	fn recorder(log: &RefCell<Vec<u128>>) -> impl FnMut(Duration) -> std::future::Ready<()> + '_ {
		move |d| {
			log.borrow_mut().push(d.as_millis());
			std::future::ready(())
		}
	}

	#[test]
	fn ready_on_first_probe_only_waits_initial_delay() {
		let waits = RefCell::new(Vec::new());
		let found = block_on(await_ready(
			|| Some(7),
			&RetryPolicy::default(),
			recorder(&waits),
		));
		assert_eq!(found, Ok(7));
		assert_eq!(*waits.borrow(), vec![200]);
	}

	#[test]
	fn succeeds_on_a_later_attempt() {
		let waits = RefCell::new(Vec::new());
		let mut calls = 0;
		let found = block_on(await_ready(
			|| {
				calls += 1;
				(calls == 3).then_some("container")
			},
			&RetryPolicy::default(),
			recorder(&waits),
		));
		assert_eq!(found, Ok("container"));
		assert_eq!(*waits.borrow(), vec![200, 500, 1000]);
	}

	#[test]
	fn gives_up_after_budget() {
		let waits = RefCell::new(Vec::new());
		let mut calls = 0u32;
		let result: Result<(), _> = block_on(await_ready(
			|| {
				calls += 1;
				None
			},
			&RetryPolicy::default(),
			recorder(&waits),
		));
		assert_eq!(result, Err(NotReady { attempts: 4 }));
		assert_eq!(calls, 4);
		assert_eq!(*waits.borrow(), vec![200, 500, 1000, 1500]);
	}
}
