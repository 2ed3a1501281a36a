use tokio::sync::{Semaphore, SemaphorePermit};

use crate::{Error, Result};

/// Fail-fast admission budget for embedding inputs, one unit per text.
///
/// Units come back when the returned [`AdmissionPermit`] is dropped, so the budget can never
/// exceed its maximum.
#[derive(Debug)]
pub struct AdmissionLimiter {
	semaphore: Semaphore,
	max: usize,
}
impl AdmissionLimiter {
	pub fn new(max: usize) -> Self {
		let max = max.min(Semaphore::MAX_PERMITS);

		Self { semaphore: Semaphore::new(max), max }
	}

	/// Takes `units` from the budget or fails with `Overloaded` without waiting. A rejected
	/// request leaves the budget untouched.
	pub fn try_acquire(&self, units: usize) -> Result<AdmissionPermit<'_>> {
		let overloaded = || {
			let available = self.available();

			tracing::warn!(requested = units, available, "Embedding admission rejected.");

			Error::Overloaded { requested: units, available }
		};
		let Ok(n) = u32::try_from(units) else {
			return Err(overloaded());
		};
		let permit = self.semaphore.try_acquire_many(n).map_err(|_| overloaded())?;

		Ok(AdmissionPermit { _permit: permit, units })
	}

	pub fn available(&self) -> usize {
		self.semaphore.available_permits()
	}

	pub fn max(&self) -> usize {
		self.max
	}
}

/// Units held against an [`AdmissionLimiter`]; returned on drop.
#[derive(Debug)]
pub struct AdmissionPermit<'a> {
	_permit: SemaphorePermit<'a>,
	units: usize,
}
impl AdmissionPermit<'_> {
	pub fn units(&self) -> usize {
		self.units
	}
}
