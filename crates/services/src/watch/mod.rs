//! Value cells that notify observers on replacement.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};


/// Identifies one observer of a [`Watched`] cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A value cell that notifies observers whenever the value is replaced.
///
/// Observers run on the thread performing the replacement and see the
/// cell's current value, which may already reflect a later replacement
/// racing on another thread. An observer may subscribe or unsubscribe, but
/// must not replace the value re-entrantly.
pub struct Watched<T> {
	value: RwLock<T>,
	observers: Mutex<Vec<(SubscriberId, Observer<T>)>>,
	next_id: AtomicU64,
}

impl<T> Watched<T> {
	/// Creates a cell holding `value` with no observers.
	pub fn new(value: T) -> Self {
		Self {
			value: RwLock::new(value),
			observers: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(0),
		}
	}

	/// Runs `f` against the current value.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.read())
	}

	/// Replaces the value and notifies observers.
	pub fn set(&self, value: T) {
		*self.value.write() = value;
		self.notify();
	}

	/// Mutates the value in place and notifies observers.
	pub fn update(&self, f: impl FnOnce(&mut T)) {
		{
			let mut value = self.value.write();
			f(&mut value);
		}
		self.notify();
	}

	/// Registers an observer; it runs after every replacement until
	/// unsubscribed.
	pub fn subscribe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> SubscriberId {
		let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.observers.lock().push((id, Arc::new(f)));
		id
	}

	/// Removes an observer. Returns false when the id is not subscribed.
	pub fn unsubscribe(&self, id: SubscriberId) -> bool {
		let mut observers = self.observers.lock();
		let before = observers.len();
		observers.retain(|(sid, _)| *sid != id);
		observers.len() != before
	}

	/// Number of registered observers.
	pub fn observer_count(&self) -> usize {
		self.observers.lock().len()
	}

	// Observers are cloned out of the lock so one may subscribe or
	// unsubscribe without deadlocking.
	fn notify(&self) {
		let observers: Vec<Observer<T>> = self
			.observers
			.lock()
			.iter()
			.map(|(_, observer)| observer.clone())
			.collect();
		let value = self.value.read();
		for observer in &observers {
			observer(&value);
		}
	}
}

impl<T: Clone> Watched<T> {
	/// Returns a clone of the current value.
	pub fn get(&self) -> T {
		self.value.read().clone()
	}
}

impl<T: Default> Default for Watched<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: fmt::Debug> fmt::Debug for Watched<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Watched")
			.field("value", &*self.value.read())
			.field("observers", &self.observer_count())
			.finish()
	}
}
