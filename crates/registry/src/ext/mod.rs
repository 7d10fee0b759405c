//! Per-instance extension state.
//!
//! An [`Ext`] is embedded as a field in any type that participates in the
//! registry. It owns the two pieces of state that belong to a single
//! instance rather than to its type: the operation override table and the
//! user-info side table. Both die with the instance.

use std::sync::OnceLock;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::handler::OpImpl;
use crate::slot::OpSlot;
use crate::value::Value;


/// Per-instance user-info side table.
pub type UserInfo = FxHashMap<Box<str>, Value>;

/// Instance-owned extension state: operation overrides and user info.
///
/// The user-info table is created lazily on first write; reads on a fresh
/// instance see an empty mapping without allocating it.
#[derive(Debug, Default)]
pub struct Ext {
	overrides: RwLock<FxHashMap<Box<str>, OpSlot>>,
	user_info: OnceLock<Mutex<UserInfo>>,
}

impl Ext {
	/// Creates empty extension state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value stored under `key`, if any.
	pub fn user_info_get(&self, key: &str) -> Option<Value> {
		self.user_info.get()?.lock().get(key).cloned()
	}

	/// Stores `value` under `key`, creating the table on first write.
	pub fn user_info_set(&self, key: &str, value: impl Into<Value>) {
		self.user_info
			.get_or_init(|| Mutex::new(UserInfo::default()))
			.lock()
			.insert(Box::from(key), value.into());
	}

	/// Removes and returns the value stored under `key`.
	pub fn user_info_remove(&self, key: &str) -> Option<Value> {
		self.user_info.get()?.lock().remove(key)
	}

	/// Runs `f` against the user-info mapping.
	///
	/// A fresh instance is presented as an empty mapping.
	pub fn with_user_info<R>(&self, f: impl FnOnce(&UserInfo) -> R) -> R {
		match self.user_info.get() {
			Some(table) => f(&table.lock()),
			None => f(&UserInfo::default()),
		}
	}

	/// Clones the override slot for `name` out of the lock, so the caller
	/// can run it without holding instance state.
	pub(crate) fn override_slot(&self, name: &str) -> Option<OpSlot> {
		self.overrides.read().get(name).cloned()
	}

	/// Pushes an instance override, seeding a fresh chain with the
	/// type-level implementation active at swap time.
	pub(crate) fn push_override(&self, name: &str, seed: OpImpl, imp: OpImpl) {
		let mut overrides = self.overrides.write();
		match overrides.get_mut(name) {
			Some(slot) => slot.push(imp),
			None => {
				let mut slot = OpSlot::new(seed);
				slot.push(imp);
				overrides.insert(Box::from(name), slot);
			}
		}
	}

	/// Pops the active instance override for `name`.
	///
	/// When only the seed remains afterwards the entry is removed entirely,
	/// so type-level behavior (including later type-level swaps) shines
	/// through again.
	pub(crate) fn pop_override(&self, name: &str) -> bool {
		let mut overrides = self.overrides.write();
		let Some(slot) = overrides.get_mut(name) else {
			return false;
		};
		let popped = slot.pop();
		if popped && slot.depth() == 1 {
			overrides.remove(name);
		}
		popped
	}
}

/// Seam between the registry and types carrying an [`Ext`].
///
/// Implement via [`impl_extended!`](crate::impl_extended) for a type with an
/// `Ext` field.
pub trait Extended: std::any::Any {
	/// Returns the instance's extension state.
	fn ext(&self) -> &Ext;
}

/// Implements [`Extended`] for a type with an [`Ext`] field.
#[macro_export]
macro_rules! impl_extended {
	($ty:ty, $field:ident) => {
		impl $crate::ext::Extended for $ty {
			fn ext(&self) -> &$crate::ext::Ext {
				&self.$field
			}
		}
	};
}
