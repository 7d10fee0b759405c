//! Slot storage and the define/swap/invoke surface.
//!
//! Registry state is an immutable snapshot behind [`ArcSwap`]: readers load
//! the current snapshot and never block, writers publish a modified clone
//! through a compare-and-swap loop. A reader therefore observes either the
//! full previous chain or the full new chain for a key, never a partial
//! slot.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::defs::OpDefReg;
use crate::error::RegistryError;
use crate::ext::Extended;
use crate::handler::{OpHandler, OpImpl};
use crate::key::{OpKey, OpScope, TargetId};
use crate::slot::OpSlot;
use crate::value::Value;

#[cfg(test)]
mod tests;

#[derive(Clone, Default)]
struct OpsSnapshot {
	tables: FxHashMap<(TargetId, OpScope), FxHashMap<Box<str>, OpSlot>>,
}

impl OpsSnapshot {
	fn slot(&self, target: TargetId, scope: OpScope, name: &str) -> Option<&OpSlot> {
		self.tables.get(&(target, scope))?.get(name)
	}

	fn slot_mut(&mut self, target: TargetId, scope: OpScope, name: &str) -> Option<&mut OpSlot> {
		self.tables.get_mut(&(target, scope))?.get_mut(name)
	}

	/// Inserts a fresh slot. Returns false if the key was already present.
	fn insert(&mut self, target: TargetId, scope: OpScope, name: &str, slot: OpSlot) -> bool {
		let table = self.tables.entry((target, scope)).or_default();
		if table.contains_key(name) {
			return false;
		}
		table.insert(Box::from(name), slot);
		true
	}
}

/// Associative store mapping operation keys to implementation chains.
pub struct BehaviorRegistry {
	snap: ArcSwap<OpsSnapshot>,
}

impl Default for BehaviorRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl BehaviorRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(OpsSnapshot::default()),
		}
	}

	/// Process-wide registry, seeded from `operation!` declarations.
	pub fn global() -> &'static Self {
		static GLOBAL: OnceLock<BehaviorRegistry> = OnceLock::new();
		GLOBAL.get_or_init(|| {
			let registry = BehaviorRegistry::new();
			for reg in inventory::iter::<OpDefReg> {
				let def = reg.0;
				let result = registry.define_impl(
					(def.target)(),
					def.scope,
					def.name,
					OpImpl::Static(def.handler),
				);
				if let Err(e) = result {
					tracing::error!(crate_name = def.crate_name, "static operation registration failed: {e}");
				}
			}
			registry
		})
	}

	/// Clone-modify-publish loop. `apply` may run more than once when
	/// writers race; an `Err` return publishes nothing.
	fn mutate<T>(
		&self,
		apply: impl Fn(&mut OpsSnapshot) -> Result<T, RegistryError>,
	) -> Result<T, RegistryError> {
		loop {
			let cur = self.snap.load_full();
			let mut next = (*cur).clone();
			let out = apply(&mut next)?;
			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				return Ok(out);
			}
		}
	}

	/// Registers the original implementation for an operation key.
	pub fn define<T: 'static>(
		&self,
		scope: OpScope,
		name: &str,
		handler: OpHandler,
	) -> Result<(), RegistryError> {
		self.define_impl(TargetId::of::<T>(), scope, name, OpImpl::Static(handler))
	}

	/// [`define`](Self::define) in the method namespace.
	pub fn define_method<T: 'static>(&self, name: &str, handler: OpHandler) -> Result<(), RegistryError> {
		self.define::<T>(OpScope::Method, name, handler)
	}

	/// [`define`](Self::define) in the assoc namespace.
	pub fn define_assoc<T: 'static>(&self, name: &str, handler: OpHandler) -> Result<(), RegistryError> {
		self.define::<T>(OpScope::Assoc, name, handler)
	}

	pub(crate) fn define_impl(
		&self,
		target: TargetId,
		scope: OpScope,
		name: &str,
		imp: OpImpl,
	) -> Result<(), RegistryError> {
		self.mutate(|snap| {
			if snap.insert(target, scope, name, OpSlot::new(imp.clone())) {
				Ok(())
			} else {
				Err(RegistryError::AlreadyDefined {
					key: OpKey::from_parts(target, scope, name),
				})
			}
		})?;
		tracing::debug!(target_type = target.type_name(), %scope, name, "operation defined");
		Ok(())
	}

	/// Pushes `imp` as the new active implementation for an operation key.
	///
	/// Fails with [`RegistryError::UnknownOperation`] if the key was never
	/// defined; the prior behavior is left untouched in that case.
	pub fn try_swap<T: 'static>(
		&self,
		scope: OpScope,
		name: &str,
		imp: OpImpl,
	) -> Result<(), RegistryError> {
		let target = TargetId::of::<T>();
		self.mutate(|snap| match snap.slot_mut(target, scope, name) {
			Some(slot) => {
				slot.push(imp.clone());
				Ok(())
			}
			None => Err(RegistryError::UnknownOperation {
				key: OpKey::from_parts(target, scope, name),
			}),
		})?;
		tracing::debug!(target_type = target.type_name(), %scope, name, "operation swapped");
		Ok(())
	}

	/// Boolean form of [`try_swap`](Self::try_swap) in the method namespace.
	pub fn swap_method<T: 'static>(&self, name: &str, imp: OpImpl) -> bool {
		self.swap_bool::<T>(OpScope::Method, name, imp)
	}

	/// Boolean form of [`try_swap`](Self::try_swap) in the assoc namespace.
	pub fn swap_assoc<T: 'static>(&self, name: &str, imp: OpImpl) -> bool {
		self.swap_bool::<T>(OpScope::Assoc, name, imp)
	}

	fn swap_bool<T: 'static>(&self, scope: OpScope, name: &str, imp: OpImpl) -> bool {
		match self.try_swap::<T>(scope, name, imp) {
			Ok(()) => true,
			Err(e) => {
				tracing::warn!("rejected swap: {e}");
				false
			}
		}
	}

	/// Pops the active implementation, reactivating its predecessor.
	///
	/// Returns false when nothing was ever swapped for the key, or the key
	/// is unknown.
	pub fn restore<T: 'static>(&self, scope: OpScope, name: &str) -> bool {
		let target = TargetId::of::<T>();
		let restored = self.mutate(|snap| match snap.slot_mut(target, scope, name) {
			Some(slot) => Ok(slot.pop()),
			None => Err(RegistryError::UnknownOperation {
				key: OpKey::from_parts(target, scope, name),
			}),
		});
		match restored {
			Ok(popped) => popped,
			Err(e) => {
				tracing::warn!("rejected restore: {e}");
				false
			}
		}
	}

	/// [`restore`](Self::restore) in the method namespace.
	pub fn restore_method<T: 'static>(&self, name: &str) -> bool {
		self.restore::<T>(OpScope::Method, name)
	}

	/// [`restore`](Self::restore) in the assoc namespace.
	pub fn restore_assoc<T: 'static>(&self, name: &str) -> bool {
		self.restore::<T>(OpScope::Assoc, name)
	}

	/// Pushes an instance-scoped override on `recv` only.
	///
	/// The fresh override chain is seeded with the type-level implementation
	/// active right now, so the override can delegate to it and
	/// [`restore_on`](Self::restore_on) falls back to it. Returns false when
	/// the operation is not defined at type level.
	pub fn swap_on<T: Extended>(&self, recv: &T, name: &str, imp: OpImpl) -> bool {
		let target = TargetId::of::<T>();
		let snap = self.snap.load_full();
		let Some(slot) = snap.slot(target, OpScope::Method, name) else {
			let key = OpKey::from_parts(target, OpScope::Method, name);
			tracing::warn!("rejected instance swap: unknown operation: {key}");
			return false;
		};
		recv.ext().push_override(name, slot.active().clone(), imp);
		tracing::debug!(target_type = target.type_name(), name, "instance operation swapped");
		true
	}

	/// Pops the active instance override on `recv`.
	///
	/// When the last override is popped the instance entry disappears and
	/// type-level behavior shines through again.
	pub fn restore_on<T: Extended>(&self, recv: &T, name: &str) -> bool {
		recv.ext().pop_override(name)
	}

	/// Invokes a method-scoped operation on `recv`.
	///
	/// Two-level lookup: the instance override table first, then the
	/// type-level table.
	pub fn invoke<T: Extended>(
		&self,
		recv: &T,
		name: &str,
		args: &[Value],
	) -> Result<Value, RegistryError> {
		if let Some(slot) = recv.ext().override_slot(name) {
			return Ok(slot.invoke(Some(recv as &dyn Any), args));
		}
		let target = TargetId::of::<T>();
		let snap = self.snap.load_full();
		match snap.slot(target, OpScope::Method, name) {
			Some(slot) => Ok(slot.invoke(Some(recv as &dyn Any), args)),
			None => Err(RegistryError::UnknownOperation {
				key: OpKey::from_parts(target, OpScope::Method, name),
			}),
		}
	}

	/// Invokes an assoc-scoped operation. No receiver.
	pub fn invoke_assoc<T: 'static>(&self, name: &str, args: &[Value]) -> Result<Value, RegistryError> {
		let target = TargetId::of::<T>();
		let snap = self.snap.load_full();
		match snap.slot(target, OpScope::Assoc, name) {
			Some(slot) => Ok(slot.invoke(None, args)),
			None => Err(RegistryError::UnknownOperation {
				key: OpKey::from_parts(target, OpScope::Assoc, name),
			}),
		}
	}

	/// Returns true when an operation is defined for `T` in `scope`.
	pub fn contains<T: 'static>(&self, scope: OpScope, name: &str) -> bool {
		self.snap
			.load()
			.slot(TargetId::of::<T>(), scope, name)
			.is_some()
	}

	/// Number of defined operation keys across all targets.
	pub fn operation_count(&self) -> usize {
		self.snap.load().tables.values().map(|table| table.len()).sum()
	}

	/// Returns true when no operation is defined.
	pub fn is_empty(&self) -> bool {
		self.operation_count() == 0
	}
}
