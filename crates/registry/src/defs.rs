//! Static operation declarations collected at link time.

use crate::handler::OpHandler;
use crate::key::{OpScope, TargetId};

/// Static operation registration entry collected via `inventory`.
///
/// Declared with the [`operation!`](crate::operation) macro; seeds
/// [`BehaviorRegistry::global`](crate::BehaviorRegistry::global) with the
/// operation's original implementation.
pub struct OpDefStatic {
	/// Target type identity, deferred because `TypeId::of` is not const.
	pub target: fn() -> TargetId,
	/// Namespace the operation lives in.
	pub scope: OpScope,
	/// Operation name.
	pub name: &'static str,
	/// Crate that declared this operation.
	pub crate_name: &'static str,
	/// Original implementation.
	pub handler: OpHandler,
}

/// Wrapper for `inventory::collect!`.
pub struct OpDefReg(pub &'static OpDefStatic);

inventory::collect!(OpDefReg);
