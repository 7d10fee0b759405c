//! Operation keys and target identity.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace an operation lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpScope {
	/// Instance-scoped operation, invoked with a receiver.
	Method,
	/// Type-scoped operation, invoked on the type itself with no receiver.
	Assoc,
}

impl fmt::Display for OpScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OpScope::Method => f.write_str("method"),
			OpScope::Assoc => f.write_str("assoc"),
		}
	}
}

/// Identity of a target type.
///
/// Equality and hashing use the `TypeId` alone; the type name is carried for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TargetId {
	id: TypeId,
	name: &'static str,
}

impl TargetId {
	/// Captures the identity of `T`.
	pub fn of<T: 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// Returns the full type name captured at construction.
	pub fn type_name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TargetId {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TargetId {}

impl Hash for TargetId {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

/// Key identifying one swappable behavior slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpKey {
	/// Target type the operation is registered on.
	pub target: TargetId,
	/// Namespace the operation lives in.
	pub scope: OpScope,
	/// Operation name.
	pub name: Box<str>,
}

impl OpKey {
	/// Builds the key for an operation on `T`.
	pub fn new<T: 'static>(scope: OpScope, name: &str) -> Self {
		Self {
			target: TargetId::of::<T>(),
			scope,
			name: Box::from(name),
		}
	}

	pub(crate) fn from_parts(target: TargetId, scope: OpScope, name: &str) -> Self {
		Self {
			target,
			scope,
			name: Box::from(name),
		}
	}
}

impl fmt::Display for OpKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}::{} [{}]", self.target.type_name(), self.name, self.scope)
	}
}
