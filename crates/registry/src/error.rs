//! Behavior registry errors.

use crate::key::OpKey;

/// Errors surfaced by [`BehaviorRegistry`](crate::BehaviorRegistry).
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
	/// The operation was never defined for the target.
	#[error("unknown operation: {key}")]
	UnknownOperation {
		/// Key the lookup was performed with.
		key: OpKey,
	},

	/// The operation key already has an original implementation.
	#[error("operation already defined: {key}")]
	AlreadyDefined {
		/// Key the definition collided on.
		key: OpKey,
	},
}
