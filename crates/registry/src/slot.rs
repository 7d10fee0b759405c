//! Implementation chains.

use std::any::Any;

use crate::handler::{OpCall, OpImpl};
use crate::value::Value;

/// Ordered chain of implementations for one operation key.
///
/// The last element is active; earlier elements are previously active
/// implementations, reachable for delegation and restore. Never empty.
#[derive(Debug, Clone)]
pub(crate) struct OpSlot {
	chain: Vec<OpImpl>,
}

impl OpSlot {
	pub(crate) fn new(imp: OpImpl) -> Self {
		Self { chain: vec![imp] }
	}

	pub(crate) fn push(&mut self, imp: OpImpl) {
		self.chain.push(imp);
	}

	/// Pops the active implementation. Returns false when only the original
	/// remains.
	pub(crate) fn pop(&mut self) -> bool {
		if self.chain.len() <= 1 {
			return false;
		}
		self.chain.pop();
		true
	}

	pub(crate) fn depth(&self) -> usize {
		self.chain.len()
	}

	pub(crate) fn active(&self) -> &OpImpl {
		// Chain is never empty.
		&self.chain[self.chain.len() - 1]
	}

	/// Runs the active implementation with the chain exposed for delegation.
	pub(crate) fn invoke(&self, receiver: Option<&dyn Any>, args: &[Value]) -> Value {
		let depth = self.chain.len() - 1;
		let call = OpCall::new(receiver, args, &self.chain, depth);
		self.chain[depth].run(&call)
	}
}
