//! Implementation callables and the invocation context.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// Function signature for statically-declared operation implementations.
pub type OpHandler = fn(&OpCall<'_>) -> Value;

/// A registered operation implementation.
#[derive(Clone)]
pub enum OpImpl {
	/// Compile-time function pointer (originals, `operation!` declarations).
	Static(OpHandler),
	/// Runtime closure registered through the swap API.
	Shared(Arc<dyn Fn(&OpCall<'_>) -> Value + Send + Sync>),
}

impl OpImpl {
	/// Wraps a closure as a shared runtime implementation.
	pub fn shared<F>(f: F) -> Self
	where
		F: Fn(&OpCall<'_>) -> Value + Send + Sync + 'static,
	{
		Self::Shared(Arc::new(f))
	}

	pub(crate) fn run(&self, call: &OpCall<'_>) -> Value {
		match self {
			OpImpl::Static(f) => f(call),
			OpImpl::Shared(f) => f(call),
		}
	}
}

impl From<OpHandler> for OpImpl {
	fn from(f: OpHandler) -> Self {
		Self::Static(f)
	}
}

impl fmt::Debug for OpImpl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OpImpl::Static(_) => f.write_str("OpImpl::Static(..)"),
			OpImpl::Shared(_) => f.write_str("OpImpl::Shared(..)"),
		}
	}
}

/// Invocation context passed to every implementation.
///
/// Carries the type-erased receiver (for method-scoped operations), the
/// argument slice, and the predecessor chain so a swapped-in implementation
/// can delegate to the one it replaced.
pub struct OpCall<'a> {
	receiver: Option<&'a dyn Any>,
	args: &'a [Value],
	chain: &'a [OpImpl],
	depth: usize,
}

impl<'a> OpCall<'a> {
	pub(crate) fn new(
		receiver: Option<&'a dyn Any>,
		args: &'a [Value],
		chain: &'a [OpImpl],
		depth: usize,
	) -> Self {
		Self {
			receiver,
			args,
			chain,
			depth,
		}
	}

	/// Returns the full argument slice.
	pub fn args(&self) -> &'a [Value] {
		self.args
	}

	/// Returns the argument at `idx`, if present.
	pub fn arg(&self, idx: usize) -> Option<&'a Value> {
		self.args.get(idx)
	}

	/// Downcasts the receiver to `T`.
	///
	/// `None` for assoc-scoped invocations or when the receiver is a
	/// different type.
	pub fn receiver<T: Any>(&self) -> Option<&'a T> {
		self.receiver?.downcast_ref::<T>()
	}

	/// Returns true when a predecessor implementation exists.
	pub fn has_previous(&self) -> bool {
		self.depth > 0
	}

	/// Invokes the implementation this one replaced, with the same receiver
	/// and arguments.
	///
	/// Returns `None` when this is the original implementation.
	pub fn call_previous(&self) -> Option<Value> {
		let depth = self.depth.checked_sub(1)?;
		let call = OpCall {
			receiver: self.receiver,
			args: self.args,
			chain: self.chain,
			depth,
		};
		Some(self.chain[depth].run(&call))
	}
}
