//! Runtime substitution of operation implementations.
//!
//! A [`BehaviorRegistry`] maps (target type, namespace, operation name) keys
//! to chains of callables. The chain tail is the active implementation;
//! swapping pushes a replacement that can still reach its predecessor through
//! [`OpCall::call_previous`], and restoring pops it again. Per-instance
//! overrides and the user-info side table hang off an [`Ext`] embedded in the
//! participating type.
//!
//! # Modules
//!
//! - [`registry`] - Slot storage and the define/swap/invoke surface
//! - [`ext`] - Per-instance override state and the user-info side table
//! - [`handler`] - Implementation callables and the invocation context
//! - [`value`] - Plain-data values crossing operation boundaries
//! - [`key`] - Operation keys and target identity
//! - [`defs`] - Static operation declarations collected via `inventory`

pub mod defs;
pub mod error;
pub mod ext;
pub mod handler;
pub mod key;
mod macros;
pub mod registry;
mod slot;
pub mod value;

pub use error::RegistryError;
pub use ext::{Ext, Extended, UserInfo};
pub use handler::{OpCall, OpHandler, OpImpl};
pub use key::{OpKey, OpScope, TargetId};
pub use registry::BehaviorRegistry;
pub use value::Value;
