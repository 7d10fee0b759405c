//! Type-keyed service registration and resolution.
//!
//! A [`ServiceContainer`] maps a service type to a constructor plus a
//! [`Lifetime`] policy deciding how long constructed instances are cached.
//! Providers are held as `Arc` and cloned out of the map lock before they
//! run, so a constructor may resolve other services recursively.

use std::any::{Any, TypeId};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;


/// How long a resolved service instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
	/// Constructed once, cached strongly for the container's lifetime.
	Singleton,
	/// Cached weakly; reconstructed after all external references drop.
	WeakSingleton,
	/// Constructed on every resolution.
	Transient,
}

/// Service container errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
	/// No provider registered for the requested type.
	#[error("no registration for {type_name}")]
	Unregistered {
		/// Requested service type.
		type_name: &'static str,
	},

	/// A provider produced a value of an unexpected type.
	#[error("provider for {type_name} produced a different type")]
	WrongType {
		/// Requested service type.
		type_name: &'static str,
	},
}

type AnyArc = Arc<dyn Any + Send + Sync>;

enum Cached {
	Empty,
	Strong(AnyArc),
	Weak(Weak<dyn Any + Send + Sync>),
}

struct Provider {
	lifetime: Lifetime,
	ctor: Box<dyn Fn() -> AnyArc + Send + Sync>,
	cached: Mutex<Cached>,
}

impl Provider {
	fn instance(&self) -> AnyArc {
		match self.lifetime {
			Lifetime::Transient => (self.ctor)(),
			Lifetime::Singleton => {
				let mut cached = self.cached.lock();
				match &*cached {
					Cached::Strong(instance) => instance.clone(),
					_ => {
						let instance = (self.ctor)();
						*cached = Cached::Strong(instance.clone());
						instance
					}
				}
			}
			Lifetime::WeakSingleton => {
				let mut cached = self.cached.lock();
				if let Cached::Weak(weak) = &*cached
					&& let Some(instance) = weak.upgrade()
				{
					return instance;
				}
				let instance = (self.ctor)();
				*cached = Cached::Weak(Arc::downgrade(&instance));
				instance
			}
		}
	}
}

/// Type-keyed service container with lifetime-aware caching.
pub struct ServiceContainer {
	providers: RwLock<FxHashMap<TypeId, Arc<Provider>>>,
}

impl Default for ServiceContainer {
	fn default() -> Self {
		Self::new()
	}
}

impl ServiceContainer {
	/// Creates an empty container.
	pub fn new() -> Self {
		Self {
			providers: RwLock::new(FxHashMap::default()),
		}
	}

	/// Process-wide container.
	pub fn global() -> &'static Self {
		static GLOBAL: OnceLock<ServiceContainer> = OnceLock::new();
		GLOBAL.get_or_init(ServiceContainer::new)
	}

	/// Registers a constructor for `T` under the given lifetime.
	///
	/// Re-registration replaces the provider and discards its cache.
	pub fn register<T, F>(&self, lifetime: Lifetime, ctor: F)
	where
		T: Send + Sync + 'static,
		F: Fn() -> T + Send + Sync + 'static,
	{
		let provider = Provider {
			lifetime,
			ctor: Box::new(move || Arc::new(ctor()) as AnyArc),
			cached: Mutex::new(Cached::Empty),
		};
		tracing::debug!(service = std::any::type_name::<T>(), ?lifetime, "service registered");
		self.providers
			.write()
			.insert(TypeId::of::<T>(), Arc::new(provider));
	}

	/// [`register`](Self::register) with [`Lifetime::Singleton`], the
	/// default lifetime.
	pub fn register_singleton<T, F>(&self, ctor: F)
	where
		T: Send + Sync + 'static,
		F: Fn() -> T + Send + Sync + 'static,
	{
		self.register(Lifetime::Singleton, ctor);
	}

	/// Resolves an instance of `T` according to its registered lifetime.
	pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ServiceError> {
		let provider = self
			.providers
			.read()
			.get(&TypeId::of::<T>())
			.cloned()
			.ok_or(ServiceError::Unregistered {
				type_name: std::any::type_name::<T>(),
			})?;
		provider
			.instance()
			.downcast::<T>()
			.map_err(|_| ServiceError::WrongType {
				type_name: std::any::type_name::<T>(),
			})
	}

	/// Returns true when a provider is registered for `T`.
	pub fn contains<T: 'static>(&self) -> bool {
		self.providers.read().contains_key(&TypeId::of::<T>())
	}

	/// Removes the provider for `T`. Returns false when none was registered.
	pub fn remove<T: 'static>(&self) -> bool {
		let removed = self.providers.write().remove(&TypeId::of::<T>()).is_some();
		if removed {
			tracing::debug!(service = std::any::type_name::<T>(), "service removed");
		}
		removed
	}

	/// Number of registered providers.
	pub fn len(&self) -> usize {
		self.providers.read().len()
	}

	/// Returns true when no provider is registered.
	pub fn is_empty(&self) -> bool {
		self.providers.read().is_empty()
	}
}
