//! Operation declaration macros.

/// Declares a statically-registered operation on a target type.
///
/// The declaration is collected via `inventory` and becomes the operation's
/// original implementation in [`BehaviorRegistry::global`]. Method scope by
/// default; prefix with `assoc` for the type-scoped namespace.
///
/// ```ignore
/// operation!(Widget, render, |call| {
///     let widget = call.receiver::<Widget>().expect("widget receiver");
///     Value::from(widget.label.clone())
/// });
/// operation!(assoc Widget, default_label, |_call| Value::from("widget"));
/// ```
///
/// [`BehaviorRegistry::global`]: crate::BehaviorRegistry::global
#[macro_export]
macro_rules! operation {
	($target:ty, $name:ident, $handler:expr) => {
		$crate::operation!(@submit Method, $target, $name, $handler);
	};
	(assoc $target:ty, $name:ident, $handler:expr) => {
		$crate::operation!(@submit Assoc, $target, $name, $handler);
	};
	(@submit $scope:ident, $target:ty, $name:ident, $handler:expr) => {
		paste::paste! {
			#[allow(non_upper_case_globals)]
			static [<OP_ $scope _ $name>]: $crate::defs::OpDefStatic = $crate::defs::OpDefStatic {
				target: $crate::key::TargetId::of::<$target>,
				scope: $crate::key::OpScope::$scope,
				name: stringify!($name),
				crate_name: env!("CARGO_PKG_NAME"),
				handler: $handler,
			};

			inventory::submit!($crate::defs::OpDefReg(&[<OP_ $scope _ $name>]));
		}
	};
}
