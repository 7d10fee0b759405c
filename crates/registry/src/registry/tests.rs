use super::*;
use crate::ext::Ext;
use crate::handler::OpCall;

struct Widget {
	ext: Ext,
	label: &'static str,
}

impl Widget {
	fn new(label: &'static str) -> Self {
		Self {
			ext: Ext::new(),
			label,
		}
	}
}

crate::impl_extended!(Widget, ext);

fn render(call: &OpCall<'_>) -> Value {
	let widget = call.receiver::<Widget>().expect("widget receiver");
	Value::from(format!("render:{}", widget.label))
}

fn render_plain(_call: &OpCall<'_>) -> Value {
	Value::from("plain")
}

#[test]
fn test_define_and_invoke() {
	let registry = BehaviorRegistry::new();
	assert!(registry.is_empty());
	registry.define_method::<Widget>("render", render).unwrap();

	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:a"));
	assert!(registry.contains::<Widget>(OpScope::Method, "render"));
	assert_eq!(registry.operation_count(), 1);
}

#[test]
fn test_swap_uses_new_impl() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	assert!(registry.swap_method::<Widget>("render", OpImpl::Static(render_plain)));

	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("plain"));
}

#[test]
fn test_swap_unknown_operation_rejected() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	assert!(!registry.swap_method::<Widget>("draw", OpImpl::Static(render_plain)));

	// Prior behavior unchanged
	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:a"));

	let err = registry.invoke(&widget, "draw", &[]).unwrap_err();
	match err {
		RegistryError::UnknownOperation { key } => {
			assert_eq!(key, OpKey::new::<Widget>(OpScope::Method, "draw"));
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn test_define_twice_rejected() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	let err = registry.define_method::<Widget>("render", render_plain).unwrap_err();
	assert!(matches!(err, RegistryError::AlreadyDefined { .. }));

	// Original implementation still active
	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:a"));
}

#[test]
fn test_swapped_impl_delegates_to_previous() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	let wrapped = OpImpl::shared(|call: &OpCall<'_>| {
		assert!(call.has_previous());
		let inner = call.call_previous().expect("previous impl");
		Value::from(format!("wrapped({})", inner.as_str().unwrap()))
	});
	assert!(registry.swap_method::<Widget>("render", wrapped));

	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("wrapped(render:a)"));
}

#[test]
fn test_restore_reactivates_previous() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();
	assert!(registry.swap_method::<Widget>("render", OpImpl::Static(render_plain)));

	assert!(registry.restore_method::<Widget>("render"));

	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:a"));

	// Nothing left to restore; unknown names are also rejected
	assert!(!registry.restore_method::<Widget>("render"));
	assert!(!registry.restore_method::<Widget>("draw"));
}

#[test]
fn test_assoc_namespace_disjoint_from_method() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();
	registry
		.define_assoc::<Widget>("render", |call| {
			assert!(call.receiver::<Widget>().is_none());
			Value::from("assoc")
		})
		.unwrap();
	assert_eq!(registry.operation_count(), 2);

	assert!(registry.swap_assoc::<Widget>("render", OpImpl::Static(render_plain)));

	// Method-scoped slot untouched by the assoc swap
	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:a"));
	let out = registry.invoke_assoc::<Widget>("render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("plain"));
}

#[test]
fn test_invoke_assoc_unknown_errors() {
	let registry = BehaviorRegistry::new();
	let err = registry.invoke_assoc::<Widget>("load", &[]).unwrap_err();
	assert!(matches!(err, RegistryError::UnknownOperation { .. }));
}

#[test]
fn test_args_reach_the_impl() {
	let registry = BehaviorRegistry::new();
	registry
		.define_method::<Widget>("resize", |call| {
			let by = call.arg(0).and_then(Value::as_int).unwrap_or(0);
			Value::from(by * 2)
		})
		.unwrap();

	let widget = Widget::new("a");
	let out = registry.invoke(&widget, "resize", &[Value::from(21)]).unwrap();
	assert_eq!(out.as_int(), Some(42));
}

#[test]
fn test_instance_swap_is_isolated() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	let first = Widget::new("a");
	let second = Widget::new("b");
	assert!(registry.swap_on(&first, "render", OpImpl::Static(render_plain)));

	let out = registry.invoke(&first, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("plain"));

	// The other instance still uses the type-level implementation
	let out = registry.invoke(&second, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("render:b"));
}

#[test]
fn test_instance_swap_requires_type_operation() {
	let registry = BehaviorRegistry::new();
	let widget = Widget::new("a");
	assert!(!registry.swap_on(&widget, "render", OpImpl::Static(render_plain)));
}

#[test]
fn test_instance_override_delegates_to_type_impl() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	let widget = Widget::new("a");
	let wrapped = OpImpl::shared(|call: &OpCall<'_>| {
		let inner = call.call_previous().expect("seeded type impl");
		Value::from(format!("mine({})", inner.as_str().unwrap()))
	});
	assert!(registry.swap_on(&widget, "render", wrapped));

	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("mine(render:a)"));
}

#[test]
fn test_instance_restore_falls_back_to_type_level() {
	let registry = BehaviorRegistry::new();
	registry.define_method::<Widget>("render", render).unwrap();

	let widget = Widget::new("a");
	assert!(registry.swap_on(&widget, "render", OpImpl::Static(render_plain)));
	assert!(registry.restore_on(&widget, "render"));

	// Back on the live type-level slot: a later type-level swap is visible
	assert!(registry.swap_method::<Widget>(
		"render",
		OpImpl::shared(|_call: &OpCall<'_>| Value::from("swapped-later")),
	));
	let out = registry.invoke(&widget, "render", &[]).unwrap();
	assert_eq!(out.as_str(), Some("swapped-later"));

	assert!(!registry.restore_on(&widget, "render"));
}

struct Gadget {
	ext: Ext,
}

crate::impl_extended!(Gadget, ext);

crate::operation!(Gadget, ping, |_call| Value::from("pong"));
crate::operation!(assoc Gadget, kind, |_call| Value::from("gadget"));

#[test]
fn test_global_registry_collects_static_defs() {
	let registry = BehaviorRegistry::global();
	let gadget = Gadget { ext: Ext::new() };

	let out = registry.invoke(&gadget, "ping", &[]).unwrap();
	assert_eq!(out.as_str(), Some("pong"));
	let out = registry.invoke_assoc::<Gadget>("kind", &[]).unwrap();
	assert_eq!(out.as_str(), Some("gadget"));
}
