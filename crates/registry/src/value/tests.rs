use std::collections::BTreeMap;

use super::*;

#[test]
fn test_accessors_match_variant() {
	assert_eq!(Value::from(true).as_bool(), Some(true));
	assert_eq!(Value::from(7).as_int(), Some(7));
	assert_eq!(Value::from(1.5).as_float(), Some(1.5));
	assert_eq!(Value::from("hi").as_str(), Some("hi"));
	assert!(Value::Null.is_null());

	let list = Value::from(vec![Value::from(1), Value::from(2)]);
	assert_eq!(list.as_list().map(<[Value]>::len), Some(2));
	let map = Value::from(BTreeMap::from([("k".to_string(), Value::Null)]));
	assert!(map.as_map().is_some_and(|m| m.contains_key("k")));

	// Cross-variant access yields None
	assert_eq!(Value::from(7).as_str(), None);
	assert_eq!(Value::from("hi").as_int(), None);
	assert_eq!(list.as_map(), None);
}

#[test]
fn test_type_name() {
	assert_eq!(Value::Null.type_name(), "null");
	assert_eq!(Value::from(1).type_name(), "int");
	assert_eq!(Value::List(vec![]).type_name(), "list");
}

#[test]
fn test_serde_untagged_shape() {
	let mut map = BTreeMap::new();
	map.insert("count".to_string(), Value::from(3));
	map.insert("label".to_string(), Value::from("a"));
	let value = Value::Map(map);

	let json = serde_json::to_string(&value).expect("serialize");
	assert_eq!(json, r#"{"count":3,"label":"a"}"#);

	let back: Value = serde_json::from_str(&json).expect("deserialize");
	assert_eq!(back, value);
}
