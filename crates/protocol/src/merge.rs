//! Parameter merging with explicit precedence.

use serde_json::{Map, Value};

/// Overlays `overrides` onto `defaults`, one level deep.
///
/// Keys present in `overrides` replace the matching default; keys missing
/// from `overrides` keep their default. Keys only present in `overrides` are
/// added. A non-object `overrides` (including `null`) leaves `defaults` as is,
/// and a non-object `defaults` is treated as empty.
pub fn merge_params(defaults: Value, overrides: Value) -> Value {
	let mut merged = match defaults {
		Value::Object(map) => map,
		_ => Map::new(),
	};

	if let Value::Object(overrides) = overrides {
		for (key, value) in overrides {
			merged.insert(key, value);
		}
	}

	Value::Object(merged)
}
