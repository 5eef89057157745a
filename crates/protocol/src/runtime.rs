//! `Runtime` domain: expression evaluation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::method::{Command, Method};

/// `Runtime.evaluate` parameters.
///
/// Fields left as `None` are omitted from the request. Anything the typed
/// fields do not cover can be passed through [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluate {
	pub expression: String,
	/// Exposes command line API helpers (`$0`, `require`, ...) to the expression.
	#[serde(
		rename = "includeCommandLineAPI",
		skip_serializing_if = "Option::is_none"
	)]
	pub include_command_line_api: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub object_group: Option<String>,
	/// Suppresses exception reporting to the console.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub silent: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub context_id: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub return_by_value: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub generate_preview: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub await_promise: Option<bool>,
	/// Evaluation timeout in milliseconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timeout: Option<f64>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Evaluate {
	pub fn new(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			..Self::default()
		}
	}

	pub fn include_command_line_api(mut self, include: bool) -> Self {
		self.include_command_line_api = Some(include);
		self
	}

	pub fn return_by_value(mut self, by_value: bool) -> Self {
		self.return_by_value = Some(by_value);
		self
	}

	pub fn await_promise(mut self, await_promise: bool) -> Self {
		self.await_promise = Some(await_promise);
		self
	}

	pub fn silent(mut self, silent: bool) -> Self {
		self.silent = Some(silent);
		self
	}

	pub fn context_id(mut self, context_id: i64) -> Self {
		self.context_id = Some(context_id);
		self
	}

	pub fn timeout(mut self, timeout_ms: f64) -> Self {
		self.timeout = Some(timeout_ms);
		self
	}

	/// Adds a raw parameter not covered by the typed fields.
	pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}
}

impl From<&str> for Evaluate {
	fn from(expression: &str) -> Self {
		Self::new(expression)
	}
}

impl From<String> for Evaluate {
	fn from(expression: String) -> Self {
		Self::new(expression)
	}
}

impl Command for Evaluate {
	const METHOD: Method = Method::RuntimeEvaluate;
	type Response = EvaluateResponse;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
	pub result: RemoteObject,
	#[serde(default)]
	pub exception_details: Option<ExceptionDetails>,
}

/// JavaScript type tag of a [`RemoteObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteObjectType {
	Object,
	Function,
	Undefined,
	String,
	Number,
	Boolean,
	Symbol,
	Bigint,
	#[serde(other)]
	Other,
}

/// Mirror of a value living in the inspected context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub kind: RemoteObjectType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subtype: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	/// Primitive value, or the JSON form of the object when requested by value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
	/// String form of values JSON cannot carry (`NaN`, `-0`, bigints).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unserializable_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub object_id: Option<String>,
}

/// Details of an exception thrown during evaluation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	#[serde(default)]
	pub exception_id: i64,
	pub text: String,
	#[serde(default)]
	pub line_number: i64,
	#[serde(default)]
	pub column_number: i64,
	#[serde(default)]
	pub script_id: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub exception: Option<RemoteObject>,
	#[serde(default)]
	pub execution_context_id: Option<i64>,
}

impl ExceptionDetails {
	/// The thrown value's description (e.g. `ReferenceError: x is not defined`
	/// plus its stack), falling back to the summary text.
	pub fn message(&self) -> &str {
		self.exception
			.as_ref()
			.and_then(|e| e.description.as_deref())
			.unwrap_or(&self.text)
	}
}
