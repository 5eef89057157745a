//! Expression evaluation for [`Diagnostics`].

use ndiag_protocol::{Evaluate, Method, RemoteObject, merge_params};
use ndiag_runtime::{Error, Result};
use serde_json::json;

use super::Diagnostics;
use crate::validator::Target;

impl Diagnostics {
	/// Evaluates an expression in the target context.
	///
	/// The request starts from the configured defaults
	/// (`includeCommandLineAPI`) and any field the caller set overrides them.
	///
	/// # Errors
	///
	/// A thrown exception surfaces as [`Error::Protocol`] whose message is the
	/// engine's own description of it, e.g. `ReferenceError: x is not defined`.
	pub async fn evaluate(
		&self,
		target: impl Into<Target>,
		request: impl Into<Evaluate>,
	) -> Result<RemoteObject> {
		let target = target.into();
		let channel = self.resolve(&target)?;
		let request = self.with_evaluate_defaults(request.into())?;
		tracing::debug!(%target, expression = %request.expression, "Evaluating expression");

		let response = channel.send(request).await?;
		match response.exception_details {
			Some(details) => Err(Error::protocol(Method::RuntimeEvaluate, details.message())),
			None => Ok(response.result),
		}
	}

	fn with_evaluate_defaults(&self, request: Evaluate) -> Result<Evaluate> {
		let defaults = json!({
			"includeCommandLineAPI": self.config.include_command_line_api,
		});
		let merged = merge_params(defaults, serde_json::to_value(request)?);
		Ok(serde_json::from_value(merged)?)
	}
}
