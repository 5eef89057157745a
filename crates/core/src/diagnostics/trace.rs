//! Trace event collection for [`Diagnostics`].

use ndiag_protocol::node_tracing::{DataCollected, GetCategories, Start, Stop};
use ndiag_runtime::Result;

use super::Diagnostics;
use crate::options::TraceOptions;
use crate::subscription::ScopedSubscription;
use crate::validator::Target;

impl Diagnostics {
	/// Records trace events for `options.duration`, streaming each collected
	/// batch to `consumer`.
	///
	/// Tracing starts before the listener is registered; batches are flushed
	/// by the engine while the stop request is in flight.
	pub async fn collect_trace_events<F>(
		&self,
		target: impl Into<Target>,
		options: TraceOptions,
		consumer: F,
	) -> Result<()>
	where
		F: Fn(DataCollected) + Send + Sync + 'static,
	{
		let target = target.into();
		let channel = self.resolve(&target)?;
		let categories = if options.categories.is_empty() {
			self.config.default_trace_categories.clone()
		} else {
			options.categories
		};
		tracing::info!(%target, duration_ms = options.duration.as_millis(), ?categories, "Collecting trace events");

		channel.send_no_result(Start::categories(categories)).await?;
		let subscription =
			ScopedSubscription::acquire::<DataCollected, _>(channel.session(), consumer);
		options.duration.elapse().await;
		channel.send_no_result(Stop).await?;
		subscription.release();

		tracing::info!(%target, "Trace collection complete");
		Ok(())
	}

	/// Trace categories the target engine supports.
	pub async fn trace_categories(&self, target: impl Into<Target>) -> Result<Vec<String>> {
		let target = target.into();
		let channel = self.resolve(&target)?;
		Ok(channel.send(GetCategories).await?.categories)
	}
}
