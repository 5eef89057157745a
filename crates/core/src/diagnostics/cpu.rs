//! CPU profile capture for [`Diagnostics`].

use ndiag_protocol::CpuProfile;
use ndiag_protocol::profiler::{Disable, Enable, SetSamplingInterval, Start, Stop};
use ndiag_runtime::Result;

use super::Diagnostics;
use crate::options::ProfileOptions;
use crate::validator::Target;

impl Diagnostics {
	/// Runs the CPU profiler for `options.duration` and returns the profile.
	///
	/// `options.interval` is the sampling interval in microseconds; it is
	/// applied before the profiler starts.
	pub async fn get_cpu_profile(
		&self,
		target: impl Into<Target>,
		options: ProfileOptions,
	) -> Result<CpuProfile> {
		let target = target.into();
		let channel = self.resolve(&target)?;
		tracing::info!(%target, duration_ms = options.duration.as_millis(), "Capturing CPU profile");

		channel.send_no_result(Enable).await?;
		if let Some(interval) = options.effective_interval() {
			channel
				.send_no_result(SetSamplingInterval { interval })
				.await?;
		}
		channel.send_no_result(Start).await?;
		options.duration.elapse().await;
		let profile = channel.send(Stop).await?.profile;
		channel.send_no_result(Disable).await?;

		tracing::info!(%target, nodes = profile.nodes.len(), "CPU profile captured");
		Ok(profile)
	}
}
