//! Heap snapshot, allocation tracking, and sampling heap profile methods.

use ndiag_protocol::SamplingHeapProfile;
use ndiag_protocol::heap_profiler::{
	AddHeapSnapshotChunk, Disable, Enable, ReportHeapSnapshotProgress, StartSampling,
	StartTrackingHeapObjects, StopSampling, StopTrackingHeapObjects, TakeHeapSnapshot,
};
use ndiag_runtime::{Channel, Result};

use super::Diagnostics;
use crate::options::{ProfileOptions, SnapshotOptions, TrackOptions};
use crate::subscription::ScopedSubscription;
use crate::validator::Target;

impl Diagnostics {
	/// Takes a heap snapshot, streaming its serialized chunks to `consumer`.
	///
	/// The chunk listener is registered before the request and removed once
	/// the request settles, whether it succeeded or not.
	pub async fn take_snapshot<F>(&self, target: impl Into<Target>, consumer: F) -> Result<()>
	where
		F: Fn(AddHeapSnapshotChunk) + Send + Sync + 'static,
	{
		self.take_snapshot_with(target, SnapshotOptions::default(), consumer)
			.await
	}

	/// [`take_snapshot`](Self::take_snapshot) with explicit snapshot options.
	///
	/// Progress events requested through `report_progress` are not delivered
	/// here; use [`take_snapshot_with_progress`](Self::take_snapshot_with_progress)
	/// to receive them.
	pub async fn take_snapshot_with<F>(
		&self,
		target: impl Into<Target>,
		options: SnapshotOptions,
		consumer: F,
	) -> Result<()>
	where
		F: Fn(AddHeapSnapshotChunk) + Send + Sync + 'static,
	{
		let target = target.into();
		let channel = self.resolve(&target)?;
		self.snapshot_on(&target, &channel, options, consumer).await
	}

	/// Takes a heap snapshot, streaming chunks to `consumer` and progress
	/// reports to `progress`.
	///
	/// `report_progress` is forced on. Both listeners are removed once the
	/// request settles.
	pub async fn take_snapshot_with_progress<F, P>(
		&self,
		target: impl Into<Target>,
		options: SnapshotOptions,
		consumer: F,
		progress: P,
	) -> Result<()>
	where
		F: Fn(AddHeapSnapshotChunk) + Send + Sync + 'static,
		P: Fn(ReportHeapSnapshotProgress) + Send + Sync + 'static,
	{
		let target = target.into();
		let channel = self.resolve(&target)?;

		let progress =
			ScopedSubscription::acquire::<ReportHeapSnapshotProgress, _>(channel.session(), progress);
		let options = SnapshotOptions {
			report_progress: Some(true),
			..options
		};
		self.snapshot_on(&target, &channel, options, consumer).await?;
		progress.release();
		Ok(())
	}

	async fn snapshot_on<F>(
		&self,
		target: &Target,
		channel: &Channel,
		options: SnapshotOptions,
		consumer: F,
	) -> Result<()>
	where
		F: Fn(AddHeapSnapshotChunk) + Send + Sync + 'static,
	{
		tracing::info!(%target, "Taking heap snapshot");

		let subscription =
			ScopedSubscription::acquire::<AddHeapSnapshotChunk, _>(channel.session(), consumer);
		channel
			.send_no_result(TakeHeapSnapshot {
				report_progress: options.report_progress,
				capture_numeric_value: options.capture_numeric_value,
			})
			.await?;
		subscription.release();

		tracing::info!(%target, "Heap snapshot complete");
		Ok(())
	}

	/// Tracks heap objects for `options.duration`, streaming the tracked
	/// snapshot chunks to `consumer`.
	pub async fn track_objects<F>(
		&self,
		target: impl Into<Target>,
		options: TrackOptions,
		consumer: F,
	) -> Result<()>
	where
		F: Fn(AddHeapSnapshotChunk) + Send + Sync + 'static,
	{
		let target = target.into();
		let channel = self.resolve(&target)?;
		tracing::info!(%target, duration_ms = options.duration.as_millis(), "Tracking heap objects");

		let subscription =
			ScopedSubscription::acquire::<AddHeapSnapshotChunk, _>(channel.session(), consumer);
		channel
			.send_no_result(StartTrackingHeapObjects {
				track_allocations: options.track_allocations,
			})
			.await?;
		options.duration.elapse().await;
		channel
			.send_no_result(StopTrackingHeapObjects {
				report_progress: options.report_progress,
			})
			.await?;
		subscription.release();

		tracing::info!(%target, "Heap object tracking complete");
		Ok(())
	}

	/// Samples heap allocations for `options.duration` and returns the profile.
	///
	/// `options.interval` is the average sampling interval in bytes.
	pub async fn get_heap_profile(
		&self,
		target: impl Into<Target>,
		options: ProfileOptions,
	) -> Result<SamplingHeapProfile> {
		let target = target.into();
		let channel = self.resolve(&target)?;
		tracing::info!(%target, duration_ms = options.duration.as_millis(), "Capturing heap profile");

		channel.send_no_result(Enable).await?;
		channel
			.send_no_result(StartSampling {
				sampling_interval: options.effective_interval(),
			})
			.await?;
		options.duration.elapse().await;
		let profile = channel.send(StopSampling).await?.profile;
		channel.send_no_result(Disable).await?;

		tracing::info!(%target, samples = profile.samples.len(), "Heap profile captured");
		Ok(profile)
	}
}
