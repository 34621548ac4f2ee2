//! Host-facing overlay player.
//!
//! Ties a [`CommentStore`] and an [`OverlayEngine`] to one backend: the
//! host opens a channel/time range, forwards playback-time updates once per
//! second, and polls placements for rendering. Fetch failures degrade to
//! "no new comments this tick" and never surface to the host.

use crate::backend::{ChannelQueryMap, CommentBackend};
use crate::config::OverlayConfig;
use crate::overlay::{
    ActiveComment, LinearMotion, MonospaceMeasure, Motion, OverlayEngine, TextMeasure,
};
use crate::store::{CommentStore, ThreadCatalog};
use crate::time::{PlaybackTime, Timestamp};

/// Comment overlay player for one playback session.
#[derive(Debug)]
pub struct OverlayPlayer<B, M = LinearMotion, T = MonospaceMeasure> {
    backend: B,
    channels: ChannelQueryMap,
    store: CommentStore,
    engine: OverlayEngine<M, T>,
}

impl<B: CommentBackend> OverlayPlayer<B> {
    /// Create a player with the built-in motion backend and width
    /// estimator.
    #[must_use]
    pub fn new(backend: B, channels: ChannelQueryMap, config: OverlayConfig) -> Self {
        Self::with_parts(
            backend,
            channels,
            config,
            LinearMotion::new(),
            MonospaceMeasure::default(),
        )
    }
}

impl<B: CommentBackend, M: Motion, T: TextMeasure> OverlayPlayer<B, M, T> {
    /// Create a player with custom motion and measure backends.
    #[must_use]
    pub fn with_parts(
        backend: B,
        channels: ChannelQueryMap,
        config: OverlayConfig,
        motion: M,
        measure: T,
    ) -> Self {
        Self {
            backend,
            channels,
            store: CommentStore::new(),
            engine: OverlayEngine::with_parts(config, motion, measure),
        }
    }

    /// Open a channel/time range, replacing any prior session state.
    pub async fn open(&mut self, channel: &str, start: Timestamp, end: Timestamp) {
        let delay = self.engine.config().delay;
        self.store
            .init(&self.backend, &self.channels, channel, start, end, delay)
            .await;
        self.engine.reset();
    }

    /// Advance to playback position `t`: fetch the comment window if due,
    /// then update the overlay.
    pub async fn on_time_update(&mut self, t: PlaybackTime) {
        self.store.windowed_fetch(&self.backend, t).await;
        let origin = self.store.channel_start() + self.store.delay();
        self.engine
            .on_time_update(t, self.store.records(), self.store.catalog(), origin);
    }

    /// Apply a configuration change to the engine and the store.
    pub fn on_config_change(&mut self, config: OverlayConfig) {
        self.store.set_delay(config.delay);
        self.engine.on_config_change(config);
    }

    /// Report the render surface width.
    pub const fn set_viewport(&mut self, screen_width: f32) {
        self.engine.set_viewport(screen_width);
    }

    /// Active placements at the last playback position.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ActiveComment> {
        self.engine.snapshot()
    }

    /// Active placements at an arbitrary playback position, for
    /// frame-interpolating renderers.
    #[must_use]
    pub fn snapshot_at(&self, now: PlaybackTime) -> Vec<ActiveComment> {
        self.engine.snapshot_at(now)
    }

    /// The thread catalog, for filter display.
    #[must_use]
    pub const fn catalog(&self) -> &ThreadCatalog {
        self.store.catalog()
    }

    /// Mutable access to the catalog, for filter toggling.
    pub const fn catalog_mut(&mut self) -> &mut ThreadCatalog {
        self.store.catalog_mut()
    }

    /// The comment store, for inspection.
    #[must_use]
    pub const fn store(&self) -> &CommentStore {
        &self.store
    }

    /// The overlay engine, for inspection.
    #[must_use]
    pub const fn engine(&self) -> &OverlayEngine<M, T> {
        &self.engine
    }
}
