// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Published ground geometry and its rebuilds.
//!
//! A [`GroundScene`] owns the current [`GroundBatch`] behind an `Arc`.
//! Readers clone the `Arc` and never see a half-built batch. Rebuilds are
//! serialized: a request arriving while another rebuild runs leaves its model
//! snapshot in a pending slot and returns, and the running rebuild loops with
//! the latest snapshot before releasing the lock.

use crate::config::ProcessingConfig;
use crate::error::{Error, Result};
use crate::texture::{GroundAppearance, TextureLoader, TextureSlot, TextureState};
use crate::trigger::RecomposeTrigger;
use ground3d_core::{GroundEnvironment, HomeModel, ModelChange};
use ground3d_geometry::{GroundGenerator, GroundGeometry};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Immutable geometry of one model state
#[derive(Debug, Default, PartialEq)]
pub struct GroundBatch {
    /// Request number the geometry was built for; 0 before the first build
    pub generation: u64,
    pub geometry: GroundGeometry,
}

/// What happened to a rebuild request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A batch was published; `generation` is the newest one this call built
    Published { generation: u64 },
    /// Another rebuild was running and will pick the request up
    Coalesced,
    /// A newer batch was already published
    Stale { generation: u64 },
}

/// A rebuild that failed after its caller was told it was coalesced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildFailure {
    pub generation: u64,
    pub message: String,
}

/// Current batch and appearance, as seen by a renderer
#[derive(Debug, Clone)]
pub struct GroundSnapshot {
    pub batch: Arc<GroundBatch>,
    pub appearance: GroundAppearance,
    /// Latest failed rebuild newer than the published batch
    pub last_failure: Option<RebuildFailure>,
}

#[derive(Debug)]
struct AppearanceState {
    environment: GroundEnvironment,
    appearance: GroundAppearance,
}

struct PendingRebuild {
    generation: u64,
    home: Arc<HomeModel>,
}

pub struct GroundScene {
    generator: GroundGenerator,
    config: ProcessingConfig,
    loader: Option<Arc<dyn TextureLoader>>,
    texture: TextureSlot,
    current: RwLock<Arc<GroundBatch>>,
    appearance: Arc<RwLock<AppearanceState>>,
    rebuild_lock: Mutex<()>,
    pending: Mutex<Option<PendingRebuild>>,
    last_failure: Mutex<Option<RebuildFailure>>,
    requested: AtomicU64,
}

impl std::fmt::Debug for GroundScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroundScene")
            .field("config", &self.config)
            .field("generation", &self.batch().generation)
            .field("texture", &self.texture.state())
            .finish_non_exhaustive()
    }
}

impl GroundScene {
    /// Create an empty scene. Fails when `config` holds invalid settings.
    pub fn new(config: ProcessingConfig, loader: Option<Arc<dyn TextureLoader>>) -> Result<Self> {
        let generator = GroundGenerator::new(config.settings())?;
        let environment = GroundEnvironment::default();
        let appearance = GroundAppearance::untextured(environment.color);
        Ok(Self {
            generator,
            config,
            loader,
            texture: TextureSlot::new(),
            current: RwLock::new(Arc::new(GroundBatch::default())),
            appearance: Arc::new(RwLock::new(AppearanceState {
                environment,
                appearance,
            })),
            rebuild_lock: Mutex::new(()),
            pending: Mutex::new(None),
            last_failure: Mutex::new(None),
            requested: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// The published batch
    pub fn batch(&self) -> Arc<GroundBatch> {
        let current = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&current)
    }

    pub fn appearance(&self) -> GroundAppearance {
        self.read_appearance().appearance.clone()
    }

    pub fn snapshot(&self) -> GroundSnapshot {
        GroundSnapshot {
            batch: self.batch(),
            appearance: self.appearance(),
            last_failure: self.last_failure(),
        }
    }

    /// Latest failed rebuild not superseded by a published batch
    pub fn last_failure(&self) -> Option<RebuildFailure> {
        self.lock_failure().clone()
    }

    /// Rebuild the ground for `home`.
    ///
    /// Returns [`RebuildOutcome::Coalesced`] without waiting when another
    /// rebuild is running; that rebuild publishes this snapshot or a later one.
    /// Only the failure of this request is returned. Failures of requests
    /// coalesced into this call are logged and kept in
    /// [`GroundScene::last_failure`].
    pub fn request_rebuild(&self, home: Arc<HomeModel>) -> Result<RebuildOutcome> {
        let generation = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut pending = self.lock_pending();
            if pending.as_ref().map_or(true, |p| p.generation < generation) {
                *pending = Some(PendingRebuild { generation, home });
            }
        }

        let mut outcome = RebuildOutcome::Coalesced;
        let mut own_error: Option<Error> = None;
        loop {
            let guard = match self.rebuild_lock.try_lock() {
                Ok(guard) => guard,
                Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {
                    if outcome == RebuildOutcome::Coalesced {
                        debug!(generation, "Rebuild coalesced into running rebuild");
                    }
                    break;
                }
            };
            while let Some(next) = self.take_pending() {
                let next_generation = next.generation;
                match self.rebuild(next) {
                    Ok(built) => outcome = built,
                    Err(e) => {
                        warn!(generation = next_generation, error = %e, "Ground rebuild failed");
                        self.record_failure(next_generation, &e);
                        if next_generation == generation {
                            own_error = Some(e);
                        }
                    }
                }
            }
            drop(guard);

            // A request may have been left between the last take and the unlock
            if self.lock_pending().is_none() {
                break;
            }
        }

        match own_error {
            Some(e) => Err(e),
            None => Ok(outcome),
        }
    }

    /// React to a model notification.
    ///
    /// Appearance-only changes update the texture and colour and keep the
    /// published geometry. Returns the rebuild outcome when one ran.
    pub fn on_change(&self, change: ModelChange, home: Arc<HomeModel>) -> Result<Option<RebuildOutcome>> {
        if change.affects_geometry() {
            self.request_rebuild(home).map(Some)
        } else {
            self.refresh_appearance(&home.environment);
            Ok(None)
        }
    }

    /// Rebuild when `trigger` has pending geometry changes
    pub fn sync(&self, trigger: &RecomposeTrigger, home: Arc<HomeModel>) -> Result<Option<RebuildOutcome>> {
        match trigger.take_dirty() {
            Some(changes) => {
                debug!(changes, "Trigger dirty, rebuilding ground");
                self.request_rebuild(home).map(Some)
            }
            None => Ok(None),
        }
    }

    fn rebuild(&self, request: PendingRebuild) -> Result<RebuildOutcome> {
        let started = Instant::now();
        let geometry = self.generator.generate(&request.home)?;
        self.refresh_appearance(&request.home.environment);

        let faces = geometry.faces.len();
        let skirts = geometry.skirts.len();
        let batch = GroundBatch {
            generation: request.generation,
            geometry,
        };
        if !self.install(batch) {
            debug!(generation = request.generation, "Stale ground batch discarded");
            return Ok(RebuildOutcome::Stale {
                generation: request.generation,
            });
        }

        info!(
            generation = request.generation,
            faces,
            skirts,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ground rebuilt"
        );
        Ok(RebuildOutcome::Published {
            generation: request.generation,
        })
    }

    /// Publish `batch` unless a newer one is already published
    fn install(&self, batch: GroundBatch) -> bool {
        let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if current.generation > batch.generation {
            return false;
        }
        let mut failure = self.lock_failure();
        if failure.as_ref().map_or(false, |f| f.generation < batch.generation) {
            *failure = None;
        }
        *current = Arc::new(batch);
        true
    }

    fn record_failure(&self, generation: u64, error: &Error) {
        let mut failure = self.lock_failure();
        if failure.as_ref().map_or(true, |f| f.generation < generation) {
            *failure = Some(RebuildFailure {
                generation,
                message: error.to_string(),
            });
        }
    }

    /// Request the texture of `environment` and update the appearance.
    ///
    /// In blocking mode waits for the loader, bounded by the configured
    /// timeout. Otherwise a pending texture shows as a placeholder until the
    /// loader calls back.
    fn refresh_appearance(&self, environment: &GroundEnvironment) {
        let image = environment.texture.as_ref().map(|t| t.image.as_str());
        let shared = Arc::clone(&self.appearance);
        let state = self.texture.request(image, self.loader.as_deref(), move |state| {
            let mut shared = shared.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            shared.appearance = GroundAppearance::resolve(&shared.environment, state);
            info!(state = ?state, "Ground texture resolved");
        });
        if self.config.wait_for_texture && state == TextureState::Pending {
            self.texture.wait(self.config.texture_timeout);
        }

        let mut shared = self.appearance.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        shared.environment = environment.clone();
        // Read under the lock so a concurrent callback can't be overwritten
        shared.appearance = GroundAppearance::resolve(environment, self.texture.state());
    }

    fn take_pending(&self) -> Option<PendingRebuild> {
        self.lock_pending().take()
    }

    fn lock_failure(&self) -> MutexGuard<'_, Option<RebuildFailure>> {
        self.last_failure.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<PendingRebuild>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_appearance(&self) -> std::sync::RwLockReadGuard<'_, AppearanceState> {
        self.appearance.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
