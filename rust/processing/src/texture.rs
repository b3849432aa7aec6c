// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground texture resolution.
//!
//! Images are loaded by an external [`TextureLoader`], possibly on another
//! thread. A [`TextureSlot`] tracks the image requested for the ground; the
//! scene either waits on it or publishes a placeholder appearance and swaps
//! the texture in once the loader calls back. Geometry is never rebuilt for
//! a texture change.

use crate::error::Result;
use ground3d_core::GroundEnvironment;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Material colour of textured faces, left to the texture
pub const TEXTURED_MATERIAL_COLOR: u32 = 0xFF_FF_FF;

/// What a loader learned about a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTexture {
    /// Whether the image has transparent pixels
    pub transparent: bool,
}

/// Completion callback handed to a [`TextureLoader`]
pub type LoadCallback = Box<dyn FnOnce(Result<LoadedTexture>) + Send>;

/// Loads texture images.
///
/// `done` must be called exactly once, from any thread, possibly before
/// `load` returns.
pub trait TextureLoader: Send + Sync {
    fn load(&self, image: &str, done: LoadCallback);
}

/// Resolution state of the ground texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TextureState {
    /// No texture requested
    Absent,
    Pending,
    Ready { transparent: bool },
    Failed,
}

/// Appearance of every ground face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundAppearance {
    /// Material colour (RGB)
    pub color: u32,
    /// Image drawn on textured faces; a placeholder is shown while pending
    pub texture: Option<String>,
    pub texture_state: TextureState,
    pub transparent: bool,
}

impl GroundAppearance {
    /// Plain coloured ground
    pub fn untextured(color: u32) -> Self {
        Self {
            color,
            texture: None,
            texture_state: TextureState::Absent,
            transparent: false,
        }
    }

    /// Appearance of `environment` once its texture is in `state`.
    ///
    /// A failed texture falls back to the ground colour.
    pub fn resolve(environment: &GroundEnvironment, state: TextureState) -> Self {
        let texture = match &environment.texture {
            Some(texture) => texture,
            None => return Self::untextured(environment.color),
        };
        match state {
            TextureState::Failed => Self {
                texture_state: TextureState::Failed,
                ..Self::untextured(environment.color)
            },
            TextureState::Ready { transparent } => Self {
                color: TEXTURED_MATERIAL_COLOR,
                texture: Some(texture.image.clone()),
                texture_state: state,
                transparent,
            },
            TextureState::Absent | TextureState::Pending => Self {
                color: TEXTURED_MATERIAL_COLOR,
                texture: Some(texture.image.clone()),
                texture_state: TextureState::Pending,
                transparent: false,
            },
        }
    }

    #[inline]
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

#[derive(Debug)]
struct SlotState {
    image: Option<String>,
    state: TextureState,
    /// Incremented on each new request so late callbacks of replaced
    /// requests are ignored
    request: u64,
}

#[derive(Debug)]
struct SlotShared {
    slot: Mutex<SlotState>,
    changed: Condvar,
}

/// The texture currently requested for the ground
#[derive(Debug, Clone)]
pub struct TextureSlot {
    shared: Arc<SlotShared>,
}

impl Default for TextureSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSlot {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SlotShared {
                slot: Mutex::new(SlotState {
                    image: None,
                    state: TextureState::Absent,
                    request: 0,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    pub fn state(&self) -> TextureState {
        self.lock().state
    }

    pub fn image(&self) -> Option<String> {
        self.lock().image.clone()
    }

    /// Request `image`, loading it unless it is already loaded or pending.
    ///
    /// `on_resolved` is called once the loader answers this request, unless
    /// another image was requested in the meantime. Returns the state right
    /// after the request.
    pub fn request(
        &self,
        image: Option<&str>,
        loader: Option<&dyn TextureLoader>,
        on_resolved: impl FnOnce(TextureState) + Send + 'static,
    ) -> TextureState {
        let (image, request) = {
            let mut slot = self.lock();
            match image {
                None => {
                    slot.image = None;
                    slot.state = TextureState::Absent;
                    slot.request += 1;
                    self.shared.changed.notify_all();
                    return TextureState::Absent;
                }
                Some(image)
                    if slot.image.as_deref() == Some(image) && slot.state != TextureState::Failed =>
                {
                    return slot.state;
                }
                Some(image) => {
                    slot.request += 1;
                    slot.image = Some(image.to_string());
                    slot.state = TextureState::Pending;
                    (image.to_string(), slot.request)
                }
            }
        };

        let loader = match loader {
            Some(loader) => loader,
            None => {
                warn!(image = %image, "No texture loader, ground drawn untextured");
                self.resolve(request, TextureState::Failed);
                return TextureState::Failed;
            }
        };

        debug!(image = %image, request, "Loading ground texture");
        let shared = Arc::clone(&self.shared);
        let failed_image = image.clone();
        loader.load(
            &image,
            Box::new(move |outcome| {
                let state = match outcome {
                    Ok(loaded) => TextureState::Ready {
                        transparent: loaded.transparent,
                    },
                    Err(e) => {
                        warn!(image = %failed_image, error = %e, "Ground texture failed to load");
                        TextureState::Failed
                    }
                };
                let slot = TextureSlot { shared };
                if slot.resolve(request, state) {
                    on_resolved(state);
                }
            }),
        );
        self.state()
    }

    /// Wait while the requested texture is pending, at most `timeout`
    pub fn wait(&self, timeout: Duration) -> TextureState {
        let deadline = Instant::now() + timeout;
        let mut slot = self.lock();
        while slot.state == TextureState::Pending {
            let now = Instant::now();
            if now >= deadline {
                warn!(image = ?slot.image, "Timed out waiting for ground texture");
                break;
            }
            slot = match self.shared.changed.wait_timeout(slot, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        slot.state
    }

    /// Store the outcome of `request` if it is still the current one
    fn resolve(&self, request: u64, state: TextureState) -> bool {
        let mut slot = self.lock();
        if slot.request != request {
            return false;
        }
        slot.state = state;
        self.shared.changed.notify_all();
        true
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.shared.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ground3d_core::GroundTexture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers synchronously
    struct ImmediateLoader {
        transparent: bool,
        loads: AtomicUsize,
    }

    impl TextureLoader for ImmediateLoader {
        fn load(&self, _image: &str, done: LoadCallback) {
            self.loads.fetch_add(1, Ordering::SeqCst);
            done(Ok(LoadedTexture {
                transparent: self.transparent,
            }));
        }
    }

    /// Keeps callbacks until the test answers them
    #[derive(Default)]
    struct ManualLoader {
        pending: Mutex<Vec<LoadCallback>>,
    }

    impl TextureLoader for ManualLoader {
        fn load(&self, _image: &str, done: LoadCallback) {
            self.pending.lock().unwrap().push(done);
        }
    }

    impl ManualLoader {
        fn answer(&self, outcome: impl Fn() -> Result<LoadedTexture>) {
            for done in self.pending.lock().unwrap().drain(..) {
                done(outcome());
            }
        }
    }

    fn textured_environment() -> GroundEnvironment {
        GroundEnvironment {
            color: 0x33_66_00,
            texture: Some(GroundTexture::new("grass", "grass.png", 100.0, 100.0)),
        }
    }

    #[test]
    fn test_synchronous_load_is_ready() {
        let slot = TextureSlot::new();
        let loader = ImmediateLoader {
            transparent: true,
            loads: AtomicUsize::new(0),
        };
        let state = slot.request(Some("grass.png"), Some(&loader), |_| {});
        assert_eq!(state, TextureState::Ready { transparent: true });

        // Same image: no second load
        slot.request(Some("grass.png"), Some(&loader), |_| {});
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_placeholder_then_callback() {
        let slot = TextureSlot::new();
        let loader = ManualLoader::default();
        let resolved = Arc::new(Mutex::new(None));
        let sink = resolved.clone();

        let state = slot.request(Some("grass.png"), Some(&loader), move |state| {
            *sink.lock().unwrap() = Some(state);
        });
        assert_eq!(state, TextureState::Pending);
        assert!(resolved.lock().unwrap().is_none());

        loader.answer(|| Ok(LoadedTexture { transparent: false }));
        assert_eq!(*resolved.lock().unwrap(), Some(TextureState::Ready { transparent: false }));
        assert_eq!(slot.state(), TextureState::Ready { transparent: false });
    }

    #[test]
    fn test_replaced_request_ignores_late_answer() {
        let slot = TextureSlot::new();
        let loader = ManualLoader::default();
        slot.request(Some("grass.png"), Some(&loader), |_| panic!("stale callback"));
        slot.request(None, Some(&loader), |_| {});

        loader.answer(|| Ok(LoadedTexture { transparent: false }));
        assert_eq!(slot.state(), TextureState::Absent);
        assert_eq!(slot.image(), None);
    }

    #[test]
    fn test_failure_and_missing_loader() {
        let slot = TextureSlot::new();
        let loader = ManualLoader::default();
        slot.request(Some("grass.png"), Some(&loader), |_| {});
        loader.answer(|| Err(Error::Texture("corrupt".to_string())));
        assert_eq!(slot.state(), TextureState::Failed);

        let slot = TextureSlot::new();
        assert_eq!(slot.request(Some("grass.png"), None, |_| {}), TextureState::Failed);
    }

    #[test]
    fn test_wait_returns_after_answer_from_other_thread() {
        let slot = TextureSlot::new();
        let loader = Arc::new(ManualLoader::default());
        slot.request(Some("grass.png"), Some(loader.as_ref()), |_| {});

        let answering = loader.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            answering.answer(|| Ok(LoadedTexture { transparent: true }));
        });
        let state = slot.wait(Duration::from_secs(5));
        handle.join().unwrap();
        assert_eq!(state, TextureState::Ready { transparent: true });
    }

    #[test]
    fn test_wait_times_out() {
        let slot = TextureSlot::new();
        let loader = ManualLoader::default();
        slot.request(Some("grass.png"), Some(&loader), |_| {});
        assert_eq!(slot.wait(Duration::from_millis(10)), TextureState::Pending);
    }

    #[test]
    fn test_appearance_resolution() {
        let environment = textured_environment();

        let pending = GroundAppearance::resolve(&environment, TextureState::Pending);
        assert!(pending.is_textured());
        assert_eq!(pending.color, TEXTURED_MATERIAL_COLOR);

        let ready = GroundAppearance::resolve(&environment, TextureState::Ready { transparent: true });
        assert!(ready.transparent);

        let failed = GroundAppearance::resolve(&environment, TextureState::Failed);
        assert!(!failed.is_textured());
        assert_eq!(failed.color, 0x33_66_00);

        let plain = GroundAppearance::resolve(&GroundEnvironment::default(), TextureState::Absent);
        assert_eq!(plain, GroundAppearance::untextured(ground3d_core::DEFAULT_GROUND_COLOR));
    }
}
