//! Generation state controller.
//!
//! Owns the form state and turns edits into render requests. Every tracked
//! edit re-arms a single debounce timer; only when it fires is a request sent,
//! so a burst of edits produces one render of the final state. Each fired
//! cycle is numbered and a response is committed only if no newer cycle has
//! started since, which keeps a slow old response from replacing a fresher
//! image.

pub mod image_store;
pub mod state;


use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    api::EmojiApi,
    color::{hex_to_rgba, normalize_hex, rgba_to_hex, Channel, RgbaColor},
    config::GeneratorConfig,
    error::Result,
    models::{contains_font, first_font, TextAlign, MAX_TEXT_CHARS},
};

pub use image_store::{ImageHandle, ImageStore, ObjectUrl, ERROR_PLACEHOLDER_IMAGE};
pub use state::{ColorTarget, GenerationState};

pub const FONT_LOAD_ERROR: &str =
    "Failed to load fonts. The API response is malformed or the server is down.";
pub const UNKNOWN_RENDER_ERROR: &str = "An unknown error occurred.";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

struct Shared {
    api: Arc<dyn EmojiApi>,
    config: GeneratorConfig,
    images: ImageStore,
    state: watch::Sender<GenerationState>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    latest_cycle: AtomicU64,
    closed: AtomicBool,
}

impl Shared {
    /// Cancels any armed timer and arms a new one, unless no typeface is
    /// selected yet.
    fn schedule_render(self: &Arc<Self>) {
        let mut pending = lock(&self.debounce);
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if self.state.borrow().typeface.is_empty() {
            log::debug!("No typeface selected, render deferred");
            return;
        }

        let shared = Arc::clone(self);
        let delay = self.config.debounce();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached: re-arming the timer must not cancel a request in flight.
            tokio::spawn(shared.run_cycle());
        }));
    }

    async fn run_cycle(self: Arc<Self>) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let cycle = self.latest_cycle.fetch_add(1, Ordering::SeqCst) + 1;

        let (text_empty, request) = {
            let state = self.state.borrow();
            (state.text.is_empty(), state.render_request(&self.config))
        };

        if text_empty {
            log::debug!("Cycle {}: text is empty, clearing preview", cycle);
            self.commit(cycle, |state| {
                state.is_loading = false;
                state.error = None;
                state.image.take()
            });
            return;
        }

        let Some(request) = request else {
            log::debug!("Cycle {}: no typeface selected, skipping", cycle);
            return;
        };

        let started = self.commit(cycle, |state| {
            state.is_loading = true;
            state.error = None;
            state.image.take()
        });
        if !started {
            log::debug!("Cycle {}: superseded before sending", cycle);
            return;
        }

        match self.api.render_emoji(&request).await {
            Ok(image) => {
                let images = &self.images;
                let mut created = None;
                let committed = self.commit(cycle, |state| {
                    let url = images.create(image);
                    created = Some(url.clone());
                    state.is_loading = false;
                    state.error = None;
                    state.image.replace(ImageHandle::Object(url))
                });
                match created {
                    Some(url) if committed => log::info!("Rendered '{}' as {}", request.text, url),
                    _ => log::debug!("Cycle {}: superseded, dropping result", cycle),
                }
            }
            Err(e) => {
                log::error!("Render failed: {}", e);
                let message = match e.to_string() {
                    message if message.trim().is_empty() => UNKNOWN_RENDER_ERROR.to_string(),
                    message => message,
                };
                let committed = self.commit(cycle, |state| {
                    state.is_loading = false;
                    state.error = Some(message);
                    state.image.replace(ImageHandle::Placeholder)
                });
                if !committed {
                    log::debug!("Cycle {}: superseded, dropping error", cycle);
                }
            }
        }
    }

    /// Applies a cycle's update only while `cycle` is still the latest one and
    /// the controller is open. The check runs under the state lock, so it
    /// cannot interleave with a newer cycle's commit or with shutdown.
    fn commit(
        &self,
        cycle: u64,
        update: impl FnOnce(&mut GenerationState) -> Option<ImageHandle>,
    ) -> bool {
        let mut displaced = None;
        let committed = self.state.send_if_modified(|state| {
            if self.closed.load(Ordering::SeqCst)
                || self.latest_cycle.load(Ordering::SeqCst) != cycle
            {
                return false;
            }
            displaced = update(state);
            true
        });
        self.images.release(displaced.as_ref());
        committed
    }

    /// Applies a pipeline update and releases the image handle it displaced.
    fn settle(&self, update: impl FnOnce(&mut GenerationState) -> Option<ImageHandle>) {
        let mut displaced = None;
        self.state.send_modify(|state| displaced = update(state));
        self.images.release(displaced.as_ref());
    }

    async fn load_fonts(self: Arc<Self>) {
        match self.api.fetch_font_directory().await {
            Ok(categories) => {
                let mut selected = None;
                self.state.send_modify(|state| {
                    if state.typeface.is_empty() {
                        if let Some(font) = first_font(&categories) {
                            state.typeface = font.value.clone();
                            selected = Some(font.value.clone());
                        }
                    }
                    state.font_categories = categories;
                });

                if let Some(typeface) = selected {
                    log::info!("Selected default typeface {}", typeface);
                    self.schedule_render();
                }
            }
            Err(e) => {
                log::error!("Failed to load font directory: {}", e);
                self.state
                    .send_modify(|state| state.error = Some(FONT_LOAD_ERROR.to_string()));
            }
        }
    }
}

/// Single owner of the emoji form state and its render pipeline.
///
/// Must be created inside a tokio runtime: construction starts the one-shot
/// font directory load. Dropping the controller runs [`shutdown`](Self::shutdown).
pub struct GenerationController {
    shared: Arc<Shared>,
    font_load: Mutex<Option<JoinHandle<()>>>,
}

impl GenerationController {
    pub fn new(api: Arc<dyn EmojiApi>, config: GeneratorConfig) -> Self {
        let (state, _) = watch::channel(GenerationState::default());
        let shared = Arc::new(Shared {
            api,
            config,
            images: ImageStore::new(),
            state,
            debounce: Mutex::new(None),
            latest_cycle: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        });

        let font_load = tokio::spawn(Arc::clone(&shared).load_fonts());

        Self {
            shared,
            font_load: Mutex::new(Some(font_load)),
        }
    }

    pub fn snapshot(&self) -> GenerationState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.shared.state.subscribe()
    }

    pub fn images(&self) -> &ImageStore {
        &self.shared.images
    }

    /// Applies a tracked edit; re-arms the debounce timer if anything changed.
    fn edit(&self, update: impl FnOnce(&mut GenerationState) -> bool) -> bool {
        let changed = self.shared.state.send_if_modified(update);
        if changed {
            self.shared.schedule_render();
        }
        changed
    }

    fn edit_color(&self, target: ColorTarget, update: impl FnOnce(RgbaColor) -> RgbaColor) -> bool {
        self.edit(|state| {
            let slot = state.color_mut(target);
            match hex_to_rgba(slot) {
                Ok(current) => replace(slot, rgba_to_hex(update(current))),
                Err(_) => false,
            }
        })
    }

    /// Sets the text, keeping at most the first 20 characters.
    pub fn set_text(&self, text: &str) -> bool {
        let text: String = text.chars().take(MAX_TEXT_CHARS).collect();
        self.edit(|state| replace(&mut state.text, text))
    }

    pub fn set_typeface(&self, typeface: &str) -> bool {
        {
            let state = self.shared.state.borrow();
            if !state.font_categories.is_empty() && !contains_font(&state.font_categories, typeface) {
                log::warn!("Typeface '{}' is not in the font directory", typeface);
            }
        }
        let typeface = typeface.to_string();
        self.edit(|state| replace(&mut state.typeface, typeface))
    }

    /// Replaces a color with any accepted hex form, stored as `#rrggbbaa`.
    pub fn set_color(&self, target: ColorTarget, hex: &str) -> Result<bool> {
        let hex = normalize_hex(hex)?;
        Ok(self.edit(|state| replace(state.color_mut(target), hex)))
    }

    /// Takes a swatch's RGB and keeps the target's current alpha. The color
    /// picker goes through here too.
    pub fn apply_preset(&self, target: ColorTarget, preset: &str) -> Result<bool> {
        let preset = hex_to_rgba(preset)?;
        Ok(self.edit_color(target, |current| current.with_rgb_of(preset)))
    }

    pub fn set_channel(&self, target: ColorTarget, channel: Channel, value: f64) -> bool {
        self.edit_color(target, |current| current.with_channel(channel, value))
    }

    pub fn set_background_enabled(&self, enabled: bool) -> bool {
        self.edit(|state| replace(&mut state.use_background_color, enabled))
    }

    pub fn set_align(&self, align: TextAlign) -> bool {
        self.edit(|state| replace(&mut state.align, align))
    }

    pub fn set_size_fixed(&self, fixed: bool) -> bool {
        self.edit(|state| replace(&mut state.size_fixed, fixed))
    }

    pub fn set_stretch_disabled(&self, disabled: bool) -> bool {
        self.edit(|state| replace(&mut state.stretch_disabled, disabled))
    }

    /// Stops pending work and releases the current image. Responses that
    /// arrive afterwards are dropped. Safe to call more than once.
    pub fn shutdown(&self) {
        if self.shared.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = lock(&self.font_load).take() {
            task.abort();
        }
        if let Some(timer) = lock(&self.shared.debounce).take() {
            timer.abort();
        }
        self.shared.settle(|state| {
            state.is_loading = false;
            state.image.take()
        });
        log::debug!("Generation controller shut down");
    }
}

impl Drop for GenerationController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
