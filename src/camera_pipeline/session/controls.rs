use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::camera_pipeline::common::error::Result;
use crate::camera_pipeline::processing::{Colormap, RenderParams, ViewMode};

/// Operator state shared between the control surface and the tick context.
///
/// Flags are atomics; render parameters sit behind a mutex and are only ever
/// read by the processor as a copied snapshot.
#[derive(Debug)]
pub struct SessionControls {
    persist: AtomicBool,
    reset_requested: AtomicBool,
    render: Mutex<RenderParams>,
}

impl Default for SessionControls {
    fn default() -> Self {
        Self::new(true, RenderParams::default())
    }
}

impl SessionControls {
    pub fn new(persist: bool, render: RenderParams) -> Self {
        Self {
            persist: AtomicBool::new(persist),
            reset_requested: AtomicBool::new(false),
            render: Mutex::new(render),
        }
    }

    pub fn persist_enabled(&self) -> bool {
        self.persist.load(Ordering::Acquire)
    }

    pub fn set_persist(&self, enabled: bool) {
        self.persist.store(enabled, Ordering::Release);
        info!(enabled, "Checkpoint persistence changed");
    }

    /// Flips persistence and returns the new value.
    pub fn toggle_persist(&self) -> bool {
        let enabled = !self.persist.fetch_xor(true, Ordering::AcqRel);
        info!(enabled, "Checkpoint persistence changed");
        enabled
    }

    pub(crate) fn request_reset(&self) {
        self.reset_requested.store(true, Ordering::Release);
    }

    /// Consumes a pending reset request.
    pub(crate) fn take_reset(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_requested.load(Ordering::Acquire)
    }

    fn lock_render(&self) -> MutexGuard<'_, RenderParams> {
        // Plain Copy data, still usable after a poisoning panic.
        self.render.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current render parameters.
    pub fn render(&self) -> RenderParams {
        *self.lock_render()
    }

    pub fn set_render(&self, params: RenderParams) {
        *self.lock_render() = params;
    }

    /// Turns the image by `steps` quarter turns; positive is counter-clockwise.
    pub fn rotate(&self, steps: i32) -> u8 {
        let mut params = self.lock_render();
        params.rotate_by(steps);
        info!(degrees = params.rotation_degrees(), "Rotation changed");
        params.rotation
    }

    pub fn set_view(&self, view: ViewMode) {
        self.lock_render().view = view;
        info!(%view, "View mode changed");
    }

    pub fn set_thresholds(&self, floor_percent: f64, ceiling_percent: f64) -> Result<()> {
        self.lock_render().set_thresholds(floor_percent, ceiling_percent)?;
        info!(floor_percent, ceiling_percent, "Thresholds changed");
        Ok(())
    }

    pub fn set_colormap(&self, colormap: Colormap) {
        self.lock_render().colormap = colormap;
        info!(%colormap, "Color map changed");
    }

    /// Selects a color map by its display name.
    pub fn set_colormap_by_name(&self, name: &str) -> Result<()> {
        let colormap: Colormap = name.parse()?;
        self.set_colormap(colormap);
        Ok(())
    }
}
