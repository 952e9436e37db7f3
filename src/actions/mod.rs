//! Download and copy actions over whatever raster was last rendered.
//!
//! Both silently no-op when nothing has rendered yet; failures surface as
//! error toasts and never touch form state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arboard::{Clipboard, ImageData};
use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::core::error::{AppError, AppResult};
use crate::core::models::Notification;
use crate::render::orchestrator::{RasterSlots, UiEvent};
use crate::utils::image::encode_png;

pub struct Actions {
    slots: Arc<Mutex<RasterSlots>>,
    ui: UnboundedSender<UiEvent>,
    output_dir: PathBuf,
}

impl Actions {
    pub fn new(slots: Arc<Mutex<RasterSlots>>, ui: UnboundedSender<UiEvent>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            slots,
            ui,
            output_dir: output_dir.into(),
        }
    }

    fn toast(&self, notification: Notification) {
        let _ = self.ui.send(UiEvent::Toast(notification));
    }

    fn latest_raster(&self) -> Option<image::RgbaImage> {
        self.slots
            .lock()
            .expect("raster slots poisoned")
            .latest()
            .cloned()
    }

    /// Saves the latest raster as a timestamped PNG in the output directory.
    /// Returns the written path, or `None` when nothing has rendered yet.
    pub fn download(&self) -> AppResult<Option<PathBuf>> {
        let Some(raster) = self.latest_raster() else {
            return Ok(None);
        };

        let path = self
            .output_dir
            .join(format!("qr-{}.png", Utc::now().timestamp_millis()));
        match self.write_png(&raster, &path) {
            Ok(()) => {
                info!("saved QR image to {:?}", path);
                self.toast(Notification::success("Downloaded successfully!"));
                Ok(Some(path))
            }
            Err(e) => {
                self.toast(Notification::error("Download failed"));
                Err(e)
            }
        }
    }

    fn write_png(&self, raster: &image::RgbaImage, path: &Path) -> AppResult<()> {
        let bytes = encode_png(raster)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Places the latest raster on the system clipboard. Returns `false`
    /// when nothing has rendered yet.
    pub fn copy(&self) -> AppResult<bool> {
        let Some(raster) = self.latest_raster() else {
            return Ok(false);
        };

        match self.copy_raster(&raster) {
            Ok(()) => {
                info!("copied QR image to clipboard");
                self.toast(Notification::success("Copied to clipboard!"));
                Ok(true)
            }
            Err(e) => {
                self.toast(Notification::error("Copy failed"));
                Err(e)
            }
        }
    }

    fn copy_raster(&self, raster: &image::RgbaImage) -> AppResult<()> {
        let (width, height) = raster.dimensions();
        let mut clipboard =
            Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
        clipboard
            .set_image(ImageData {
                width: width as usize,
                height: height as usize,
                bytes: raster.as_raw().as_slice().into(),
            })
            .map_err(|e| AppError::Clipboard(e.to_string()))
    }
}
