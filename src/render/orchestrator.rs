//! Debounced state-to-raster pipeline.
//!
//! Change notifications from the state container restart a trailing-edge
//! debounce timer; when the timer survives a quiet period, one render cycle
//! runs against the state snapshot taken at that moment. Intermediate states
//! inside the window are never rendered.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::RgbaImage;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time;
use tracing::{debug, error};

use crate::core::models::{FormState, Notification};
use crate::render::content;
use crate::render::logo::composite_logo;
use crate::render::safe_zone::{self, SafeZoneStatus};
use crate::state::ChangeEvent;
use crate::utils::qrcode::render_raster;

/// Quiet period after the last state mutation before a render runs.
pub const DEBOUNCE: Duration = Duration::from_millis(150);
/// Delay between mounting fresh rasters and compositing the logo.
pub const LOGO_MOUNT_DELAY: Duration = Duration::from_millis(50);
/// The secondary (mobile) raster never exceeds this edge length.
pub const MOBILE_EDGE_CAP: u32 = 180;

pub fn secondary_edge(size: u32) -> u32 {
    size.min(MOBILE_EDGE_CAP)
}

/// The two output rasters, replaced wholesale by each render cycle.
#[derive(Debug, Default)]
pub struct RasterSlots {
    pub primary: Option<RgbaImage>,
    pub secondary: Option<RgbaImage>,
}

impl RasterSlots {
    /// Most recently rendered raster, preferring the primary.
    pub fn latest(&self) -> Option<&RgbaImage> {
        self.primary.as_ref().or(self.secondary.as_ref())
    }
}

/// Events for whatever front end is listening: safe-zone status, toast
/// notifications, and completed render cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Status(SafeZoneStatus),
    Toast(Notification),
    Rendered { primary: u32, secondary: u32 },
}

/// Everything one render cycle needs, resolved up front from a snapshot.
/// An empty payload resolves to no plan and the cycle is skipped.
#[derive(Debug)]
pub struct CyclePlan {
    pub payload: String,
    pub status: SafeZoneStatus,
    pub primary: u32,
    pub secondary: u32,
}

impl CyclePlan {
    pub fn resolve(payload: String, state: &FormState) -> Option<Self> {
        if payload.is_empty() {
            return None;
        }
        Some(Self {
            payload,
            status: safe_zone::check(state),
            primary: state.size,
            secondary: secondary_edge(state.size),
        })
    }
}

pub struct RenderOrchestrator {
    state: Arc<Mutex<FormState>>,
    slots: Arc<Mutex<RasterSlots>>,
    ui: UnboundedSender<UiEvent>,
}

impl RenderOrchestrator {
    pub fn new(
        state: Arc<Mutex<FormState>>,
        slots: Arc<Mutex<RasterSlots>>,
        ui: UnboundedSender<UiEvent>,
    ) -> Self {
        Self { state, slots, ui }
    }

    /// Drives the debounce loop until the change stream closes. The final
    /// pending window, if any, still renders before returning.
    pub async fn run(self, mut changes: UnboundedReceiver<ChangeEvent>) {
        loop {
            match changes.recv().await {
                Some(ev) => debug!(field = ?ev.field, "state changed"),
                None => break,
            }

            let mut closed = false;
            loop {
                let timer = time::sleep(DEBOUNCE);
                tokio::pin!(timer);
                tokio::select! {
                    _ = &mut timer => break,
                    more = changes.recv() => match more {
                        // Any further change cancels and restarts the timer.
                        Some(ev) => debug!(field = ?ev.field, "state changed"),
                        None => {
                            closed = true;
                            break;
                        }
                    },
                }
            }

            self.render_cycle().await;

            if closed {
                break;
            }
        }
        debug!("change stream closed, render loop stopped");
    }

    /// One full cycle: payload, safe-zone status, both rasters, logo.
    pub async fn render_cycle(&self) {
        let snapshot = self.state.lock().expect("state mutex poisoned").clone();
        let payload = content::payload(&snapshot);
        let Some(plan) = CyclePlan::resolve(payload, &snapshot) else {
            debug!("empty payload, render cycle skipped");
            return;
        };

        let _ = self.ui.send(UiEvent::Status(plan.status.clone()));

        // Clear prior rasters before re-rendering, matching a cleared
        // container being repopulated.
        {
            let mut slots = self.slots.lock().expect("raster slots poisoned");
            slots.primary = None;
            slots.secondary = None;
        }

        let rendered = render_raster(&plan.payload, plan.primary, snapshot.color_fg, snapshot.color_bg)
            .and_then(|primary| {
                let secondary = render_raster(
                    &plan.payload,
                    plan.secondary,
                    snapshot.color_fg,
                    snapshot.color_bg,
                )?;
                Ok((primary, secondary))
            });
        let (primary, secondary) = match rendered {
            Ok(pair) => pair,
            Err(e) => {
                // A failed cycle leaves the slots empty; the next change
                // re-renders with the latest state.
                error!("render cycle failed: {}", e);
                return;
            }
        };

        {
            let mut slots = self.slots.lock().expect("raster slots poisoned");
            slots.primary = Some(primary);
            slots.secondary = Some(secondary);
        }
        debug!(
            primary = plan.primary,
            secondary = plan.secondary,
            "rendered QR rasters"
        );

        if let Some(logo) = snapshot.logo_image.clone() {
            time::sleep(LOGO_MOUNT_DELAY).await;
            let mut slots = self.slots.lock().expect("raster slots poisoned");
            if let Some(raster) = slots.primary.as_mut() {
                composite_logo(raster, plan.primary, &logo, snapshot.logo_size, snapshot.color_bg);
            }
            if let Some(raster) = slots.secondary.as_mut() {
                composite_logo(raster, plan.secondary, &logo, snapshot.logo_size, snapshot.color_bg);
            }
            debug!(logo_size = snapshot.logo_size, "composited logo overlay");
        }

        let _ = self.ui.send(UiEvent::Rendered {
            primary: plan.primary,
            secondary: plan.secondary,
        });
    }
}
