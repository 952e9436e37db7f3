use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actions::Actions;
use crate::core::config::AppConfig;
use crate::core::models::{
    Color, FormState, Notification, NotificationKind, QrKind, WifiSecurity,
};
use crate::render::orchestrator::{RasterSlots, RenderOrchestrator, UiEvent};
use crate::state::StateContainer;
use crate::utils::image::decode_logo;

/// Free-text fields of the form, addressed by the edit binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentField {
    Url,
    Text,
    Email,
    EmailSubject,
    EmailBody,
    Phone,
    SmsPhone,
    SmsMsg,
    Ssid,
    WifiPass,
}

/// One interaction with the UI surface. Each variant maps 1:1 to a state
/// field write or an action invocation.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    SelectKind(QrKind),
    SelectSize(u32),
    ApplyPreset { foreground: Color, background: Color },
    PickForeground(Color),
    PickBackground(Color),
    Edit(ContentField, String),
    SelectWifiSecurity(WifiSecurity),
    UploadLogo(Vec<u8>),
    SetLogoSize(u8),
    RemoveLogo,
    Download,
    Copy,
}

/// Application context: configuration, the reactive state container, the
/// background render task, the shared raster slots, and the UI event stream.
/// Constructed once per session; everything that needs it receives it
/// explicitly.
pub struct App {
    config: AppConfig,
    container: StateContainer,
    actions: Actions,
    ui_tx: UnboundedSender<UiEvent>,
    ui_rx: Option<UnboundedReceiver<UiEvent>>,
    render_task: JoinHandle<()>,
}

impl App {
    /// Builds the context and spawns the render loop. The loop performs one
    /// initial render before settling into debounced operation, so a session
    /// with untouched defaults still produces a raster.
    pub fn new(config: AppConfig) -> Self {
        let initial = FormState {
            kind: config.defaults.kind,
            size: config.defaults.size,
            color_fg: config.defaults.foreground,
            color_bg: config.defaults.background,
            logo_size: config.defaults.logo_size,
            ..FormState::default()
        };

        let (container, changes) = StateContainer::new(initial);
        let slots = Arc::new(Mutex::new(RasterSlots::default()));
        let (ui_tx, ui_rx) = unbounded_channel();

        let orchestrator =
            RenderOrchestrator::new(container.shared(), Arc::clone(&slots), ui_tx.clone());
        let render_task = tokio::spawn(async move {
            orchestrator.render_cycle().await;
            orchestrator.run(changes).await;
        });

        let output_dir = config
            .output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let actions = Actions::new(Arc::clone(&slots), ui_tx.clone(), output_dir);

        Self {
            config,
            container,
            actions,
            ui_tx,
            ui_rx: Some(ui_rx),
            render_task,
        }
    }

    pub fn state(&self) -> &StateContainer {
        &self.container
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Takes the UI event stream. Single consumer.
    pub fn ui_events(&mut self) -> UnboundedReceiver<UiEvent> {
        self.ui_rx.take().expect("UI event stream already taken")
    }

    /// Routes one control event into the reactive state or an action.
    pub fn apply(&self, event: ControlEvent) {
        match event {
            ControlEvent::SelectKind(kind) => self.container.set_kind(kind),
            ControlEvent::SelectSize(size) => self.container.set_size(size),
            ControlEvent::ApplyPreset {
                foreground,
                background,
            } => {
                self.container.set_color_fg(foreground);
                self.container.set_color_bg(background);
            }
            ControlEvent::PickForeground(color) => self.container.set_color_fg(color),
            ControlEvent::PickBackground(color) => self.container.set_color_bg(color),
            ControlEvent::Edit(field, value) => self.edit(field, value),
            ControlEvent::SelectWifiSecurity(security) => {
                self.container.set_wifi_security(security)
            }
            ControlEvent::UploadLogo(bytes) => self.upload_logo(&bytes),
            ControlEvent::SetLogoSize(percent) => self.container.set_logo_size(percent),
            ControlEvent::RemoveLogo => self.container.set_logo_image(None),
            ControlEvent::Download => {
                if let Err(e) = self.actions.download() {
                    warn!("download action failed: {}", e);
                }
            }
            ControlEvent::Copy => {
                if let Err(e) = self.actions.copy() {
                    warn!("copy action failed: {}", e);
                }
            }
        }
    }

    fn edit(&self, field: ContentField, value: String) {
        match field {
            ContentField::Url => self.container.set_url(value),
            ContentField::Text => self.container.set_text(value),
            ContentField::Email => self.container.set_email(value),
            ContentField::EmailSubject => self.container.set_email_subject(value),
            ContentField::EmailBody => self.container.set_email_body(value),
            ContentField::Phone => self.container.set_phone(value),
            ContentField::SmsPhone => self.container.set_sms_phone(value),
            ContentField::SmsMsg => self.container.set_sms_msg(value),
            ContentField::Ssid => self.container.set_ssid(value),
            ContentField::WifiPass => self.container.set_wifi_pass(value),
        }
    }

    /// Rejects oversized files before decode; form state stays untouched on
    /// every failure path.
    fn upload_logo(&self, bytes: &[u8]) {
        match decode_logo(bytes) {
            Ok(logo) => {
                self.container.set_logo_image(Some(logo));
                self.notify(Notification::success("Logo added!"));
            }
            Err(crate::core::error::AppError::OversizedUpload { .. }) => {
                self.notify(Notification::error("File too large (max 2MB)"));
            }
            Err(e) => {
                self.notify(Notification::error(format!("Logo decode failed: {}", e)));
            }
        }
    }

    fn notify(&self, notification: Notification) {
        let _ = self.ui_tx.send(UiEvent::Toast(notification));
    }

    /// Waits until the next completed render, logging the UI traffic seen
    /// on the way. `None` on timeout or a closed stream.
    pub async fn settle(
        &self,
        ui_rx: &mut UnboundedReceiver<UiEvent>,
        timeout: Duration,
    ) -> Option<(u32, u32)> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let event = tokio::time::timeout_at(deadline, ui_rx.recv()).await.ok()??;
            match event {
                UiEvent::Rendered { primary, secondary } => return Some((primary, secondary)),
                other => self.log_event(&other),
            }
        }
    }

    fn log_event(&self, event: &UiEvent) {
        match event {
            UiEvent::Status(status) => {
                if let Some(message) = &status.message {
                    warn!("{}", message);
                }
            }
            UiEvent::Toast(notification) => {
                if self.config.ui.log_toasts {
                    match notification.kind {
                        NotificationKind::Success => info!("{}", notification.message),
                        NotificationKind::Error => error!("{}", notification.message),
                    }
                }
            }
            UiEvent::Rendered { primary, secondary } => {
                info!("rendered QR at {}px (mobile {}px)", primary, secondary)
            }
        }
    }

    /// One-shot CLI session: apply the control events, let the debounce
    /// settle, then save and/or copy the result.
    pub async fn run_session(
        mut self,
        events: Vec<ControlEvent>,
        download: bool,
        copy: bool,
    ) -> Result<Option<PathBuf>> {
        let mut ui_rx = self.ui_events();
        let settle_timeout = Duration::from_secs(5);

        // Initial render of the configured defaults.
        if self.settle(&mut ui_rx, settle_timeout).await.is_none() {
            warn!("initial render did not complete");
        }

        // Flags that restate the current defaults fire no change events, so
        // gate the second wait on the revision counter rather than the flag
        // count.
        let before = self.container.revision();
        for event in events {
            self.apply(event);
        }
        if self.container.revision() != before
            && self.settle(&mut ui_rx, settle_timeout).await.is_none()
        {
            warn!("render did not complete after applying settings");
        }

        let mut saved = None;
        if download {
            saved = self.actions.download()?;
            if saved.is_none() {
                warn!("nothing rendered yet, no file written");
            }
        }
        if copy {
            if !self.actions.copy()? {
                warn!("nothing rendered yet, clipboard untouched");
            }
        }

        // Drain and log whatever the session produced.
        while let Ok(event) = ui_rx.try_recv() {
            self.log_event(&event);
        }

        self.shutdown().await;
        Ok(saved)
    }

    /// Closes the change stream and waits for the render loop to finish its
    /// final pending cycle.
    pub async fn shutdown(self) {
        drop(self.container);
        drop(self.actions);
        if let Err(e) = self.render_task.await {
            error!("render task failed: {}", e);
        }
    }
}
