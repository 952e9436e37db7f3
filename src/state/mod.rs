//! Reactive wrapper around [`FormState`].
//!
//! Every setter applies the write, then fires exactly one [`ChangeEvent`]
//! to the registered watcher iff the value actually changed. Writes are
//! synchronous and per-field; coalescing happens downstream in the render
//! orchestrator, never here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::core::models::{Color, FormState, LogoImage, QrKind, WifiSecurity};

/// Names of the mutable fields, carried in change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    Size,
    ColorFg,
    ColorBg,
    LogoImage,
    LogoSize,
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
    WifiSecurity,
}

/// Typed old/new value in a change notification.
///
/// `Logo` compares by handle identity: two different decodes of the same
/// bytes are different values, re-setting the same handle is not a change.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Kind(QrKind),
    Size(u32),
    Color(Color),
    Percent(u8),
    Text(String),
    Security(WifiSecurity),
    Logo(Option<LogoImage>),
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Kind(a), FieldValue::Kind(b)) => a == b,
            (FieldValue::Size(a), FieldValue::Size(b)) => a == b,
            (FieldValue::Color(a), FieldValue::Color(b)) => a == b,
            (FieldValue::Percent(a), FieldValue::Percent(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Security(a), FieldValue::Security(b)) => a == b,
            (FieldValue::Logo(a), FieldValue::Logo(b)) => match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub field: Field,
    pub new: FieldValue,
    pub old: FieldValue,
}

pub struct StateContainer {
    state: Arc<Mutex<FormState>>,
    watcher: UnboundedSender<ChangeEvent>,
    revision: AtomicU64,
}

impl StateContainer {
    /// Wraps `initial` and returns the container plus the change stream.
    pub fn new(initial: FormState) -> (Self, UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                state: Arc::new(Mutex::new(initial)),
                watcher: tx,
                revision: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Counts the change notifications fired so far. Writes that leave a
    /// field unchanged do not advance it.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    /// Shared handle for readers that need state snapshots.
    pub fn shared(&self) -> Arc<Mutex<FormState>> {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> FormState {
        self.state.lock().expect("state mutex poisoned").clone()
    }

    fn notify(&self, field: Field, new: FieldValue, old: FieldValue) {
        self.revision.fetch_add(1, Ordering::Relaxed);
        // A closed watcher just means nobody is listening anymore.
        let _ = self.watcher.send(ChangeEvent { field, new, old });
    }

    /// Write + notify for one field. The lock is released before the
    /// notification so watchers can snapshot freely.
    fn write(&self, field: Field, new: FieldValue, apply: impl FnOnce(&mut FormState) -> FieldValue) {
        let old = {
            let mut state = self.state.lock().expect("state mutex poisoned");
            apply(&mut state)
        };
        if new != old {
            self.notify(field, new, old);
        }
    }

    pub fn set_kind(&self, value: QrKind) {
        self.write(Field::Kind, FieldValue::Kind(value), |s| {
            FieldValue::Kind(std::mem::replace(&mut s.kind, value))
        });
    }

    pub fn set_size(&self, value: u32) {
        self.write(Field::Size, FieldValue::Size(value), |s| {
            FieldValue::Size(std::mem::replace(&mut s.size, value))
        });
    }

    pub fn set_color_fg(&self, value: Color) {
        self.write(Field::ColorFg, FieldValue::Color(value), |s| {
            FieldValue::Color(std::mem::replace(&mut s.color_fg, value))
        });
    }

    pub fn set_color_bg(&self, value: Color) {
        self.write(Field::ColorBg, FieldValue::Color(value), |s| {
            FieldValue::Color(std::mem::replace(&mut s.color_bg, value))
        });
    }

    pub fn set_logo_image(&self, value: Option<LogoImage>) {
        let new = FieldValue::Logo(value.clone());
        self.write(Field::LogoImage, new, |s| {
            FieldValue::Logo(std::mem::replace(&mut s.logo_image, value))
        });
    }

    pub fn set_logo_size(&self, value: u8) {
        self.write(Field::LogoSize, FieldValue::Percent(value), |s| {
            FieldValue::Percent(std::mem::replace(&mut s.logo_size, value))
        });
    }

    pub fn set_wifi_security(&self, value: WifiSecurity) {
        self.write(Field::WifiSecurity, FieldValue::Security(value), |s| {
            FieldValue::Security(std::mem::replace(&mut s.wifi_security, value))
        });
    }

    pub fn set_url(&self, value: String) {
        self.set_text_field(Field::Url, value, |s| &mut s.url)
    }

    pub fn set_text(&self, value: String) {
        self.set_text_field(Field::Text, value, |s| &mut s.text)
    }

    pub fn set_email(&self, value: String) {
        self.set_text_field(Field::Email, value, |s| &mut s.email)
    }

    pub fn set_email_subject(&self, value: String) {
        self.set_text_field(Field::EmailSubject, value, |s| &mut s.email_subject)
    }

    pub fn set_email_body(&self, value: String) {
        self.set_text_field(Field::EmailBody, value, |s| &mut s.email_body)
    }

    pub fn set_phone(&self, value: String) {
        self.set_text_field(Field::Phone, value, |s| &mut s.phone)
    }

    pub fn set_sms_phone(&self, value: String) {
        self.set_text_field(Field::SmsPhone, value, |s| &mut s.sms_phone)
    }

    pub fn set_sms_msg(&self, value: String) {
        self.set_text_field(Field::SmsMsg, value, |s| &mut s.sms_msg)
    }

    pub fn set_ssid(&self, value: String) {
        self.set_text_field(Field::Ssid, value, |s| &mut s.ssid)
    }

    pub fn set_wifi_pass(&self, value: String) {
        self.set_text_field(Field::WifiPass, value, |s| &mut s.wifi_pass)
    }

    fn set_text_field(
        &self,
        field: Field,
        value: String,
        pick: impl FnOnce(&mut FormState) -> &mut String,
    ) {
        let new = FieldValue::Text(value.clone());
        self.write(field, new, |s| {
            FieldValue::Text(std::mem::replace(pick(s), value))
        });
    }
}
