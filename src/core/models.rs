use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::error::AppError;

/// QR raster edge lengths offered by the size selector, in pixels.
pub const SIZE_PRESETS: [u32; 4] = [150, 200, 250, 300];

/// Payload schema selected by the type control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    Url,
    Text,
    Email,
    Phone,
    Sms,
    Wifi,
}

impl Default for QrKind {
    fn default() -> Self {
        QrKind::Url
    }
}

impl fmt::Display for QrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QrKind::Url => "url",
            QrKind::Text => "text",
            QrKind::Email => "email",
            QrKind::Phone => "phone",
            QrKind::Sms => "sms",
            QrKind::Wifi => "wifi",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QrKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "url" => Ok(QrKind::Url),
            "text" => Ok(QrKind::Text),
            "email" => Ok(QrKind::Email),
            "phone" => Ok(QrKind::Phone),
            "sms" => Ok(QrKind::Sms),
            "wifi" => Ok(QrKind::Wifi),
            other => Err(format!(
                "unknown QR kind '{}', expected url/text/email/phone/sms/wifi",
                other
            )),
        }
    }
}

/// Wi-Fi security mode as it appears in the `WIFI:T:` payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    Nopass,
}

impl Default for WifiSecurity {
    fn default() -> Self {
        WifiSecurity::Wpa
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::Nopass => "nopass",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for WifiSecurity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" => Ok(WifiSecurity::Wpa),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" | "none" => Ok(WifiSecurity::Nopass),
            other => Err(format!(
                "unknown Wi-Fi security '{}', expected WPA/WEP/nopass",
                other
            )),
        }
    }
}

/// Hex triplet color (`#RRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
pub const WHITE: Color = Color {
    r: 0xFF,
    g: 0xFF,
    b: 0xFF,
};

impl Color {
    pub fn rgba(&self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::InvalidColor(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| AppError::InvalidColor(s.to_string()))
        };
        Ok(Color {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// Decoded logo raster. Shared by handle; equality is identity, not pixels.
pub type LogoImage = Arc<RgbaImage>;

/// All user-editable fields. Created once at startup, mutated field-by-field
/// through the reactive container for the rest of the session.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: QrKind,
    pub size: u32,
    pub color_fg: Color,
    pub color_bg: Color,
    pub logo_image: Option<LogoImage>,
    pub logo_size: u8,

    // Per-kind content fields. Only the active kind's fields are consumed;
    // the rest are retained untouched.
    pub url: String,
    pub text: String,
    pub email: String,
    pub email_subject: String,
    pub email_body: String,
    pub phone: String,
    pub sms_phone: String,
    pub sms_msg: String,
    pub ssid: String,
    pub wifi_pass: String,
    pub wifi_security: WifiSecurity,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            kind: QrKind::Url,
            size: 200,
            color_fg: BLACK,
            color_bg: WHITE,
            logo_image: None,
            logo_size: 25,
            url: "https://example.com".to_string(),
            text: String::new(),
            email: String::new(),
            email_subject: String::new(),
            email_body: String::new(),
            phone: String::new(),
            sms_phone: String::new(),
            sms_msg: String::new(),
            ssid: String::new(),
            wifi_pass: String::new(),
            wifi_security: WifiSecurity::Wpa,
        }
    }
}

/// Toast-style user notification emitted by actions and uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}
