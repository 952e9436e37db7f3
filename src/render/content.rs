//! Derives the QR payload string from the active form state.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::core::models::{FormState, QrKind};

pub const FALLBACK_URL: &str = "https://example.com";
pub const FALLBACK_TEXT: &str = "Hello World";

// Everything except A-Za-z0-9 - _ . ! ~ * ' ( ), the set query components
// in mailto:/sms: links conventionally leave bare.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(component: &str) -> String {
    utf8_percent_encode(component, QUERY).to_string()
}

/// Pure and total over every [`QrKind`]. Empty per-kind fields fall back or
/// drop their query parameter as the payload format allows; the result is
/// what gets encoded into the symbol, verbatim.
pub fn payload(state: &FormState) -> String {
    match state.kind {
        QrKind::Url => {
            if state.url.is_empty() {
                FALLBACK_URL.to_string()
            } else {
                state.url.clone()
            }
        }
        QrKind::Text => {
            if state.text.is_empty() {
                FALLBACK_TEXT.to_string()
            } else {
                state.text.clone()
            }
        }
        QrKind::Email => {
            let mut params = Vec::new();
            if !state.email_subject.is_empty() {
                params.push(format!("subject={}", encode(&state.email_subject)));
            }
            if !state.email_body.is_empty() {
                params.push(format!("body={}", encode(&state.email_body)));
            }
            if params.is_empty() {
                format!("mailto:{}", state.email)
            } else {
                format!("mailto:{}?{}", state.email, params.join("&"))
            }
        }
        QrKind::Phone => format!("tel:{}", state.phone),
        QrKind::Sms => {
            if state.sms_msg.is_empty() {
                format!("sms:{}", state.sms_phone)
            } else {
                format!("sms:{}?body={}", state.sms_phone, encode(&state.sms_msg))
            }
        }
        QrKind::Wifi => format!(
            "WIFI:T:{};S:{};P:{};;",
            state.wifi_security, state.ssid, state.wifi_pass
        ),
    }
}
