//! Flags logo overlays large enough to risk breaking scannability.

use crate::core::models::FormState;

/// Largest logo share (percent of the QR edge) that high error correction
/// reliably tolerates.
pub const SAFE_ZONE_MAX_PCT: u8 = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeZoneStatus {
    pub is_unsafe: bool,
    /// Populated only when unsafe.
    pub message: Option<String>,
}

/// Unsafe iff a logo is present and its size exceeds the safe zone.
/// The configuration is never blocked; callers only warn.
pub fn check(state: &FormState) -> SafeZoneStatus {
    let is_unsafe = state.logo_image.is_some() && state.logo_size > SAFE_ZONE_MAX_PCT;
    let message = is_unsafe.then(|| {
        format!(
            "Logo size {}% exceeds safe zone ({}%). QR may not scan reliably.",
            state.logo_size, SAFE_ZONE_MAX_PCT
        )
    });
    SafeZoneStatus { is_unsafe, message }
}
