//! Device fingerprinting.
//!
//! Voting is limited per device without requiring a login. A device is
//! identified by hashing a handful of passively observable browser
//! signals. The result is a bucketing key, not a unique identifier: two
//! devices with identical configurations share an id, and a device that
//! changes any signal (new browser version, resized screen) gets a new one.

use serde::{Deserialize, Serialize};

/// Prefix of every fingerprint-derived voter id.
pub const DEVICE_ID_PREFIX: &str = "device_";

const SIGNAL_DELIMITER: char = '|';

/// Something that can name the voter behind a request.
pub trait VoterIdentity {
    fn voter_id(&self) -> String;
}

/// Ambient browser signals a device id is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSignals {
    pub user_agent: String,
    /// BCP 47 language tag, e.g. "en-US"
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Minutes between UTC and local time, as browsers report it (UTC+2 is -120)
    pub timezone_offset: i32,
}

impl DeviceSignals {
    fn joined(&self) -> String {
        let d = SIGNAL_DELIMITER;
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.user_agent,
            self.language,
            self.screen_width,
            self.screen_height,
            self.timezone_offset
        )
    }
}

impl VoterIdentity for DeviceSignals {
    fn voter_id(&self) -> String {
        compute_device_id(self)
    }
}

/// Derive the device id for a set of signals.
///
/// Same signals always give the same id.
pub fn compute_device_id(signals: &DeviceSignals) -> String {
    let hash = rolling_hash(&signals.joined());
    format!("{}{:x}", DEVICE_ID_PREFIX, hash.unsigned_abs())
}

/// 32-bit `hash * 31 + c` over UTF-16 code units, wrapping on overflow.
fn rolling_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> DeviceSignals {
        DeviceSignals {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0".to_string(),
            language: "en-US".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            timezone_offset: -120,
        }
    }

    #[test]
    fn test_rolling_hash_known_values() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(rolling_hash("a"), 97);
        // 97 * 31 + 98
        assert_eq!(rolling_hash("ab"), 3105);
        // Same as Java's "hello".hashCode()
        assert_eq!(rolling_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_rolling_hash_wraps_to_32_bits() {
        let long = "x".repeat(64);
        let expected = long
            .bytes()
            .fold(0i64, |h, c| ((h * 31 + i64::from(c)) as i32) as i64);
        assert_eq!(i64::from(rolling_hash(&long)), expected);
    }

    #[test]
    fn test_device_id_format() {
        let id = compute_device_id(&desktop());
        let hex = id.strip_prefix(DEVICE_ID_PREFIX).expect("missing prefix");

        assert!(!hex.is_empty());
        assert!(
            hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "Expected lowercase hex, got {}",
            id
        );
    }

    #[test]
    fn test_device_id_is_deterministic() {
        assert_eq!(compute_device_id(&desktop()), compute_device_id(&desktop()));
        assert_eq!(desktop().voter_id(), compute_device_id(&desktop()));
    }

    #[test]
    fn test_device_id_changes_with_each_signal() {
        let base = compute_device_id(&desktop());

        let variants = [
            DeviceSignals { user_agent: "Mozilla/5.0 Chrome/126.0".into(), ..desktop() },
            DeviceSignals { language: "de-DE".into(), ..desktop() },
            DeviceSignals { screen_width: 1921, ..desktop() },
            DeviceSignals { screen_height: 1081, ..desktop() },
            DeviceSignals { timezone_offset: 0, ..desktop() },
        ];

        for variant in &variants {
            assert_ne!(
                compute_device_id(variant),
                base,
                "Changing a signal should change the id: {:?}",
                variant
            );
        }
    }

    #[test]
    fn test_device_id_almost_always_differs_across_widths() {
        let ids: std::collections::HashSet<_> = (800..1800)
            .map(|w| compute_device_id(&DeviceSignals { screen_width: w, ..desktop() }))
            .collect();

        // Collisions are possible in principle; a sample this small should have none
        assert!(ids.len() >= 995, "Too many collisions: {} distinct ids", ids.len());
    }

    #[test]
    fn test_non_ascii_signals_hash_utf16_units() {
        let signals = DeviceSignals { language: "日本語".into(), ..desktop() };
        let id = compute_device_id(&signals);
        assert!(id.starts_with(DEVICE_ID_PREFIX));
        assert_ne!(id, compute_device_id(&desktop()));
    }
}
