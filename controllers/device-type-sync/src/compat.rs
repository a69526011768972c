//! NetBox version compatibility
//!
//! The sync adjusts to two API differences across releases: module types
//! exist from 3.2, and the interface-template device-type filter was renamed
//! from `devicetype_id` to `device_type_id` in 4.0.

use crate::error::SyncError;
use std::fmt;
use std::str::FromStr;

/// Major/minor version reported by `GET /api/status/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NetBoxVersion {
    pub major: u32,
    pub minor: u32,
}

impl NetBoxVersion {
    /// Module types are available
    pub fn supports_modules(self) -> bool {
        self >= Self { major: 3, minor: 2 }
    }

    /// Query parameter that filters interface templates by device type
    pub fn interface_template_filter(self) -> &'static str {
        if self.major >= 4 {
            "device_type_id"
        } else {
            "devicetype_id"
        }
    }
}

impl FromStr for NetBoxVersion {
    type Err = SyncError;

    /// Accepts `3.7`, `3.7.2`, `v4.1.0` and pre-release forms like `4.0-beta1`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncError::IncompatibleVersion(s.to_string());

        let release = s
            .trim()
            .trim_start_matches('v')
            .split(['-', '+'])
            .next()
            .unwrap_or_default();
        let mut parts = release.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;

        Ok(Self { major, minor })
    }
}

impl fmt::Display for NetBoxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
