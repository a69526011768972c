//! Run tallies

use std::fmt;
use tracing::info;

/// Counts of objects created during a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncCounter {
    /// Device types created
    pub added: u64,
    /// Interface templates created
    pub updated: u64,
    /// Manufacturers created
    pub manufacturer: u64,
    /// Module types created
    pub module_added: u64,
    /// Module type ports created
    pub module_port_added: u64,
}

impl SyncCounter {
    /// True when the run created nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self) {
        if self.is_empty() {
            info!("NetBox already up to date, nothing created");
            return;
        }
        info!("{}", self);
    }
}

impl fmt::Display for SyncCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "manufacturers created: {}, device types created: {}, interface templates created: {}, \
             module types created: {}, module ports created: {}",
            self.manufacturer, self.added, self.updated, self.module_added, self.module_port_added
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(SyncCounter::default().is_empty());
    }

    #[test]
    fn test_display_lists_every_tally() {
        let counter = SyncCounter {
            added: 2,
            updated: 48,
            manufacturer: 1,
            ..SyncCounter::default()
        };
        assert!(!counter.is_empty());
        let summary = counter.to_string();
        assert!(summary.contains("manufacturers created: 1"));
        assert!(summary.contains("device types created: 2"));
        assert!(summary.contains("interface templates created: 48"));
    }
}
