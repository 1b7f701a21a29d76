use std::time::Duration;
use tracing::warn;
use crate::tracker::DEFAULT_INTERVAL;

pub const CHANNEL_BUFFER_VAR: &str = "BIKEWASH_CHANNEL_BUFFER";
pub const TRACKER_INTERVAL_VAR: &str = "BIKEWASH_TRACKER_INTERVAL_MS";

/// Runtime knobs for the marketplace system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    /// Bounded mailbox size of every actor.
    pub channel_buffer: usize,
    /// Delay between automatic order advances.
    pub tracker_interval: Duration,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            tracker_interval: DEFAULT_INTERVAL,
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by `BIKEWASH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Malformed or zero values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(buffer) = parse_positive(&lookup, CHANNEL_BUFFER_VAR) {
            config.channel_buffer = buffer as usize;
        }
        if let Some(ms) = parse_positive(&lookup, TRACKER_INTERVAL_VAR) {
            config.tracker_interval = Duration::from_millis(ms);
        }
        config
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(key, value = %raw, "Ignoring invalid setting");
            None
        }
    }
}
