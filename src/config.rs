//! Tuning knobs for the scissors core. There is no config-file layer here:
//! this is a library, not a service, so callers wire a [`ScissorsConfig`]
//! up however their host application reads its own settings.

use crate::weigher::weigher_names;

/// How many vertices a single `extend_search` batch settles before the
/// background worker checks for cancellation and reports progress again.
/// Smaller values mean more responsive cancellation and finer-grained
/// progress, at the cost of more snapshot cloning.
pub const DEFAULT_BATCH_SIZE: u32 = 4096;

#[derive(Debug, Clone)]
pub struct ScissorsConfig {
    pub batch_size: u32,
    pub default_weigher: String,
}

impl Default for ScissorsConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            default_weigher: weigher_names()[0].to_string(),
        }
    }
}

impl ScissorsConfig {
    #[must_use]
    pub fn new(batch_size: u32, default_weigher: impl Into<String>) -> Self {
        Self {
            batch_size,
            default_weigher: default_weigher.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_weigher_is_a_known_name() {
        let config = ScissorsConfig::default();
        assert!(weigher_names().contains(&config.default_weigher.as_str()));
    }
}
