#[cfg(feature = "serde")]
use serde::Deserialize;

/// Limits applied when compiling templates and matching requests.
///
/// With the `serde` feature the config deserializes from any serde format;
/// missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct RouterConfig {
    /// Trie children one match may try before it gives up.
    pub max_match_steps: usize,
    /// Forms a single template may expand to through its optional parts.
    pub max_template_alternatives: usize,
    pub max_segments: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_match_steps: 10_000,
            max_template_alternatives: 64,
            max_segments: 64,
        }
    }
}

impl RouterConfig {
    pub fn with_max_match_steps(mut self, steps: usize) -> Self {
        self.max_match_steps = steps;
        self
    }

    pub fn with_max_template_alternatives(mut self, alternatives: usize) -> Self {
        self.max_template_alternatives = alternatives;
        self
    }

    pub fn with_max_segments(mut self, segments: usize) -> Self {
        self.max_segments = segments;
        self
    }
}
