use serde::{Deserialize, Serialize};

/// Layout settings for rendered diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Column limit for legend entries, measured before `legend_indent`.
    pub width: usize,
    /// Spaces prefixed to every legend line.
    pub legend_indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 79,
            legend_indent: 2,
        }
    }
}
