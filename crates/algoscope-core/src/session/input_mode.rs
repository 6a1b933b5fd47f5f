//! Input mode of a session.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the user writes in a session. Chosen once, before the first message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Pseudocode, sent to the AST analysis endpoint.
    Pseudocode,
    /// Prose, translated to pseudocode by the service before analysis.
    Natural,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Pseudocode => "pseudocode",
            InputMode::Natural => "natural",
        }
    }
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pseudo" | "pseudocode" | "code" => Ok(InputMode::Pseudocode),
            "natural" | "nl" | "text" => Ok(InputMode::Natural),
            other => Err(format!(
                "unknown input mode '{other}', expected pseudocode or natural"
            )),
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
