//! Engine settings.

use serde::{Deserialize, Serialize};

/// Settings that shape path parsing, slot selection and page titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Page extension without the dot (`html`).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Slot the renderer treats as the page's main text.
    #[serde(default = "default_slot")]
    pub default_slot: String,

    /// Appended to browser titles of every page except the site root.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Hard cap on wildcard redirect probes per request.
    #[serde(default = "default_max_redirect_probes")]
    pub max_redirect_probes: usize,
}

fn default_extension() -> String {
    "html".to_string()
}

fn default_slot() -> String {
    "text".to_string()
}

fn default_project_name() -> String {
    "Lectern".to_string()
}

fn default_max_redirect_probes() -> usize {
    64
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            default_slot: default_slot(),
            project_name: default_project_name(),
            max_redirect_probes: default_max_redirect_probes(),
        }
    }
}
