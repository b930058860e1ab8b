use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::coord::guard::{DEFAULT_CONFIRM_PROMPT, DEFAULT_UNLOAD_PROMPT};

/// Configuration from carebook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Text of the in-app "discard changes?" popup
    #[serde(default = "default_confirm_prompt")]
    pub confirm_prompt: String,
    /// Text of the prompt shown when quitting with unsaved changes
    #[serde(default = "default_unload_prompt")]
    pub unload_prompt: String,
    /// Upper bound on programmatic initialization for surfaces that don't
    /// signal completion themselves
    #[serde(default = "default_init_fallback_ms")]
    pub init_fallback_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        GuardConfig {
            confirm_prompt: default_confirm_prompt(),
            unload_prompt: default_unload_prompt(),
            init_fallback_ms: default_init_fallback_ms(),
        }
    }
}

fn default_confirm_prompt() -> String {
    DEFAULT_CONFIRM_PROMPT.to_string()
}

fn default_unload_prompt() -> String {
    DEFAULT_UNLOAD_PROMPT.to_string()
}

fn default_init_fallback_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides by theme slot name ("highlight" = "#FB4196")
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
