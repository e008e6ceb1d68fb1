//! Optional AI-assist enrichment.
//!
//! Provider API keys come from the configuration file or the environment.
//! The scorer never depends on this module: when no provider is configured
//! the status is a fixed "unavailable" marker and reports carry a setup hint.
//! No network requests are made.

use std::fmt;

use crate::config::AssistConfig;

/// Environment variable holding the OpenAI key.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Anthropic key.
pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Values shipped in sample `.env` files; treated as unset.
const PLACEHOLDER_KEYS: &[&str] = &["sk-your-openai-key-here", "sk-ant-REDACTED"];

/// An AI provider the assist layer can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI.
    OpenAi,
    /// Anthropic.
    Anthropic,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic Claude"),
        }
    }
}

/// Availability of the assist layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistStatus {
    /// No provider configured.
    Unavailable,
    /// At least one provider has a key.
    Available {
        /// Configured providers.
        providers: Vec<Provider>,
    },
}

impl AssistStatus {
    /// One-line description for reports.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Unavailable => format!(
                "Análisis IA no disponible. Configurar {OPENAI_KEY_VAR} o {ANTHROPIC_KEY_VAR} para análisis avanzado"
            ),
            Self::Available { providers } => {
                let names: Vec<String> = providers.iter().map(ToString::to_string).collect();
                format!("Proveedores configurados: {}", names.join(", "))
            }
        }
    }
}

/// Resolved assist configuration.
#[derive(Debug, Clone, Default)]
pub struct AiAssist {
    providers: Vec<Provider>,
}

impl AiAssist {
    /// Resolves providers from the config file, letting environment
    /// variables override file values.
    #[must_use]
    pub fn from_config(config: &AssistConfig) -> Self {
        let openai = std::env::var(OPENAI_KEY_VAR)
            .ok()
            .or_else(|| config.openai_api_key.clone());
        let anthropic = std::env::var(ANTHROPIC_KEY_VAR)
            .ok()
            .or_else(|| config.anthropic_api_key.clone());

        Self::from_keys(openai.as_deref(), anthropic.as_deref())
    }

    /// Resolves providers from explicit key values.
    #[must_use]
    pub fn from_keys(openai: Option<&str>, anthropic: Option<&str>) -> Self {
        let mut providers = Vec::new();
        if openai.is_some_and(is_real_key) {
            providers.push(Provider::OpenAi);
        }
        if anthropic.is_some_and(is_real_key) {
            providers.push(Provider::Anthropic);
        }
        Self { providers }
    }

    /// Current availability.
    #[must_use]
    pub fn status(&self) -> AssistStatus {
        if self.providers.is_empty() {
            AssistStatus::Unavailable
        } else {
            AssistStatus::Available {
                providers: self.providers.clone(),
            }
        }
    }
}

fn is_real_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
}
