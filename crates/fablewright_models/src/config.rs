//! Layered configuration for provider selection and credentials.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`fablewright.toml` shipped with the library)
//! 2. User config in home directory (`~/.config/fablewright/fablewright.toml`)
//! 3. User config in current directory (`./fablewright.toml`)
//! 4. Environment variables prefixed `FABLEWRIGHT_`, with `__` between
//!    nested keys (`FABLEWRIGHT_PROVIDERS__IMAGE=stability,openai`)

use config::{Config, Environment, File, FileFormat};
use fablewright_core::{Channel, ProviderKind};
use fablewright_error::{ConfigError, FablewrightError, FablewrightResult};
use fablewright_retry::FallbackOptions;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

const DEFAULT_CONFIG: &str = include_str!("../../../fablewright.toml");

/// Provider type used when a channel's configured list is empty.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::OpenAi;

/// Raw ordered provider lists, one comma-separated string per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderLists {
    /// Text-channel preference list
    #[serde(default)]
    pub text: String,
    /// Image-channel preference list
    #[serde(default)]
    pub image: String,
}

/// Endpoint, model and credential settings for one provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// API base URL without trailing slash
    pub base_url: String,
    /// Model used for narrative text
    #[serde(default)]
    pub text_model: Option<String>,
    /// Model used for image analysis
    #[serde(default)]
    pub vision_model: Option<String>,
    /// Model used for image generation
    #[serde(default)]
    pub image_model: Option<String>,
}

impl ProviderSettings {
    /// API key from the configured environment variable, if present and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Top-level Fablewright configuration.
///
/// # Example
///
/// ```no_run
/// use fablewright_models::FablewrightConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FablewrightConfig::load()?;
/// println!("text providers: {:?}", config.text_providers());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FablewrightConfig {
    /// Ordered provider lists
    #[serde(default)]
    pub providers: ProviderLists,
    /// Deadline and retry budget per provider
    #[serde(default)]
    pub fallback: FallbackOptions,
    /// OpenAI settings
    pub openai: ProviderSettings,
    /// Anthropic settings
    pub anthropic: ProviderSettings,
    /// Gemini settings
    pub gemini: ProviderSettings,
    /// Stability settings
    pub stability: ProviderSettings,
}

impl FablewrightConfig {
    /// Bundled defaults only, ignoring user files and the environment.
    pub fn bundled() -> FablewrightResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Bundled defaults overridden by a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> FablewrightResult<Self> {
        debug!("Loading configuration from file");

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with full precedence (see module docs).
    #[instrument]
    pub fn load() -> FablewrightResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/fablewright/fablewright.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("fablewright").required(false))
            .add_source(
                Environment::with_prefix("FABLEWRIGHT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> FablewrightResult<Self> {
        builder
            .build()
            .map_err(|e| {
                FablewrightError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                FablewrightError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Ordered text-channel provider types.
    pub fn text_providers(&self) -> Vec<ProviderKind> {
        parse_provider_list(&self.providers.text, Channel::Text)
    }

    /// Ordered image-channel provider types.
    pub fn image_providers(&self) -> Vec<ProviderKind> {
        parse_provider_list(&self.providers.image, Channel::Image)
    }

    /// Settings block for a provider type.
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Stability => &self.stability,
        }
    }
}

/// Parse a comma-separated provider list.
///
/// Unknown names are dropped with a warning and repeats keep their first
/// position. An empty result falls back to [`DEFAULT_PROVIDER`].
///
/// # Examples
///
/// ```
/// use fablewright_core::{Channel, ProviderKind};
/// use fablewright_models::parse_provider_list;
///
/// let kinds = parse_provider_list(" Stability, dalle, openai ,stability", Channel::Image);
/// assert_eq!(kinds, vec![ProviderKind::Stability, ProviderKind::OpenAi]);
///
/// assert_eq!(parse_provider_list("", Channel::Text), vec![ProviderKind::OpenAi]);
/// ```
pub fn parse_provider_list(raw: &str, channel: Channel) -> Vec<ProviderKind> {
    let mut kinds = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match ProviderKind::from_str(name) {
            Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Ok(_) => debug!(%channel, provider = name, "Ignoring repeated provider"),
            Err(_) => warn!(%channel, provider = name, "Dropping unknown provider type"),
        }
    }

    if kinds.is_empty() {
        debug!(%channel, default = %DEFAULT_PROVIDER, "Provider list empty, using default");
        kinds.push(DEFAULT_PROVIDER);
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let config = FablewrightConfig::bundled().unwrap();
        assert_eq!(
            config.text_providers(),
            vec![
                ProviderKind::OpenAi,
                ProviderKind::Anthropic,
                ProviderKind::Gemini
            ]
        );
        assert_eq!(
            config.image_providers(),
            vec![ProviderKind::OpenAi, ProviderKind::Stability]
        );
        assert_eq!(config.fallback, FallbackOptions::default());
        assert_eq!(config.openai.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_only_unknown_names_yield_default() {
        assert_eq!(
            parse_provider_list("midjourney, dall-e", Channel::Image),
            vec![DEFAULT_PROVIDER]
        );
    }

    #[test]
    fn test_settings_lookup() {
        let config = FablewrightConfig::bundled().unwrap();
        assert_eq!(
            config.settings(ProviderKind::Stability).image_model.as_deref(),
            Some("stable-diffusion-xl-1024-v1-0")
        );
    }
}
