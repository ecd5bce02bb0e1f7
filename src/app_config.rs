use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::language_utils;
use crate::providers::deepl;
use crate::scene::FontName;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code in provider vocabulary (e.g. "EN", "FR", "ZH")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Replace text in place instead of adding annotation frames
    #[serde(default = "default_true")]
    pub replace_in_place: bool,

    /// How nodes already in the target language are skipped
    #[serde(default)]
    pub filter_strategy: FilterStrategy,

    /// Translation provider config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Annotation frame styling
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Strategy for skipping text that is already in the target language
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterStrategy {
    // @strategy: Send everything, skip what the provider detects as the target
    #[default]
    ProviderDetected,
    // @strategy: Skip locally detected target-language text before sending
    LocalHeuristic,
}

impl FilterStrategy {
    // @returns: Short identifier used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProviderDetected => "provider",
            Self::LocalHeuristic => "local",
        }
    }
}

// Implement Display trait for FilterStrategy
impl std::fmt::Display for FilterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Implement FromStr trait for FilterStrategy
impl std::str::FromStr for FilterStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "provider" | "provider_detected" => Ok(Self::ProviderDetected),
            "local" | "local_heuristic" => Ok(Self::LocalHeuristic),
            _ => Err(anyhow!("Invalid filter strategy: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translate endpoint URL (DeepL API or a proxy speaking its JSON)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; when empty the credential store is used
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Styling of annotation frames placed next to translated nodes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnnotationConfig {
    /// Frame opacity (0.0 to 1.0)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    #[serde(default = "default_padding")]
    pub vertical_padding: f32,

    #[serde(default = "default_padding")]
    pub horizontal_padding: f32,

    /// Width above which the frame stops hugging and the text wraps
    #[serde(default = "default_max_width")]
    pub max_width: f32,

    /// Horizontal gap between the frame and the source node
    #[serde(default = "default_gutter")]
    pub gutter: f32,

    /// Font used when the source node mixes fonts
    #[serde(default = "default_font")]
    pub default_font: FontName,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            vertical_padding: default_padding(),
            horizontal_padding: default_padding(),
            max_width: default_max_width(),
            gutter: default_gutter(),
            default_font: default_font(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "EN".to_string()
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    deepl::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500 // doubled on each retry
}

fn default_opacity() -> f32 {
    0.8
}

fn default_padding() -> f32 {
    10.0
}

fn default_max_width() -> f32 {
    500.0
}

fn default_gutter() -> f32 {
    100.0
}

fn default_font() -> FontName {
    FontName::new("Inter", "Regular")
}

impl Config {
    /// Load a config file, or create one with defaults when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            return serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json =
            serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if language_utils::is_auto_or_empty(&self.target_language) {
            return Err(anyhow!("A concrete target language is required"));
        }

        Url::parse(&self.translation.endpoint)
            .with_context(|| format!("Invalid endpoint URL: {}", self.translation.endpoint))?;

        if self.translation.retry_count > deepl::MAX_RETRY_COUNT {
            return Err(anyhow!(
                "Retry count must be at most {}, got {}",
                deepl::MAX_RETRY_COUNT,
                self.translation.retry_count
            ));
        }

        let annotation = &self.annotation;
        if !(0.0..=1.0).contains(&annotation.opacity) {
            return Err(anyhow!(
                "Annotation opacity must be between 0 and 1, got {}",
                annotation.opacity
            ));
        }
        if annotation.max_width <= 2.0 * annotation.horizontal_padding {
            return Err(anyhow!(
                "Annotation max width {} leaves no room inside padding {}",
                annotation.max_width,
                annotation.horizontal_padding
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            replace_in_place: default_true(),
            filter_strategy: FilterStrategy::default(),
            translation: TranslationConfig::default(),
            annotation: AnnotationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
