//! TOML Configuration File Support
//!
//! Configuration for the widget, read from `~/.config/faqchat/widget.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoints]
//! chat = "http://localhost:3000/chat"
//! probe = "http://localhost:3000/test"
//! timeout_secs = 30
//!
//! [animation]
//! typing_delay_ms = 30
//!
//! [document]
//! delay_ms = 5000
//! filename = "conversation.pdf"
//! download_dir = "/home/me/Downloads"
//! page_size = "letter"
//!
//! [branding]
//! title = "26ideas FAQ Assistant"
//! subtitle = "Ask me anything about our services"
//! homepage = "https://26ideas.com"
//! welcome = "Hi! I'm the 26ideas FAQ Assistant. How can I help you today?"
//! fallback_reply = "Sorry, I could not process your request."
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animator::DEFAULT_TYPING_DELAY;
use crate::document::{GeneratorSettings, PageSize, DEFAULT_DOCUMENT_DELAY, DEFAULT_FILENAME};
use crate::fetcher::DEFAULT_REQUEST_TIMEOUT;

/// Bot text used when the chat endpoint returns an empty reply
pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, I could not process your request.";

/// Default chat endpoint
pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:3000/chat";

/// Default probe endpoint
pub const DEFAULT_PROBE_ENDPOINT: &str = "http://localhost:3000/test";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where configuration values came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Endpoints section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsToml {
    /// Chat endpoint URL
    pub chat: Option<String>,

    /// Probe endpoint URL
    pub probe: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Animation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationToml {
    /// Delay between revealed characters in milliseconds
    pub typing_delay_ms: Option<u64>,
}

/// Document section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentToml {
    /// Delay after the probe in milliseconds
    pub delay_ms: Option<u64>,

    /// Download file name
    pub filename: Option<String>,

    /// Directory downloads are written to
    pub download_dir: Option<PathBuf>,

    /// Page size of the generated document
    pub page_size: Option<PageSize>,
}

/// Branding section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingToml {
    /// Header title
    pub title: Option<String>,
    /// Header subtitle
    pub subtitle: Option<String>,
    /// Homepage link shown in the header
    pub homepage: Option<String>,
    /// Seeded welcome message
    pub welcome: Option<String>,
    /// Bot text shown when the endpoint replies with an empty string
    pub fallback_reply: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// Endpoints configuration section
    pub endpoints: EndpointsToml,

    /// Animation configuration section
    pub animation: AnimationToml,

    /// Document configuration section
    pub document: DocumentToml,

    /// Branding configuration section
    pub branding: BrandingToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Text shown in the header and the seeded first message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
    /// Header title
    pub title: String,
    /// Header subtitle
    pub subtitle: String,
    /// Homepage link
    pub homepage: String,
    /// Welcome message seeded into every session
    pub welcome: String,
    /// Typed in place of an empty reply
    pub fallback_reply: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            title: "26ideas FAQ Assistant".to_string(),
            subtitle: "Ask me anything about our services".to_string(),
            homepage: "https://26ideas.com".to_string(),
            welcome: "Hi! I'm the 26ideas FAQ Assistant. How can I help you today?".to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}

/// Centralized widget configuration
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Chat endpoint
    pub chat_endpoint: Url,

    /// Probe endpoint hit before a document is generated
    pub probe_endpoint: Url,

    /// Bound on a single request
    pub request_timeout: Duration,

    /// Delay between two revealed characters
    pub typing_delay: Duration,

    /// Delay between the probe returning and the document appearing
    pub document_delay: Duration,

    /// Download file name
    pub document_filename: String,

    /// Page size of generated documents
    pub page_size: PageSize,

    /// Directory downloads are written to
    pub download_dir: PathBuf,

    /// Header and welcome text
    pub branding: Branding,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

fn parse_url(value: &str, what: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::ValidationError(format!("{what} {value:?}: {e}")))
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: Url::parse(DEFAULT_CHAT_ENDPOINT).unwrap_or_else(|_| unreachable!()),
            probe_endpoint: Url::parse(DEFAULT_PROBE_ENDPOINT).unwrap_or_else(|_| unreachable!()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            typing_delay: DEFAULT_TYPING_DELAY,
            document_delay: DEFAULT_DOCUMENT_DELAY,
            document_filename: DEFAULT_FILENAME.to_string(),
            page_size: PageSize::default(),
            download_dir: PathBuf::from("."),
            branding: Branding::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl WidgetConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Document generator settings derived from this configuration
    #[must_use]
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            delay: self.document_delay,
            filename: self.document_filename.clone(),
            page_size: self.page_size,
        }
    }

    /// Check invariants that parsing alone cannot enforce
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero timeout, a zero
    /// typing delay or an empty file name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        if self.typing_delay.is_zero() {
            return Err(ConfigError::ValidationError(
                "typing delay must be greater than zero".to_string(),
            ));
        }
        let filename = self.document_filename.trim();
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "document filename {:?} must be a non-empty file name",
                self.document_filename
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/faqchat/widget.toml` or
/// `~/.config/faqchat/widget.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("faqchat").join("widget.toml"))
}

/// Load configuration from all sources with proper priority
///
/// CLI overrides are not handled here; apply a [`ConfigOverrides`] after.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// value fails validation. A missing config file is not an error.
pub fn load_config() -> Result<WidgetConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed or
/// validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<WidgetConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = WidgetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: WidgetToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut WidgetConfig, toml: &WidgetToml) -> Result<(), ConfigError> {
    // Endpoints
    if let Some(ref chat) = toml.endpoints.chat {
        config.chat_endpoint = parse_url(chat, "chat endpoint")?;
    }
    if let Some(ref probe) = toml.endpoints.probe {
        config.probe_endpoint = parse_url(probe, "probe endpoint")?;
    }
    if let Some(secs) = toml.endpoints.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }

    // Animation
    if let Some(ms) = toml.animation.typing_delay_ms {
        config.typing_delay = Duration::from_millis(ms);
    }

    // Document
    if let Some(ms) = toml.document.delay_ms {
        config.document_delay = Duration::from_millis(ms);
    }
    if let Some(ref filename) = toml.document.filename {
        config.document_filename.clone_from(filename);
    }
    if let Some(ref dir) = toml.document.download_dir {
        config.download_dir.clone_from(dir);
    }
    if let Some(size) = toml.document.page_size {
        config.page_size = size;
    }

    // Branding
    let branding = &toml.branding;
    if let Some(ref title) = branding.title {
        config.branding.title.clone_from(title);
    }
    if let Some(ref subtitle) = branding.subtitle {
        config.branding.subtitle.clone_from(subtitle);
    }
    if let Some(ref homepage) = branding.homepage {
        config.branding.homepage.clone_from(homepage);
    }
    if let Some(ref welcome) = branding.welcome {
        config.branding.welcome.clone_from(welcome);
    }
    if let Some(ref fallback) = branding.fallback_reply {
        config.branding.fallback_reply.clone_from(fallback);
    }

    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparsable numbers are ignored with a warning; unparsable URLs are errors.
fn apply_env_config<F>(config: &mut WidgetConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let number = |key: &str| -> Option<u64> {
        let raw = env(key)?;
        match raw.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring non-numeric environment value");
                None
            }
        }
    };

    if let Some(url) = env("FAQCHAT_CHAT_URL") {
        config.chat_endpoint = parse_url(&url, "FAQCHAT_CHAT_URL")?;
        config.source = ConfigSource::Env;
    }
    if let Some(url) = env("FAQCHAT_PROBE_URL") {
        config.probe_endpoint = parse_url(&url, "FAQCHAT_PROBE_URL")?;
        config.source = ConfigSource::Env;
    }
    if let Some(secs) = number("FAQCHAT_TIMEOUT_SECS") {
        config.request_timeout = Duration::from_secs(secs);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = number("FAQCHAT_TYPING_DELAY_MS") {
        config.typing_delay = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = number("FAQCHAT_DOCUMENT_DELAY_MS") {
        config.document_delay = Duration::from_millis(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(dir) = env("FAQCHAT_DOWNLOAD_DIR") {
        config.download_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }

    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Chat endpoint override
    pub chat_endpoint: Option<String>,

    /// Probe endpoint override
    pub probe_endpoint: Option<String>,

    /// Download directory override
    pub download_dir: Option<PathBuf>,

    /// Typing delay override (milliseconds)
    pub typing_delay_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chat endpoint override
    #[must_use]
    pub fn with_chat_endpoint(mut self, url: impl Into<String>) -> Self {
        self.chat_endpoint = Some(url.into());
        self
    }

    /// Set probe endpoint override
    #[must_use]
    pub fn with_probe_endpoint(mut self, url: impl Into<String>) -> Self {
        self.probe_endpoint = Some(url.into());
        self
    }

    /// Set download directory override
    #[must_use]
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = Some(dir);
        self
    }

    /// Set typing delay override
    #[must_use]
    pub fn with_typing_delay_ms(mut self, ms: u64) -> Self {
        self.typing_delay_ms = Some(ms);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chat_endpoint.is_none()
            && self.probe_endpoint.is_none()
            && self.download_dir.is_none()
            && self.typing_delay_ms.is_none()
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an unparsable URL or a
    /// resulting configuration that fails validation.
    pub fn apply(&self, config: &mut WidgetConfig) -> Result<(), ConfigError> {
        if let Some(ref url) = self.chat_endpoint {
            config.chat_endpoint = parse_url(url, "--chat-url")?;
        }
        if let Some(ref url) = self.probe_endpoint {
            config.probe_endpoint = parse_url(url, "--probe-url")?;
        }
        if let Some(ref dir) = self.download_dir {
            config.download_dir.clone_from(dir);
        }
        if let Some(ms) = self.typing_delay_ms {
            config.typing_delay = Duration::from_millis(ms);
        }
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = WidgetConfig::default();
        assert_eq!(config.chat_endpoint.as_str(), DEFAULT_CHAT_ENDPOINT);
        assert_eq!(config.probe_endpoint.as_str(), DEFAULT_PROBE_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.typing_delay, Duration::from_millis(30));
        assert_eq!(config.document_delay, Duration::from_millis(5000));
        assert_eq!(config.document_filename, "conversation.pdf");
        assert_eq!(config.page_size, PageSize::Letter);
        assert_eq!(config.branding.title, "26ideas FAQ Assistant");
        assert_eq!(config.branding.fallback_reply, DEFAULT_FALLBACK_REPLY);
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_endpoints_are_valid_urls() {
        // Default relies on these parsing
        for raw in [DEFAULT_CHAT_ENDPOINT, DEFAULT_PROBE_ENDPOINT] {
            let url = Url::parse(raw).unwrap();
            assert_eq!(url.scheme(), "http");
            assert_eq!(url.port(), Some(3000));
        }
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("faqchat/widget.toml"));
        }
    }

    // =========================================================================
    // TOML Parsing
    // =========================================================================

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[endpoints]
chat = "https://faq.example.com/chat"
probe = "https://faq.example.com/test"
timeout_secs = 10

[animation]
typing_delay_ms = 15

[document]
delay_ms = 250
filename = "transcript.pdf"
download_dir = "/tmp/downloads"
page_size = "a4"

[branding]
title = "Example FAQ"
welcome = "Hello there"
fallback_reply = "No answer, try again"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.chat_endpoint.as_str(), "https://faq.example.com/chat");
        assert_eq!(config.probe_endpoint.as_str(), "https://faq.example.com/test");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.typing_delay, Duration::from_millis(15));
        assert_eq!(config.document_delay, Duration::from_millis(250));
        assert_eq!(config.document_filename, "transcript.pdf");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/downloads"));
        assert_eq!(config.page_size, PageSize::A4);
        assert_eq!(config.branding.title, "Example FAQ");
        assert_eq!(config.branding.welcome, "Hello there");
        assert_eq!(config.branding.fallback_reply, "No answer, try again");
        // untouched keys keep their defaults
        assert_eq!(config.branding.subtitle, "Ask me anything about our services");
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_empty_toml() {
        let file = write_toml("");
        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.chat_endpoint.as_str(), DEFAULT_CHAT_ENDPOINT);
        assert_eq!(config.source(), ConfigSource::File);
    }

    // =========================================================================
    // Missing / Malformed Files
    // =========================================================================

    #[test]
    fn test_missing_file_graceful() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[endpoints\nchat = ");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_bad_url_in_file_is_validation_error() {
        let file = write_toml("[endpoints]\nchat = \"not a url\"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_typing_delay_rejected() {
        let file = write_toml("[animation]\ntyping_delay_ms = 0\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(err.to_string().contains("typing delay"));
    }

    #[test]
    fn test_empty_filename_rejected() {
        let file = write_toml("[document]\nfilename = \"  \"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    // =========================================================================
    // Priority
    // =========================================================================

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml(
            "[endpoints]\nchat = \"http://file.example/chat\"\ntimeout_secs = 5\n",
        );
        let env = env_from(&[
            ("FAQCHAT_CHAT_URL", "http://env.example/chat"),
            ("FAQCHAT_DOCUMENT_DELAY_MS", "100"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.chat_endpoint.as_str(), "http://env.example/chat");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.document_delay, Duration::from_millis(100));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_non_numeric_is_ignored() {
        let env = env_from(&[("FAQCHAT_TYPING_DELAY_MS", "fast")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.typing_delay, DEFAULT_TYPING_DELAY);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = env_from(&[
            ("FAQCHAT_CHAT_URL", "http://env.example/chat"),
            ("FAQCHAT_DOWNLOAD_DIR", "/env/dir"),
        ]);
        let mut config = load_config_with_env(None, env).unwrap();

        ConfigOverrides::new()
            .with_chat_endpoint("http://cli.example/chat")
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.chat_endpoint.as_str(), "http://cli.example/chat");
        assert_eq!(config.download_dir, PathBuf::from("/env/dir"));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    // =========================================================================
    // ConfigOverrides
    // =========================================================================

    #[test]
    fn test_config_overrides_builder() {
        let overrides = ConfigOverrides::new()
            .with_probe_endpoint("http://cli.example/test")
            .with_download_dir(PathBuf::from("/cli"))
            .with_typing_delay_ms(5);

        assert_eq!(overrides.probe_endpoint.as_deref(), Some("http://cli.example/test"));
        assert_eq!(overrides.download_dir, Some(PathBuf::from("/cli")));
        assert_eq!(overrides.typing_delay_ms, Some(5));
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = WidgetConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.chat_endpoint.as_str(), DEFAULT_CHAT_ENDPOINT);
    }

    #[test]
    fn test_config_overrides_bad_url() {
        let mut config = WidgetConfig::default();
        let err = ConfigOverrides::new()
            .with_chat_endpoint("::nope::")
            .apply(&mut config)
            .unwrap_err();
        assert!(err.to_string().contains("--chat-url"));
    }

    #[test]
    fn test_generator_settings_follow_config() {
        let mut config = WidgetConfig::default();
        config.document_delay = Duration::from_millis(10);
        config.document_filename = "faq.pdf".to_string();

        let settings = config.generator_settings();
        assert_eq!(settings.delay, Duration::from_millis(10));
        assert_eq!(settings.filename, "faq.pdf");
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
