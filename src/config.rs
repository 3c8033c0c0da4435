//! Configuration management for paperfolio using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Default delay step between card animations, in milliseconds.
pub const DEFAULT_ANIMATION_STEP_MS: u64 = 100;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Site source directory (local assets such as the CV PDF live here).
    pub source_dir: PathBuf,
    /// Directory the generated site is written to.
    pub output_dir: PathBuf,
    /// Public base URL used to probe document sizes. None = read local files.
    pub site_url: Option<String>,
    /// Name shown in the page header and titles.
    pub site_title: String,
    /// User agent for size probes (None = default).
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Animation delay step between cards.
    pub animation_step_ms: u64,
    /// Paper catalog override (None = embedded catalog).
    pub papers_file: Option<PathBuf>,
    /// Showcase data override (None = embedded descriptors).
    pub showcase_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("public"),
            site_url: None,
            site_title: "Publications".to_string(),
            user_agent: None,
            request_timeout: 30,
            animation_step_ms: DEFAULT_ANIMATION_STEP_MS,
            papers_file: None,
            showcase_file: None,
        }
    }
}

impl Settings {
    /// Create settings rooted at a custom source directory.
    pub fn with_source_dir(source_dir: PathBuf) -> Self {
        Self {
            output_dir: source_dir.join("public"),
            source_dir,
            ..Default::default()
        }
    }

    /// Ensure the output directory exists.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site source directory.
    #[serde(default)]
    pub source: Option<String>,
    /// Output directory.
    #[serde(default)]
    pub output: Option<String>,
    /// Public base URL of the deployed site.
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub site_title: Option<String>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    #[serde(default)]
    pub animation_step_ms: Option<u64>,
    /// Paper catalog file (TOML or JSON).
    #[serde(default)]
    pub papers: Option<String>,
    /// Showcase data file (TOML or JSON).
    #[serde(default)]
    pub showcase: Option<String>,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers paperfolio config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("paperfolio").await {
            Ok(pref_config) => Config {
                source: pref_config.get("source").ok(),
                output: pref_config.get("output").ok(),
                site_url: pref_config.get("site_url").ok(),
                site_title: pref_config.get("site_title").ok(),
                user_agent: pref_config.get("user_agent").ok(),
                request_timeout: pref_config.get("request_timeout").ok(),
                animation_step_ms: pref_config.get("animation_step_ms").ok(),
                papers: pref_config.get("papers").ok(),
                showcase: pref_config.get("showcase").ok(),
            },
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Parse a config file directly.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref source) = self.source {
            settings.source_dir = expand(source);
            settings.output_dir = settings.source_dir.join("public");
        }
        if let Some(ref output) = self.output {
            settings.output_dir = expand(output);
        }
        if let Some(ref url) = self.site_url {
            settings.site_url = Some(url.clone());
        }
        if let Some(ref title) = self.site_title {
            settings.site_title = title.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(step) = self.animation_step_ms {
            settings.animation_step_ms = step;
        }
        if let Some(ref papers) = self.papers {
            settings.papers_file = Some(expand(papers));
        }
        if let Some(ref showcase) = self.showcase {
            settings.showcase_file = Some(expand(showcase));
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_only_set_values() {
        let config: Config = toml::from_str(
            r#"
            source = "/srv/site"
            site_url = "https://example.org"
            animation_step_ms = 50
            "#,
        )
        .unwrap();
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.source_dir, PathBuf::from("/srv/site"));
        assert_eq!(settings.output_dir, PathBuf::from("/srv/site/public"));
        assert_eq!(settings.site_url.as_deref(), Some("https://example.org"));
        assert_eq!(settings.animation_step_ms, 50);
        assert_eq!(settings.request_timeout, 30);
        assert!(settings.papers_file.is_none());
    }

    #[test]
    fn test_output_overrides_source_default() {
        let config = Config {
            source: Some("/srv/site".to_string()),
            output: Some("/tmp/out".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
    }
}
