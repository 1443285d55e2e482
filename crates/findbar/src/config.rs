//! Optional configuration file at `~/.config/findbar/config.toml`.
//!
//! ```toml
//! [find_bar]
//! placeholder = "Search this page"
//! char_limit = 120
//! accepts_focus = true
//!
//! [theme]
//! query = "#e66000"
//! counter = "gray"
//! border = "#eeeeee"
//! ```
//!
//! A missing file yields the defaults silently. A file that cannot be read or
//! parsed yields the defaults plus a warning for the host to display.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use findbar_widgets::find_bar::{FindBarOptions, FindBarStyle};
use ratatui::style::{Color, Style};
use serde::Deserialize;

/// Errors raised while reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid color {value:?} for theme.{field}")]
    Color { field: &'static str, value: String },
}

/// `[find_bar]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FindBarSection {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub char_limit: Option<usize>,
    #[serde(default = "default_accepts_focus")]
    pub accepts_focus: bool,
}

fn default_placeholder() -> String {
    FindBarOptions::default().placeholder
}

fn default_accepts_focus() -> bool {
    true
}

impl Default for FindBarSection {
    fn default() -> Self {
        FindBarSection {
            placeholder: default_placeholder(),
            char_limit: None,
            accepts_focus: default_accepts_focus(),
        }
    }
}

/// `[theme]` section. Unset colors keep the built-in style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThemeConfig {
    pub query: Option<String>,
    pub counter: Option<String>,
    pub button: Option<String>,
    pub button_disabled: Option<String>,
    pub border: Option<String>,
    pub background: Option<String>,
}

impl ThemeConfig {
    /// Apply the configured colors on top of the default style.
    pub fn to_style(&self) -> Result<FindBarStyle, ConfigError> {
        let mut style = FindBarStyle::default();
        apply_fg(&mut style.query, "query", &self.query)?;
        apply_fg(&mut style.counter, "counter", &self.counter)?;
        apply_fg(&mut style.button, "button", &self.button)?;
        apply_fg(&mut style.button_disabled, "button_disabled", &self.button_disabled)?;
        apply_fg(&mut style.border, "border", &self.border)?;
        if let Some(value) = &self.background {
            style.background = Style::default().bg(parse_color("background", value)?);
        }
        Ok(style)
    }
}

fn apply_fg(style: &mut Style, field: &'static str, value: &Option<String>) -> Result<(), ConfigError> {
    if let Some(value) = value {
        *style = style.fg(parse_color(field, value)?);
    }
    Ok(())
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_str(value).map_err(|_| ConfigError::Color {
        field,
        value: value.to_string(),
    })
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub find_bar: FindBarSection,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Config {
    /// Build bar options from this configuration.
    pub fn find_bar_options(&self) -> Result<FindBarOptions, ConfigError> {
        Ok(FindBarOptions {
            placeholder: self.find_bar.placeholder.clone(),
            char_limit: self.find_bar.char_limit,
            accepts_focus: self.find_bar.accepts_focus,
            style: self.theme.to_style()?,
            ..FindBarOptions::default()
        })
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigResult {
    pub config: Config,
    pub warning: Option<String>,
}

/// Load `~/.config/findbar/config.toml`.
pub fn load_config() -> ConfigResult {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &Path) -> ConfigResult {
    log::debug!("loading config from {:?}", path);

    if !path.exists() {
        log::debug!("config file does not exist, using defaults");
        return ConfigResult {
            config: Config::default(),
            warning: None,
        };
    }

    match read_config(path) {
        Ok(config) => ConfigResult {
            config,
            warning: None,
        },
        Err(err @ ConfigError::Color { .. }) => {
            log::error!("config file {:?}: {}", path, err);
            // Keep the non-theme settings; only the theme is discarded.
            let config = fs::read_to_string(path)
                .ok()
                .and_then(|contents| toml::from_str::<Config>(&contents).ok())
                .map(|config| Config {
                    theme: ThemeConfig::default(),
                    ..config
                })
                .unwrap_or_default();
            ConfigResult {
                config,
                warning: Some(err.to_string()),
            }
        }
        Err(err) => {
            log::error!("config file {:?}: {}", path, err);
            ConfigResult {
                config: Config::default(),
                warning: Some(err.to_string()),
            }
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    config.theme.to_style()?;
    Ok(config)
}

/// `~/.config/findbar/config.toml` on every platform.
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("findbar")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_uses_defaults_silently() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from(&dir.path().join("config.toml"));
        assert_eq!(result.config, Config::default());
        assert!(result.warning.is_none());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let file = write_config("");
        let result = load_config_from(file.path());
        assert_eq!(result.config.find_bar.placeholder, "Find in page");
        assert!(result.config.find_bar.accepts_focus);
        assert!(result.warning.is_none());
    }

    #[test]
    fn reads_find_bar_section() {
        let file = write_config(
            r#"
[find_bar]
placeholder = "Search"
char_limit = 12
accepts_focus = false
"#,
        );
        let result = load_config_from(file.path());
        assert!(result.warning.is_none());
        let options = result.config.find_bar_options().unwrap();
        assert_eq!(options.placeholder, "Search");
        assert_eq!(options.char_limit, Some(12));
        assert!(!options.accepts_focus);
    }

    #[test]
    fn invalid_toml_falls_back_with_warning() {
        let file = write_config("[find_bar\nplaceholder = ");
        let result = load_config_from(file.path());
        assert_eq!(result.config, Config::default());
        let warning = result.warning.unwrap();
        assert!(warning.starts_with("invalid config"), "{warning}");
    }

    #[test]
    fn theme_colors_parse() {
        let theme = ThemeConfig {
            query: Some("#e66000".into()),
            counter: Some("gray".into()),
            background: Some("black".into()),
            ..ThemeConfig::default()
        };
        let style = theme.to_style().unwrap();
        assert_eq!(style.query.fg, Some(Color::Rgb(0xe6, 0x60, 0x00)));
        assert_eq!(style.counter.fg, Some(Color::Gray));
        assert_eq!(style.background.bg, Some(Color::Black));
    }

    #[test]
    fn bad_color_drops_only_the_theme() {
        let file = write_config(
            r#"
[find_bar]
placeholder = "Look for"

[theme]
border = "not-a-color"
"#,
        );
        let result = load_config_from(file.path());
        assert_eq!(result.config.find_bar.placeholder, "Look for");
        assert_eq!(result.config.theme, ThemeConfig::default());
        let warning = result.warning.unwrap();
        assert!(warning.contains("theme.border"), "{warning}");
    }
}
