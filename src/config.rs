use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV_PREFIX: &str = "FONTLET";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub figlet: FigletConfig,
    #[serde(default)]
    pub ui: UIConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigletConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_font_extension")]
    pub font_extension: String,
    #[serde(default = "default_font_dirs")]
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FigletConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            font_extension: default_font_extension(),
            font_dirs: default_font_dirs(),
        }
    }
}

fn default_command() -> String {
    "figlet".into()
}

fn default_font_extension() -> String {
    "flf".into()
}

fn default_font_dirs() -> Vec<PathBuf> {
    [
        "/usr/share/figlet/fonts",
        "/usr/share/figlet",
        "/usr/local/share/figlet/fonts",
        "/usr/local/share/figlet",
        "/opt/homebrew/share/figlet/fonts",
        "/opt/homebrew/share/figlet",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UIConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
    #[serde(default = "default_preview_margin")]
    pub preview_margin: usize,
    #[serde(default = "default_output_margin")]
    pub output_margin: usize,
    #[serde(default = "default_min_width")]
    pub min_width: usize,
    #[serde(default = "default_status_timeout", with = "humantime_serde")]
    pub status_timeout: Duration,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            preview_lines: default_preview_lines(),
            preview_margin: default_preview_margin(),
            output_margin: default_output_margin(),
            min_width: default_min_width(),
            status_timeout: default_status_timeout(),
        }
    }
}

fn default_theme() -> String {
    "default".into()
}

fn default_preview_lines() -> usize {
    11
}

fn default_preview_margin() -> usize {
    20
}

fn default_output_margin() -> usize {
    8
}

fn default_min_width() -> usize {
    20
}

fn default_status_timeout() -> Duration {
    Duration::from_secs(2)
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    apply_env(&mut cfg, prefix);

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.figlet.command.trim().is_empty() {
        base.figlet.command = other.figlet.command;
    }
    if !other.figlet.font_extension.trim().is_empty() {
        base.figlet.font_extension = other.figlet.font_extension;
    }
    if !other.figlet.font_dirs.is_empty() {
        base.figlet.font_dirs = other.figlet.font_dirs;
    }

    if !other.ui.theme.is_empty() {
        base.ui.theme = other.ui.theme;
    }
    if other.ui.preview_lines != 0 {
        base.ui.preview_lines = other.ui.preview_lines;
    }
    base.ui.preview_margin = other.ui.preview_margin;
    base.ui.output_margin = other.ui.output_margin;
    if other.ui.min_width != 0 {
        base.ui.min_width = other.ui.min_width;
    }
    base.ui.status_timeout = other.ui.status_timeout;

    base
}

// Environment values are applied on top of the merged file config, so only the
// keys that are actually set take effect.
fn apply_env(cfg: &mut Config, prefix: &str) {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    for (key, value) in map {
        apply_env_value(cfg, &key, value);
    }
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "figlet.command" => cfg.figlet.command = value,
        "figlet.font_extension" => cfg.figlet.font_extension = value,
        "figlet.font_dirs" => {
            cfg.figlet.font_dirs = env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        "ui.theme" => cfg.ui.theme = value,
        "ui.preview_lines" => {
            if let Ok(parsed) = value.parse::<usize>() {
                if parsed > 0 {
                    cfg.ui.preview_lines = parsed;
                }
            }
        }
        "ui.preview_margin" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.ui.preview_margin = parsed;
            }
        }
        "ui.output_margin" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.ui.output_margin = parsed;
            }
        }
        "ui.min_width" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.ui.min_width = parsed;
            }
        }
        "ui.status_timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.ui.status_timeout = duration;
            }
        }
        _ => {}
    }
}

pub fn default_path() -> Option<PathBuf> {
    default_config_path()
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fontlet").join("config.yaml"))
}
