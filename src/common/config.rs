use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::layout_engine::command::validate_boundaries;
use crate::layout_engine::{Boundaries, BoundariesAction};

fn home_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir().context("could not determine the home directory")
}

pub fn data_dir() -> anyhow::Result<PathBuf> { Ok(home_dir()?.join(".rift-focus")) }
pub fn state_file() -> anyhow::Result<PathBuf> { Ok(data_dir()?.join("state.ron")) }
pub fn config_file() -> anyhow::Result<PathBuf> {
    Ok(home_dir()?.join(".config").join("rift-focus").join("config.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub focus: FocusSettings,
    #[serde(default)]
    pub gaps: GapSettings,
}

/// Defaults for focus commands. Each can be overridden per command.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FocusSettings {
    #[serde(default)]
    pub boundaries: Boundaries,
    #[serde(default)]
    pub boundaries_action: BoundariesAction,
    /// Let floating windows take part in directional navigation.
    #[serde(default = "yes")]
    pub floating_as_tiling: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        FocusSettings {
            boundaries: Boundaries::default(),
            boundaries_action: BoundariesAction::default(),
            floating_as_tiling: yes(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    /// Outer gaps (space between windows and screen edges)
    #[serde(default)]
    pub outer: OuterGaps,
}

/// Outer gap configuration (space between windows and screen edges)
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

impl Settings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.focus.validate());
        issues.extend(self.gaps.validate());
        issues
    }
}

impl FocusSettings {
    pub fn validate(&self) -> Vec<String> {
        match validate_boundaries(self.boundaries, self.boundaries_action) {
            Ok(()) => Vec::new(),
            Err(err) => vec![format!("focus: {err}")],
        }
    }
}

impl GapSettings {
    pub fn validate(&self) -> Vec<String> { self.outer.validate() }
}

impl OuterGaps {
    pub fn validate(&self) -> Vec<String> {
        [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ]
        .into_iter()
        .filter(|(_, gap)| *gap < 0.0)
        .map(|(side, gap)| format!("outer.{side} gap must be non-negative, got {gap}"))
        .collect()
    }
}

fn yes() -> bool { true }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf)
    }

    /// Reads `path` if it exists, falling back to the bundled defaults.
    pub fn read_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() { Self::read(path) } else { Ok(Self::default_config()) }
    }

    pub fn default_config() -> Config {
        Self::parse(include_str!("../../rift-focus.default.toml"))
            .unwrap_or_else(|err| panic!("bundled default config is invalid: {err}"))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = match toml::from_str(buf) {
            Ok(config) => config,
            Err(err) => bail!("invalid config: {}", err.message()),
        };
        Ok(config)
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }
}
