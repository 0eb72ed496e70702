// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_SUBMIT_DELAY: &str = "1500ms";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub submit: Submit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            submit: Submit::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Data {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub dark_mode: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            dark_mode: Some(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Submit {
    pub delay: Option<String>,
}

impl Default for Submit {
    fn default() -> Self {
        Self {
            delay: Some(DEFAULT_SUBMIT_DELAY.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SITEWALK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set SITEWALK_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(sitewalk_data::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [data], [ui], and [submit]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(delay) = &self.submit.delay {
            let parsed = parse_duration(delay)?;
            if parsed > Duration::from_secs(60) {
                bail!(
                    "submit.delay in {} must be at most 1m, got {}",
                    path.display(),
                    delay
                );
            }
        }
        Ok(())
    }

    /// Dataset file precedence: [data].path, then SITEWALK_DATA_PATH,
    /// then none (the seeded demo dataset).
    pub fn data_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.data.path {
            return Some(PathBuf::from(path));
        }
        env::var_os("SITEWALK_DATA_PATH").map(PathBuf::from)
    }

    pub fn dark_mode(&self) -> bool {
        self.ui.dark_mode.unwrap_or(false)
    }

    pub fn submit_delay(&self) -> Result<Duration> {
        parse_duration(self.submit.delay.as_deref().unwrap_or(DEFAULT_SUBMIT_DELAY))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# sitewalk config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Optional. Without a dataset file the seeded demo data is used.\n# path = \"/absolute/path/to/dataset.json\"\n\n[ui]\ndark_mode = false\n\n[submit]\ndelay = \"{}\"\n",
            path.display(),
            DEFAULT_SUBMIT_DELAY,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid delay duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid delay duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid delay duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 1500ms or 2s)")
}
