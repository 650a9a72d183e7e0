use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::lyrics::{Lookahead, ParseOptions};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lyrics: ParseOptions,
    pub resolver: ResolverConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Seconds a line is highlighted ahead of its timestamp
    pub lookahead_secs: f64,
    /// No lookahead before this many seconds of playback
    pub grace_period_secs: f64,
    /// Start scrolling this many seconds before a line becomes active
    pub scroll_anticipation_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Clock tick interval in milliseconds
    pub tick_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let lookahead = Lookahead::default();
        Self {
            lookahead_secs: lookahead.tolerance,
            grace_period_secs: lookahead.grace_period,
            scroll_anticipation_secs: 0.25,
        }
    }
}

impl ResolverConfig {
    pub fn lookahead(&self) -> Lookahead {
        Lookahead {
            tolerance: self.lookahead_secs,
            grace_period: self.grace_period_secs,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "lyricline", "lyricline").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn resolve_path(override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_path(override_path)?;

    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg, &path).context("write default config")?;
        tracing::info!(path = %path.display(), "created default config");
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
