use std::fs;

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

const CONFIG_DIR: &str = "makit";
const CONFIG_FILE: &str = "config.toml";

/// Defaults loaded from `<config_dir>/makit/config.toml` or `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MakitConfig {
    /// Same syntax as `--mode`.
    pub mode: Option<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub no_create: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigPathSource {
    Explicit,
    UserDefault,
}

impl ConfigPathSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::UserDefault => "user-default",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedConfigPath {
    pub path: Utf8PathBuf,
    pub source: ConfigPathSource,
}

/// Pick the defaults file to read, if any. An explicit path must exist; the
/// user default is only used when present and `discover` is set.
pub fn resolve_path(
    explicit: Option<&Utf8Path>,
    discover: bool,
) -> Result<Option<ResolvedConfigPath>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("config file {} does not exist", path);
        }
        return Ok(Some(ResolvedConfigPath {
            path: path.to_owned(),
            source: ConfigPathSource::Explicit,
        }));
    }

    if !discover {
        return Ok(None);
    }

    let Some(dir) = dirs::config_dir() else {
        return Ok(None);
    };
    let dir = match Utf8PathBuf::from_path_buf(dir) {
        Ok(dir) => dir,
        Err(dir) => {
            tracing::warn!(dir = %dir.display(), "config directory is not valid UTF-8");
            return Ok(None);
        }
    };
    let path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
    Ok(path.is_file().then_some(ResolvedConfigPath {
        path,
        source: ConfigPathSource::UserDefault,
    }))
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<MakitConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// Resolve and load defaults; no file means all defaults.
pub fn load(explicit: Option<&Utf8Path>, discover: bool) -> Result<MakitConfig> {
    load_resolved(resolve_path(explicit, discover)?)
}

/// An explicit file that fails to load is fatal. A discovered one is only
/// warned about, so a broken user file never blocks a run.
pub fn load_resolved(resolved: Option<ResolvedConfigPath>) -> Result<MakitConfig> {
    let Some(resolved) = resolved else {
        return Ok(MakitConfig::default());
    };
    tracing::debug!(
        path = %resolved.path,
        source = resolved.source.as_str(),
        "loading defaults"
    );

    match (load_from_path(&resolved.path), resolved.source) {
        (Ok(config), _) => Ok(config),
        (Err(err), ConfigPathSource::Explicit) => Err(err),
        (Err(err), ConfigPathSource::UserDefault) => {
            tracing::warn!(
                path = %resolved.path,
                error = %format!("{err:#}"),
                "ignoring defaults file"
            );
            Ok(MakitConfig::default())
        }
    }
}
