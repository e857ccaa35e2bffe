use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct RendererConfig {
    /// External command that turns the payload JSON into an explanatory
    /// animation. The payload path is appended as the last argument.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Word2vec text-format embeddings file. The built-in demo set is used
    /// when unset or unloadable.
    pub embeddings: Option<PathBuf>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub renderer: RendererConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embeddings: None,
            top_n: DEFAULT_TOP_N,
            renderer: RendererConfig::default(),
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "wordwheel", "wordwheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("WORDWHEEL"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Startup never fails on a bad or missing config file.
pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("falling back to default configuration: {e}");
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Watch the config directory and emit a reload event whenever the config
/// file itself changes.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("config watcher error: {e}");
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };
    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("failed to create config directory for watching: {e}");
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("failed to create config watcher: {e}");
            return;
        }
    };
    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("failed to watch config directory: {e}");
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let relevant = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);
                if relevant && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("config watch error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert!(config.embeddings.is_none());
        assert!(config.renderer.command.is_none());
    }

    #[test]
    fn deserializes_partial_toml() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                "embeddings = \"/data/vectors.txt\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = s.try_deserialize().unwrap();
        assert_eq!(config.embeddings, Some(PathBuf::from("/data/vectors.txt")));
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert!(config.renderer.command.is_none());
    }

    #[test]
    fn deserializes_renderer_table() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                "top_n = 7\n[renderer]\ncommand = \"manim -pql scenes.py\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = s.try_deserialize().unwrap();
        assert_eq!(config.top_n, 7);
        assert_eq!(
            config.renderer.command.as_deref(),
            Some("manim -pql scenes.py")
        );
    }
}
