//! Bot configuration, layered as defaults, then a TOML file, then
//! environment variables, then command-line flags. Every field remembers
//! which layer set it so `--show-config` can explain the result.

use std::fs;
use std::path::{Path, PathBuf};

use chipbot_engine::{GameOptions, TableConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "CHIPBOT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub prefix: String,
    pub database: PathBuf,
    pub assets: PathBuf,
    pub image_dir: PathBuf,
    pub seed: Option<u64>,
    pub table: GameOptions,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".into(),
            database: PathBuf::from("chipbot.db"),
            assets: PathBuf::from("Cards"),
            image_dir: PathBuf::from("out"),
            seed: None,
            table: GameOptions::default(),
        }
    }
}

impl BotConfig {
    pub fn table_config(&self) -> TableConfig {
        TableConfig {
            prefix: self.prefix.clone(),
            options: self.table,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigSources {
    pub prefix: ValueSource,
    pub database: ValueSource,
    pub assets: ValueSource,
    pub image_dir: ValueSource,
    pub seed: ValueSource,
    pub table: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            prefix: ValueSource::Default,
            database: ValueSource::Default,
            assets: ValueSource::Default,
            image_dir: ValueSource::Default,
            seed: ValueSource::Default,
            table: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: BotConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prefix: Option<String>,
    pub database: Option<PathBuf>,
    pub assets: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    database: Option<PathBuf>,
    #[serde(default)]
    assets: Option<PathBuf>,
    #[serde(default)]
    image_dir: Option<PathBuf>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    table: Option<GameOptions>,
}

/// Resolves the configuration from the process environment.
pub fn load_with_sources(
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<ConfigResolved, ConfigError> {
    resolve(file, |key| std::env::var(key).ok(), overrides)
}

/// Resolves the configuration with `env` standing in for the environment.
///
/// The file is `file` if given, otherwise whatever `CHIPBOT_CONFIG` names.
pub fn resolve<E>(
    file: Option<&Path>,
    env: E,
    overrides: &Overrides,
) -> Result<ConfigResolved, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let mut cfg = BotConfig::default();
    let mut sources = ConfigSources::default();
    let env = |key: &str| env(key).filter(|v| !v.is_empty());

    let path = file.map(Path::to_path_buf).or_else(|| env(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = path {
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let f: FileConfig = toml::from_str(&text)?;
        if let Some(v) = f.prefix {
            cfg.prefix = v;
            sources.prefix = ValueSource::File;
        }
        if let Some(v) = f.database {
            cfg.database = v;
            sources.database = ValueSource::File;
        }
        if let Some(v) = f.assets {
            cfg.assets = v;
            sources.assets = ValueSource::File;
        }
        if let Some(v) = f.image_dir {
            cfg.image_dir = v;
            sources.image_dir = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.table {
            cfg.table = v;
            sources.table = ValueSource::File;
        }
    }

    if let Some(v) = env("CHIPBOT_PREFIX") {
        cfg.prefix = v;
        sources.prefix = ValueSource::Env;
    }
    if let Some(v) = env("CHIPBOT_DATABASE") {
        cfg.database = PathBuf::from(v);
        sources.database = ValueSource::Env;
    }
    if let Some(v) = env("CHIPBOT_ASSETS") {
        cfg.assets = PathBuf::from(v);
        sources.assets = ValueSource::Env;
    }
    if let Some(v) = env("CHIPBOT_SEED") {
        cfg.seed = Some(
            v.parse()
                .map_err(|_| ConfigError::Invalid(format!("CHIPBOT_SEED '{v}' is not a number")))?,
        );
        sources.seed = ValueSource::Env;
    }

    if let Some(v) = &overrides.prefix {
        cfg.prefix = v.clone();
        sources.prefix = ValueSource::Cli;
    }
    if let Some(v) = &overrides.database {
        cfg.database = v.clone();
        sources.database = ValueSource::Cli;
    }
    if let Some(v) = &overrides.assets {
        cfg.assets = v.clone();
        sources.assets = ValueSource::Cli;
    }
    if let Some(v) = &overrides.image_dir {
        cfg.image_dir = v.clone();
        sources.image_dir = ValueSource::Cli;
    }
    if let Some(v) = overrides.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Cli;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn validate(cfg: &BotConfig) -> Result<(), ConfigError> {
    if cfg.prefix.trim().is_empty() {
        return Err(ConfigError::Invalid("prefix must not be empty".into()));
    }
    if cfg.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(
            "prefix must not contain whitespace".into(),
        ));
    }
    cfg.table
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("table: {e}")))
}
