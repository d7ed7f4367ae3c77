//! Where `ppq` learns its archive root, queue user, and poll policy.
//!
//! Three sources, in falling precedence: command-line flags, the YAML
//! config file (`--config`, else `$PPQ_CONFIG`), and the environment
//! (`$PP_ROOT`, `$USER`).

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Environment fallback for the archive root.
pub const ROOT_ENV: &str = "PP_ROOT";

/// Environment fallback for the config file path.
pub const CONFIG_ENV: &str = "PPQ_CONFIG";

fn default_poll_secs() -> u64 {
    30
}

fn default_max_polls() -> usize {
    120
}

/// The `ppq` config file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PpqConfig {
    /// Archive root to use when no `--root` flag is given.
    pub root: Option<PathBuf>,
    /// Queue user for `queue`, when not given on the command line.
    pub user: Option<String>,
    /// Seconds between residency polls in `stage --wait`.
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
    /// Residency polls before `stage --wait` gives up.
    #[serde(default = "default_max_polls")]
    pub max_polls: usize,
}

impl Default for PpqConfig {
    fn default() -> Self {
        PpqConfig {
            root: None,
            user: None,
            poll_secs: default_poll_secs(),
            max_polls: default_max_polls(),
        }
    }
}

/// Load configuration from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PpqConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file: {}", path.as_ref().display()))?;

    let config: PpqConfig =
        serde_yaml::from_str(&content).context("failed to parse YAML configuration")?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration.
pub(crate) fn validate_config(config: &PpqConfig) -> Result<()> {
    if config.poll_secs == 0 {
        anyhow::bail!("poll_secs must be greater than 0");
    }

    if config.max_polls == 0 {
        anyhow::bail!("max_polls must be greater than 0");
    }

    if let Some(user) = &config.user
        && user.is_empty()
    {
        anyhow::bail!("user cannot be empty when set");
    }

    Ok(())
}

/// Resolved settings shared by every subcommand.
pub struct Context {
    root_flag: Option<PathBuf>,
    config: PpqConfig,
}

impl Context {
    pub fn new(root_flag: Option<PathBuf>, config: PpqConfig) -> Self {
        Context { root_flag, config }
    }

    /// Build the context from the global flags, loading the config file
    /// named by `--config` or `$PPQ_CONFIG` when either is present.
    pub fn load(root_flag: Option<PathBuf>, config_flag: Option<PathBuf>) -> Result<Self> {
        let config_path = config_flag.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => PpqConfig::default(),
        };
        Ok(Context::new(root_flag, config))
    }

    /// The archive root: `--root` flag, else the config file, else
    /// `$PP_ROOT`.
    pub fn archive_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root_flag {
            return Ok(root.clone());
        }
        if let Some(root) = &self.config.root {
            return Ok(root.clone());
        }
        env::var(ROOT_ENV).map(PathBuf::from).map_err(|_| {
            anyhow!("no archive root: pass --root, set `root` in the config file, or set {ROOT_ENV}")
        })
    }

    /// The queue user: command-line argument, else the config file,
    /// else `$USER`.
    pub fn queue_user(&self, arg: Option<String>) -> Result<String> {
        if let Some(user) = arg {
            return Ok(user);
        }
        if let Some(user) = &self.config.user {
            return Ok(user.clone());
        }
        env::var("USER")
            .map_err(|_| anyhow!("no queue user: pass one, set `user` in the config file, or set USER"))
    }

    pub fn poll_secs(&self) -> u64 {
        self.config.poll_secs
    }

    pub fn max_polls(&self) -> usize {
        self.config.max_polls
    }
}
