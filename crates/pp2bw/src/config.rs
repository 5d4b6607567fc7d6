//! Configuration file.
use pp2bw_migrate::import::csv::MapperOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Export file read when no configuration names one.
pub const DEFAULT_INPUT: &str = "passwords_plus.csv";

/// Document written when no configuration names one.
pub const DEFAULT_OUTPUT: &str = "bitwarden.json";

/// Configuration file loaded from the working directory
/// when it exists.
pub const CONFIG_FILE: &str = "pp2bw.toml";

/// Configuration for a conversion.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Passwords Plus CSV export.
    pub input: PathBuf,

    /// Bitwarden JSON document.
    pub output: PathBuf,

    /// Report of skipped rows, defaults to a file
    /// next to the output.
    pub report: Option<PathBuf>,

    /// Replace an existing output file.
    pub overwrite: bool,

    /// How rows are mapped to items.
    pub mapping: MapperOptions,

    /// Path the file was loaded from used to determine
    /// relative paths.
    #[serde(skip)]
    file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            report: None,
            overwrite: false,
            mapping: Default::default(),
            file: None,
        }
    }
}

impl Config {
    /// Load a config from a file path.
    ///
    /// Relative paths in the file are resolved against the
    /// directory containing the file.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !tokio::fs::try_exists(path.as_ref()).await? {
            return Err(Error::NotFile(path.as_ref().to_path_buf()));
        }

        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let mut config: Config = toml::from_str(&contents)?;
        let file = path.as_ref().canonicalize()?;

        if let Some(dir) = file.parent() {
            if config.input.is_relative() {
                config.input = dir.join(&config.input);
            }
            if config.output.is_relative() {
                config.output = dir.join(&config.output);
            }
            if let Some(report) = config.report.as_mut() {
                if report.is_relative() {
                    *report = dir.join(&*report);
                }
            }
        }

        config.file = Some(file);
        Ok(config)
    }

    /// Load the config file at the path when given, otherwise
    /// the default config file when it exists or the defaults.
    pub async fn resolve(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                if tokio::fs::try_exists(CONFIG_FILE).await? {
                    Self::load(CONFIG_FILE).await
                } else {
                    Ok(Default::default())
                }
            }
        }
    }

    /// Path the config was loaded from.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Path for the skipped rows report.
    pub fn report_path(&self) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.output.with_extension("skipped.csv"))
    }
}
