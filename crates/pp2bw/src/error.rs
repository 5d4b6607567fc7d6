use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("path {0} is not a file")]
    NotFile(PathBuf),

    #[error("file {0} already exists, set overwrite = true in the config to replace it")]
    FileExistsUseForce(PathBuf),

    #[error(transparent)]
    Migrate(#[from] pp2bw_migrate::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDeser(#[from] toml::de::Error),
}
