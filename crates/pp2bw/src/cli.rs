//! Command line interface.
use clap::Parser;
use pp2bw_migrate::{
    import::csv::passwords_plus::PasswordsPlusCsv, Conversion, Convert,
};
use std::path::PathBuf;

use crate::{
    config::Config,
    helpers::messages::{success, warn},
    Error, Result, TARGET,
};

/// Convert a Passwords Plus CSV export into a Bitwarden
/// JSON import file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Pp2bw {
    /// Config file to load, defaults to pp2bw.toml in the
    /// current directory when it exists.
    #[clap(short, long, env = "PP2BW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Parse arguments and run a conversion.
pub async fn run() -> Result<()> {
    let args = Pp2bw::parse();
    let config = Config::resolve(args.config).await?;
    if let Some(file) = config.file() {
        tracing::debug!(target: TARGET, config = %file.display());
    }

    let conversion = convert(&config).await?;
    success(format!(
        "Converted {} item(s) to {}",
        conversion.export.items().len(),
        config.output.display()
    ));
    if !conversion.report.is_empty() {
        warn(format!(
            "skipped {} row(s), see {}",
            conversion.report.len(),
            config.report_path().display()
        ));
    }
    Ok(())
}

/// Convert the configured input and write the output document.
///
/// The skipped rows report is only written when rows
/// were skipped.
pub async fn convert(config: &Config) -> Result<Conversion> {
    if tokio::fs::try_exists(&config.output).await? && !config.overwrite {
        return Err(Error::FileExistsUseForce(config.output.clone()));
    }
    if !tokio::fs::try_exists(&config.input).await? {
        return Err(Error::NotFile(config.input.clone()));
    }

    tracing::info!(
        target: TARGET,
        input = %config.input.display(),
        output = %config.output.display(),
        "convert");

    let converter = PasswordsPlusCsv::new(config.mapping.clone());
    let conversion = converter.convert(config.input.clone()).await?;
    conversion.export.write(&config.output).await?;

    if !conversion.report.is_empty() {
        conversion.report.write(config.report_path()).await?;
    }
    Ok(conversion)
}
