//! Optional TOML configuration, merged under the command-line flags.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::args::Cli;
use mailhunt_lib::ProbeOptions;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    pub helo_name: Option<String>,
    pub mail_from: Option<String>,
    pub stage_timeout_ms: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Defaults, then the config file, then flags.
pub fn probe_options(cli: &Cli) -> Result<ProbeOptions> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    Ok(merge(file.smtp, cli))
}

fn merge(smtp: SmtpConfig, cli: &Cli) -> ProbeOptions {
    let mut options = ProbeOptions::default();
    if let Some(helo) = cli.helo.clone().or(smtp.helo_name) {
        options = options.with_helo_name(helo);
    }
    if let Some(mail_from) = cli.mail_from.clone().or(smtp.mail_from) {
        options = options.with_mail_from(mail_from);
    }
    if let Some(ms) = cli.timeout_ms.or(smtp.stage_timeout_ms) {
        options = options.with_stage_timeout(Duration::from_millis(ms));
    }
    options
}
