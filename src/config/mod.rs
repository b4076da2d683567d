/// Configuration parsing and validation.
///
/// This module contains three logical entities:
///  * Snippets: single configuration files, holding a subset of configuration entries.
///  * Inputs: configuration snippets merged, but not yet validated.
///  * AppConfig: validated configuration for the generator.
mod inputs;
mod snippets;

use crate::alias::{ConnectionProfile, Endpoint};
use crate::prometheus::DEFAULT_VALIDITY_SECS;
use failure::{Fallible, ResultExt};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Application name, used for configuration paths.
static APP_NAME: &str = "minio-promgen";

/// Default signing region for the admin API.
pub(crate) static DEFAULT_REGION: &str = "us-east-1";

/// Largest token lifetime representable as a `chrono::Duration`.
const MAX_VALIDITY_SECS: u64 = (i64::MAX / 1000) as u64;

/// Configuration directories, in increasing priority order.
///
/// System locations come first, then the user configuration directory,
/// then any directory given on the command line.
pub(crate) fn search_dirs(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(format!("/usr/lib/{}/config.d", APP_NAME)),
        PathBuf::from(format!("/etc/{}/config.d", APP_NAME)),
    ];
    if let Some(user) = dirs::config_dir() {
        paths.push(user.join(APP_NAME).join("config.d"));
    }
    paths.extend(extra.iter().cloned());
    paths
}

/// Runtime configuration for the generator.
///
/// It holds validated configuration.
#[derive(Debug, Serialize)]
pub(crate) struct AppConfig {
    pub(crate) aliases: BTreeMap<String, ConnectionProfile>,
    /// Configured aliases that failed validation, with the reason.
    pub(crate) rejected_aliases: BTreeMap<String, String>,
    pub(crate) output: OutputConfig,
    pub(crate) token_validity_secs: u64,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub(crate) struct OutputConfig {
    pub(crate) json: bool,
    pub(crate) color: bool,
}

impl AppConfig {
    pub(crate) fn read_config(dirs: &[PathBuf]) -> Fallible<Self> {
        let cfg = inputs::ConfigInput::read_config(dirs)?;
        Self::try_from_input(cfg)
    }

    /// Bearer token lifetime.
    pub(crate) fn token_validity(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_validity_secs as i64)
    }

    /// Validate inputs and return a valid configuration.
    ///
    /// A malformed alias does not invalidate the whole configuration,
    /// it is only an error when that alias is requested.
    fn try_from_input(cfg: inputs::ConfigInput) -> Fallible<Self> {
        let mut aliases = BTreeMap::new();
        let mut rejected_aliases = BTreeMap::new();
        for (name, input) in cfg.aliases {
            match Self::try_profile(&name, input) {
                Ok(profile) => {
                    aliases.insert(name, profile);
                }
                Err(e) => {
                    let reason = e
                        .iter_chain()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(": ");
                    warn!("skipping invalid configuration for alias '{}': {}", name, reason);
                    rejected_aliases.insert(name, reason);
                }
            }
        }

        let token_validity_secs = match cfg.token.validity_secs {
            None => DEFAULT_VALIDITY_SECS,
            Some(0) => bail!("token validity must be positive"),
            Some(v) if v > MAX_VALIDITY_SECS => bail!("token validity too large: {}s", v),
            Some(v) => v,
        };

        let state = AppConfig {
            aliases,
            rejected_aliases,
            output: OutputConfig {
                json: cfg.output.json,
                color: cfg.output.color,
            },
            token_validity_secs,
        };
        debug!(
            "Runtime configuration:\n{}",
            serde_json::to_string_pretty(&state).unwrap_or_default()
        );

        Ok(state)
    }

    fn try_profile(name: &str, input: inputs::AliasInput) -> Fallible<ConnectionProfile> {
        if !crate::alias::is_valid_alias(name) {
            bail!("invalid alias name");
        }
        if input.url.is_empty() {
            bail!("missing server URL");
        }
        let url = url::Url::parse(&input.url).context("failed to parse server URL")?;
        let endpoint = Endpoint::parse(&input.url)?;
        let region = if input.region.is_empty() {
            String::from(DEFAULT_REGION)
        } else {
            input.region
        };

        Ok(ConnectionProfile {
            url,
            endpoint,
            access_key: input.access_key,
            secret_key: input.secret_key,
            region,
            insecure: input.insecure,
        })
    }
}
