//! Scrape-config generation.
//!
//! Ties together token minting, version gating and config assembly
//! for an already resolved endpoint. Every step is attempted exactly
//! once, the first failure aborts the whole generation.

use crate::admin::ServerInfoSource;
use crate::alias::ConnectionProfile;
use crate::prometheus::{self, PrometheusConfig, Template};
use chrono::{DateTime, Duration, Utc};
use failure::{Fallible, ResultExt};

/// Generate a scrape config for the server behind `profile`.
pub(crate) fn generate(
    profile: &ConnectionProfile,
    source: &dyn ServerInfoSource,
    issued_at: DateTime<Utc>,
    validity: Duration,
) -> Fallible<PrometheusConfig> {
    let endpoint = &profile.endpoint;
    let token = prometheus::mint(
        &profile.access_key,
        profile.secret_key.as_bytes(),
        issued_at,
        validity,
    )?;

    let info = source.server_info().context("failed to get server info")?;
    let version = info.first_version()?;
    let template = Template::select(&version);
    info!(
        "server version '{}', using {:?} metrics path",
        version, template
    );

    Ok(prometheus::assemble(
        template,
        &token,
        &endpoint.scheme,
        &endpoint.host,
    ))
}
