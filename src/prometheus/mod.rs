//! Prometheus scrape configuration.
//!
//! This module contains the two immutable scrape-config templates,
//! the version gate choosing between them, and the assembler which
//! fills a fresh copy of a template with request-specific values.

mod render;
mod token;

pub(crate) use render::{render, OutputFormat};
pub(crate) use token::{mint, DEFAULT_VALIDITY_SECS};

use lazy_static::lazy_static;

/// Job name shared by all generated scrape configs.
static DEFAULT_JOB_NAME: &str = "minio-job";

/// Metrics endpoint served by releases before the cutover.
static LEGACY_METRICS_PATH: &str = "/minio/prometheus/metrics";

/// Cluster metrics endpoint (v2).
static DEFAULT_METRICS_PATH: &str = "/minio/v2/metrics/cluster";

/// First server release exposing the v2 metrics endpoint.
static CUTOVER_VERSION: &str = "2021-01-30T00-20-58Z";

lazy_static! {
    static ref LEGACY_CONFIG: PrometheusConfig = PrometheusConfig::template(LEGACY_METRICS_PATH);
    static ref DEFAULT_CONFIG: PrometheusConfig = PrometheusConfig::template(DEFAULT_METRICS_PATH);
}

/// Top-level Prometheus configuration, holding scrape configs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct PrometheusConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) scrape_configs: Vec<ScrapeConfig>,
}

/// A single scraping unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct ScrapeConfig {
    pub(crate) job_name: String,
    pub(crate) bearer_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) metrics_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) scheme: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) static_configs: Vec<StaticConfig>,
}

/// Statically configured targets.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct StaticConfig {
    pub(crate) targets: Vec<String>,
}

impl PrometheusConfig {
    /// Build a template with a single, still empty, scrape target.
    fn template(metrics_path: &str) -> Self {
        let scrape = ScrapeConfig {
            job_name: DEFAULT_JOB_NAME.to_string(),
            bearer_token: String::new(),
            metrics_path: metrics_path.to_string(),
            scheme: String::new(),
            static_configs: vec![StaticConfig {
                targets: vec![String::new()],
            }],
        };
        Self {
            scrape_configs: vec![scrape],
        }
    }
}

/// Server version, as reported by the admin API.
///
/// Server versions are release timestamps (e.g. `2021-01-30T00-20-58Z`),
/// thus plain string ordering matches release ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct VersionTag(pub(crate) String);

impl std::fmt::Display for VersionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scrape-config flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Template {
    Legacy,
    Current,
}

impl Template {
    /// Pick the template matching a server version.
    pub(crate) fn select(version: &VersionTag) -> Self {
        if version.0.as_str() < CUTOVER_VERSION {
            Template::Legacy
        } else {
            Template::Current
        }
    }

    fn base(self) -> &'static PrometheusConfig {
        match self {
            Template::Legacy => &*LEGACY_CONFIG,
            Template::Current => &*DEFAULT_CONFIG,
        }
    }
}

/// Fill a fresh copy of `template` with token, scheme and target host.
///
/// Inputs are not validated and end up verbatim in the document.
pub(crate) fn assemble(template: Template, token: &str, scheme: &str, host: &str) -> PrometheusConfig {
    let mut cfg = template.base().clone();
    for scrape in cfg.scrape_configs.iter_mut() {
        scrape.bearer_token = token.to_string();
        scrape.scheme = scheme.to_string();
        scrape.static_configs = vec![StaticConfig {
            targets: vec![host.to_string()],
        }];
    }
    cfg
}
