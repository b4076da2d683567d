//! Blocking client for the server admin API.
//!
//! This module contains `AdminClient`, which queries the remote server
//! for its deployment information. Only the reported server versions
//! are consumed by the generator.

mod signer;

use crate::alias::ConnectionProfile;
use crate::prometheus::VersionTag;
use chrono::Utc;
use failure::{Fallible, ResultExt};
use reqwest::blocking::Client;
use url::Url;

/// Admin API path endpoint for server information (v3).
static V3_INFO_PATH: &str = "minio/admin/v3/info";

/// Source of remote server information.
pub(crate) trait ServerInfoSource {
    /// Fetch deployment information from the remote server.
    fn server_info(&self) -> Fallible<InfoMessage>;
}

/// Deployment information, as returned by the admin API.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct InfoMessage {
    #[serde(default)]
    pub(crate) mode: String,
    #[serde(default, rename = "deploymentID")]
    pub(crate) deployment_id: String,
    #[serde(default)]
    pub(crate) servers: Vec<ServerProperties>,
}

/// Per-node server properties.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct ServerProperties {
    #[serde(default)]
    pub(crate) state: String,
    #[serde(default)]
    pub(crate) endpoint: String,
    #[serde(default)]
    pub(crate) version: String,
    #[serde(default, rename = "commitID")]
    pub(crate) commit_id: String,
}

impl InfoMessage {
    /// Version reported by the first server in the deployment.
    ///
    /// Other nodes are not consulted, even if they run a different release.
    pub(crate) fn first_version(&self) -> Fallible<VersionTag> {
        let first = self
            .servers
            .first()
            .ok_or_else(|| format_err!("no servers reported by deployment '{}'", self.deployment_id))?;
        for s in &self.servers {
            trace!(
                "server {} ({}): version '{}', commit '{}'",
                s.endpoint,
                s.state,
                s.version,
                s.commit_id
            );
        }
        if self.servers.iter().any(|s| s.version != first.version) {
            warn!(
                "mixed server versions in deployment, using '{}' from {}",
                first.version, first.endpoint
            );
        }
        Ok(VersionTag(first.version.clone()))
    }
}

/// Admin API client for a single connection profile.
#[derive(Debug)]
pub(crate) struct AdminClient {
    endpoint: Url,
    access_key: String,
    secret_key: String,
    region: String,
    http: Client,
}

impl AdminClient {
    pub(crate) fn new(profile: &ConnectionProfile, insecure: bool) -> Fallible<Self> {
        let mut base = profile.url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(V3_INFO_PATH)?;

        if insecure {
            warn!("TLS certificate verification disabled for {}", profile.url);
        }
        let http = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            endpoint,
            access_key: profile.access_key.clone(),
            secret_key: profile.secret_key.clone(),
            region: profile.region.clone(),
            http,
        })
    }
}

impl ServerInfoSource for AdminClient {
    fn server_info(&self) -> Fallible<InfoMessage> {
        let creds = signer::Credentials {
            access_key: &self.access_key,
            secret_key: &self.secret_key,
            region: &self.region,
        };
        let headers = signer::sign_request("GET", &self.endpoint, &creds, Utc::now())?;
        trace!("GET to admin endpoint: {}", self.endpoint);

        let mut req = self.http.get(self.endpoint.clone());
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let resp = req
            .send()
            .context(format!("failed to reach {}", self.endpoint))?;

        // Ensure response is positive.
        let resp = resp.error_for_status().map_err(|err| {
            error!("{}", err);
            err
        })?;

        let info: InfoMessage = resp.json().context("failed to decode server info")?;
        trace!(
            "server info: mode '{}', {} server(s)",
            info.mode,
            info.servers.len()
        );
        Ok(info)
    }
}
