use std::collections::BTreeMap;

/// Top-level configuration stanza.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConfigSnippet {
    /// Connection profiles, keyed by alias.
    pub(crate) aliases: Option<BTreeMap<String, AliasSnippet>>,
    /// Output configuration.
    pub(crate) output: Option<OutputSnippet>,
    /// Bearer token configuration.
    pub(crate) token: Option<TokenSnippet>,
}

/// Config snippet for a single alias.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AliasSnippet {
    /// Base URL of the server (scheme and host).
    pub(crate) url: Option<String>,
    pub(crate) access_key: Option<String>,
    pub(crate) secret_key: Option<String>,
    /// Signing region (default: 'us-east-1')
    pub(crate) region: Option<String>,
    /// Whether to skip TLS certificate verification (default: false)
    pub(crate) insecure: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OutputSnippet {
    /// Print JSON instead of YAML (default: false)
    pub(crate) json: Option<bool>,
    /// Colorize YAML output (default: true)
    pub(crate) color: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenSnippet {
    /// Bearer token lifetime, in seconds (default: 100 years)
    pub(crate) validity_secs: Option<u64>,
}
