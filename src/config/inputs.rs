use crate::config::snippets;
use failure::{Fallible, ResultExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration holding environmental inputs, merged but not validated.
#[derive(Debug, Serialize)]
pub(crate) struct ConfigInput {
    pub(crate) aliases: BTreeMap<String, AliasInput>,
    pub(crate) output: OutputInput,
    pub(crate) token: TokenInput,
}

impl ConfigInput {
    /// Read config snippets from `dirs` and merge them into a single config.
    ///
    /// Directories are listed in increasing priority order.
    pub(crate) fn read_config(dirs: &[PathBuf]) -> Fallible<Self> {
        let mut snips = vec![];
        for dir in dirs {
            for path in list_snippets(dir)? {
                trace!("reading config snippet {:?}", path);
                let content =
                    std::fs::read(&path).context(format!("failed to read file {:?}", path))?;
                let snippet: snippets::ConfigSnippet = toml::from_slice(&content)
                    .context(format!("failed to parse TOML in {:?}", path))?;
                snips.push(snippet);
            }
        }

        let cfg = Self::merge_snippets(snips);
        debug!(
            "Configuration input:\n{}",
            toml::to_string_pretty(&cfg).unwrap_or_default()
        );

        Ok(cfg)
    }

    /// Merge multiple snippets into a single configuration.
    pub(crate) fn merge_snippets(snippets: Vec<snippets::ConfigSnippet>) -> Self {
        let mut aliases: BTreeMap<String, Vec<snippets::AliasSnippet>> = BTreeMap::new();
        let mut outputs = vec![];
        let mut tokens = vec![];

        for snip in snippets {
            if let Some(a) = snip.aliases {
                for (name, alias) in a {
                    aliases.entry(name).or_default().push(alias);
                }
            }
            if let Some(o) = snip.output {
                outputs.push(o);
            }
            if let Some(t) = snip.token {
                tokens.push(t);
            }
        }

        Self {
            aliases: aliases
                .into_iter()
                .map(|(name, snips)| (name, AliasInput::from_snippets(snips)))
                .collect(),
            output: OutputInput::from_snippets(outputs),
            token: TokenInput::from_snippets(tokens),
        }
    }
}

/// List `*.toml` snippets in `dir`, sorted by file name.
///
/// A missing directory holds no snippets.
fn list_snippets(dir: &Path) -> Fallible<Vec<PathBuf>> {
    if !dir.is_dir() {
        trace!("skipping missing config directory {:?}", dir);
        return Ok(vec![]);
    }

    let entries =
        std::fs::read_dir(dir).context(format!("failed to list directory {:?}", dir))?;
    let mut paths = vec![];
    for entry in entries {
        let path = entry.context("failed to read directory entry")?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths)
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct AliasInput {
    pub(crate) url: String,
    pub(crate) access_key: String,
    #[serde(skip_serializing)]
    pub(crate) secret_key: String,
    pub(crate) region: String,
    pub(crate) insecure: bool,
}

impl AliasInput {
    fn from_snippets(snippets: Vec<snippets::AliasSnippet>) -> Self {
        let mut cfg = Self {
            url: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: String::new(),
            insecure: false,
        };

        for snip in snippets {
            if let Some(u) = snip.url {
                cfg.url = u;
            }
            if let Some(ak) = snip.access_key {
                cfg.access_key = ak;
            }
            if let Some(sk) = snip.secret_key {
                cfg.secret_key = sk;
            }
            if let Some(r) = snip.region {
                cfg.region = r;
            }
            if let Some(i) = snip.insecure {
                cfg.insecure = i;
            }
        }

        cfg
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OutputInput {
    pub(crate) json: bool,
    pub(crate) color: bool,
}

impl OutputInput {
    fn from_snippets(snippets: Vec<snippets::OutputSnippet>) -> Self {
        let mut cfg = Self {
            json: false,
            color: true,
        };

        for snip in snippets {
            if let Some(j) = snip.json {
                cfg.json = j;
            }
            if let Some(c) = snip.color {
                cfg.color = c;
            }
        }

        cfg
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenInput {
    /// Token lifetime in seconds.
    pub(crate) validity_secs: Option<u64>,
}

impl TokenInput {
    fn from_snippets(snippets: Vec<snippets::TokenSnippet>) -> Self {
        let mut cfg = Self {
            validity_secs: None,
        };

        for snip in snippets {
            if snip.validity_secs.is_some() {
                cfg.validity_secs = snip.validity_secs;
            }
        }

        cfg
    }
}
