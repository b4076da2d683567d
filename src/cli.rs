//! Command-line options.

use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "minio-promgen",
    about = "Generate a Prometheus scrape config for a MinIO deployment"
)]
pub(crate) struct CliOptions {
    /// Alias of the target deployment
    #[structopt(name = "ALIAS")]
    pub(crate) alias: String,

    /// Print the scrape targets as JSON
    #[structopt(long = "json")]
    pub(crate) json: bool,

    /// Disable colorized output
    #[structopt(long = "no-color")]
    pub(crate) no_color: bool,

    /// Accept invalid TLS certificates from the server
    #[structopt(long = "insecure")]
    pub(crate) insecure: bool,

    /// Additional configuration directory (highest priority, repeatable)
    #[structopt(
        short = "c",
        long = "config-dir",
        number_of_values = 1,
        parse(from_os_str)
    )]
    pub(crate) config_dirs: Vec<PathBuf>,

    /// Verbosity level (repeatable)
    #[structopt(short = "v", parse(from_occurrences))]
    pub(crate) verbosity: u8,
}

impl CliOptions {
    /// Log level requested on the command line, if any.
    pub(crate) fn log_level(&self) -> Option<log::LevelFilter> {
        match self.verbosity {
            0 => None,
            1 => Some(log::LevelFilter::Warn),
            2 => Some(log::LevelFilter::Info),
            3 => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flags() {
        let opts = CliOptions::from_iter_safe(&[
            "minio-promgen",
            "--json",
            "-c",
            "/tmp/a",
            "--config-dir",
            "/tmp/b",
            "-vv",
            "play/",
        ])
        .unwrap();
        assert_eq!(opts.alias, "play/");
        assert!(opts.json);
        assert!(!opts.no_color);
        assert_eq!(
            opts.config_dirs,
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]
        );
        assert_eq!(opts.log_level(), Some(log::LevelFilter::Info));
    }

    #[test]
    fn alias_is_required() {
        assert!(CliOptions::from_iter_safe(&["minio-promgen"]).is_err());
        assert!(CliOptions::from_iter_safe(&["minio-promgen", "a", "b"]).is_err());
    }
}
