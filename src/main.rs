//! minio-promgen: Prometheus scrape-config generator for MinIO.
//!
//! This binary generates a scrape configuration for a single MinIO
//! deployment, identified by an alias. It queries the deployment for
//! its server version, picks the matching metrics endpoint, and mints
//! a long-lived bearer token for the configured account.
//!
//! It is made of a few small pieces, run in sequence:
//!  * `config` and `alias` - connection profiles from config snippets and environment.
//!  * `admin` - blocking client for the server admin API.
//!  * `prometheus` - scrape-config templates, token minting and rendering.

extern crate env_logger;
#[macro_use]
extern crate failure;
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate structopt;

mod admin;
mod alias;
mod cli;
mod config;
mod generate;
mod prometheus;

use crate::admin::AdminClient;
use crate::cli::CliOptions;
use crate::config::AppConfig;
use crate::prometheus::OutputFormat;
use failure::Fallible;
use structopt::StructOpt;

fn main() {
    let opts = CliOptions::from_args();

    if let Err(err) = run(opts) {
        eprintln!("error: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(opts: CliOptions) -> Fallible<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = opts.log_level() {
        logger.filter(None, level);
    }
    logger.try_init()?;

    let alias = alias::clean_alias(&opts.alias);
    if !alias::is_valid_alias(&alias) {
        return Err(alias::AliasError::Invalid(alias).into());
    }

    let cfg = AppConfig::read_config(&config::search_dirs(&opts.config_dirs))?;
    let profile = alias::resolve(&alias, &cfg)?;

    let client = AdminClient::new(&profile, opts.insecure || profile.insecure)?;
    let scrape = generate::generate(&profile, &client, chrono::Utc::now(), cfg.token_validity())?;

    let format = if opts.json || cfg.output.json {
        OutputFormat::Json
    } else {
        OutputFormat::Structured {
            color: cfg.output.color && !opts.no_color,
        }
    };
    println!("{}", prometheus::render(&scrape, format)?);

    Ok(())
}
