//! Configuration loading and immutable application state.
//!
//! Settings are layered: built-in defaults, then an optional `config.toml`,
//! then `NOCACHED_*` environment variables, then command-line flags.

use clap::Parser;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::http::headers::{no_cache_finalizer, HeaderFinalizer};

/// Command-line surface. Flags override the config file and environment.
#[derive(Debug, Parser)]
#[command(name = "nocached", about = "Static file server that always serves the current on-disk content")]
pub struct Args {
    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory to serve (defaults to the working directory)
    #[arg(long)]
    pub root: Option<String>,

    /// Config file path, without extension
    #[arg(long, default_value = "config")]
    pub config: String,

    /// Disable per-request access logging
    #[arg(long)]
    pub quiet: bool,
}

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub serve: ServeConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// File serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServeConfig {
    pub root: String,
    pub index_files: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration, applying CLI overrides last.
    pub fn load(args: &Args) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&args.config).required(false))
            .add_source(config::Environment::with_prefix("NOCACHED").separator("_"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("serve.root", ".")?
            .set_default("serve.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", true)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        if let Some(port) = args.port {
            cfg.server.port = port;
        }
        if let Some(ref bind) = args.bind {
            cfg.server.host = bind.clone();
        }
        if let Some(ref root) = args.root {
            cfg.serve.root = root.clone();
        }
        if args.quiet {
            cfg.logging.access_log = false;
        }

        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

/// Immutable per-process state shared across request tasks.
pub struct AppState {
    pub config: Config,
    /// Canonicalized served root; every resolved path must stay under it.
    pub root: PathBuf,
    /// Runs over the headers of every response before transmission.
    pub finalize_headers: HeaderFinalizer,
}

impl AppState {
    /// Canonicalize the served root. Fails if the root is missing or
    /// unreadable, which is a startup error.
    pub fn new(config: Config) -> std::io::Result<Self> {
        let root = PathBuf::from(&config.serve.root).canonicalize()?;
        Ok(Self {
            config,
            root,
            finalize_headers: no_cache_finalizer(),
        })
    }
}
