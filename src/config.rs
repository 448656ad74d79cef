//! Command line and environment configuration.
//!
//! Every flag can also be set through the environment (or a `.env` file
//! loaded at startup).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

use crate::error::ConfigError;
use crate::state::RoverName;

/// Mars rover photo dashboard and NASA API proxy
#[derive(Parser)]
#[command(name = "mars-dashboard", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the proxy and the dashboard it serves
    Serve(ServeArgs),
    /// Select one rover against a running proxy and write the page to a file
    Snapshot(SnapshotArgs),
}

// No `Debug`: holds the API key
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory of static assets served by the proxy
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Base URL of the NASA API
    #[arg(long, env = "NASA_API_BASE", default_value = "https://api.nasa.gov")]
    pub upstream: String,

    /// Martian sol to request photos for
    #[arg(long, env = "ROVER_SOL", default_value_t = 30)]
    pub sol: u32,

    /// Result page to request
    #[arg(long, env = "ROVER_PAGE", default_value_t = 1)]
    pub page: u32,

    /// NASA API key, never sent to the browser
    #[arg(long = "api-key", env = "API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,

    /// Where the dashboard reaches the proxy (defaults to this server)
    #[arg(long, env = "PROXY_BASE")]
    pub proxy_base: Option<String>,

    /// Timeout for the dashboard's proxy requests, in seconds
    #[arg(long, env = "CLIENT_TIMEOUT_SECS")]
    pub client_timeout_secs: Option<u64>,

    /// Browser sessions kept before the least recently used is dropped
    #[arg(
        long,
        env = "MAX_SESSIONS",
        default_value_t = 1024,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_sessions: usize,
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Rover to select (Curiosity, Opportunity or Spirit)
    #[arg(long)]
    pub rover: RoverName,

    /// HTML file to write
    #[arg(long, default_value = "dashboard.html")]
    pub out: PathBuf,

    /// Base URL of the running proxy
    #[arg(long, env = "PROXY_BASE", default_value = "http://localhost:3000")]
    pub proxy_base: String,

    /// Request timeout, in seconds
    #[arg(long, env = "CLIENT_TIMEOUT_SECS")]
    pub client_timeout_secs: Option<u64>,
}

/// Upstream API settings; `Debug` never prints the key
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub sol: u32,
    pub page: u32,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("sol", &self.sol)
            .field("page", &self.page)
            .finish()
    }
}

/// Validated settings for `serve`
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub static_dir: PathBuf,
    pub upstream: UpstreamConfig,
    pub proxy_base: String,
    pub client_timeout: Option<Duration>,
    pub max_sessions: usize,
}

impl ServeArgs {
    /// Check the arguments and fill in derived defaults
    pub fn into_config(self) -> Result<ServeConfig, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        url::Url::parse(&self.upstream).map_err(|source| ConfigError::InvalidUrl {
            name: "upstream",
            value: self.upstream.clone(),
            source,
        })?;

        let bind = SocketAddr::new(self.host, self.port);
        let proxy_base = self
            .proxy_base
            .unwrap_or_else(|| format!("http://{}", loopback_for(bind)));

        Ok(ServeConfig {
            bind,
            static_dir: self.static_dir,
            upstream: UpstreamConfig {
                base_url: self.upstream,
                api_key: self.api_key,
                sol: self.sol,
                page: self.page,
            },
            proxy_base,
            client_timeout: self.client_timeout_secs.map(Duration::from_secs),
            max_sessions: self.max_sessions,
        })
    }
}

/// Address the dashboard uses to reach a server bound on `bind`
fn loopback_for(bind: SocketAddr) -> SocketAddr {
    if bind.ip().is_unspecified() {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), bind.port())
    } else {
        bind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServeArgs {
        let mut argv = vec!["mars-dashboard", "serve", "--host", "0.0.0.0"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Serve(args) => args,
            Command::Snapshot(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_serve_requires_api_key() {
        let args = parse(&["--api-key", " ", "--port", "4000"]);
        assert!(matches!(args.into_config(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_serve_defaults_proxy_base_to_own_address() {
        let config = parse(&["--api-key", "k", "--port", "4000"]).into_config().unwrap();

        assert_eq!(config.bind.port(), 4000);
        assert_eq!(config.proxy_base, "http://127.0.0.1:4000");
        assert_eq!(config.upstream.sol, 30);
        assert_eq!(config.upstream.page, 1);
        assert_eq!(config.client_timeout, None);
        assert_eq!(config.max_sessions, 1024);
    }

    #[test]
    fn test_serve_rejects_bad_upstream_url() {
        let args = parse(&["--api-key", "k", "--upstream", "nasa"]);
        assert!(matches!(args.into_config(), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_zero_max_sessions_is_rejected() {
        let argv = ["mars-dashboard", "serve", "--host", "0.0.0.0", "--max-sessions", "0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let config = parse(&["--api-key", "super-secret"]).into_config().unwrap();
        let printed = format!("{config:?}");

        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_snapshot_parses_rover_name() {
        let cli = Cli::try_parse_from(["mars-dashboard", "snapshot", "--rover", "Spirit"]).unwrap();
        match cli.command {
            Command::Snapshot(args) => assert_eq!(args.rover, RoverName::Spirit),
            Command::Serve(_) => panic!("expected snapshot"),
        }

        assert!(Cli::try_parse_from(["mars-dashboard", "snapshot", "--rover", "spirit"]).is_err());
    }
}
