use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use mars_dashboard::api::ProxyClient;
use mars_dashboard::app::{Dashboard, Message, Outcome};
use mars_dashboard::config::{Cli, Command, ServeArgs, SnapshotArgs};
use mars_dashboard::server::{self, ProxyState, SessionRegistry, UpstreamClient};
use mars_dashboard::ui::FileMount;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading RUST_LOG or any flag defaults
    let dotenv = dotenvy::dotenv();
    init_tracing();
    if let Err(err) = dotenv {
        debug!("no .env loaded: {err}");
    }

    let result = match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Snapshot(args) => snapshot(args).await,
    };
    if let Err(err) = &result {
        error!("❌ {err:#}");
    }
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mars_dashboard=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run the proxy with the per-session dashboards behind it
async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    debug!(?config, "starting proxy");

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    let client = ProxyClient::new(&config.proxy_base, config.client_timeout)?;
    let upstream = UpstreamClient::new(config.upstream.clone())?;

    let sessions = SessionRegistry::new(Arc::new(client), config.max_sessions);

    info!(
        proxy = %config.proxy_base,
        static_dir = %config.static_dir.display(),
        max_sessions = config.max_sessions,
        "🎨 Mars dashboard ready"
    );

    let router = server::router(ProxyState::new(upstream, sessions), &config.static_dir);
    server::serve(listener, router).await?;
    Ok(())
}

/// Run one selection cycle against a running proxy and write the page
async fn snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let timeout = args.client_timeout_secs.map(Duration::from_secs);
    let client = ProxyClient::new(&args.proxy_base, timeout)?;
    let mount = FileMount::new(&args.out);

    let mut dashboard = Dashboard::new(Arc::new(client), Arc::new(mount));
    dashboard.render();

    let (ack, done) = oneshot::channel();
    let selected = Message::RoverSelected {
        rover: args.rover,
        ack: Some(ack),
    };
    if let Some(task) = dashboard.update(selected) {
        let loaded = task.await;
        dashboard.update(loaded);
    }

    match done.await? {
        Outcome::Applied => {
            info!(rover = %args.rover, out = %args.out.display(), "📸 snapshot written");
            Ok(())
        }
        outcome => bail!("could not load photos for {} ({outcome:?})", args.rover),
    }
}
