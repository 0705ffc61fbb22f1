use anyhow::{Context, Result};
use beacon::model::IceServerConfig;
use beacon::server::{serve, ServerConfig, DEFAULT_PORT, DEFAULT_STUN_URL};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "beacon")]
#[command(bin_name = "beacon")]
#[command(about = "WebRTC signaling relay", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "BEACON_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    #[arg(short, long, env = "BEACON_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Extra STUN server URL; repeat or comma-separate for several.
    #[arg(long = "stun", env = "BEACON_STUN", value_delimiter = ',')]
    stun: Vec<String>,

    /// Do not advertise the public Google STUN server.
    #[arg(long)]
    no_default_stun: bool,

    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME", requires = "turn_url")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL", requires = "turn_url", hide_env_values = true)]
    turn_credential: Option<String>,

    /// Log filter, e.g. `info` or `beacon_server=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let mut ice_servers = Vec::new();
        if !self.no_default_stun {
            ice_servers.push(IceServerConfig::stun(DEFAULT_STUN_URL));
        }
        ice_servers.extend(self.stun.into_iter().map(IceServerConfig::stun));
        if let Some(url) = self.turn_url {
            ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: self.turn_username,
                credential: self.turn_credential,
            });
        }

        ServerConfig {
            bind: SocketAddr::new(self.host, self.port),
            ice_servers,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_tracing(&args.log)?;
            let config = args.into_config();

            println!("{}", "📡 Starting Beacon signaling relay...".green().bold());
            println!("   🌐 Address:     http://{}", config.bind);
            println!("   🧊 ICE servers: {}", config.ice_servers.len());

            serve(config, shutdown_signal()).await?;

            println!("{}", "👋 Relay stopped.".yellow());
        }
    }

    Ok(())
}

fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, shutting down");
}
