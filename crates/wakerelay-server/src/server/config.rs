use anyhow::{Context, bail};
use clap::Parser;
use std::net::SocketAddr;

/// Port used when neither `SERVER_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the `wakerelay-server` binary.
///
/// All values are parsed from CLI arguments or environment variables. Hosting
/// platforms that only hand out a port (via `PORT`) are supported without
/// spelling out a full address.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wakerelay-server",
    version,
    about = "HTTP broker holding pending Wake-on-LAN requests"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Example: "0.0.0.0:5000" or "[::]:8080". Takes precedence over `PORT`.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR")]
    pub server_addr: Option<String>,

    /// Port to listen on, bound on all IPv4 interfaces.
    ///
    /// Environment variable: `PORT`
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr = match (args.server_addr, args.port) {
            (Some(addr), _) => addr
                .parse()
                .with_context(|| format!("SERVER_ADDR ({addr}) is not a socket address"))?,
            (None, Some(0)) => bail!("PORT must be greater than 0"),
            (None, Some(port)) => SocketAddr::from(([0, 0, 0, 0], port)),
            (None, None) => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        };

        Ok(Self { server_addr })
    }
}
