use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use std::net::SocketAddr;
use wakerelay::{Backoff, DEFAULT_CEILING_SECS, DEFAULT_FLOOR_SECS};

/// How a validated address is woken.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeMethod {
    /// Run an external program with the address as its only argument.
    Command,
    /// Send a UDP magic packet directly.
    MagicPacket,
}

/// Runtime configuration for the `wakerelay-worker` binary.
///
/// All values are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wakerelay-worker",
    version,
    about = "Claims wake requests from a wakerelay broker and wakes the machine"
)]
pub struct CliArgs {
    /// Base URL of the broker, e.g. "https://broker.example.net".
    ///
    /// Environment variable: `BROKER_URL`
    #[arg(long, env = "BROKER_URL")]
    pub broker_url: String,

    /// Id to poll for. Defaults to this machine's hardware address.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID")]
    pub id: Option<String>,

    /// Delay between polls while the broker is reachable, in seconds.
    ///
    /// Environment variable: `POLL_FLOOR_SECS`
    #[arg(long, env = "POLL_FLOOR_SECS", default_value_t = DEFAULT_FLOOR_SECS)]
    pub poll_floor_secs: u64,

    /// Largest delay between polls after repeated broker failures, in seconds.
    ///
    /// Environment variable: `POLL_CEILING_SECS`
    #[arg(long, env = "POLL_CEILING_SECS", default_value_t = DEFAULT_CEILING_SECS)]
    pub poll_ceiling_secs: u64,

    /// Timeout for a single poll request, in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT_SECS`
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// How to wake a claimed address.
    ///
    /// Environment variable: `WAKE_METHOD`
    #[arg(long, env = "WAKE_METHOD", value_enum, default_value_t = WakeMethod::Command)]
    pub wake_method: WakeMethod,

    /// Program run by the `command` wake method.
    ///
    /// Environment variable: `WAKE_COMMAND`
    #[arg(long, env = "WAKE_COMMAND", default_value_t = String::from("wakeonlan"))]
    pub wake_command: String,

    /// Destination of the `magic-packet` wake method.
    ///
    /// Environment variable: `WAKE_BROADCAST_ADDR`
    #[arg(long, env = "WAKE_BROADCAST_ADDR", default_value = "255.255.255.255:9")]
    pub wake_broadcast_addr: SocketAddr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeConfig {
    Command { program: String },
    MagicPacket { broadcast: SocketAddr },
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub broker_url: String,
    pub id: Option<String>,
    pub backoff: Backoff,
    pub request_timeout: Duration,
    pub wake: WakeConfig,
}

impl TryFrom<CliArgs> for WorkerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let broker_url = args.broker_url.trim().trim_end_matches('/').to_string();
        if !(broker_url.starts_with("http://") || broker_url.starts_with("https://")) {
            bail!("BROKER_URL ({broker_url}) must start with http:// or https://");
        }

        if args.poll_floor_secs == 0 {
            bail!("POLL_FLOOR_SECS must be greater than 0");
        }

        if args.poll_ceiling_secs < args.poll_floor_secs {
            bail!(
                "POLL_CEILING_SECS ({}) must not be below POLL_FLOOR_SECS ({})",
                args.poll_ceiling_secs,
                args.poll_floor_secs
            );
        }

        if args.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        let wake = match args.wake_method {
            WakeMethod::Command => {
                if args.wake_command.trim().is_empty() {
                    bail!("WAKE_COMMAND must not be empty");
                }
                WakeConfig::Command {
                    program: args.wake_command,
                }
            }
            WakeMethod::MagicPacket => WakeConfig::MagicPacket {
                broadcast: args.wake_broadcast_addr,
            },
        };

        Ok(Self {
            broker_url,
            id: args.id.filter(|id| !id.trim().is_empty()),
            backoff: Backoff::new(args.poll_floor_secs, args.poll_ceiling_secs),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            wake,
        })
    }
}
