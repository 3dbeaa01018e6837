//! Wake actions for a validated address.
//!
//! The worker only cares whether the action succeeded. [`CommandWake`] hands
//! the address to an external tool such as `wakeonlan`; [`MagicPacketWake`]
//! sends the packet itself.

use crate::worker::config::WakeConfig;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::{net::UdpSocket, process::Command};
use wakerelay::{Error, MacAddress, Result};

/// Size of a magic packet: 6 sync bytes then 16 copies of the address.
pub const MAGIC_PACKET_LEN: usize = 102;

/// Sends a wake signal to a validated address.
pub trait WakeAction {
    fn wake(&self, mac: &MacAddress) -> impl Future<Output = Result<()>> + Send;
}

/// Builds the magic packet for `mac`.
pub fn magic_packet(mac: &MacAddress) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFF_u8; MAGIC_PACKET_LEN];
    let octets = mac.octets();
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&octets);
    }
    packet
}

/// Runs `program <mac>` and waits for it to exit.
#[derive(Clone, Debug)]
pub struct CommandWake {
    program: String,
}

impl CommandWake {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl WakeAction for CommandWake {
    async fn wake(&self, mac: &MacAddress) -> Result<()> {
        let status = Command::new(&self.program)
            .arg(mac.as_str())
            .status()
            .await
            .map_err(|e| Error::Wake {
                context: format!("failed to run `{}`: {e}", self.program),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Wake {
                context: format!("`{} {mac}` exited with {status}", self.program),
            })
        }
    }
}

/// Sends a magic packet over UDP, with broadcast enabled.
#[derive(Clone, Copy, Debug)]
pub struct MagicPacketWake {
    broadcast: SocketAddr,
}

impl MagicPacketWake {
    pub const fn new(broadcast: SocketAddr) -> Self {
        Self { broadcast }
    }
}

impl WakeAction for MagicPacketWake {
    async fn wake(&self, mac: &MacAddress) -> Result<()> {
        let local: SocketAddr = if self.broadcast.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let wake_err = |e: std::io::Error| Error::Wake {
            context: format!("magic packet to {}: {e}", self.broadcast),
        };

        let socket = UdpSocket::bind(local).await.map_err(wake_err)?;
        socket.set_broadcast(true).map_err(wake_err)?;
        let sent = socket
            .send_to(&magic_packet(mac), self.broadcast)
            .await
            .map_err(wake_err)?;

        if sent == MAGIC_PACKET_LEN {
            Ok(())
        } else {
            Err(Error::Wake {
                context: format!("short magic packet write ({sent} bytes)"),
            })
        }
    }
}

/// The wake action chosen by configuration.
#[derive(Clone, Debug)]
pub enum WakeDispatch {
    Command(CommandWake),
    MagicPacket(MagicPacketWake),
}

impl From<&WakeConfig> for WakeDispatch {
    fn from(config: &WakeConfig) -> Self {
        match config {
            WakeConfig::Command { program } => Self::Command(CommandWake::new(program.clone())),
            WakeConfig::MagicPacket { broadcast } => {
                Self::MagicPacket(MagicPacketWake::new(*broadcast))
            }
        }
    }
}

impl WakeAction for WakeDispatch {
    async fn wake(&self, mac: &MacAddress) -> Result<()> {
        match self {
            Self::Command(action) => action.wake(mac).await,
            Self::MagicPacket(action) => action.wake(mac).await,
        }
    }
}
