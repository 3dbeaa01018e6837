//! Resolves the id this worker polls for.
//!
//! The id is the machine's own hardware address in canonical form, so the
//! person requesting a wake can read it off the worker's startup log.

use std::path::Path;
use wakerelay::{Error, MacAddress, Result};

const SYSFS_NET: &str = "/sys/class/net";
const ZERO_MAC: &str = "00:00:00:00:00:00";

/// Uses `configured` when given, otherwise discovers the local address.
///
/// Failure here is fatal to the worker.
pub fn resolve(configured: Option<&str>) -> Result<MacAddress> {
    let raw = match configured {
        Some(id) => id.to_string(),
        None => discover()?,
    };
    MacAddress::parse(&raw).map_err(|invalid| Error::Identity {
        reason: format!("not a hardware address: {invalid}"),
    })
}

#[cfg(target_os = "linux")]
fn discover() -> Result<String> {
    if let Some(mac) = from_sysfs(Path::new(SYSFS_NET)) {
        return Ok(mac);
    }
    tracing::debug!("No address under {SYSFS_NET}, falling back to `ip link`");

    let output = std::process::Command::new("ip")
        .arg("link")
        .output()
        .map_err(|e| Error::Identity {
            reason: format!("failed to run `ip link`: {e}"),
        })?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ip_link(&stdout)
        .map(ToString::to_string)
        .ok_or_else(|| Error::Identity {
            reason: "no link/ether entry in `ip link` output".to_string(),
        })
}

#[cfg(not(target_os = "linux"))]
fn discover() -> Result<String> {
    Err(Error::Identity {
        reason: "hardware address discovery is only supported on Linux; pass --id".to_string(),
    })
}

/// First usable interface address under `root`, in `ifindex` order (the
/// order `ip link` lists them in).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn from_sysfs(root: &Path) -> Option<String> {
    let interfaces = std::fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_string_lossy().into_owned();
            let address = std::fs::read_to_string(path.join("address")).ok()?;
            let ifindex = std::fs::read_to_string(path.join("ifindex"))
                .ok()
                .and_then(|raw| raw.trim().parse().ok());
            Some(Interface {
                ifindex,
                name,
                address,
            })
        })
        .collect();
    pick_interface(in_link_order(interfaces))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
struct Interface {
    ifindex: Option<u32>,
    name: String,
    address: String,
}

/// Sorts by `ifindex`; interfaces without one go last, by name.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn in_link_order(mut interfaces: Vec<Interface>) -> impl Iterator<Item = (String, String)> {
    interfaces.sort_by(|a, b| {
        (a.ifindex.unwrap_or(u32::MAX), &a.name).cmp(&(b.ifindex.unwrap_or(u32::MAX), &b.name))
    });
    interfaces.into_iter().map(|iface| (iface.name, iface.address))
}

fn pick_interface(candidates: impl IntoIterator<Item = (String, String)>) -> Option<String> {
    candidates
        .into_iter()
        .filter(|(name, _)| name != "lo")
        .map(|(_, address)| address.trim().to_ascii_uppercase())
        .find(|address| address != ZERO_MAC && MacAddress::parse(address).is_ok())
}

/// Address from the first `link/ether` line of `ip link` output.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_ip_link(output: &str) -> Option<&str> {
    output
        .lines()
        .find(|line| line.contains("link/ether"))
        .and_then(|line| line.split_whitespace().nth(1))
}
