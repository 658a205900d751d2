//! Network collector
//!
//! Linux-first: addresses come from `hostname -I`, socket counts from
//! `/proc/net/tcp{,6}`, listening ports from `ss -tuln` (or `netstat -tuln`
//! where `ss` is missing), and traffic totals from `/proc/net/dev`.
//! Elsewhere `netstat -an` stands in for the socket table.

use async_trait::async_trait;

use super::command::{optional, read, run};
use super::snapshot::format_bytes;
use super::{CollectedSnapshot, CollectionError, Collector, NetworkInfo};
use crate::cache::CacheCategory;

/// Most listening ports reported
pub const MAX_PORTS: usize = 10;

const LOOPBACK: &str = "127.0.0.1";

/// Collects [`NetworkInfo`]
#[derive(Clone, Debug, Default)]
pub struct NetworkCollector;

impl NetworkCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Collector for NetworkCollector {
    fn category(&self) -> CacheCategory {
        CacheCategory::Network
    }

    async fn collect(&self) -> Result<CollectedSnapshot, CollectionError> {
        let (addresses, connections, ports, traffic) = tokio::join!(
            ip_addresses(),
            connection_count(),
            listening_ports(),
            traffic_totals(),
        );

        let traffic = optional("traffic", traffic);
        let info = NetworkInfo {
            ip_addresses: with_loopback_fallback(optional("addresses", addresses).unwrap_or_default()),
            bandwidth_in: traffic.map(|(rx, _)| format_bytes(rx)),
            bandwidth_out: traffic.map(|(_, tx)| format_bytes(tx)),
            connections: optional("connections", connections),
            active_ports: optional("ports", ports).unwrap_or_default(),
        };

        Ok(CollectedSnapshot::Network(info))
    }
}

async fn ip_addresses() -> Result<Vec<String>, CollectionError> {
    Ok(parse_hostname_addresses(&run("hostname", &["-I"]).await?))
}

async fn connection_count() -> Result<usize, CollectionError> {
    if cfg!(target_os = "linux") {
        let v4 = read("/proc/net/tcp").await?;
        let v6 = read("/proc/net/tcp6").await.unwrap_or_default();
        Ok(count_socket_table(&v4) + count_socket_table(&v6))
    } else {
        let output = run("netstat", &["-an"]).await?;
        Ok(output
            .lines()
            .filter(|l| l.trim_start().starts_with("tcp"))
            .count())
    }
}

async fn listening_ports() -> Result<Vec<String>, CollectionError> {
    if !cfg!(target_os = "linux") {
        return Ok(parse_netstat_listening(&run("netstat", &["-an"]).await?));
    }
    match run("ss", &["-tuln"]).await {
        Ok(output) => Ok(parse_ss_listening(&output)),
        Err(e) => {
            tracing::debug!(error = %e, "ss unavailable, falling back to netstat");
            Ok(parse_netstat_listening(&run("netstat", &["-tuln"]).await?))
        }
    }
}

async fn traffic_totals() -> Result<(u64, u64), CollectionError> {
    if !cfg!(target_os = "linux") {
        return Err(CollectionError::Unsupported("traffic counters"));
    }
    let content = read("/proc/net/dev").await?;
    parse_proc_net_dev(&content).ok_or_else(|| CollectionError::parse("/proc/net/dev", "no interfaces"))
}

// ============================================================================
// Parsing
// ============================================================================

/// Addresses from `hostname -I`, loopback excluded
pub fn parse_hostname_addresses(output: &str) -> Vec<String> {
    output
        .split_whitespace()
        .filter(|addr| *addr != LOOPBACK)
        .map(str::to_string)
        .collect()
}

fn with_loopback_fallback(addresses: Vec<String>) -> Vec<String> {
    if addresses.is_empty() {
        vec![LOOPBACK.to_string()]
    } else {
        addresses
    }
}

/// Number of socket rows in a `/proc/net/tcp` style table
pub fn count_socket_table(content: &str) -> usize {
    content
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .count()
}

/// Port of a `host:port` address, if it names a concrete port
fn port_of(address: &str) -> Option<&str> {
    let (_, port) = address.rsplit_once(':')?;
    (!port.is_empty() && port != "*").then_some(port)
}

fn push_port(ports: &mut Vec<String>, port: &str) {
    if ports.len() < MAX_PORTS && !ports.iter().any(|p| p == port) {
        ports.push(port.to_string());
    }
}

/// Listening ports from `ss -tuln`
///
/// The local address is the fourth whitespace-separated column in `ss`'s
/// output for both TCP and UDP rows.
pub fn parse_ss_listening(output: &str) -> Vec<String> {
    let mut ports = Vec::new();
    for line in output.lines().skip(1) {
        if !line.contains("LISTEN") && !line.starts_with("udp") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if let Some(port) = fields.get(4).and_then(|addr| port_of(addr)) {
            push_port(&mut ports, port);
        }
    }
    ports
}

/// Listening ports from `netstat` (Linux `-tuln`, BSD and Windows `-an`)
pub fn parse_netstat_listening(output: &str) -> Vec<String> {
    let mut ports = Vec::new();
    for line in output.lines() {
        if !line.contains("LISTEN") {
            continue;
        }
        for field in line.split_whitespace() {
            if field.contains("::") {
                continue;
            }
            // BSD netstat separates the port with a dot: `*.22`, `127.0.0.1.631`
            let port = port_of(field).or_else(|| {
                field
                    .rsplit_once('.')
                    .map(|(_, p)| p)
                    .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
            });
            if let Some(port) = port {
                push_port(&mut ports, port);
                break;
            }
        }
    }
    ports
}

/// Received and sent byte totals from `/proc/net/dev`, loopback excluded
pub fn parse_proc_net_dev(content: &str) -> Option<(u64, u64)> {
    let mut totals = None;
    for line in content.lines().skip(2) {
        let Some((iface, counters)) = line.split_once(':') else {
            continue;
        };
        if iface.trim() == "lo" {
            continue;
        }
        let fields: Vec<u64> = counters
            .split_whitespace()
            .filter_map(|f| f.parse().ok())
            .collect();
        if fields.len() < 9 {
            continue;
        }
        let (rx, tx) = totals.unwrap_or((0, 0));
        totals = Some((rx + fields[0], tx + fields[8]));
    }
    totals
}
