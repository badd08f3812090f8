//! Round-robin pool of HTTP clients bound to distinct local addresses.
//!
//! The platform rate-limits per source address, so a bulk operation such as
//! a loadout swap spreads its calls across every configured address.

use crate::core::constants::REQUEST_TIMEOUT_SECONDS;
use crate::core::error::ConfigError;
use reqwest::blocking::Client;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed set of clients handed out in rotation. Shareable across threads.
#[derive(Debug)]
pub struct ClientPool<C = Client> {
    clients: Vec<C>,
    next: AtomicUsize,
}

impl ClientPool<Client> {
    /// One client per parseable local address; a single default client when none can be built.
    pub fn from_addresses(addresses: &[String], timeout: Duration) -> Self {
        let mut clients = Vec::with_capacity(addresses.len());
        for address in addresses {
            match build_bound_client(address, timeout) {
                Ok(client) => clients.push(client),
                Err(err) => warn!(%address, error = %err, "skipping local address"),
            }
        }

        if clients.is_empty() {
            info!("no bound clients available, using a single default client");
            clients.push(default_client(timeout));
        } else {
            info!(count = clients.len(), "client pool ready");
        }

        Self::from_clients(clients).unwrap_or_else(|| Self::single(default_client(timeout)))
    }

    pub fn with_default_client() -> Self {
        Self::single(default_client(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)))
    }
}

impl<C> ClientPool<C> {
    /// `None` when `clients` is empty.
    pub fn from_clients(clients: Vec<C>) -> Option<Self> {
        if clients.is_empty() {
            return None;
        }
        Some(Self {
            clients,
            next: AtomicUsize::new(0),
        })
    }

    pub fn single(client: C) -> Self {
        Self {
            clients: vec![client],
            next: AtomicUsize::new(0),
        }
    }

    /// Next client in rotation, wrapping modulo the pool size.
    pub fn acquire(&self) -> &C {
        let len = self.clients.len();
        let index = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some((current + 1) % len)
            })
            .unwrap_or(0);
        &self.clients[index]
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

fn build_bound_client(address: &str, timeout: Duration) -> Result<Client, ConfigError> {
    let local: IpAddr = address
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(address.to_string()))?;
    let client = Client::builder()
        .local_address(local)
        .timeout(timeout)
        .tcp_keepalive(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

fn default_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}
