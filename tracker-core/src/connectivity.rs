use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use std::{fmt::Debug, time::Duration};
use tokio::net::TcpStream;

/// Network reachability check performed before every lookup.
#[async_trait]
pub trait Connectivity: Send + Sync + Debug {
    async fn is_available(&self) -> bool;
}

/// Considers the network available when a TCP connection to the first hop of
/// an API request can be opened within `timeout`. The first hop is the API
/// host, or the proxy when the environment routes the API through one
/// (`HTTPS_PROXY`, `HTTP_PROXY`, `ALL_PROXY`, honoring `NO_PROXY`), as reqwest does.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self { address: address.into(), timeout }
    }

    /// Probe the first hop that requests to `base_url` will use.
    pub fn for_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Self::for_base_url_with_env(base_url, timeout, |name| std::env::var(name).ok())
    }

    fn for_base_url_with_env(
        base_url: &str,
        timeout: Duration,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("Invalid base URL: {base_url}"))?;
        let host = url.host_str().ok_or_else(|| anyhow!("Base URL has no host: {base_url}"))?;

        if let Some(proxy) = proxy_for(url.scheme(), host, &env) {
            let proxy_url =
                Url::parse(&proxy).with_context(|| format!("Invalid proxy URL: {proxy}"))?;
            let proxy_host =
                proxy_url.host_str().ok_or_else(|| anyhow!("Proxy URL has no host: {proxy}"))?;
            let port = proxy_url.port_or_known_default().unwrap_or(DEFAULT_PROXY_PORT);
            debug!("Connectivity probe goes through proxy {proxy_host}:{port}");

            return Ok(Self::new(format!("{proxy_host}:{port}"), timeout));
        }

        let port = url
            .port_or_known_default()
            .ok_or_else(|| anyhow!("Base URL has no port: {base_url}"))?;

        Ok(Self::new(format!("{host}:{port}"), timeout))
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// SOCKS proxies have no scheme default in `Url`.
const DEFAULT_PROXY_PORT: u16 = 1080;

fn env_value(env: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names.iter().filter_map(|&name| env(name)).find(|value| !value.trim().is_empty())
}

/// Proxy URL reqwest would use for `scheme://host`, if any.
fn proxy_for(scheme: &str, host: &str, env: &impl Fn(&str) -> Option<String>) -> Option<String> {
    if let Some(no_proxy) = env_value(env, &["NO_PROXY", "no_proxy"]) {
        let bypassed = no_proxy.split(',').map(str::trim).any(|entry| {
            let entry = entry.trim_start_matches('.');
            entry == "*"
                || (!entry.is_empty()
                    && (host == entry || host.ends_with(&format!(".{entry}"))))
        });
        if bypassed {
            return None;
        }
    }

    let scheme_vars: &[&str] = match scheme {
        "https" => &["HTTPS_PROXY", "https_proxy"],
        "http" => &["HTTP_PROXY", "http_proxy"],
        _ => &[],
    };

    let proxy = env_value(env, scheme_vars).or_else(|| env_value(env, &["ALL_PROXY", "all_proxy"]))?;

    // A bare `host:port` means an HTTP proxy.
    if proxy.contains("://") { Some(proxy) } else { Some(format!("http://{proxy}")) }
}

#[async_trait]
impl Connectivity for TcpProbe {
    async fn is_available(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                debug!("Connectivity probe to {} failed: {err}", self.address);
                false
            }
            Err(_) => {
                debug!("Connectivity probe to {} timed out after {:?}", self.address, self.timeout);
                false
            }
        }
    }
}
