//! NGINX Plus status endpoint input.
//!
//! Every configured URL is fetched concurrently. The JSON status document is
//! decoded into [`status::Status`] and flattened into one metric per section
//! entry (zone, upstream, peer, cache).

pub mod status;

use crate::error::{InputError, Result};
use crate::Input;
use async_trait::async_trait;
use oxprobe_common::accumulator::Accumulator;
use oxprobe_common::types::Tags;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client, Identity, StatusCode};
use serde::Deserialize;
use status::Status;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::{Host, Url};

const SAMPLE_CONFIG: &str = r#"# Read NGINX Plus full status information (ngx_http_status_module)
[[inputs.nginx_plus]]
  ## An array of NGINX Plus status URIs to gather stats.
  urls = ["http://localhost/status"]

  ## HTTP response timeout in seconds (values below 1 fall back to 5)
  response_timeout_secs = 5

  ## Optional TLS config
  # tls_ca = "/etc/oxprobe/ca.pem"
  # tls_cert = "/etc/oxprobe/cert.pem"
  # tls_key = "/etc/oxprobe/key.pem"
  ## Use TLS but skip chain & host verification
  # insecure_skip_verify = false
"#;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NginxPlusConfig {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,
    pub tls_ca: Option<PathBuf>,
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

fn default_response_timeout() -> u64 {
    5
}

pub struct NginxPlus {
    config: NginxPlusConfig,
    /// Built on the first gather and reused afterwards.
    client: Option<Client>,
}

impl NginxPlus {
    pub fn new(config: NginxPlusConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = build_client(&self.config)?;
        self.client = Some(client.clone());
        Ok(client)
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| InputError::Tls(format!("could not read {}: {e}", path.display())))
}

fn build_client(config: &NginxPlusConfig) -> Result<Client> {
    let timeout_secs = if config.response_timeout_secs < 1 {
        default_response_timeout()
    } else {
        config.response_timeout_secs
    };

    let mut builder = Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(timeout_secs));

    if let Some(ca) = &config.tls_ca {
        let cert = Certificate::from_pem(&read_pem(ca)?)
            .map_err(|e| InputError::Tls(format!("invalid CA certificate {}: {e}", ca.display())))?;
        builder = builder.add_root_certificate(cert);
    }

    match (&config.tls_cert, &config.tls_key) {
        (Some(cert), Some(key)) => {
            let mut pem = read_pem(cert)?;
            pem.push(b'\n');
            pem.extend(read_pem(key)?);
            let identity = Identity::from_pem(&pem)
                .map_err(|e| InputError::Tls(format!("invalid client certificate or key: {e}")))?;
            builder = builder.identity(identity);
        }
        (None, None) => {}
        _ => {
            return Err(InputError::Tls(
                "tls_cert and tls_key must be set together".to_string(),
            ))
        }
    }

    if config.insecure_skip_verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(InputError::ClientBuild)
}

/// Base tags for every metric gathered from `addr`.
///
/// `server` is the host without IPv6 brackets. `port` is the port as written
/// in `raw` (possibly empty, as in `http://host:/status`), else the scheme
/// default for http/https, else empty.
pub fn url_tags(raw: &str, addr: &Url) -> Tags {
    let server = match addr.host() {
        Some(Host::Ipv6(ip)) => ip.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    };
    // `Url` drops a port equal to the scheme default and an empty one, so the
    // port is read from the address as configured.
    let port = match written_port(raw) {
        Some(port) => port.to_string(),
        None => match addr.scheme() {
            "http" => "80".to_string(),
            "https" => "443".to_string(),
            _ => String::new(),
        },
    };

    let mut tags = Tags::new();
    tags.insert("server".to_string(), server);
    tags.insert("port".to_string(), port);
    tags
}

/// Text after the host's `:` separator in the authority of `raw`, if any.
fn written_port(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = if host_port.starts_with('[') {
        &host_port[host_port.find(']')? + 1..]
    } else {
        host_port
    };
    after_host.rfind(':').map(|i| &after_host[i + 1..])
}

/// Fetches one status document and emits its metrics under `tags`.
async fn gather_url(client: &Client, addr: &Url, tags: &Tags, acc: &dyn Accumulator) -> Result<()> {
    let url = addr.to_string();
    let response = client
        .get(addr.clone())
        .send()
        .await
        .map_err(|source| InputError::Http {
            url: url.clone(),
            source,
        })?;

    if response.status() != StatusCode::OK {
        return Err(InputError::HttpStatus {
            url,
            status: response.status(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if content_type != "application/json" {
        return Err(InputError::UnexpectedContentType { url, content_type });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| InputError::Http {
            url: url.clone(),
            source,
        })?;
    let status = Status::from_slice(&body).map_err(InputError::Decode)?;

    tracing::debug!(url = %url, version = status.version, "Decoded NGINX Plus status");
    status.gather(tags, acc);
    Ok(())
}

#[async_trait]
impl Input for NginxPlus {
    fn name(&self) -> &str {
        "nginx_plus"
    }

    fn sample_config(&self) -> &'static str {
        SAMPLE_CONFIG
    }

    async fn gather(&mut self, acc: Arc<dyn Accumulator>) -> Result<()> {
        let client = self.client()?;

        let mut tasks = Vec::new();
        for raw in &self.config.urls {
            let addr = match Url::parse(raw) {
                Ok(addr) => addr,
                Err(source) => {
                    acc.add_error(
                        InputError::InvalidUrl {
                            url: raw.clone(),
                            source,
                        }
                        .into(),
                    );
                    continue;
                }
            };

            let tags = url_tags(raw, &addr);
            let client = client.clone();
            let acc = Arc::clone(&acc);
            tasks.push(tokio::spawn(async move {
                if let Err(e) = gather_url(&client, &addr, &tags, acc.as_ref()).await {
                    tracing::warn!(url = %addr, error = %e, "Failed to gather NGINX Plus status");
                    acc.add_error(e.into());
                }
            }));
        }

        // Wait for all tasks to complete
        for task in tasks {
            if let Err(e) = task.await {
                tracing::error!("Task panicked: {}", e);
                acc.add_error(e.into());
            }
        }

        Ok(())
    }
}
