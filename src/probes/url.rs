use crate::health::{Probe, ProbeResult};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Issues a GET against an endpoint. Any response below 500 counts as reachable.
pub struct UrlProbe {
    client: reqwest::Client,
    url: String,
}

impl UrlProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Probe for UrlProbe {
    async fn check(&self) -> ProbeResult {
        self.check_url().await
    }
}

impl UrlProbe {
    #[tracing::instrument(name = "Check URL health", skip(self), fields(url = %self.url))]
    async fn check_url(&self) -> ProbeResult {
        let start = Instant::now();

        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let elapsed = start.elapsed().as_millis() as u64;
                let status = response.status();

                let result = if status.is_server_error() {
                    tracing::warn!("Endpoint returned status: {}", status);
                    ProbeResult::down(format!("Endpoint returned status: {}", status))
                } else {
                    ProbeResult::up()
                };

                result
                    .with_detail("url", self.url.as_str())
                    .with_detail("status_code", status.as_u16())
                    .with_detail("latency_ms", elapsed)
            }
            Err(e) => {
                tracing::warn!("URL health check failed: {:?}", e);
                ProbeResult::down(e.to_string()).with_detail("url", self.url.as_str())
            }
        }
    }
}
