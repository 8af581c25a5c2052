use async_trait::async_trait;
use pulsecheck::configuration::{HealthSettings, Settings};
use pulsecheck::health::{Probe, ProbeRegistry, ProbeResult};
use std::time::Duration;

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub fn health_url(&self) -> String {
        format!("{}/health", self.address)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        health: HealthSettings {
            path: "/health".to_string(),
            timeout_secs: 5,
            databases: vec![],
            urls: vec![],
        },
    }
}

// the server runs on its own task, bound to a random port
pub async fn spawn_app(registry: ProbeRegistry) -> TestApp {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = pulsecheck::startup::run(listener, registry, test_settings())
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp { address }
}

/// Probe answering with a fixed result after an optional delay.
pub struct StaticProbe {
    result: ProbeResult,
    delay: Duration,
}

impl StaticProbe {
    pub fn up() -> Self {
        Self {
            result: ProbeResult::up(),
            delay: Duration::ZERO,
        }
    }

    pub fn down(error: &str) -> Self {
        Self {
            result: ProbeResult::down(error),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Probe for StaticProbe {
    async fn check(&self) -> ProbeResult {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}
