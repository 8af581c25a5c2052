//! Concrete probes for the backends a service usually depends on, and construction of
//! a [`ProbeRegistry`] from [`HealthSettings`].

mod database;
mod url;

pub use database::DatabaseProbe;
pub use url::UrlProbe;

use crate::configuration::HealthSettings;
use crate::health::{ProbeRegistry, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum ProbeSetupError {
    #[error("database probe `{name}`: {source}")]
    Database {
        name: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("url probe `{name}`: {source}")]
    Url {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Builds every configured probe and registers it under its configured name, in
/// configuration order: databases first, then URLs.
pub async fn init(settings: &HealthSettings) -> Result<ProbeRegistry, ProbeSetupError> {
    let timeout = settings.timeout();
    let registry = ProbeRegistry::new().with_timeout(timeout);

    for database in &settings.databases {
        let probe = DatabaseProbe::connect_lazy(database, timeout).map_err(|source| {
            ProbeSetupError::Database {
                name: database.name.clone(),
                source,
            }
        })?;
        registry.add_probe(&database.name, probe).await?;
    }

    for url in &settings.urls {
        let probe = UrlProbe::new(url.url.as_str(), url.timeout(timeout)).map_err(|source| {
            ProbeSetupError::Url {
                name: url.name.clone(),
                source,
            }
        })?;
        registry.add_probe(&url.name, probe).await?;
    }

    tracing::info!(
        probes = registry.len().await,
        timeout_secs = settings.timeout_secs,
        "Health probes initialized"
    );

    Ok(registry)
}
