use std::time::Duration;

const DEFAULT_MYSQL_PORT: u16 = 3306;
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_port: u16,
    pub app_host: String,
    pub health: HealthSettings,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct HealthSettings {
    pub path: String,
    /// Ceiling for a whole check cycle; also the default timeout of every probe.
    /// 0 means the 10 s default.
    pub timeout_secs: u64,
    #[serde(default)]
    pub databases: Vec<DatabaseProbeSettings>,
    #[serde(default)]
    pub urls: Vec<UrlProbeSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mysql,
    Postgres,
    Sqlite,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DatabaseProbeSettings {
    pub name: String,
    pub backend: DatabaseBackend,
    /// Full DSN; takes precedence over the individual connection fields
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database_name: Option<String>,
    /// SQLite file path or `:memory:`
    pub data_source: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct UrlProbeSettings {
    pub name: String,
    pub url: String,
    pub timeout_secs: Option<u64>,
}

impl HealthSettings {
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl DatabaseBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl DatabaseProbeSettings {
    // mysql://<username>:<password>@<host>:<port>/<database_name>
    // postgresql://<username>:<password>@<host>:<port>/<database_name>
    // sqlite:<data_source>
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        match self.backend {
            DatabaseBackend::Sqlite => format!(
                "sqlite:{}",
                self.data_source.as_deref().unwrap_or(":memory:")
            ),
            DatabaseBackend::Mysql => self.server_connection_string("mysql", DEFAULT_MYSQL_PORT),
            DatabaseBackend::Postgres => {
                self.server_connection_string("postgresql", DEFAULT_POSTGRES_PORT)
            }
        }
    }

    fn server_connection_string(&self, scheme: &str, default_port: u16) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            scheme,
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
            self.host.as_deref().unwrap_or("localhost"),
            self.port.unwrap_or(default_port),
            self.database_name.as_deref().unwrap_or_default(),
        )
    }

    pub fn timeout(&self, fallback: Duration) -> Duration {
        probe_timeout(self.timeout_secs, fallback)
    }
}

impl UrlProbeSettings {
    pub fn timeout(&self, fallback: Duration) -> Duration {
        probe_timeout(self.timeout_secs, fallback)
    }
}

// unset or 0 falls back to the health-wide timeout
fn probe_timeout(timeout_secs: Option<u64>, fallback: Duration) -> Duration {
    timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("app_host", "0.0.0.0")?
        .set_default("app_port", 8080)?
        .set_default("health.path", "/health")?
        .set_default("health.timeout_secs", DEFAULT_TIMEOUT_SECS)
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    builder()?
        // configuration.yaml / .json / .toml, if present
        .add_source(config::File::with_name("configuration").required(false))
        // e.g. APP_APP_PORT=9000, APP_HEALTH__TIMEOUT_SECS=3
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
