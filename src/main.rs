use pulsecheck::configuration::get_configuration;
use pulsecheck::probes;
use pulsecheck::startup::run;
use pulsecheck::telemetry::{get_subscriber, init_subscriber};
use std::io::{Error, ErrorKind};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let subscriber = get_subscriber("pulsecheck".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber).map_err(|err| Error::new(ErrorKind::Other, err))?;

    let settings =
        get_configuration().map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;

    let registry = probes::init(&settings.health)
        .await
        .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;

    let address = format!("{}:{}", settings.app_host, settings.app_port);
    tracing::info!(
        health_path = %settings.health.path,
        "Start server at {:?}",
        &address
    );
    let listener = TcpListener::bind(&address)?;

    run(listener, registry, settings)?.await
}
